use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("name contains parent directory (..)")]
    ContainsParentDir,

    #[error("name is an absolute path")]
    AbsolutePath,

    #[error("name contains invalid component")]
    InvalidComponent,

    #[error("name contains null byte")]
    NullByte,

    #[error("name is empty")]
    Empty,

    #[error("name contains directory separator")]
    ContainsDirectorySeparator,
}

//=====================
// Artifact file names
//=====================

/// Artifact names are joined onto a destination directory,
/// so they must be a single plain path component
pub fn validate_filename(filename: &str) -> Result<(), ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::Empty);
    }

    // \0 ends the string early once it reaches the OS
    if filename.contains('\0') {
        return Err(ValidationError::NullByte);
    }

    for component in Path::new(filename).components() {
        match component {
            Component::Normal(_) => continue,
            Component::ParentDir => return Err(ValidationError::ContainsParentDir),
            Component::RootDir => return Err(ValidationError::AbsolutePath),
            Component::CurDir => return Err(ValidationError::ContainsDirectorySeparator),
            Component::Prefix(_) => return Err(ValidationError::InvalidComponent), // Windows
        }
    }

    // checked on every platform, Path only splits on '\' under Windows
    if filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::ContainsDirectorySeparator);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename_parent_directory() {
        assert!(matches!(
            validate_filename("../Loader.exe"),
            Err(ValidationError::ContainsParentDir)
        ));
        assert!(matches!(
            validate_filename("bin/../../etc/passwd"),
            Err(ValidationError::ContainsParentDir)
        ));
        assert!(matches!(
            validate_filename(".."),
            Err(ValidationError::ContainsParentDir)
        ));
    }

    #[test]
    fn test_validate_filename_absolute_path() {
        assert!(matches!(
            validate_filename("/usr/bin/tool"),
            Err(ValidationError::AbsolutePath)
        ));
        assert!(matches!(
            validate_filename("/"),
            Err(ValidationError::AbsolutePath)
        ));
    }

    #[test]
    fn test_validate_filename_null_byte() {
        assert!(matches!(
            validate_filename("helper\0.exe"),
            Err(ValidationError::NullByte)
        ));
    }

    #[test]
    fn test_validate_filename_empty() {
        assert!(matches!(validate_filename(""), Err(ValidationError::Empty)));
        assert!(matches!(validate_filename("   "), Err(ValidationError::Empty)));
    }

    #[test]
    fn test_validate_filename_rejects_directory_separators() {
        assert!(matches!(
            validate_filename("bin/helper.exe"),
            Err(ValidationError::ContainsDirectorySeparator)
        ));
        assert!(matches!(
            validate_filename("./helper.exe"),
            Err(ValidationError::ContainsDirectorySeparator)
        ));
        assert!(matches!(
            validate_filename("bin\\helper.exe"),
            Err(ValidationError::ContainsDirectorySeparator)
        ));
    }

    #[test]
    fn test_validate_filename_valid() {
        assert!(validate_filename("helper.exe").is_ok());
        assert!(validate_filename("driver-v2_final.sys").is_ok());
        assert!(validate_filename("my tool.bin").is_ok());
        assert!(validate_filename(".env").is_ok());
    }
}
