use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A remote file and where it lands on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    pub source_url: String,
    pub file_name: String,
    pub destination_directory: PathBuf,
}

impl ArtifactDescriptor {
    pub fn local_path(&self) -> PathBuf {
        self.destination_directory.join(&self.file_name)
    }
}

/// Privileged menu entry: fetch `artifacts` in order, then launch `executable`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub label: String,

    /// Question the host asks before starting, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm: Option<String>,

    pub artifacts: Vec<ArtifactDescriptor>,
    pub executable: ArtifactDescriptor,

    /// `{dir}` expands to the executable's destination directory
    #[serde(default)]
    pub arguments: Vec<String>,
}

pub(crate) fn expand_arguments(arguments: &[String], dir: &Path) -> Vec<String> {
    let dir = dir.to_string_lossy();
    arguments
        .iter()
        .map(|arg| arg.replace("{dir}", &dir))
        .collect()
}
