use std::path::Path;
use std::process::{Command, Stdio};

use crate::common::SpawnError;

/// Capability to start a program as an independent process
pub trait Launcher: Send + Sync {
    fn spawn_detached(&self, program: &Path, args: &[String]) -> Result<(), SpawnError>;
}

/// Launches through the OS with no captured output and no lifetime coupling
pub struct DetachedLauncher;

impl Launcher for DetachedLauncher {
    fn spawn_detached(&self, program: &Path, args: &[String]) -> Result<(), SpawnError> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // own process group, so it survives the host's terminal closing
            command.process_group(0);
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;
            command.creation_flags(CREATE_NEW_CONSOLE);
        }

        // Child handle dropped without waiting
        let child = command.spawn().map_err(|source| SpawnError {
            program: program.to_path_buf(),
            source,
        })?;
        tracing::info!(pid = child.id(), program = %program.display(), "launched");
        Ok(())
    }
}
