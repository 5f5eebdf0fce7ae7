//! Fetch-then-execute pipeline behind every privileged action.
//!
//! Artifacts are fetched strictly in order and the first failure ends the
//! run: nothing after it is fetched and nothing is launched. Only when every
//! artifact is on disk is the executable started, after which the host is
//! told to quit whether or not the launch worked.

mod artifact;
mod launcher;

pub use artifact::{Action, ArtifactDescriptor};
pub use launcher::{DetachedLauncher, Launcher};

use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::common::FetchError;
use crate::presentation::{PresentationSink, Tone};
use crate::transport::Transport;

/// Result of fetching one artifact
#[derive(Debug)]
pub enum ArtifactOutcome {
    Fetched(PathBuf),
    FetchFailed(FetchError),
}

#[derive(Debug)]
pub enum PipelineOutcome {
    AllFetched,
    AbortedAt { index: usize, reason: FetchError },
}

impl PipelineOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, PipelineOutcome::AllFetched)
    }
}

pub struct ActionPipeline {
    transport: Arc<dyn Transport>,
    launcher: Arc<dyn Launcher>,
}

impl ActionPipeline {
    pub fn new(transport: Arc<dyn Transport>, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            transport,
            launcher,
        }
    }

    /// Run `action` on its own task. The only concurrent path in the gate.
    pub fn spawn<S>(self: Arc<Self>, action: Action, sink: S) -> JoinHandle<PipelineOutcome>
    where
        S: PresentationSink + 'static,
    {
        tokio::spawn(async move {
            self.run(
                &action.artifacts,
                &action.executable,
                &action.arguments,
                &sink,
            )
            .await
        })
    }

    pub async fn run(
        &self,
        artifacts: &[ArtifactDescriptor],
        executable: &ArtifactDescriptor,
        arguments: &[String],
        sink: &dyn PresentationSink,
    ) -> PipelineOutcome {
        for (index, artifact) in artifacts.iter().enumerate() {
            match self.fetch(artifact).await {
                ArtifactOutcome::Fetched(path) => {
                    tracing::info!(index, path = %path.display(), "artifact saved");
                }
                ArtifactOutcome::FetchFailed(reason) => {
                    tracing::error!(index, error = %reason, "pipeline aborted");
                    sink.status(&format!("Download Error: {reason}"), Tone::Error);
                    return PipelineOutcome::AbortedAt { index, reason };
                }
            }
        }

        self.execute(executable, arguments, sink);
        PipelineOutcome::AllFetched
    }

    /// GET, create the directory, write. Stops at the first failing step.
    pub async fn fetch(&self, artifact: &ArtifactDescriptor) -> ArtifactOutcome {
        let file = artifact.file_name.as_str();

        let bytes = match self.transport.get_bytes(&artifact.source_url).await {
            Ok(bytes) => bytes,
            Err(source) => {
                return ArtifactOutcome::FetchFailed(FetchError::Network {
                    file: file.to_string(),
                    source,
                })
            }
        };

        if let Err(e) = tokio::fs::create_dir_all(&artifact.destination_directory).await {
            return ArtifactOutcome::FetchFailed(FetchError::from_io(file, e));
        }

        let path = artifact.local_path();
        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            return ArtifactOutcome::FetchFailed(FetchError::from_io(file, e));
        }

        tracing::debug!(file, bytes = bytes.len(), "fetched");
        ArtifactOutcome::Fetched(path)
    }

    fn execute(&self, executable: &ArtifactDescriptor, arguments: &[String], sink: &dyn PresentationSink) {
        let program = executable.local_path();
        let args = artifact::expand_arguments(arguments, &executable.destination_directory);

        if let Err(e) = self.launcher.spawn_detached(&program, &args) {
            // host still exits as if the launch succeeded
            tracing::warn!(error = %e, "launch failed, exiting anyway");
        }

        sink.quit();
    }
}
