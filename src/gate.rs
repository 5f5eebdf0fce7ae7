//! Locked → Authenticating → Unlocked state machine.
//!
//! The gate decides which surface the host shows and whether privileged
//! actions may run. Unlocked is terminal: there is no way back to Locked
//! short of exiting the process.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::common::{ApplicationContext, GateError};
use crate::pipeline::{Action, ActionPipeline, PipelineOutcome};
use crate::presentation::{PresentationSink, Tone};
use crate::session::SessionClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Authenticating,
    Unlocked,
}

impl GateState {
    pub fn can_advance_to(self, next: GateState) -> bool {
        matches!(
            (self, next),
            (GateState::Locked, GateState::Authenticating)
                | (GateState::Authenticating, GateState::Unlocked)
                | (GateState::Authenticating, GateState::Locked)
        )
    }
}

pub struct GateController {
    client: SessionClient,
}

impl GateController {
    pub fn new(client: SessionClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    /// Open a session ahead of the first submit
    pub async fn prepare(&self, ctx: &mut ApplicationContext) {
        let (fingerprint, session) = ctx.login_parts();
        self.client.warm_up(session, fingerprint).await;
    }

    /// Submit a license key and return the resulting state
    pub async fn submit(
        &self,
        ctx: &mut ApplicationContext,
        key: &str,
        sink: &dyn PresentationSink,
    ) -> Result<GateState, GateError> {
        if ctx.gate() == GateState::Unlocked {
            return Ok(GateState::Unlocked);
        }

        let key = key.trim();
        if key.is_empty() {
            sink.status("Please enter a key.", Tone::Error);
            return Ok(ctx.gate());
        }

        ctx.advance(GateState::Authenticating)?;

        let result = {
            let (fingerprint, session) = ctx.login_parts();
            self.client.login(key, fingerprint, session).await
        };

        match result {
            Ok(()) => {
                ctx.advance(GateState::Unlocked)?;
                tracing::info!("gate unlocked");
                sink.status("Login successful!", Tone::Success);
                sink.transition();
            }
            Err(e) => {
                ctx.advance(GateState::Locked)?;
                sink.status(&e.to_string(), Tone::Error);
            }
        }

        Ok(ctx.gate())
    }

    /// Actions reachable in the current state
    pub fn menu<'a>(
        &self,
        ctx: &ApplicationContext,
        actions: &'a [Action],
    ) -> Result<&'a [Action], GateError> {
        match ctx.gate() {
            GateState::Unlocked => Ok(actions),
            _ => Err(GateError::Locked),
        }
    }

    /// Start `action` on a background task, only once unlocked
    pub fn launch<S>(
        &self,
        ctx: &ApplicationContext,
        pipeline: Arc<ActionPipeline>,
        action: Action,
        sink: S,
    ) -> Result<JoinHandle<PipelineOutcome>, GateError>
    where
        S: PresentationSink + 'static,
    {
        if ctx.gate() != GateState::Unlocked {
            tracing::warn!(action = %action.name, "launch refused while locked");
            return Err(GateError::Locked);
        }

        tracing::info!(action = %action.name, "launching action");
        sink.status("Downloading and preparing...", Tone::Pending);
        Ok(pipeline.spawn(action, sink))
    }
}
