//! License-gated action launcher.
//!
//! A device fingerprint binds a licensing session; a successful license
//! check unlocks a menu of actions, each of which downloads its artifacts
//! and launches one of them before the host exits.

pub mod common;
pub mod device;
pub mod gate;
pub mod pipeline;
pub mod presentation;
pub mod session;
pub mod transport;
pub mod ui;
pub mod utils;

pub use common::{ApplicationContext, GateConfig};
pub use device::{DeviceFingerprint, DeviceIdentity};
pub use gate::{GateController, GateState};
pub use pipeline::{Action, ActionPipeline, ArtifactDescriptor, PipelineOutcome};
pub use presentation::{ChannelSink, PresentationSink, Tone, UiEvent};
pub use session::{Session, SessionClient};
