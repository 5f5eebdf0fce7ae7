mod client;
pub mod protocol;

pub use client::{SessionClient, TEST_KEY};

use crate::device::DeviceFingerprint;

/// Application registration on the licensing backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub name: String,
    pub owner_id: String,
    pub version: String,
}

/// Server-issued session. Lives for one process run, never persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    session_id: Option<String>,
    initialized: bool,
    // fingerprint the session was opened for
    bound_to: Option<DeviceFingerprint>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn opened(session_id: String, fingerprint: DeviceFingerprint) -> Self {
        Self {
            session_id: Some(session_id),
            initialized: true,
            bound_to: Some(fingerprint),
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Usable for a license check from `fingerprint`
    pub fn is_valid_for(&self, fingerprint: &DeviceFingerprint) -> bool {
        self.initialized
            && self.session_id.is_some()
            && self.bound_to.as_ref() == Some(fingerprint)
    }
}
