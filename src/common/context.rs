use crate::common::GateError;
use crate::device::DeviceFingerprint;
use crate::gate::GateState;
use crate::session::Session;

/// Mutable state of one running gate. Single owner: the event loop.
#[derive(Debug)]
pub struct ApplicationContext {
    session: Session,
    gate: GateState,
    fingerprint: DeviceFingerprint,
}

impl ApplicationContext {
    pub fn new(fingerprint: DeviceFingerprint) -> Self {
        Self {
            session: Session::new(),
            gate: GateState::Locked,
            fingerprint,
        }
    }

    pub fn gate(&self) -> GateState {
        self.gate
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn fingerprint(&self) -> &DeviceFingerprint {
        &self.fingerprint
    }

    /// Split borrow for login: the session is written while the
    /// fingerprint is read
    pub(crate) fn login_parts(&mut self) -> (&DeviceFingerprint, &mut Session) {
        (&self.fingerprint, &mut self.session)
    }

    pub(crate) fn advance(&mut self, next: GateState) -> Result<(), GateError> {
        if !self.gate.can_advance_to(next) {
            return Err(GateError::InvalidTransition {
                from: self.gate,
                to: next,
            });
        }
        tracing::debug!(from = ?self.gate, to = ?next, "gate transition");
        self.gate = next;
        Ok(())
    }
}
