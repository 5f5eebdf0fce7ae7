//! Device fingerprinting for license binding.
//!
//! The fingerprint is a SHA-256 digest of the machine's hardware identifier
//! (a network interface MAC address). It is sent to the licensing backend as
//! the `hwid` field and is only ever compared, never decoded.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use sysinfo::Networks;

/// Hex SHA-256 digest identifying this machine
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceFingerprint(String);

impl DeviceFingerprint {
    pub fn from_hardware_id(id: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(id)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the raw hardware identifier comes from
pub trait HardwareSource {
    fn hardware_id(&self) -> Option<Vec<u8>>;
}

/// Reads the MAC address of the first interface (by name) that has one
pub struct SystemHardware;

impl HardwareSource for SystemHardware {
    fn hardware_id(&self) -> Option<Vec<u8>> {
        let networks = Networks::new_with_refreshed_list();

        let mut candidates: Vec<(String, [u8; 6])> = networks
            .iter()
            .map(|(name, data)| (name.clone(), data.mac_address()))
            .filter(|(_, mac)| !mac.is_unspecified())
            .map(|(name, mac)| (name, mac.0))
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        candidates.into_iter().next().map(|(name, mut mac)| {
            tracing::debug!(interface = %name, "hardware identifier source");
            // little-endian 48-bit node id
            mac.reverse();
            mac.to_vec()
        })
    }
}

/// Fixed identifier, for tests and for hosts without a usable NIC
pub struct StaticHardware(pub Vec<u8>);

impl HardwareSource for StaticHardware {
    fn hardware_id(&self) -> Option<Vec<u8>> {
        Some(self.0.clone())
    }
}

/// Stable identity of the running machine
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    fingerprint: DeviceFingerprint,
}

impl DeviceIdentity {
    /// Startup precondition: fails only when no hardware identifier exists
    pub fn detect() -> Result<Self> {
        Self::from_source(&SystemHardware)
    }

    pub fn from_source(source: &impl HardwareSource) -> Result<Self> {
        let id = source
            .hardware_id()
            .filter(|id| !id.is_empty())
            .context("no hardware identifier available for device fingerprinting")?;

        Ok(Self {
            fingerprint: DeviceFingerprint::from_hardware_id(&id),
        })
    }

    pub fn fingerprint(&self) -> DeviceFingerprint {
        self.fingerprint.clone()
    }
}
