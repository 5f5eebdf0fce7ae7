//! Wire format of the licensing backend.
//!
//! Requests are url-encoded forms POSTed to one endpoint and told apart by
//! their `type` field. Responses are JSON.

use serde::Deserialize;

use crate::device::DeviceFingerprint;
use crate::session::AppIdentity;
use crate::transport::Form;

#[derive(Debug, Deserialize)]
pub struct InitResponse {
    #[serde(default)]
    pub success: bool,
    pub sessionid: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LicenseResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

pub fn init_form(app: &AppIdentity, fingerprint: &DeviceFingerprint) -> Form {
    vec![
        ("type", "init".to_string()),
        ("name", app.name.clone()),
        ("ownerid", app.owner_id.clone()),
        ("version", app.version.clone()),
        ("hwid", fingerprint.to_string()),
    ]
}

pub fn license_form(
    app: &AppIdentity,
    key: &str,
    fingerprint: &DeviceFingerprint,
    session_id: &str,
) -> Form {
    vec![
        ("type", "license".to_string()),
        ("key", key.to_string()),
        ("hwid", fingerprint.to_string()),
        ("sessionid", session_id.to_string()),
        ("name", app.name.clone()),
        ("ownerid", app.owner_id.clone()),
    ]
}
