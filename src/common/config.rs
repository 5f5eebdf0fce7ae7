use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::common::errors::ConfigError;
use crate::pipeline::Action;
use crate::session::AppIdentity;
use crate::utils::security::validate_filename;

pub const DEFAULT_API_URL: &str = "https://keyauth.win/api/1.3/";
pub const CONFIG_FILE_NAME: &str = "keygate.toml";
pub const ENV_PREFIX: &str = "KEYGATE_";

/// Gate configuration
/// Defaults < config file < KEYGATE_* environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Licensing endpoint, every protocol request is POSTed here
    pub api_url: String,
    pub app_name: String,
    pub owner_id: String,
    pub version: String,

    /// Accept the literal test key without contacting the backend.
    /// This is an authentication bypass, never enable it in a shipped config.
    pub allow_test_key: bool,

    /// None keeps the transport default (no timeout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    pub actions: Vec<Action>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            app_name: String::new(),
            owner_id: String::new(),
            version: "1.0".to_string(),
            allow_test_key: false,
            request_timeout_secs: None,
            actions: Vec::new(),
        }
    }
}

impl GateConfig {
    /// Load from an explicit file, or from the user config dir and the
    /// working directory when none is given
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(GateConfig::default()));

        match explicit {
            Some(path) => {
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = user_config_path() {
                    figment = figment.merge(Toml::file(path));
                }
                figment = figment.merge(Toml::file(CONFIG_FILE_NAME));
            }
        }

        let config: GateConfig = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(Box::new)?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::Missing("app_name"));
        }
        if self.owner_id.trim().is_empty() {
            return Err(ConfigError::Missing("owner_id"));
        }
        if self.version.trim().is_empty() {
            return Err(ConfigError::Missing("version"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl);
        }

        let mut seen = HashSet::new();
        for action in &self.actions {
            if !seen.insert(action.name.as_str()) {
                return Err(ConfigError::DuplicateAction(action.name.clone()));
            }
            if action.artifacts.is_empty() {
                return Err(ConfigError::EmptyAction(action.name.clone()));
            }

            // only ever launch a file this run downloaded
            let program = action.executable.local_path();
            if !action.artifacts.iter().any(|a| a.local_path() == program) {
                return Err(ConfigError::UnfetchedExecutable {
                    action: action.name.clone(),
                    file_name: action.executable.file_name.clone(),
                });
            }

            let names = action
                .artifacts
                .iter()
                .chain(std::iter::once(&action.executable))
                .map(|a| a.file_name.as_str());
            for file_name in names {
                validate_filename(file_name).map_err(|source| ConfigError::InvalidFileName {
                    action: action.name.clone(),
                    file_name: file_name.to_string(),
                    source,
                })?;
            }
        }

        Ok(())
    }

    pub fn identity(&self) -> AppIdentity {
        AppIdentity {
            name: self.app_name.clone(),
            owner_id: self.owner_id.clone(),
            version: self.version.clone(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }
}

/// Platform config location, e.g. ~/.config/keygate/keygate.toml
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "keygate").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
