pub mod config;
pub mod context;
pub mod errors;

pub use config::GateConfig;
pub use context::ApplicationContext;
pub use errors::{
    ConfigError, ConnectionError, FetchError, GateError, LoginError, SpawnError, TransportError,
};
