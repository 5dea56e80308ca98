use serde::{Deserialize, Serialize};

mod config;
mod error;
mod snapshot;

pub use config::*;
pub use error::DashboardError;
pub use snapshot::*;

// ===== MESSAGE TYPES =====

/// Messages from the dashboard page to the server that hosts it.
///
/// Snapshot fetching and session variables go through the plain HTTP
/// endpoints named in `EndpointsSection`, not through this channel.
#[derive(Serialize, Deserialize, Debug)]
pub enum UpMsg {
    LoadConfig,
}

#[derive(Serialize, Deserialize, Debug)]
pub enum DownMsg {
    ConfigLoaded(DashboardConfig),
    ConfigError(String),
}
