//! Application state management

use database::mongodb::Client;
use database::redis::ConnectionManager;

/// Shared application state
///
/// Exactly one backing connection is populated, matching the configured
/// source mode.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo: Option<Client>,
    pub redis: Option<ConnectionManager>,
}
