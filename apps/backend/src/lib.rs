#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod infra;
pub mod realtime;
pub mod repos;
pub mod services;
pub mod state;


// Re-exports for public API
pub use config::EngineConfig;
pub use error::AppError;
pub use errors::ErrorCode;
pub use infra::state::{build_state, StateBuilder};
pub use services::GameFlowService;
pub use state::app_state::AppState;

// Prelude for test convenience
pub mod prelude {
    pub use super::config::*;
    pub use super::domain::*;
    pub use super::error::*;
    pub use super::realtime::*;
    pub use super::state::app_state::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
