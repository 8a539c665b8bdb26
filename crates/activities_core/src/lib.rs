//! Core library for the activities client.
//! Owns the activity model, the remote API contract and the client-side store.

pub mod api;
pub mod config;
pub mod logging;
pub mod model;
pub mod store;

pub use api::{ActivitiesApi, ApiError, ApiResult, HttpActivitiesApi, MemoryActivitiesApi};
pub use config::{ClientConfig, ConfigError, ConfigResult};
pub use logging::{
    default_log_level, init_client_logging, init_logging, logging_status, LoggingError,
};
pub use model::activity::{Activity, ActivityId, ActivityValidationError};
pub use store::activity_store::{
    ActivityStore, StoreError, StoreResult, StoreSnapshot, StoreWatcher,
};
pub use store::grouping::{group_by_date, DateGroup};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
