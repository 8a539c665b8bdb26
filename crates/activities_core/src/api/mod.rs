//! Remote activities API contract and implementations.
//!
//! # Responsibility
//! - Define the async collaborator contract the store depends on.
//! - Keep transport details (HTTP, in-process) behind that contract.
//!
//! # Invariants
//! - Implementations never panic; every failure is an `ApiError`.
//! - Id-addressed calls report a missing record as `ApiError::NotFound`.

use crate::model::activity::{Activity, ActivityId};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod http;
pub mod memory;

pub use http::HttpActivitiesApi;
pub use memory::MemoryActivitiesApi;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure reported by an activities API implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection, timeout or I/O failure before a response arrived.
    Transport(String),
    /// The server answered with a non-success status.
    Status { status: u16, url: String },
    /// The response body could not be decoded.
    Decode(String),
    /// The addressed activity does not exist.
    NotFound(ActivityId),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Status { status, url } => {
                write!(f, "request to {url} failed with status {status}")
            }
            Self::Decode(message) => write!(f, "invalid response body: {message}"),
            Self::NotFound(id) => write!(f, "activity not found: {id}"),
        }
    }
}

impl Error for ApiError {}

/// Async contract for the `activities` resource.
#[async_trait]
pub trait ActivitiesApi: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<Activity>>;
    async fn details(&self, id: &str) -> ApiResult<Activity>;
    async fn create(&self, activity: &Activity) -> ApiResult<()>;
    async fn update(&self, activity: &Activity) -> ApiResult<()>;
    async fn delete(&self, id: &str) -> ApiResult<()>;
}

#[async_trait]
impl<T: ActivitiesApi + ?Sized> ActivitiesApi for std::sync::Arc<T> {
    async fn list(&self) -> ApiResult<Vec<Activity>> {
        (**self).list().await
    }

    async fn details(&self, id: &str) -> ApiResult<Activity> {
        (**self).details(id).await
    }

    async fn create(&self, activity: &Activity) -> ApiResult<()> {
        (**self).create(activity).await
    }

    async fn update(&self, activity: &Activity) -> ApiResult<()> {
        (**self).update(activity).await
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        (**self).delete(id).await
    }
}
