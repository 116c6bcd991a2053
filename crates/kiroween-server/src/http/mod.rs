//! HTTP layer: response envelope, resource controllers, error
//! translation, health check and middleware.

pub mod controller;
pub mod envelope;
pub mod error;
pub mod health;
pub mod middleware;

pub use controller::resource_router;
pub use envelope::{ApiResponse, PageMeta};
pub use error::ApiError;
