//! Kiroween Core: domain models, field schemas, validation, repository
//! traits, and error types shared by every generated app.

pub mod error;
pub mod models;
pub mod repository;
pub mod schema;
pub mod validation;

pub use error::{KiroweenError, KiroweenResult};
pub use models::{Resource, ResourceKind};
pub use validation::Validated;
