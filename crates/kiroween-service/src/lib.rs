//! Kiroween Service: the business rules shared by every resource kind.

pub mod service;

pub use service::ResourceService;
