//! HTTP route handlers.

pub mod health;
pub mod upload;

pub use health::{health, health_routes, version, HealthResponse, VersionResponse};
pub use upload::{index, upload, upload_routes};
