//! HTTP handlers for the story service.

pub mod health;
pub mod metrics;
pub mod story;

use service_core::error::AppError;

/// Message for any route or method the service does not serve.
pub const ROUTE_NOT_FOUND: &str = "Route not found.";

/// Fallback for unknown routes and unsupported methods.
pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!(ROUTE_NOT_FOUND))
}
