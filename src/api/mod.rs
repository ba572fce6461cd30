// ============================================================================
// Module : api
// ============================================================================
// REST client for the prediction / ingestion service.
// ============================================================================

pub mod client;

// Re-export the main types
pub use client::{ApiClient, ApiError};
