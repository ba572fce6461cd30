// ============================================================================
// coindash - Library
// ============================================================================
// Terminal dashboard client for the crypto investment analysis service.
// Exposes the modules for integration tests and examples.
// ============================================================================

pub mod api;    // REST client for the prediction / ingestion service
pub mod app;    // Application state (tabs, forms, last prediction)
pub mod config; // Runtime configuration (service base URL)
pub mod models; // Payload structures exchanged with the service
pub mod ui;     // Terminal user interface
