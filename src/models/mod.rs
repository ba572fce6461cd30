// ============================================================================
// Module : models
// ============================================================================
// Data structures exchanged with the prediction / ingestion service.
// ============================================================================

pub mod ohlcv;      // OHLCV market data record (ingestion payload)
pub mod prediction; // Prediction result and risk classification

// Re-export the main structures to simplify imports
pub use ohlcv::OhlcvRecord;
pub use prediction::{PredictionResult, PredictionSnapshot, RiskLevel};
