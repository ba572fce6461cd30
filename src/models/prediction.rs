// ============================================================================
// Structure : PredictionResult
// ============================================================================
// Payload returned by GET /predict/{ticker}. The service reports a score in
// [0, 1], a textual risk category and an arbitrary JSON blob of per-model
// predictions that the UI shows verbatim.
//
// The service does not guarantee that score stays in range or that risk is
// one of the sanctioned labels, so the accessors here normalise defensively:
// the score is clamped for rendering (the raw value stays visible in the
// verbatim dump) and unknown risk labels degrade to Low.
// ============================================================================

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Risk category derived from the service's `risk` label.
///
/// Only the exact lowercase labels "high" and "medium" are special; any
/// other string, including "low" and unrecognized values, maps to Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classifies a raw risk label from the service.
    pub fn from_label(label: &str) -> Self {
        match label {
            "high" => RiskLevel::High,
            "medium" => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

/// Prediction returned by the analysis service for a single ticker.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionResult {
    /// Risk score, expected (but not guaranteed) to be in [0, 1].
    pub score: f64,

    /// Risk label. Open set: the service may send anything.
    pub risk: String,

    /// Per-model predictions, shown verbatim. Arbitrary JSON.
    pub predictions: serde_json::Value,
}

impl PredictionResult {
    /// Risk category for color selection.
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_label(&self.risk)
    }

    /// Score clamped to [0, 1] for gauge rendering.
    ///
    /// A non-finite score (NaN, infinities) degrades to 0.0 rather than
    /// poisoning the gauge ratio.
    pub fn clamped_score(&self) -> f64 {
        if self.score.is_finite() {
            self.score.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A prediction together with the ticker it answers and when it arrived.
///
/// The App root keeps the latest snapshot so the Predictions pane can show
/// it after the user navigates away from Overview.
#[derive(Debug, Clone)]
pub struct PredictionSnapshot {
    pub ticker: String,
    pub result: PredictionResult,
    pub fetched_at: DateTime<Utc>,
}

impl PredictionSnapshot {
    pub fn new(ticker: String, result: PredictionResult) -> Self {
        Self {
            ticker,
            result,
            fetched_at: Utc::now(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
