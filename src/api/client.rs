// ============================================================================
// API Client : prediction / ingestion service
// ============================================================================
// REST client for the crypto investment analysis service.
//
// Two operations:
// - GET  {base}/predict/{ticker}  -> PredictionResult
// - POST {base}/api/v1/ohlcv      -> 2xx on success
//
// Failures are reported through a tagged ApiError (Network / Http / Decode)
// so the UI can show distinct messages instead of a single opaque "error"
// flag.
// ============================================================================

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::models::{OhlcvRecord, PredictionResult};

/// Errors produced by calls to the analysis service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: connection refused, DNS, timeout, ...
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned HTTP {0}")]
    Http(StatusCode),

    /// The response body could not be decoded as the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client for the prediction / ingestion service.
///
/// Holds a single reqwest::Client so connections are pooled across calls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// URL of the prediction endpoint for a ticker.
    fn predict_url(&self, ticker: &str) -> String {
        format!("{}/predict/{}", self.base_url, ticker)
    }

    /// URL of the OHLCV ingestion endpoint.
    fn ohlcv_url(&self) -> String {
        format!("{}/api/v1/ohlcv", self.base_url)
    }

    /// Fetches the latest prediction for a ticker.
    #[instrument(skip(self))]
    pub async fn fetch_prediction(&self, ticker: &str) -> Result<PredictionResult, ApiError> {
        let url = self.predict_url(ticker);
        debug!(url = %url, "Requesting prediction");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();
        debug!(status = %status, "Received prediction response");

        if !status.is_success() {
            error!(ticker = %ticker, status = %status, "Prediction request rejected");
            return Err(ApiError::Http(status));
        }

        let prediction: PredictionResult =
            response.json().await.map_err(ApiError::Decode)?;

        info!(
            ticker = %ticker,
            score = prediction.score,
            risk = %prediction.risk,
            "Prediction fetched"
        );
        Ok(prediction)
    }

    /// Submits one OHLCV record to the ingestion endpoint.
    ///
    /// Any 2xx answer is a success; the body, if any, is ignored.
    #[instrument(skip(self, record), fields(asset_id = %record.asset_id))]
    pub async fn submit_ohlcv(&self, record: &OhlcvRecord) -> Result<(), ApiError> {
        let url = self.ohlcv_url();
        debug!(url = %url, timestamp = %record.timestamp, "Submitting OHLCV record");

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();
        debug!(status = %status, "Received ingestion response");

        if !status.is_success() {
            error!(asset_id = %record.asset_id, status = %status, "Ingestion rejected");
            return Err(ApiError::Http(status));
        }

        info!(asset_id = %record.asset_id, "OHLCV record accepted");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_url() {
        let client = ApiClient::new("http://localhost:8000");
        assert_eq!(
            client.predict_url("BTC"),
            "http://localhost:8000/predict/BTC"
        );
    }

    #[test]
    fn test_ohlcv_url() {
        let client = ApiClient::new("http://api.internal:9000");
        assert_eq!(
            client.ohlcv_url(),
            "http://api.internal:9000/api/v1/ohlcv"
        );
    }

    #[test]
    fn test_error_display_is_distinct() {
        let http = ApiError::Http(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(http.to_string(), "service returned HTTP 500 Internal Server Error");
    }

    // Network path test against an unroutable endpoint: verifies the
    // transport failure is tagged as Network, not collapsed into a panic.
    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        // Port 1 is essentially never listening locally
        let client = ApiClient::new("http://127.0.0.1:1");
        let result = client.fetch_prediction("BTC").await;

        match result {
            Err(ApiError::Network(_)) => {}
            other => panic!("expected network error, got {:?}", other.map(|p| p.score)),
        }
    }
}
