// ============================================================================
// Structure : OhlcvRecord
// ============================================================================
// A single time-bucketed market data record (Open / High / Low / Close /
// Volume) submitted to POST /api/v1/ohlcv.
//
// The contract is deliberately thin: the five numeric fields must be finite,
// the timestamp is passed through as an ISO-8601-like string, and ordering
// constraints (low <= close <= high, ...) are left to the service.
// ============================================================================

use serde::Serialize;

/// One OHLCV market data record, as accepted by the ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcvRecord {
    /// Asset identifier (ex: "BTC", "ETH").
    pub asset_id: String,

    /// Bucket timestamp, ISO-8601-like (ex: "2024-01-01T00:00:00").
    /// Not validated client-side; the service owns the format.
    pub timestamp: String,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_record() {
        let record = OhlcvRecord {
            asset_id: "BTC".to_string(),
            timestamp: "2024-01-01T00:00:00".to_string(),
            open: 42000.0,
            high: 43500.0,
            low: 41800.0,
            close: 43210.5,
            volume: 1234.56,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["asset_id"], "BTC");
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00");
        assert_eq!(json["open"], 42000.0);
        assert_eq!(json["high"], 43500.0);
        assert_eq!(json["low"], 41800.0);
        assert_eq!(json["close"], 43210.5);
        assert_eq!(json["volume"], 1234.56);
    }
}
