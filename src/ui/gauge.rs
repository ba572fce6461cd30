// ============================================================================
// Risk gauge
// ============================================================================
// Renders the prediction score as a gauge with a risk-dependent color and a
// percentage overlay.
//
// Pure mapping, deterministic for a given (score, risk) pair:
// - fill ratio  = score clamped to [0, 1]
// - color       = red for "high", amber for "medium", green otherwise
// - label       = "{round(score * 100)}% {RISK} RISK"
// ============================================================================

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::models::{PredictionResult, RiskLevel};

/// Fill color for a risk category.
pub fn risk_color(risk: RiskLevel) -> Color {
    match risk {
        RiskLevel::High => Color::Red,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::Low => Color::Green,
    }
}

/// Overlay text: rounded percentage and upper-cased risk label.
pub fn gauge_label(score: f64, risk: &str) -> String {
    let percent = (score * 100.0).round() as i64;
    format!("{}% {} RISK", percent, risk.to_uppercase())
}

/// Draws the risk gauge for a prediction.
pub fn render_risk_gauge(frame: &mut Frame, prediction: &PredictionResult, area: Rect) {
    let color = risk_color(prediction.risk_level());

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Risk Score "),
        )
        .gauge_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .ratio(prediction.clamped_score())
        .label(gauge_label(prediction.score, &prediction.risk));

    frame.render_widget(gauge, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mapping() {
        // Red iff "high", amber iff "medium", green otherwise
        assert_eq!(risk_color(RiskLevel::from_label("high")), Color::Red);
        assert_eq!(risk_color(RiskLevel::from_label("medium")), Color::Yellow);
        assert_eq!(risk_color(RiskLevel::from_label("low")), Color::Green);
        assert_eq!(risk_color(RiskLevel::from_label("unknown")), Color::Green);
        assert_eq!(risk_color(RiskLevel::from_label("")), Color::Green);
    }

    #[test]
    fn test_gauge_label_rounding() {
        assert_eq!(gauge_label(0.82, "high"), "82% HIGH RISK");
        assert_eq!(gauge_label(0.5, "medium"), "50% MEDIUM RISK");
        assert_eq!(gauge_label(0.005, "low"), "1% LOW RISK");
        assert_eq!(gauge_label(0.004, "low"), "0% LOW RISK");
        assert_eq!(gauge_label(1.0, "low"), "100% LOW RISK");
    }

    #[test]
    fn test_gauge_label_uppercases_any_risk() {
        assert_eq!(gauge_label(0.3, "elevated"), "30% ELEVATED RISK");
    }

    #[test]
    fn test_ratio_stays_in_range_for_rogue_scores() {
        let mut prediction = PredictionResult {
            score: 1.7,
            risk: "high".to_string(),
            predictions: serde_json::Value::Null,
        };
        assert_eq!(prediction.clamped_score(), 1.0);

        prediction.score = -2.0;
        assert_eq!(prediction.clamped_score(), 0.0);
    }

    #[test]
    fn test_btc_example() {
        // {score: 0.82, risk: "high"} renders red at 82%
        let prediction = PredictionResult {
            score: 0.82,
            risk: "high".to_string(),
            predictions: serde_json::json!({"1d": "down"}),
        };

        assert_eq!(risk_color(prediction.risk_level()), Color::Red);
        assert_eq!(
            gauge_label(prediction.score, &prediction.risk),
            "82% HIGH RISK"
        );
        assert_eq!(prediction.clamped_score(), 0.82);
    }
}
