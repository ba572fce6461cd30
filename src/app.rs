// ============================================================================
// Structure : App
// ============================================================================
// Global state of the TUI application.
//
// The App owns:
// - the navigation shell (five fixed tabs, exactly one active),
// - the per-pane form state (ticker lookup on Overview, OHLCV ingestion),
// - the last prediction snapshot shared by Overview and Predictions,
// - the usual TUI plumbing (running flag, two-step quit, loading indicator).
//
// All UI components read from App; all mutations go through its methods.
// ============================================================================

use tracing::debug;

use crate::models::{OhlcvRecord, PredictionResult, PredictionSnapshot};

// ============================================================================
// Enum : Tab
// ============================================================================

/// The five fixed panes of the dashboard, in display order.
///
/// Exactly one tab is active at a time; switching tabs discards the
/// ephemeral state of the pane being left (unmount semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Ingestion,
    Predictions,
    Analytics,
    Settings,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Ingestion,
        Tab::Predictions,
        Tab::Analytics,
        Tab::Settings,
    ];

    /// Label shown in the tab bar.
    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Ingestion => "Data Ingestion",
            Tab::Predictions => "Model Predictions",
            Tab::Analytics => "Analytics",
            Tab::Settings => "Settings",
        }
    }

    /// Position in the tab bar (0..4).
    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Tab at a given position, if within 0..4.
    pub fn from_index(index: usize) -> Option<Tab> {
        Tab::ALL.get(index).copied()
    }

    /// Next tab, wrapping after Settings.
    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    /// Previous tab, wrapping before Overview.
    pub fn previous(self) -> Tab {
        let len = Tab::ALL.len();
        Tab::ALL[(self.index() + len - 1) % len]
    }
}

// ============================================================================
// Form state
// ============================================================================

/// Lifecycle of a form submission.
///
/// Submitting doubles as the in-flight guard: while a request is pending the
/// form refuses a second submit, so concurrent submits cannot race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Success,
    Error(String),
}

impl FormStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, FormStatus::Submitting)
    }
}

/// Errors detected client-side before a form is dispatched.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} is not a valid number")]
    InvalidNumber(&'static str),
}

/// Ticker lookup form (Overview pane).
#[derive(Debug, Clone)]
pub struct TickerForm {
    /// Current input buffer.
    pub input: String,

    /// Submission status, shown as a banner on the Overview pane.
    pub status: FormStatus,

    /// Monotonic sequence number of the latest submit. Only the response
    /// carrying this value is applied (last-request-wins).
    pub seq: u64,
}

impl TickerForm {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            status: FormStatus::Idle,
            seq: 0,
        }
    }

    pub fn append_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Resets the form to its initial state (pane unmount).
    ///
    /// The sequence number is bumped so a response still in flight no
    /// longer matches and lands as a no-op.
    pub fn reset(&mut self) {
        self.input.clear();
        self.status = FormStatus::Idle;
        self.seq += 1;
    }
}

impl Default for TickerForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Field labels of the ingestion form. Indexes match IngestForm::fields.
pub const INGEST_FIELDS: [&str; 7] = [
    "Asset ID",
    "Timestamp",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
];

/// Index of the first numeric field in INGEST_FIELDS.
const FIRST_NUMERIC_FIELD: usize = 2;

/// OHLCV ingestion form (Data Ingestion pane).
///
/// Seven string fields edited one at a time; each keystroke replaces exactly
/// one field, the others are untouched (last-write-wins per field).
#[derive(Debug, Clone)]
pub struct IngestForm {
    /// Raw field values, in INGEST_FIELDS order.
    pub fields: [String; 7],

    /// Index of the focused field.
    pub focus: usize,

    /// Submission status, shown as a banner on the pane.
    pub status: FormStatus,

    /// Monotonic sequence number of the latest submit.
    pub seq: u64,
}

impl IngestForm {
    pub fn new() -> Self {
        Self {
            fields: Default::default(),
            focus: 0,
            status: FormStatus::Idle,
            seq: 0,
        }
    }

    /// Moves focus to the next field, wrapping after Volume.
    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    /// Moves focus to the previous field, wrapping before Asset ID.
    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Appends a character to the focused field.
    pub fn append_char(&mut self, c: char) {
        self.fields[self.focus].push(c);
    }

    /// Deletes the last character of the focused field.
    pub fn backspace(&mut self) {
        self.fields[self.focus].pop();
    }

    /// Builds the submission payload from the current field values.
    ///
    /// Every field must be non-blank, and the five numeric fields must parse
    /// to finite numbers. A parse failure is surfaced as a FormError naming
    /// the field instead of silently shipping NaN to the service.
    pub fn to_record(&self) -> Result<OhlcvRecord, FormError> {
        for (i, &label) in INGEST_FIELDS.iter().enumerate() {
            if self.fields[i].trim().is_empty() {
                return Err(FormError::MissingField(label));
            }
        }

        let mut numbers = [0.0_f64; 5];
        for (slot, i) in (FIRST_NUMERIC_FIELD..self.fields.len()).enumerate() {
            let value: f64 = self.fields[i]
                .trim()
                .parse()
                .map_err(|_| FormError::InvalidNumber(INGEST_FIELDS[i]))?;
            if !value.is_finite() {
                return Err(FormError::InvalidNumber(INGEST_FIELDS[i]));
            }
            numbers[slot] = value;
        }

        Ok(OhlcvRecord {
            asset_id: self.fields[0].trim().to_string(),
            timestamp: self.fields[1].trim().to_string(),
            open: numbers[0],
            high: numbers[1],
            low: numbers[2],
            close: numbers[3],
            volume: numbers[4],
        })
    }

    /// Clears every field (after a successful submission).
    pub fn clear_fields(&mut self) {
        for field in self.fields.iter_mut() {
            field.clear();
        }
        self.focus = 0;
    }

    /// Resets the form to its initial state (pane unmount).
    ///
    /// Bumps the sequence number, invalidating any response still in
    /// flight (see TickerForm::reset).
    pub fn reset(&mut self) {
        self.clear_fields();
        self.status = FormStatus::Idle;
        self.seq += 1;
    }
}

impl Default for IngestForm {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Structure : App
// ============================================================================

/// Global application state.
pub struct App {
    /// Whether the event loop keeps running.
    pub running: bool,

    /// Currently active pane. Exactly one at a time.
    pub active_tab: Tab,

    /// Two-step quit: first 'q' arms the confirmation, second quits.
    pub confirm_quit: bool,

    /// True while a field of the active pane is being edited.
    /// Modal, Vim-like: 'i' enters edit mode, ESC leaves it.
    pub edit_mode: bool,

    /// Background request in flight (worker sets/clears this).
    pub is_loading: bool,

    /// Optional message shown while loading.
    pub loading_message: Option<String>,

    /// Ticker lookup form, hosted on the Overview pane.
    pub ticker_form: TickerForm,

    /// OHLCV ingestion form, hosted on the Data Ingestion pane.
    pub ingest_form: IngestForm,

    /// Latest prediction snapshot. Owned by the App root, so it survives
    /// tab switches and feeds both Overview and Model Predictions.
    pub last_prediction: Option<PredictionSnapshot>,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            active_tab: Tab::Overview,
            confirm_quit: false,
            edit_mode: false,
            is_loading: false,
            loading_message: None,
            ticker_form: TickerForm::new(),
            ingest_form: IngestForm::new(),
            last_prediction: None,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Called every iteration of the event loop. Nothing periodic yet.
    pub fn tick(&mut self) {}

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Loading indicator
    // ========================================================================

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    // ========================================================================
    // Navigation shell
    // ========================================================================

    /// Activates a tab. The pane being left loses its ephemeral form state
    /// (unmount semantics); the last prediction snapshot belongs to the App
    /// root and survives.
    pub fn select_tab(&mut self, tab: Tab) {
        if tab == self.active_tab {
            return;
        }

        match self.active_tab {
            Tab::Overview => self.ticker_form.reset(),
            Tab::Ingestion => self.ingest_form.reset(),
            _ => {}
        }

        self.edit_mode = false;
        self.active_tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.active_tab.next());
    }

    pub fn previous_tab(&mut self) {
        self.select_tab(self.active_tab.previous());
    }

    // ========================================================================
    // Edit mode
    // ========================================================================

    /// Enters edit mode. Only the Overview and Data Ingestion panes carry
    /// editable fields.
    pub fn start_edit(&mut self) {
        if matches!(self.active_tab, Tab::Overview | Tab::Ingestion) {
            self.edit_mode = true;
        }
    }

    pub fn stop_edit(&mut self) {
        self.edit_mode = false;
    }

    pub fn is_editing(&self) -> bool {
        self.edit_mode
    }

    // ========================================================================
    // Ticker lookup (Overview)
    // ========================================================================

    /// Prepares a ticker lookup. Returns the symbol and its sequence number,
    /// or None when the input is blank or a lookup is already in flight.
    pub fn submit_ticker(&mut self) -> Option<(String, u64)> {
        if self.ticker_form.status.is_submitting() {
            debug!("Ticker lookup already in flight, ignoring submit");
            return None;
        }

        let symbol = self.ticker_form.input.trim().to_uppercase();
        if symbol.is_empty() {
            return None;
        }

        self.ticker_form.seq += 1;
        self.ticker_form.status = FormStatus::Submitting;
        Some((symbol, self.ticker_form.seq))
    }

    /// Applies a prediction response. Stale sequence numbers are a no-op, so
    /// a response arriving after a newer submit (or after the pane was left)
    /// cannot clobber current state.
    pub fn apply_prediction(&mut self, ticker: String, result: PredictionResult, seq: u64) {
        if seq != self.ticker_form.seq {
            debug!(ticker = %ticker, seq, latest = self.ticker_form.seq, "Dropping stale prediction");
            return;
        }

        self.last_prediction = Some(PredictionSnapshot::new(ticker, result));
        self.ticker_form.status = FormStatus::Success;
    }

    /// Applies a failed lookup. The previous snapshot is kept; the failure is
    /// surfaced as an error banner instead of a silent no-op.
    pub fn fail_prediction(&mut self, error: String, seq: u64) {
        if seq != self.ticker_form.seq {
            return;
        }
        self.ticker_form.status = FormStatus::Error(error);
    }

    // ========================================================================
    // OHLCV ingestion (Data Ingestion)
    // ========================================================================

    /// Prepares an ingestion submit. Returns the payload and its sequence
    /// number, or None when blocked: a submit is already in flight, or the
    /// fields do not form a valid record (the error lands in the status).
    pub fn submit_ingest(&mut self) -> Option<(OhlcvRecord, u64)> {
        if self.ingest_form.status.is_submitting() {
            debug!("Ingestion already in flight, ignoring submit");
            return None;
        }

        match self.ingest_form.to_record() {
            Ok(record) => {
                self.ingest_form.seq += 1;
                self.ingest_form.status = FormStatus::Submitting;
                Some((record, self.ingest_form.seq))
            }
            Err(e) => {
                self.ingest_form.status = FormStatus::Error(e.to_string());
                None
            }
        }
    }

    /// Applies an accepted ingestion: fields are cleared, status flips to
    /// Success. Stale sequence numbers are ignored.
    pub fn apply_ingest_success(&mut self, seq: u64) {
        if seq != self.ingest_form.seq {
            return;
        }
        self.ingest_form.clear_fields();
        self.ingest_form.status = FormStatus::Success;
    }

    /// Applies a rejected ingestion: field values are preserved so the user
    /// can correct and resubmit. Stale sequence numbers are ignored.
    pub fn apply_ingest_failure(&mut self, error: String, seq: u64) {
        if seq != self.ingest_form.seq {
            return;
        }
        self.ingest_form.status = FormStatus::Error(error);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_ingest_form() -> IngestForm {
        let mut form = IngestForm::new();
        form.fields = [
            "BTC".to_string(),
            "2024-01-01T00:00:00".to_string(),
            "42000".to_string(),
            "43500".to_string(),
            "41800".to_string(),
            "43210.5".to_string(),
            "1234.56".to_string(),
        ];
        form
    }

    fn sample_prediction() -> PredictionResult {
        PredictionResult {
            score: 0.82,
            risk: "high".to_string(),
            predictions: serde_json::json!({"1d": "down"}),
        }
    }

    fn app_submit_btc(app: &mut App) -> u64 {
        app.ticker_form.input = "btc".to_string();
        let (symbol, seq) = app.submit_ticker().unwrap();
        assert_eq!(symbol, "BTC");
        seq
    }

    #[test]
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert_eq!(app.active_tab, Tab::Overview);
        assert!(!app.is_editing());
        assert!(app.last_prediction.is_none());
    }

    #[test]
    fn test_tab_order_and_indices() {
        assert_eq!(Tab::ALL.len(), 5);
        assert_eq!(Tab::Overview.index(), 0);
        assert_eq!(Tab::Settings.index(), 4);
        assert_eq!(Tab::from_index(2), Some(Tab::Predictions));
        assert_eq!(Tab::from_index(5), None);
    }

    #[test]
    fn test_tab_cycling_wraps() {
        assert_eq!(Tab::Settings.next(), Tab::Overview);
        assert_eq!(Tab::Overview.previous(), Tab::Settings);
        assert_eq!(Tab::Ingestion.next(), Tab::Predictions);
    }

    #[test]
    fn test_select_tab_resets_departed_pane() {
        let mut app = App::new();
        app.ticker_form.input = "BTC".to_string();
        app.ticker_form.status = FormStatus::Error("boom".to_string());

        app.select_tab(Tab::Analytics);

        assert_eq!(app.active_tab, Tab::Analytics);
        assert!(app.ticker_form.input.is_empty());
        assert_eq!(app.ticker_form.status, FormStatus::Idle);
    }

    #[test]
    fn test_select_tab_resets_ingest_fields() {
        let mut app = App::new();
        app.select_tab(Tab::Ingestion);
        app.ingest_form = filled_ingest_form();

        app.select_tab(Tab::Settings);

        assert!(app.ingest_form.fields.iter().all(|f| f.is_empty()));
        assert_eq!(app.ingest_form.focus, 0);
    }

    #[test]
    fn test_last_prediction_survives_navigation() {
        let mut app = App::new();
        let seq = app_submit_btc(&mut app);
        app.apply_prediction("BTC".to_string(), sample_prediction(), seq);

        app.select_tab(Tab::Predictions);

        let snapshot = app.last_prediction.as_ref().unwrap();
        assert_eq!(snapshot.ticker, "BTC");
    }

    #[test]
    fn test_ticker_submit_guard() {
        let mut app = App::new();
        app_submit_btc(&mut app);

        // A second submit while the first is in flight is refused
        app.ticker_form.input = "ETH".to_string();
        assert!(app.submit_ticker().is_none());
    }

    #[test]
    fn test_blank_ticker_is_not_submitted() {
        let mut app = App::new();
        app.ticker_form.input = "   ".to_string();
        assert!(app.submit_ticker().is_none());
        assert_eq!(app.ticker_form.status, FormStatus::Idle);
    }

    #[test]
    fn test_stale_prediction_is_dropped() {
        let mut app = App::new();
        let old_seq = app_submit_btc(&mut app);

        // The pane is left and a new lookup is started later
        app.select_tab(Tab::Analytics);
        app.select_tab(Tab::Overview);
        app.ticker_form.input = "ETH".to_string();
        let (_, new_seq) = app.submit_ticker().unwrap();
        assert!(new_seq > old_seq);

        // The late BTC response must be a no-op
        app.apply_prediction("BTC".to_string(), sample_prediction(), old_seq);
        assert!(app.last_prediction.is_none());
        assert!(app.ticker_form.status.is_submitting());
    }

    #[test]
    fn test_prediction_arriving_after_unmount_is_a_noop() {
        let mut app = App::new();
        let seq = app_submit_btc(&mut app);

        // The user leaves Overview while the lookup is still in flight
        app.select_tab(Tab::Analytics);

        app.apply_prediction("BTC".to_string(), sample_prediction(), seq);

        // The reset pane must stay untouched
        assert!(app.last_prediction.is_none());
        assert_eq!(app.ticker_form.status, FormStatus::Idle);
    }

    #[test]
    fn test_ingest_failure_after_unmount_is_a_noop() {
        let mut app = App::new();
        app.select_tab(Tab::Ingestion);
        app.ingest_form = filled_ingest_form();
        let (_, seq) = app.submit_ingest().unwrap();

        // The user leaves the pane before the service answers
        app.select_tab(Tab::Settings);

        app.apply_ingest_failure("service returned HTTP 500".to_string(), seq);
        assert_eq!(app.ingest_form.status, FormStatus::Idle);

        // A late success must not flash a banner either
        app.apply_ingest_success(seq);
        assert_eq!(app.ingest_form.status, FormStatus::Idle);
    }

    #[test]
    fn test_failed_lookup_keeps_previous_snapshot() {
        let mut app = App::new();
        let seq = app_submit_btc(&mut app);
        app.apply_prediction("BTC".to_string(), sample_prediction(), seq);

        app.ticker_form.input = "ETH".to_string();
        let (_, seq2) = app.submit_ticker().unwrap();
        app.fail_prediction("network error: connection refused".to_string(), seq2);

        assert_eq!(app.last_prediction.as_ref().unwrap().ticker, "BTC");
        assert!(matches!(app.ticker_form.status, FormStatus::Error(_)));
    }

    #[test]
    fn test_ingest_to_record() {
        let form = filled_ingest_form();
        let record = form.to_record().unwrap();

        assert_eq!(record.asset_id, "BTC");
        assert_eq!(record.timestamp, "2024-01-01T00:00:00");
        assert_eq!(record.open, 42000.0);
        assert_eq!(record.high, 43500.0);
        assert_eq!(record.low, 41800.0);
        assert_eq!(record.close, 43210.5);
        assert_eq!(record.volume, 1234.56);
    }

    #[test]
    fn test_ingest_missing_field() {
        let mut form = filled_ingest_form();
        form.fields[1].clear();
        assert_eq!(form.to_record(), Err(FormError::MissingField("Timestamp")));
    }

    #[test]
    fn test_ingest_invalid_number_names_the_field() {
        let mut form = filled_ingest_form();
        form.fields[5] = "not-a-price".to_string();
        assert_eq!(form.to_record(), Err(FormError::InvalidNumber("Close")));
    }

    #[test]
    fn test_ingest_rejects_non_finite() {
        let mut form = filled_ingest_form();
        form.fields[6] = "inf".to_string();
        assert_eq!(form.to_record(), Err(FormError::InvalidNumber("Volume")));
    }

    #[test]
    fn test_ingest_success_clears_fields() {
        let mut app = App::new();
        app.select_tab(Tab::Ingestion);
        app.ingest_form = filled_ingest_form();

        let (record, seq) = app.submit_ingest().unwrap();
        assert_eq!(record.asset_id, "BTC");
        assert!(app.ingest_form.status.is_submitting());

        app.apply_ingest_success(seq);

        assert_eq!(app.ingest_form.status, FormStatus::Success);
        assert!(app.ingest_form.fields.iter().all(|f| f.is_empty()));
    }

    #[test]
    fn test_ingest_failure_preserves_fields() {
        let mut app = App::new();
        app.select_tab(Tab::Ingestion);
        app.ingest_form = filled_ingest_form();

        let (_, seq) = app.submit_ingest().unwrap();
        app.apply_ingest_failure("service returned HTTP 500".to_string(), seq);

        assert!(matches!(app.ingest_form.status, FormStatus::Error(_)));
        assert_eq!(app.ingest_form.fields[0], "BTC");
        assert_eq!(app.ingest_form.fields[6], "1234.56");
    }

    #[test]
    fn test_ingest_parse_failure_blocks_dispatch() {
        let mut app = App::new();
        app.select_tab(Tab::Ingestion);
        app.ingest_form = filled_ingest_form();
        app.ingest_form.fields[2] = "abc".to_string();

        assert!(app.submit_ingest().is_none());
        assert_eq!(
            app.ingest_form.status,
            FormStatus::Error("Open is not a valid number".to_string())
        );
        // Fields are untouched so the user can fix the typo
        assert_eq!(app.ingest_form.fields[2], "abc");
    }

    #[test]
    fn test_ingest_submit_guard() {
        let mut app = App::new();
        app.select_tab(Tab::Ingestion);
        app.ingest_form = filled_ingest_form();

        assert!(app.submit_ingest().is_some());
        assert!(app.submit_ingest().is_none());
    }

    #[test]
    fn test_ingest_field_focus_wraps() {
        let mut form = IngestForm::new();
        assert_eq!(form.focus, 0);

        form.focus_previous();
        assert_eq!(form.focus, 6);

        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_ingest_editing_targets_focused_field_only() {
        let mut form = IngestForm::new();
        form.append_char('B');
        form.append_char('T');
        form.append_char('C');
        form.focus_next();
        form.append_char('2');

        assert_eq!(form.fields[0], "BTC");
        assert_eq!(form.fields[1], "2");
        assert!(form.fields[2..].iter().all(|f| f.is_empty()));

        form.backspace();
        assert_eq!(form.fields[1], "");
        assert_eq!(form.fields[0], "BTC");
    }

    #[test]
    fn test_edit_mode_only_on_form_panes() {
        let mut app = App::new();

        app.start_edit();
        assert!(app.is_editing());
        app.stop_edit();

        app.select_tab(Tab::Settings);
        app.start_edit();
        assert!(!app.is_editing());
    }

    #[test]
    fn test_two_step_quit() {
        let mut app = App::new();
        assert!(!app.is_awaiting_quit_confirmation());

        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        assert!(app.is_running());

        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());

        app.quit();
        assert!(!app.is_running());
    }
}
