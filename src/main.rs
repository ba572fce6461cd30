// ============================================================================
// coindash - Terminal dashboard for the crypto investment analysis service
// ============================================================================
// TUI with five panes (Overview, Data Ingestion, Model Predictions,
// Analytics, Settings). The Overview pane looks up a risk prediction for a
// ticker; the Data Ingestion pane submits OHLCV records. All network calls
// run on a background worker thread so the UI stays responsive.
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use coindash::api::ApiClient;
use coindash::app::{App, Tab};
use coindash::config::Config;
use coindash::models::{OhlcvRecord, PredictionResult};
use coindash::ui::{events::EventHandler, render};

// ============================================================================
// Worker commands and results
// ============================================================================
// The event loop sends commands to a worker thread that owns the HTTP client
// and a tokio runtime; results come back on a second channel and are drained
// between frames. Each command carries the sequence number of the submit it
// answers, so stale responses can be dropped (last-request-wins).
// ============================================================================

/// Commands sent to the worker thread.
#[derive(Debug, Clone)]
enum AppCommand {
    /// Fetch the prediction for a ticker (Overview pane).
    FetchPrediction { ticker: String, seq: u64 },

    /// Submit one OHLCV record (Data Ingestion pane).
    SubmitOhlcv { record: OhlcvRecord, seq: u64 },
}

/// Results sent back by the worker thread.
#[derive(Debug)]
enum AppResult {
    PredictionLoaded {
        ticker: String,
        prediction: PredictionResult,
        seq: u64,
    },
    PredictionFailed {
        ticker: String,
        error: String,
        seq: u64,
    },
    OhlcvAccepted {
        seq: u64,
    },
    OhlcvFailed {
        error: String,
        seq: u64,
    },
}

// ============================================================================
// Logging
// ============================================================================

/// Initializes file logging. stdout belongs to the TUI, so logs go to a
/// daily-rolling file under the platform data directory:
/// - Linux : ~/.local/share/coindash/logs/coindash.log
/// - macOS : ~/Library/Application Support/coindash/logs/coindash.log
///
/// Level is controlled through RUST_LOG (default: coindash=debug,info).
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join("coindash").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("./logs"));

    std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "coindash.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coindash=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialized");
    Ok(())
}

// ============================================================================
// Entry point
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("Warning: failed to initialize logging: {}", e);
        eprintln!("Continuing without logging...");
    });

    let config = Config::from_env();
    info!(api_base_url = %config.api_base_url, "coindash starting up");

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let app = Arc::new(Mutex::new(App::new()));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(config, command_rx, result_tx, app.clone());

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, command_tx, result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background worker
// ============================================================================
// A dedicated OS thread with its own tokio runtime. block_on() blocks the
// worker, never the UI; the loading indicator is toggled around each call.
// ============================================================================

fn spawn_background_worker(
    config: Config,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    app: Arc<Mutex<App>>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime, worker exiting");
                return;
            }
        };

        let client = ApiClient::new(config.api_base_url);

        loop {
            match command_rx.recv() {
                Ok(command) => {
                    info!(?command, "Worker received command");

                    match command {
                        AppCommand::FetchPrediction { ticker, seq } => {
                            {
                                let mut app_lock = app.lock().unwrap();
                                app_lock.start_loading(Some(format!("Analyzing {}...", ticker)));
                            }

                            let result = runtime.block_on(client.fetch_prediction(&ticker));

                            match result {
                                Ok(prediction) => {
                                    info!(ticker = %ticker, score = prediction.score, "Prediction loaded");
                                    let _ = result_tx.send(AppResult::PredictionLoaded {
                                        ticker,
                                        prediction,
                                        seq,
                                    });
                                }
                                Err(e) => {
                                    error!(ticker = %ticker, error = %e, "Failed to fetch prediction");
                                    let _ = result_tx.send(AppResult::PredictionFailed {
                                        ticker,
                                        error: e.to_string(),
                                        seq,
                                    });
                                }
                            }

                            {
                                let mut app_lock = app.lock().unwrap();
                                app_lock.stop_loading();
                            }
                        }

                        AppCommand::SubmitOhlcv { record, seq } => {
                            {
                                let mut app_lock = app.lock().unwrap();
                                app_lock.start_loading(Some(format!(
                                    "Submitting {} record...",
                                    record.asset_id
                                )));
                            }

                            let result = runtime.block_on(client.submit_ohlcv(&record));

                            match result {
                                Ok(()) => {
                                    info!(asset_id = %record.asset_id, "OHLCV record accepted");
                                    let _ = result_tx.send(AppResult::OhlcvAccepted { seq });
                                }
                                Err(e) => {
                                    error!(asset_id = %record.asset_id, error = %e, "Failed to submit OHLCV record");
                                    let _ = result_tx.send(AppResult::OhlcvFailed {
                                        error: e.to_string(),
                                        seq,
                                    });
                                }
                            }

                            {
                                let mut app_lock = app.lock().unwrap();
                                app_lock.stop_loading();
                            }
                        }
                    }
                }
                Err(_) => {
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

// ============================================================================
// Event loop
// ============================================================================
// Classic render / input / update loop. Worker results are drained first so
// a response arriving between frames is applied before the next draw.
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        {
            let app_lock = app.lock().unwrap();
            if !app_lock.is_running() {
                break;
            }
        }

        // 0. RESULTS : apply worker results (stale seqs are no-ops)
        match result_rx.try_recv() {
            Ok(result) => {
                let mut app_lock = app.lock().unwrap();
                match result {
                    AppResult::PredictionLoaded { ticker, prediction, seq } => {
                        app_lock.apply_prediction(ticker, prediction, seq);
                    }
                    AppResult::PredictionFailed { ticker, error, seq } => {
                        error!(ticker = %ticker, error = %error, "Prediction lookup failed");
                        app_lock.fail_prediction(error, seq);
                    }
                    AppResult::OhlcvAccepted { seq } => {
                        app_lock.apply_ingest_success(seq);
                    }
                    AppResult::OhlcvFailed { error, seq } => {
                        error!(error = %error, "OHLCV submission failed");
                        app_lock.apply_ingest_failure(error, seq);
                    }
                }
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                error!("Worker thread disconnected!");
            }
        }

        // 1. RENDER
        {
            let app_clone = app.clone();
            terminal.draw(|frame| {
                let app_lock = app_clone.lock().unwrap();
                render(frame, &app_lock);
            })?;
        }

        // 2. INPUT
        if let Ok(event) = events.next() {
            let mut app_lock = app.lock().unwrap();
            handle_event(&mut app_lock, event, &command_tx);
        }

        // 3. UPDATE
        {
            let mut app_lock = app.lock().unwrap();
            app_lock.tick();
        }
    }

    Ok(())
}

// ============================================================================
// Event handling
// ============================================================================

/// Routes an event to the application state.
///
/// Edit-mode guards come first: while a form is being edited, every
/// printable key belongs to the focused field and only ESC leaves the mode.
fn handle_event(app: &mut App, event: coindash::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use coindash::ui::events::{
        get_char_from_event, is_backspace_event, is_edit_event, is_enter_event, is_escape_event,
        is_field_char_event, is_focus_next_event, is_focus_previous_event, is_next_tab_event,
        is_previous_tab_event, is_quit_event, tab_digit_from_event, Event,
    };

    match event {
        // ========================================
        // Edit mode : keys feed the active form
        // ========================================
        Event::Key(_) if app.is_editing() && is_escape_event(&event) => {
            debug!("User left edit mode");
            app.stop_edit();
        }

        Event::Key(_) if app.is_editing() && is_enter_event(&event) => match app.active_tab {
            Tab::Overview => {
                if let Some((ticker, seq)) = app.submit_ticker() {
                    info!(ticker = %ticker, seq, "User requested prediction");
                    let _ = command_tx.send(AppCommand::FetchPrediction { ticker, seq });
                }
            }
            Tab::Ingestion => {
                if let Some((record, seq)) = app.submit_ingest() {
                    info!(asset_id = %record.asset_id, seq, "User submitted OHLCV record");
                    let _ = command_tx.send(AppCommand::SubmitOhlcv { record, seq });
                }
            }
            _ => {}
        },

        Event::Key(_) if app.is_editing() && is_backspace_event(&event) => match app.active_tab {
            Tab::Overview => app.ticker_form.backspace(),
            Tab::Ingestion => app.ingest_form.backspace(),
            _ => {}
        },

        Event::Key(_)
            if app.is_editing()
                && app.active_tab == Tab::Ingestion
                && is_focus_next_event(&event) =>
        {
            app.ingest_form.focus_next();
        }

        Event::Key(_)
            if app.is_editing()
                && app.active_tab == Tab::Ingestion
                && is_focus_previous_event(&event) =>
        {
            app.ingest_form.focus_previous();
        }

        Event::Key(_) if app.is_editing() && is_field_char_event(&event) => {
            if let Some(c) = get_char_from_event(&event) {
                match app.active_tab {
                    Tab::Overview => app.ticker_form.append_char(c),
                    Tab::Ingestion => app.ingest_form.append_char(c),
                    _ => {}
                }
            }
        }

        // ========================================
        // Normal mode : navigation and quit
        // ========================================
        Event::Key(_) if !app.is_editing() && is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if !app.is_editing() && is_edit_event(&event) => {
            app.cancel_quit();
            debug!(tab = ?app.active_tab, "User entered edit mode");
            app.start_edit();
        }

        Event::Key(_) if !app.is_editing() && is_next_tab_event(&event) => {
            app.cancel_quit();
            app.next_tab();
            debug!(tab = ?app.active_tab, "User switched to next tab");
        }

        Event::Key(_) if !app.is_editing() && is_previous_tab_event(&event) => {
            app.cancel_quit();
            app.previous_tab();
            debug!(tab = ?app.active_tab, "User switched to previous tab");
        }

        Event::Key(_) if !app.is_editing() && tab_digit_from_event(&event).is_some() => {
            app.cancel_quit();
            if let Some(tab) = tab_digit_from_event(&event).and_then(Tab::from_index) {
                debug!(tab = ?tab, "User selected tab directly");
                app.select_tab(tab);
            }
        }

        Event::Tick => {
            // Nothing periodic yet
        }

        Event::Key(_) => {
            // Any other key cancels a pending quit confirmation
            app.cancel_quit();
        }

        _ => {}
    }
}

// ============================================================================
// Terminal setup / restore
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    Ok(())
}
