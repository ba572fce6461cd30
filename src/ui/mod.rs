// ============================================================================
// Module : ui
// ============================================================================
// Terminal user interface: event handling and rendering.
// ============================================================================

pub mod dashboard; // Root rendering (tab bar, pane routing, footer)
pub mod events;    // Keyboard events and tick handling
pub mod gauge;     // Risk gauge widget
pub mod ingest;    // OHLCV ingestion form pane

// Re-exports to simplify imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
