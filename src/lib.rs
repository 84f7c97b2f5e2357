//! Sudoku Live library - one shared sudoku round for everyone connected.
//!
//! # Architecture
//!
//! - **Event**: parses two multiplexed client protocols into one event type
//! - **Session**: the live board, its immutable template/solution and the
//!   round's time bounds
//! - **Progress**: pure completion and time evaluation
//! - **Engine**: owns the session, applies events, ticks on a cadence and
//!   schedules automatic restarts
//! - **Render**: turns engine-emitted view data into HTML fragments
//! - **Puzzle**: grid type plus a generator/solver behind the
//!   [`puzzle::PuzzleSource`] seam
//!
//! # Example
//!
//! ```
//! use sudoku_live::{GameEvent, parse_event, completion};
//!
//! let data = serde_json::json!({
//!     "cell_3_4": "7",
//!     "HEADERS": { "HX-Trigger": "cell_3_4" },
//! });
//! assert_eq!(parse_event(&data), GameEvent::SetCell { x: 3, y: 4, value: 7 });
//!
//! let result = completion(&[1, 2, 0, 4], &[1, 2, 3, 4], 2);
//! assert_eq!(result.percent, 50);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod engine;
mod event;
mod progress;
mod session;

// Public modules
pub mod puzzle;
pub mod render;

// Crate-level exports - Configuration
pub use config::{Config, ConfigError};

// Crate-level exports - Engine and view types
pub use engine::{
    BoardView, CellView, Engine, EngineError, EngineMessage, ProgressView, Status, ViewUpdate,
};

// Crate-level exports - Event parsing
pub use event::{GameEvent, parse_event};

// Crate-level exports - Progress evaluation
pub use progress::{Completion, TimeStatus, completion, time_status};

// Crate-level exports - Session state
pub use session::{Session, SessionError};
