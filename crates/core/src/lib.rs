//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has **no dependencies** on rendering, input devices, or I/O, making it:
//!
//! - **Deterministic**: A seed plus the per-frame `(elapsed_ms, input)` sequence reproduces a run
//! - **Testable**: Every rule is exercised by unit tests
//! - **Portable**: Runs headless, under a terminal, or behind any renderer
//!
//! # Module Structure
//!
//! - [`field`]: 10x20 grid with collision rule and line clearing
//! - [`pieces`]: Shape catalog, rotation transform and SRS kick tables
//! - [`rng`]: Seeded LCG and the lookahead-preserving 7-bag
//! - [`piece`]: The active piece and its collision queries
//! - [`scoring`]: Line clear awards, drop points, level and gravity
//! - [`mode`]: Marathon / Sprint / Ultra finish rules
//! - [`session`]: The per-frame state machine tying everything together
//! - [`snapshot`]: Plain-data copy of the session for presentation layers
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer** with a configurable minimum lookahead (default 5)
//! - **SRS Rotation** with per-class kick tables (JLSTZ, I, O)
//! - **Lock Delay**: 2000ms once grounded; a move that frees the piece resets it
//! - **Hold**: once per spawned piece
//! - **T-Spin**: single-corner heuristic for doubles and triples
//! - **Scoring**: 100/300/500/800 (and 1200/1600 for T-spins) times the level before the clear
//!
//! # Example
//!
//! ```
//! use monomino_core::{GameMode, GameSession, SessionConfig};
//! use monomino_core::types::{Action, InputSnapshot};
//!
//! let mut game = GameSession::new(GameMode::Marathon, SessionConfig::with_seed(12345));
//!
//! // One 16ms frame with hard drop freshly pressed
//! let input = InputSnapshot::new().with(Action::HardDrop, 1);
//! game.advance(16.0, &input);
//!
//! assert!(game.score() > 0); // Hard drop awards points
//! assert_eq!(game.field().solid_count(), 4);
//! ```

pub mod config;
pub mod field;
pub mod mode;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use monomino_types as types;

// Re-export commonly used types for convenience
pub use config::SessionConfig;
pub use field::Field;
pub use mode::{GameMode, ModeRules, SessionStats};
pub use piece::ActivePiece;
pub use pieces::{cell_at, filled_cells, kick_offsets, KickClass, KickTransition};
pub use rng::{PieceBag, SimpleRng};
pub use scoring::{gravity_interval_ms, level_for_lines, line_clear_award, LineClearAward};
pub use session::{GameSession, PiecePhase, MAX_PENDING_EVENTS};
pub use snapshot::{ActiveSnapshot, GameSnapshot, TimersSnapshot};
