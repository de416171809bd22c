//! Engine layer: settings and the frame runner.
//!
//! Sits between a front end and [`monomino_core`]. It owns everything the core
//! deliberately leaves to its caller: reading settings, clamping DAS/ARR,
//! resolving key bindings, tracking held frames and handing the finished-mode
//! result to a leaderboard.

pub mod runner;
pub mod settings;

pub use monomino_core as core;
pub use monomino_input as input;
pub use monomino_types as types;

pub use runner::Runner;
pub use settings::{Settings, SettingsError, DEFAULT_SEED};
