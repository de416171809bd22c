//! Input module (engine-facing).
//!
//! This crate is independent of any windowing or terminal library. It maps
//! physical [`Key`]s onto [`crate::types::Action`]s through [`KeyBindings`]
//! and counts how many frames each action has been held, producing the
//! [`crate::types::InputSnapshot`] a session consumes each frame.

pub mod handler;
pub mod map;

pub use monomino_types as types;

pub use handler::HeldFrames;
pub use map::{BindingPreset, Key, KeyBindings};
