//! Monomino (workspace facade crate).
//!
//! Re-exports the workspace crates as `monomino::{core,engine,input,types}` so
//! callers depend on one package while the implementation lives under `crates/`.

pub use monomino_core as core;
pub use monomino_engine as engine;
pub use monomino_input as input;
pub use monomino_types as types;
