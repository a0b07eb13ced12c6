//! Public facade crate for `rebrief`.
//!
//! This crate contains no matching or process logic.
//! It re-exports the backend-agnostic types/traits from `rebrief-core`.

pub use rebrief_core::*;
