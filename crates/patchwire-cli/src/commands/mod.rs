//! CLI command implementations.

pub mod check;
pub mod common;
pub mod kinds;
pub mod patches;
pub mod play;
