//! POI viewport sync engine.
//!
//! Debounces surface moves, gates fetches on zoom and filter, backfills
//! empty areas once per session and applies only the newest result.

pub mod area_memo;
pub mod config;
pub mod context;
pub mod controller;
pub mod movement;
pub mod source;

#[cfg(test)]
mod testing;

pub use area_memo::*;
pub use config::*;
pub use context::*;
pub use controller::*;
pub use movement::*;
pub use source::*;
