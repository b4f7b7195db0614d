//! Display models for CLI output
//!
//! Converts pipeline results into table rows, pretty lines and the JSON
//! response shape.

pub mod display;

pub use display::{GameDisplay, LibraryReport};
