//! Display model implementations for table and JSON output

mod game;

pub use game::{GameDisplay, LibraryReport};
