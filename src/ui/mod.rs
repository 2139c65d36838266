//! ui
//!
//! Terminal output.
//!
//! # Modules
//!
//! - [`output`] - JSON and plain-line output

pub mod output;
