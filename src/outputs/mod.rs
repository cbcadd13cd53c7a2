//! Output generation.
//!
//! # Submodules
//!
//! - [`json`]: writes list snapshots to JSON files for other tools
//!
//! Rendered pages go to stdout through [`crate::views`]; only machine-readable
//! output lives here.

pub mod json;
