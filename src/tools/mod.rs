//! Tool implementations for dbsweep
//!
//! Each tool corresponds to a CLI command and returns a serializable output.

mod clean;
mod list;
mod sequences;
mod status;
mod truncate;

pub use clean::*;
pub use list::*;
pub use sequences::*;
pub use status::*;
pub use truncate::*;
