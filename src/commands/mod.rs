//! CLI commands implementation

pub mod load;
pub mod report;

pub use load::*;
pub use report::*;
