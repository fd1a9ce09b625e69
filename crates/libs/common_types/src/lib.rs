#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod queue;
pub mod quiz;
pub mod report;
pub mod stage_output;

pub use queue::*;
pub use quiz::*;
pub use report::*;
pub use stage_output::*;
