#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]

pub mod context;
pub mod error;
pub mod notifier;
pub mod parse;
pub mod prompts;
pub mod stages;
pub mod store;
pub mod sweeper;

pub use context::*;
pub use error::*;
pub use notifier::*;
pub use parse::*;
pub use stages::*;
pub use store::*;
pub use sweeper::*;
