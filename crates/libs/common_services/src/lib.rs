#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod api;
pub mod database;
pub mod email_client;
pub mod queue;
pub mod utils;
