pub mod auth;
pub mod internal;
pub mod reports;
