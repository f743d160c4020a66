//! Shared utilities.

pub mod exec;
pub mod plural;
pub mod url;
