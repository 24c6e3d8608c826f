//! Command implementations for mgit.
//!
//! Each module corresponds to an `mgit` top-level command.

pub mod config;
pub mod factory;
pub mod plan;
pub mod remotes;
pub mod report;
pub mod resolve;
pub mod rule;
pub mod version;

#[cfg(test)]
pub mod test_helpers;
