//! Core types, traits, and utilities for mgit.
//!
//! This crate provides the foundational pieces shared by the other mgit crates:
//! - [`config`] for the read-only rule store and key path expansion
//! - [`IOStreams`] for capturable terminal output
//! - [`table::TablePrinter`] for TTY-aware tabular output

pub mod cmdutil;
pub mod config;
pub mod errors;
pub mod iostreams;
pub mod table;

pub use errors::ConfigError;
pub use iostreams::IOStreams;
