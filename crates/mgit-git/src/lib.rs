//! Remote parsing, rule matching, and SSH key resolution for mgit.
//!
//! The decision engine is pure and synchronous:
//! - [`url_parser`] turns a remote identifier into a [`url_parser::RemoteDescriptor`]
//! - [`matcher`] picks the best rule for a descriptor
//! - [`infer`] finds the remote a git command line targets
//! - [`resolve`] composes the above into a `GIT_SSH_COMMAND` override
//!
//! [`client`] is the only part that talks to git, and only to query remotes.

pub mod client;
pub mod errors;
pub mod infer;
pub mod matcher;
pub mod remote;
pub mod resolve;
pub mod ssh_command;
pub mod url_parser;
