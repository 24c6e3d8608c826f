//! Error markers shared by commands and the binary's exit-code mapping.

/// Invalid or conflicting command-line usage. Maps to exit code 2.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FlagError(pub String);

/// Failure that has already been reported to the user. Maps to exit code 1
/// without printing anything further.
#[derive(Debug, thiserror::Error)]
#[error("")]
pub struct SilentError;

/// Whether an error is a usage error.
pub fn is_flag_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<FlagError>().is_some()
}

/// Whether an error has already been reported.
pub fn is_silent(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SilentError>().is_some()
}
