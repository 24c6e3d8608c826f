//! Error types for remote parsing, matching, inference, resolution, and git
//! queries.

use mgit_core::ConfigError;

/// Errors from parsing a remote identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteParseError {
    /// Input was empty or whitespace only.
    #[error("empty remote URL")]
    Malformed,

    /// Input matches neither the URL nor the shorthand grammar.
    #[error("unsupported remote URL format: {input:?}")]
    UnsupportedFormat {
        /// The rejected input.
        input: String,
    },

    /// URL form without a host.
    #[error("URL {input:?} does not contain host")]
    MissingHost {
        /// The rejected input.
        input: String,
    },

    /// URL form that the URL parser rejected for another reason.
    #[error("invalid URL {input:?}: {source}")]
    InvalidUrl {
        /// The rejected input.
        input: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },

    /// Fewer than two path segments (owner and repo are both required).
    #[error("repository path {path:?} must include owner and repo")]
    IncompleteRepositoryPath {
        /// The raw path component.
        path: String,
    },

    /// Repository name is empty once `.git` is stripped.
    #[error("invalid repo in path {path:?}")]
    InvalidRepositoryName {
        /// The raw path component.
        path: String,
    },

    /// Ownership path collapses to nothing.
    #[error("invalid owner/namespace in path {path:?}")]
    InvalidOwnershipPath {
        /// The raw path component.
        path: String,
    },
}

/// Errors from rule matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// No rule matched both host and owner.
    #[error("no SSH key rule matched (host={host}, owner={owner})")]
    NoRuleMatched {
        /// Host of the remote.
        host: String,
        /// Ownership path of the remote.
        owner: String,
    },

    /// The descriptor has no host.
    #[error("parsed remote host is empty")]
    EmptyHost,
}

/// Errors from inferring a command target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferError {
    /// `git clone` without a repository argument.
    #[error("clone requires repository URL")]
    MissingCloneTarget,
}

/// Errors from resolving a remote to a key.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The remote identifier could not be parsed.
    #[error(transparent)]
    Parse(#[from] RemoteParseError),

    /// No usable rule.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// SSH remote but no rule store was loaded.
    #[error("config is required for SSH remote")]
    MissingConfig,

    /// The matched rule's key reference could not be expanded.
    #[error("expand key path for rule {rule_id:?}: {source}")]
    KeyPath {
        /// Id of the matched rule.
        rule_id: String,
        /// Expansion failure.
        #[source]
        source: ConfigError,
    },
}

impl ResolveError {
    /// Suggested fix for a failed match, naming the remote's host and owner.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Match(MatchError::NoRuleMatched { host, owner }) => Some(format!(
                "add a rule to .mgit/config.json: \
                 {{\"host\": \"{host}\", \"owner\": \"{owner}\", \"key\": \"~/.ssh/<key>\"}}"
            )),
            Self::MissingConfig => Some(
                "create .mgit/config.json or pass --config with a rule store path".to_string(),
            ),
            _ => None,
        }
    }
}

/// Errors from git queries.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// Git command failed with an exit code.
    #[error("git {command} failed: {message}")]
    CommandFailed {
        /// The git subcommand that failed.
        command: String,
        /// Error message from stderr.
        message: String,
        /// Process exit code, if available.
        exit_code: Option<i32>,
    },

    /// Git binary not found.
    #[error("git executable not found in PATH")]
    NotFound,

    /// No remote could be chosen as the default.
    #[error("could not determine default remote; specify one explicitly")]
    NoDefaultRemote,

    /// A remote name was required but blank.
    #[error("remote name is empty")]
    EmptyRemoteName,

    /// I/O error from subprocess.
    #[error("git IO error: {0}")]
    Io(#[from] std::io::Error),
}
