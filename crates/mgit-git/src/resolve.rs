//! Remote to SSH key resolution.

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use mgit_core::config::{PathExpander, Rule};

use crate::errors::ResolveError;
use crate::matcher::match_rule;
use crate::ssh_command::{GIT_SSH_COMMAND_ENV, build_git_ssh_command};
use crate::url_parser::{RemoteDescriptor, parse};

/// Outcome of resolving one remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// The remote identifier as given.
    pub url: String,
    /// Parsed remote.
    pub remote: RemoteDescriptor,
    /// Whether a key was selected for this remote.
    pub ssh_selection_applies: bool,
    /// Winning rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<Rule>,
    /// Absolute path of the selected key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,
    /// Value for `GIT_SSH_COMMAND`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_ssh_command: Option<String>,
    /// Score of the winning rule; 0 when no selection happened.
    pub match_score: i64,
    /// Advisory notes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ResolutionResult {
    /// The environment variable and value to install for git, if any.
    pub fn env_override(&self) -> Option<(&'static str, &str)> {
        self.git_ssh_command
            .as_deref()
            .map(|cmd| (GIT_SSH_COMMAND_ENV, cmd))
    }
}

/// Resolve `raw` to a key selection.
///
/// Non-SSH remotes resolve without consulting `rules`. SSH remotes require a
/// rule store and a matching rule.
pub fn resolve_remote(
    rules: Option<&[Rule]>,
    raw: &str,
    expander: &dyn PathExpander,
) -> Result<ResolutionResult, ResolveError> {
    let remote = parse(raw)?;

    if !remote.is_ssh() {
        let note = if remote.is_https() {
            "HTTPS remote detected: SSH key selection is not applied".to_string()
        } else {
            format!(
                "transport \"{}\" is not SSH: SSH key selection is not applied",
                remote.transport
            )
        };
        debug!(url = raw, transport = %remote.transport, "skipping key selection");
        return Ok(ResolutionResult {
            url: raw.to_string(),
            remote,
            ssh_selection_applies: false,
            matched_rule: None,
            key_path: None,
            git_ssh_command: None,
            match_score: 0,
            notes: vec![note],
        });
    }

    let rules = rules.ok_or(ResolveError::MissingConfig)?;
    let matched = match_rule(rules, &remote)?;
    let key_path = expander
        .expand(&matched.rule.key)
        .map_err(|source| ResolveError::KeyPath {
            rule_id: matched.rule.id.clone(),
            source,
        })?;
    debug!(
        url = raw,
        rule = %matched.rule.id,
        score = matched.score,
        key = %key_path.display(),
        "selected key"
    );

    Ok(ResolutionResult {
        url: raw.to_string(),
        remote,
        ssh_selection_applies: true,
        git_ssh_command: Some(build_git_ssh_command(&key_path)),
        key_path: Some(key_path),
        match_score: matched.score,
        matched_rule: Some(matched.rule),
        notes: Vec::new(),
    })
}
