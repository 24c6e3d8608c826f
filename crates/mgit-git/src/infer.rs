//! Find the remote a git command line talks to.

use serde::Serialize;

use crate::errors::InferError;
use crate::url_parser::looks_like_remote_url;

/// Flags whose value is the following token unless written as `--flag=value`.
const VALUE_FLAGS: &[&str] = &["-c", "--config", "-C", "--upload-pack", "--receive-pack", "-o"];

/// How a command identifies its remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum TargetKind {
    /// No remote named on the command line.
    None,
    /// A registered remote such as `origin`.
    ByRemoteName(String),
    /// A literal URL or shorthand locator.
    ByLiteralUrl(String),
}

/// Result of inspecting a git argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitTarget {
    /// Subcommand, e.g. `push` or `remote set-url`. Empty for an empty argv.
    pub command: String,
    /// Remote reference found, if any.
    #[serde(flatten)]
    pub kind: TargetKind,
    /// The command never opens a connection, so no key is needed.
    pub skip_credential_selection: bool,
    /// Advisory text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GitTarget {
    fn none(command: &str) -> Self {
        Self {
            command: command.to_string(),
            kind: TargetKind::None,
            skip_credential_selection: false,
            notes: None,
        }
    }

    fn with_note(mut self, note: &str) -> Self {
        self.notes = Some(note.to_string());
        self
    }

    fn with_kind(mut self, kind: TargetKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Infer the target of `git <argv...>`.
///
/// # Examples
///
/// ```
/// use mgit_git::infer::{TargetKind, infer_git_target};
///
/// let target = infer_git_target(&["fetch", "--prune", "mirror"]).unwrap();
/// assert_eq!(target.kind, TargetKind::ByRemoteName("mirror".to_string()));
/// ```
pub fn infer_git_target<S: AsRef<str>>(argv: &[S]) -> Result<GitTarget, InferError> {
    let Some((command, rest)) = argv.split_first() else {
        return Ok(GitTarget::none(""));
    };
    let command = command.as_ref();

    let target = match command {
        "push" | "fetch" | "pull" => match positional_args(rest).first() {
            None => GitTarget::none(command).with_note("remote not specified explicitly"),
            Some(first) => GitTarget::none(command).with_kind(classify(first)),
        },
        "clone" => {
            let first = positional_args(rest)
                .into_iter()
                .next()
                .ok_or(InferError::MissingCloneTarget)?;
            GitTarget::none(command).with_kind(TargetKind::ByLiteralUrl(first.to_string()))
        }
        "ls-remote" => match positional_args(rest).first() {
            None => GitTarget::none(command).with_note("no repository argument"),
            Some(first) => GitTarget::none(command).with_kind(classify(first)),
        },
        "remote" => infer_remote_subcommand(rest).unwrap_or_else(|| GitTarget::none(command)),
        _ => GitTarget::none(command),
    };
    Ok(target)
}

// git remote set-url [--push] <name> <newurl> [<oldurl>]
fn infer_remote_subcommand<S: AsRef<str>>(rest: &[S]) -> Option<GitTarget> {
    let (sub, args) = rest.split_first()?;
    if sub.as_ref() != "set-url" {
        return None;
    }
    let positional = positional_args(args);
    let new_url = positional.get(1).filter(|url| looks_like_remote_url(url))?;
    Some(GitTarget {
        command: "remote set-url".to_string(),
        kind: TargetKind::ByLiteralUrl((*new_url).to_string()),
        skip_credential_selection: true,
        notes: Some("local config update; SSH key selection not required".to_string()),
    })
}

fn classify(token: &str) -> TargetKind {
    if looks_like_remote_url(token) {
        TargetKind::ByLiteralUrl(token.to_string())
    } else {
        TargetKind::ByRemoteName(token.to_string())
    }
}

/// Positional arguments, skipping flags and the values of known value flags.
/// Everything after `--` is positional.
fn positional_args<S: AsRef<str>>(args: &[S]) -> Vec<&str> {
    let mut out = Vec::with_capacity(args.len());
    let mut iter = args.iter().map(AsRef::as_ref);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            out.extend(iter);
            break;
        }
        if arg.is_empty() {
            continue;
        }
        if arg.starts_with('-') {
            if takes_value(arg) {
                iter.next();
            }
            continue;
        }
        out.push(arg);
    }
    out
}

fn takes_value(flag: &str) -> bool {
    !flag.contains('=') && VALUE_FLAGS.contains(&flag)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn name(s: &str) -> TargetKind {
        TargetKind::ByRemoteName(s.to_string())
    }

    fn url(s: &str) -> TargetKind {
        TargetKind::ByLiteralUrl(s.to_string())
    }

    #[rstest]
    #[case(&["push", "origin", "main"], "push", name("origin"))]
    #[case(&["fetch", "--prune", "mirror"], "fetch", name("mirror"))]
    #[case(&["pull", "--rebase", "upstream", "main"], "pull", name("upstream"))]
    #[case(&["clone", "git@github.com:Org/project.git"], "clone", url("git@github.com:Org/project.git"))]
    #[case(&["clone", "--depth=1", "https://github.com/a/b"], "clone", url("https://github.com/a/b"))]
    #[case(&["clone", "--depth", "1", "https://github.com/a/b"], "clone", url("1"))]
    #[case(&["ls-remote", "ssh://git@gitlab.com/Group/repo.git"], "ls-remote", url("ssh://git@gitlab.com/Group/repo.git"))]
    #[case(&["push", "git@github.com:o/r.git", "HEAD"], "push", url("git@github.com:o/r.git"))]
    #[case(&["push", "-o", "ci.skip", "origin"], "push", name("origin"))]
    #[case(&["fetch", "--upload-pack=/opt/git-upload-pack", "mirror"], "fetch", name("mirror"))]
    #[case(&["fetch", "--upload-pack", "/opt/git-upload-pack", "mirror"], "fetch", name("mirror"))]
    #[case(&["push", "", "origin"], "push", name("origin"))]
    #[case(&["push", "--", "-weird-remote"], "push", name("-weird-remote"))]
    #[case(&["status"], "status", TargetKind::None)]
    #[case(&["remote", "add", "origin", "git@github.com:o/r.git"], "remote", TargetKind::None)]
    fn test_should_infer_target(
        #[case] argv: &[&str],
        #[case] command: &str,
        #[case] kind: TargetKind,
    ) {
        let target = infer_git_target(argv).unwrap();
        assert_eq!(target.command, command);
        assert_eq!(target.kind, kind);
        assert!(!target.skip_credential_selection);
    }

    #[test]
    fn test_should_note_missing_remote() {
        let target = infer_git_target(&["pull"]).unwrap();
        assert_eq!(target.kind, TargetKind::None);
        assert_eq!(target.notes.as_deref(), Some("remote not specified explicitly"));

        let target = infer_git_target(&["push", "--force"]).unwrap();
        assert_eq!(target.kind, TargetKind::None);
        assert!(target.notes.is_some());
    }

    #[test]
    fn test_should_note_missing_ls_remote_repository() {
        let target = infer_git_target(&["ls-remote", "--heads"]).unwrap();
        assert_eq!(target.kind, TargetKind::None);
        assert_eq!(target.notes.as_deref(), Some("no repository argument"));
    }

    #[test]
    fn test_should_fail_clone_without_target() {
        assert_eq!(
            infer_git_target(&["clone", "--bare"]).unwrap_err(),
            InferError::MissingCloneTarget
        );
    }

    #[test]
    fn test_should_handle_empty_argv() {
        let argv: [&str; 0] = [];
        let target = infer_git_target(&argv).unwrap();
        assert_eq!(target.command, "");
        assert_eq!(target.kind, TargetKind::None);
    }

    #[test]
    fn test_should_skip_credentials_for_set_url() {
        let target = infer_git_target(&[
            "remote",
            "set-url",
            "--push",
            "origin",
            "git@github.com:Org/new.git",
        ])
        .unwrap();
        assert_eq!(target.command, "remote set-url");
        assert_eq!(target.kind, url("git@github.com:Org/new.git"));
        assert!(target.skip_credential_selection);
        assert_eq!(
            target.notes.as_deref(),
            Some("local config update; SSH key selection not required")
        );
    }

    #[rstest]
    #[case(&["remote", "set-url", "origin"])]
    #[case(&["remote", "set-url", "origin", "not-a-url"])]
    #[case(&["remote"])]
    fn test_should_ignore_other_remote_shapes(#[case] argv: &[&str]) {
        let target = infer_git_target(argv).unwrap();
        assert_eq!(target.command, "remote");
        assert_eq!(target.kind, TargetKind::None);
        assert!(!target.skip_credential_selection);
    }

    #[test]
    fn test_should_accept_owned_strings() {
        let argv = vec!["push".to_string(), "origin".to_string()];
        let target = infer_git_target(&argv).unwrap();
        assert_eq!(target.kind, name("origin"));
    }

    #[test]
    fn test_should_serialize_kind_with_target() {
        let target = infer_git_target(&["push", "origin"]).unwrap();
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["kind"], "by_remote_name");
        assert_eq!(json["target"], "origin");
        assert_eq!(json["command"], "push");
    }
}
