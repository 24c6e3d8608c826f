//! Read-only git queries.
//!
//! mgit never runs the wrapped git command itself; it only asks git about the
//! remotes of the current repository.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::instrument;

use crate::errors::GitError;
use crate::remote::Remote;

/// Name git gives the remote created by `git clone`.
pub const DEFAULT_REMOTE: &str = "origin";

/// Client for querying git.
#[derive(Debug, Clone)]
pub struct GitClient {
    git_path: PathBuf,
    repo_dir: Option<PathBuf>,
}

impl GitClient {
    /// Create a client using the `git` found in PATH.
    pub fn new() -> Result<Self, GitError> {
        let git_path = which::which("git").map_err(|_| GitError::NotFound)?;
        Ok(Self {
            git_path,
            repo_dir: None,
        })
    }

    /// Run git in `dir` instead of the process working directory.
    #[must_use]
    pub fn with_repo_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.repo_dir = Some(dir.into());
        self
    }

    #[instrument(skip(self), fields(args = ?args))]
    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let mut cmd = Command::new(&self.git_path);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.repo_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: args.iter().take(2).copied().collect::<Vec<_>>().join(" "),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                exit_code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// URL of a registered remote. With `push`, the push URL is returned.
    pub async fn remote_url(&self, name: &str, push: bool) -> Result<String, GitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GitError::EmptyRemoteName);
        }
        let mut args = vec!["remote", "get-url"];
        if push {
            args.push("--push");
        }
        args.push(name);
        self.run(&args).await
    }

    /// All remotes, sorted by name.
    pub async fn remotes(&self) -> Result<Vec<Remote>, GitError> {
        let output = self.run(&["remote", "-v"]).await?;
        Ok(Remote::parse_remotes(&output))
    }

    /// Remote of the current branch's upstream, if one is configured.
    pub async fn current_upstream_remote(&self) -> Result<Option<String>, GitError> {
        match self
            .run(&[
                "rev-parse",
                "--abbrev-ref",
                "--symbolic-full-name",
                "@{upstream}",
            ])
            .await
        {
            Ok(output) => Ok(upstream_remote_name(&output)),
            Err(GitError::CommandFailed { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The remote git would use when none is given: the upstream's remote,
    /// else the only remote, else `origin`.
    pub async fn guess_default_remote(&self) -> Result<String, GitError> {
        let upstream = self.current_upstream_remote().await?;
        if let Some(name) = upstream {
            return Ok(name);
        }
        let remotes = self.remotes().await?;
        pick_default_remote(&remotes)
    }
}

fn upstream_remote_name(output: &str) -> Option<String> {
    let line = output.lines().next()?.trim();
    let (remote, _) = line.split_once('/').unwrap_or((line, ""));
    (!remote.is_empty()).then(|| remote.to_string())
}

fn pick_default_remote(remotes: &[Remote]) -> Result<String, GitError> {
    if let [only] = remotes {
        return Ok(only.name.clone());
    }
    remotes
        .iter()
        .find(|r| r.name == DEFAULT_REMOTE)
        .map(|r| r.name.clone())
        .ok_or(GitError::NoDefaultRemote)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn remote(name: &str) -> Remote {
        Remote {
            name: name.to_string(),
            fetch_url: format!("git@github.com:me/{name}.git"),
            push_url: None,
        }
    }

    #[rstest]
    #[case("origin/main", Some("origin"))]
    #[case("upstream/feature/x", Some("upstream"))]
    #[case("mirror", Some("mirror"))]
    #[case("", None)]
    #[case("/main", None)]
    fn test_should_parse_upstream_remote(#[case] output: &str, #[case] expected: Option<&str>) {
        assert_eq!(upstream_remote_name(output).as_deref(), expected);
    }

    #[test]
    fn test_should_pick_only_remote() {
        assert_eq!(pick_default_remote(&[remote("fork")]).unwrap(), "fork");
    }

    #[test]
    fn test_should_pick_origin_among_many() {
        let remotes = [remote("backup"), remote("origin"), remote("upstream")];
        assert_eq!(pick_default_remote(&remotes).unwrap(), "origin");
    }

    #[test]
    fn test_should_fail_without_obvious_default() {
        let remotes = [remote("backup"), remote("upstream")];
        assert!(matches!(
            pick_default_remote(&remotes).unwrap_err(),
            GitError::NoDefaultRemote
        ));
        assert!(matches!(
            pick_default_remote(&[]).unwrap_err(),
            GitError::NoDefaultRemote
        ));
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    fn repo_with_remotes() -> Option<(tempfile::TempDir, GitClient)> {
        let client = GitClient::new().ok()?;
        let tmp = tempfile::tempdir().unwrap();
        git(tmp.path(), &["init", "-q"]);
        git(tmp.path(), &["remote", "add", "origin", "git@github.com:me/app.git"]);
        git(tmp.path(), &["remote", "add", "backup", "ssh://git@backup.example/me/app.git"]);
        git(
            tmp.path(),
            &["remote", "set-url", "--push", "origin", "git@github.com:me/app-push.git"],
        );
        let client = client.with_repo_dir(tmp.path());
        Some((tmp, client))
    }

    #[tokio::test]
    async fn test_should_query_remotes_from_repository() {
        let Some((_tmp, client)) = repo_with_remotes() else {
            return;
        };

        let remotes = client.remotes().await.unwrap();
        let names: Vec<&str> = remotes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["backup", "origin"]);

        assert_eq!(
            client.remote_url("origin", false).await.unwrap(),
            "git@github.com:me/app.git"
        );
        assert_eq!(
            client.remote_url("origin", true).await.unwrap(),
            "git@github.com:me/app-push.git"
        );
        assert_eq!(client.guess_default_remote().await.unwrap(), "origin");
        assert!(client.current_upstream_remote().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_should_fail_for_unknown_remote() {
        let Some((_tmp, client)) = repo_with_remotes() else {
            return;
        };
        let err = client.remote_url("missing", false).await.unwrap_err();
        assert!(matches!(err, GitError::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn test_should_reject_blank_remote_name() {
        let Ok(client) = GitClient::new() else {
            return;
        };
        assert!(matches!(
            client.remote_url("  ", false).await.unwrap_err(),
            GitError::EmptyRemoteName
        ));
    }
}
