//! `mgit resolve` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use mgit_core::cmdutil::FlagError;
use mgit_core::ios_println;
use mgit_core::iostreams::IOStreams;
use mgit_git::resolve::ResolutionResult;

use crate::factory::Factory;
use crate::report::{print_json, resolve_url};

/// Show which SSH key a remote would use.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Name of a registered remote, e.g. `origin`.
    #[arg(long)]
    pub remote: Option<String>,

    /// Remote URL or shorthand locator.
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote: Option<&'a str>,
    url: &'a str,
    result: &'a ResolutionResult,
}

impl ResolveArgs {
    /// Run the resolve command.
    pub async fn run(&self, factory: &Factory) -> Result<()> {
        let remote = self.remote.as_deref().filter(|s| !s.trim().is_empty());
        let url = self.url.as_deref().filter(|s| !s.trim().is_empty());

        let (source, remote, raw_url) = match (remote, url) {
            (None, None) => {
                return Err(FlagError("specify --remote <name> or --url <remote-url>".to_string()).into());
            }
            (Some(_), Some(_)) => {
                return Err(FlagError("use only one of --remote or --url".to_string()).into());
            }
            (Some(name), None) => {
                let url = factory
                    .git_client()?
                    .remote_url(name, false)
                    .await
                    .map_err(|e| anyhow::anyhow!("failed to get URL for remote {name:?}: {e}"))?;
                (format!("remote:{name}"), Some(name), url)
            }
            (None, Some(url)) => ("url".to_string(), None, url.to_string()),
        };

        let result = resolve_url(factory, &raw_url)?;
        let output = ResolveOutput {
            source,
            remote,
            url: &raw_url,
            result: &result,
        };
        if factory.json() {
            return print_json(&factory.io, &output);
        }
        print_text(&factory.io, &output);
        Ok(())
    }
}

fn print_text(ios: &IOStreams, out: &ResolveOutput<'_>) {
    let cs = ios.color_scheme();
    let res = out.result;
    let remote = &res.remote;

    ios_println!(ios, "Source: {}", out.source);
    ios_println!(ios, "URL: {}", cs.cyan(out.url));
    ios_println!(
        ios,
        "Parsed: host={} owner={} repo={} transport={}",
        remote.host,
        remote.owner,
        remote.repo,
        remote.transport
    );
    match (&res.matched_rule, &res.key_path, &res.git_ssh_command) {
        (Some(rule), Some(key), Some(cmd)) => {
            ios_println!(
                ios,
                "Matched rule: id={} host={} owner={} (score {})",
                cs.bold(&rule.id),
                rule.host,
                rule.owner,
                res.match_score
            );
            ios_println!(ios, "Key path: {}", key.display());
            ios_println!(ios, "GIT_SSH_COMMAND: {cmd}");
        }
        _ => ios_println!(ios, "Matched rule: n/a"),
    }
    for note in &res.notes {
        ios_println!(ios, "Note: {note}");
    }
}

#[cfg(test)]
mod tests {
    use mgit_core::cmdutil::is_flag_error;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_helpers::TestHarness;

    fn url_args(url: &str) -> ResolveArgs {
        ResolveArgs {
            remote: None,
            url: Some(url.to_string()),
        }
    }

    #[tokio::test]
    async fn test_should_resolve_ssh_url() {
        let h = TestHarness::new();
        url_args("git@github.com:CompanyOrg/service.git")
            .run(&h.factory)
            .await
            .unwrap();

        assert_eq!(
            h.stdout(),
            "Source: url\n\
             URL: git@github.com:CompanyOrg/service.git\n\
             Parsed: host=github.com owner=CompanyOrg repo=service transport=ssh\n\
             Matched rule: id=work host=github.com owner=CompanyOrg (score 820)\n\
             Key path: /home/dev/.ssh/work\n\
             GIT_SSH_COMMAND: ssh -F /dev/null -i '/home/dev/.ssh/work' -o IdentitiesOnly=yes\n"
        );
    }

    #[tokio::test]
    async fn test_should_resolve_https_without_config() {
        let h = TestHarness::without_config();
        url_args("https://github.com/cli/cli.git")
            .run(&h.factory)
            .await
            .unwrap();

        let stdout = h.stdout();
        assert!(stdout.contains("transport=https"));
        assert!(stdout.contains("Matched rule: n/a"));
        assert!(stdout.contains("Note: HTTPS remote detected"));
    }

    #[tokio::test]
    async fn test_should_fail_ssh_without_config() {
        let h = TestHarness::without_config();
        let err = url_args("git@github.com:a/b.git")
            .run(&h.factory)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "config is required for SSH remote");
        assert!(crate::report::hint_for(&err).is_some());
    }

    #[tokio::test]
    async fn test_should_emit_json() {
        let h = TestHarness::new().json();
        url_args("ssh://git@gitlab.com/Group/sub/tool.git")
            .run(&h.factory)
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&h.stdout()).unwrap();
        assert_eq!(json["source"], "url");
        assert_eq!(json["result"]["remote"]["owner"], "Group/sub");
        assert_eq!(json["result"]["matched_rule"]["id"], "group");
        assert!(json.get("remote").is_none());
    }

    #[tokio::test]
    async fn test_should_require_exactly_one_source() {
        let h = TestHarness::new();
        let none = ResolveArgs {
            remote: None,
            url: None,
        };
        assert!(is_flag_error(&none.run(&h.factory).await.unwrap_err()));

        let both = ResolveArgs {
            remote: Some("origin".to_string()),
            url: Some("git@github.com:a/b.git".to_string()),
        };
        let err = both.run(&h.factory).await.unwrap_err();
        assert!(is_flag_error(&err));
        assert_eq!(err.to_string(), "use only one of --remote or --url");
    }

    #[tokio::test]
    async fn test_should_resolve_registered_remote() {
        let h = TestHarness::new();
        if !h.init_repo(&[("origin", "git@github.com:CompanyOrg/service.git")]) {
            return;
        }
        let args = ResolveArgs {
            remote: Some("origin".to_string()),
            url: None,
        };
        args.run(&h.factory).await.unwrap();

        let stdout = h.stdout();
        assert!(stdout.starts_with("Source: remote:origin\n"));
        assert!(stdout.contains("id=work"));
    }
}
