//! `mgit remotes` command: resolve every remote of the current repository.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use mgit_core::cmdutil::SilentError;
use mgit_core::iostreams::IOStreams;
use mgit_core::{ios_eprintln, ios_println};
use mgit_git::remote::Remote;
use mgit_git::resolve::ResolutionResult;

use crate::factory::Factory;
use crate::report::{hint_for, print_json, resolve_url};

/// Resolve the SSH key for each remote of the current repository.
#[derive(Debug, Args)]
pub struct RemotesArgs {}

#[derive(Debug, Serialize)]
struct RemoteReport {
    name: String,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ResolutionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl RemoteReport {
    fn build(factory: &Factory, remote: &Remote) -> Self {
        let mut report = Self {
            name: remote.name.clone(),
            url: remote.fetch_url.clone(),
            result: None,
            error: None,
            hint: None,
        };
        match resolve_url(factory, &remote.fetch_url) {
            Ok(res) => report.result = Some(res),
            Err(e) => {
                report.hint = hint_for(&e);
                report.error = Some(e.to_string());
            }
        }
        report
    }
}

impl RemotesArgs {
    /// Run the remotes command. Fails silently after printing when any
    /// remote cannot be resolved.
    pub async fn run(&self, factory: &Factory) -> Result<()> {
        let ios = &factory.io;
        let remotes = factory.git_client()?.remotes().await?;

        let reports: Vec<RemoteReport> = remotes
            .iter()
            .map(|remote| RemoteReport::build(factory, remote))
            .collect();

        if factory.json() {
            print_json(ios, &reports)?;
        } else if reports.is_empty() {
            ios_eprintln!(ios, "No remotes configured");
        } else {
            print_text(ios, &reports);
        }

        if reports.iter().any(|r| r.error.is_some()) {
            return Err(SilentError.into());
        }
        Ok(())
    }
}

fn print_text(ios: &IOStreams, reports: &[RemoteReport]) {
    let cs = ios.color_scheme();
    for report in reports {
        let icon = if report.error.is_some() {
            cs.error_icon()
        } else {
            cs.success_icon()
        };
        ios_println!(ios, "{icon} {} => {}", cs.bold(&report.name), cs.cyan(&report.url));

        if let Some(err) = &report.error {
            ios_println!(ios, "    error: {err}");
            if let Some(hint) = &report.hint {
                ios_println!(ios, "    {} {hint}", cs.gray("hint:"));
            }
            continue;
        }
        let Some(res) = &report.result else {
            continue;
        };
        let parsed = &res.remote;
        ios_println!(
            ios,
            "    parsed: host={} owner={} repo={} transport={}",
            parsed.host,
            parsed.owner,
            parsed.repo,
            parsed.transport
        );
        match (&res.matched_rule, &res.key_path) {
            (Some(rule), Some(key)) => {
                ios_println!(ios, "    rule: id={} key={}", rule.id, key.display());
            }
            _ => ios_println!(ios, "    rule: n/a (non-SSH remote)"),
        }
    }
}
