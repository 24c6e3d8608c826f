//! `mgit plan` command: show what mgit would set up for a git command.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::debug;

use mgit_core::cmdutil::FlagError;
use mgit_core::ios_println;
use mgit_core::iostreams::IOStreams;
use mgit_git::infer::{GitTarget, TargetKind, infer_git_target};
use mgit_git::resolve::ResolutionResult;

use crate::factory::Factory;
use crate::report::{print_json, resolve_url};

/// Commands that fall back to the default remote when none is named.
const DEFAULT_REMOTE_COMMANDS: &[&str] = &["push", "fetch", "pull"];

/// Dry-run a git command: infer its remote and show the key override.
#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Git arguments, e.g. `push origin main`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub git_args: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Plan {
    git_args: Vec<String>,
    target: GitTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote_url: Option<String>,
    env: BTreeMap<String, String>,
    notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<ResolutionResult>,
}

impl PlanArgs {
    /// Run the plan command.
    pub async fn run(&self, factory: &Factory) -> Result<()> {
        if self.git_args.is_empty() {
            return Err(FlagError(
                "missing git arguments; use e.g. `mgit plan push origin main`".to_string(),
            )
            .into());
        }

        let mut target =
            infer_git_target(&self.git_args).map_err(|e| FlagError(e.to_string()))?;
        let mut notes: Vec<String> = target.notes.iter().cloned().collect();

        let (mut remote, mut remote_url) = (None, None);
        match &target.kind {
            TargetKind::ByLiteralUrl(url) => remote_url = Some(url.clone()),
            TargetKind::ByRemoteName(name) => remote = Some(name.clone()),
            TargetKind::None => {}
        }

        if target.kind == TargetKind::None
            && DEFAULT_REMOTE_COMMANDS.contains(&target.command.as_str())
        {
            match factory.git_client()?.guess_default_remote().await {
                Ok(guessed) => {
                    notes.push(format!("remote inferred automatically: {guessed}"));
                    target.kind = TargetKind::ByRemoteName(guessed.clone());
                    remote = Some(guessed);
                }
                Err(e) => debug!(error = %e, "no default remote"),
            }
        }

        if let Some(name) = &remote {
            let push = target.command == "push";
            let url = factory
                .git_client()?
                .remote_url(name, push)
                .await
                .map_err(|e| anyhow::anyhow!("failed to get URL for remote {name:?}: {e}"))?;
            remote_url = Some(url);
        }

        let mut env = BTreeMap::new();
        let mut resolution = None;
        if let Some(url) = remote_url.as_deref().filter(|_| !target.skip_credential_selection) {
            let res = resolve_url(factory, url)?;
            if let Some((key, value)) = res.env_override() {
                env.insert(key.to_string(), value.to_string());
            }
            notes.extend(res.notes.iter().cloned());
            resolution = Some(res);
        }

        let plan = Plan {
            git_args: self.git_args.clone(),
            target,
            remote,
            remote_url,
            env,
            notes,
            resolution,
        };
        if factory.json() {
            return print_json(&factory.io, &plan);
        }
        print_text(&factory.io, &plan);
        Ok(())
    }
}

fn print_text(ios: &IOStreams, plan: &Plan) {
    let cs = ios.color_scheme();
    ios_println!(ios, "Dry run: git {}", plan.git_args.join(" "));
    if let Some(url) = &plan.remote_url {
        ios_println!(ios, "Resolved URL: {}", cs.cyan(url));
    }
    if let Some(name) = &plan.remote {
        ios_println!(ios, "Remote: {name}");
    }
    if plan.env.is_empty() {
        ios_println!(ios, "No SSH env override will be applied");
    }
    for (key, value) in &plan.env {
        ios_println!(ios, "{key}={value}");
    }
    for note in &plan.notes {
        ios_println!(ios, "Note: {note}");
    }
}
