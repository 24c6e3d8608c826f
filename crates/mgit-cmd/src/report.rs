//! Error reporting and shared resolution plumbing.

use serde::Serialize;
use tracing::debug;

use mgit_core::cmdutil::is_flag_error;
use mgit_core::ios_eprintln;
use mgit_core::iostreams::IOStreams;
use mgit_git::errors::ResolveError;
use mgit_git::resolve::{ResolutionResult, resolve_remote};

use crate::factory::Factory;

/// Suggested fix for an error, if it carries one.
pub fn hint_for(err: &anyhow::Error) -> Option<String> {
    err.downcast_ref::<ResolveError>().and_then(ResolveError::hint)
}

/// Print an error and its hint to stderr.
pub fn print_error(ios: &IOStreams, err: &anyhow::Error) {
    let cs = ios.color_scheme();
    ios_eprintln!(ios, "{} {err}", cs.error_icon());
    if let Some(hint) = hint_for(err) {
        ios_eprintln!(ios, "{} {hint}", cs.gray("hint:"));
    }
    if is_flag_error(err) {
        ios_eprintln!(ios, "Run 'mgit --help' for usage.");
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(ios: &IOStreams, value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    mgit_core::ios_println!(ios, "{out}");
    Ok(())
}

/// Resolve `url` against the factory's rule store.
///
/// A rule store that fails to load only matters for SSH remotes: other
/// transports still resolve, with a note.
pub fn resolve_url(factory: &Factory, url: &str) -> anyhow::Result<ResolutionResult> {
    let rules = match factory.rules() {
        Ok(rules) => rules,
        Err(load_err) => {
            return match resolve_remote(None, url, factory.expander()) {
                Ok(mut res) if !res.ssh_selection_applies => {
                    debug!(error = %load_err, "ignoring rule store for non-SSH remote");
                    res.notes.push(
                        "config not loaded, but remote does not use SSH so key selection is skipped"
                            .to_string(),
                    );
                    Ok(res)
                }
                _ => Err(load_err),
            };
        }
    };
    Ok(resolve_remote(rules, url, factory.expander())?)
}
