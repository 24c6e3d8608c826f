//! Rule selection by priority and pattern specificity.

use glob::Pattern;
use serde::Serialize;
use tracing::debug;

use mgit_core::config::{Rule, WILDCARD};

use crate::errors::MatchError;
use crate::url_parser::RemoteDescriptor;

const PRIORITY_WEIGHT: i64 = 1000;
const EXACT_LITERAL: i64 = 400;
const NON_WILDCARD_LITERAL: i64 = 300;
const WILDCARD_PATTERN: i64 = 100;

/// The winning rule for a remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Selected rule.
    pub rule: Rule,
    /// Score the rule achieved.
    pub score: i64,
    /// Position of the rule in the input order.
    pub index: usize,
}

/// Pick the best rule for `remote`.
///
/// Both the host and owner pattern must glob-match. Among candidates the
/// highest score wins and the earliest rule wins a tie.
pub fn match_rule(rules: &[Rule], remote: &RemoteDescriptor) -> Result<MatchResult, MatchError> {
    if remote.host.trim().is_empty() {
        return Err(MatchError::EmptyHost);
    }

    let host = remote.host.trim().to_lowercase();
    let owner = remote.owner.trim().to_lowercase();

    let mut best: Option<MatchResult> = None;
    for (index, rule) in rules.iter().enumerate() {
        let Some(score) = score_rule(rule, &host, &owner) else {
            continue;
        };
        match &best {
            Some(current) if score > current.score => {}
            Some(current) => {
                if score == current.score {
                    debug!(
                        kept = current.index,
                        skipped = index,
                        score,
                        "rules tie; keeping the earlier one"
                    );
                }
                continue;
            }
            None => {}
        }
        best = Some(MatchResult {
            rule: rule.clone(),
            score,
            index,
        });
    }

    best.ok_or_else(|| MatchError::NoRuleMatched {
        host: remote.host.clone(),
        owner: remote.owner.clone(),
    })
}

fn score_rule(rule: &Rule, host: &str, owner: &str) -> Option<i64> {
    let host_pattern = normalize(&rule.host);
    let owner_pattern = normalize(&rule.owner);

    if !glob_matches(&host_pattern, host) || !glob_matches(&owner_pattern, owner) {
        return None;
    }

    Some(
        rule.priority
            .saturating_mul(PRIORITY_WEIGHT)
            .saturating_add(specificity(&host_pattern, host))
            .saturating_add(specificity(&owner_pattern, owner))
            .saturating_add(literal_chars(&host_pattern))
            .saturating_add(literal_chars(&owner_pattern)),
    )
}

fn normalize(pattern: &str) -> String {
    let trimmed = pattern.trim();
    if trimmed.is_empty() {
        WILDCARD.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

// Invalid patterns never match.
fn glob_matches(pattern: &str, value: &str) -> bool {
    Pattern::new(&collapse_stars(pattern)).is_ok_and(|p| p.matches(value))
}

// `glob` only accepts `**` as a whole path component; a run of stars
// elsewhere means the same as one.
fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

fn specificity(pattern: &str, value: &str) -> i64 {
    if pattern == WILDCARD {
        0
    } else if !has_wildcard(pattern) && pattern.eq_ignore_ascii_case(value) {
        EXACT_LITERAL
    } else if !has_wildcard(pattern) {
        NON_WILDCARD_LITERAL
    } else {
        WILDCARD_PATTERN
    }
}

fn literal_chars(pattern: &str) -> i64 {
    let count = pattern
        .chars()
        .filter(|c| !matches!(c, '*' | '?' | '[' | ']'))
        .count();
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}
