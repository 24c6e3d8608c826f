//! Rule store for mgit.
//!
//! The store is a JSON document (`.mgit/config.json`) holding an ordered list
//! of routing rules. mgit only reads it; the rules are normalized on load so
//! every rule carries an id and non-empty patterns.

mod expand;
mod store;

use serde::{Deserialize, Serialize};

pub use expand::{HomeDirExpander, PathExpander, expand_path, expand_path_with};
pub use store::{
    CONFIG_ENV_VAR, find_nearest_config, find_repo_root, load_config, resolve_config_path,
};

/// Current rule store schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Location of the rule store relative to a repository root.
pub const CONFIG_RELATIVE_PATH: &str = ".mgit/config.json";

/// The wildcard pattern that matches any host or owner.
pub const WILDCARD: &str = "*";

/// Top-level rule store document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Schema version.
    #[serde(default)]
    pub version: u32,
    /// Routing rules in priority-independent declaration order.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A routing rule mapping a host/owner pattern pair to a private key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule id.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Glob pattern for the remote host.
    #[serde(default)]
    pub host: String,
    /// Glob pattern for the ownership path (account, org, or nested group).
    #[serde(default)]
    pub owner: String,
    /// Key reference, e.g. `~/.ssh/work_key`.
    #[serde(default)]
    pub key: String,
    /// Explicit priority; higher wins before specificity is considered.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: i64,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl Rule {
    /// Create a rule with zero priority and no id.
    pub fn new(host: impl Into<String>, owner: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            host: host.into(),
            owner: owner.into(),
            key: key.into(),
            priority: 0,
        }
    }

    /// Set the rule id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the rule priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }
}

impl Config {
    /// Fill in defaults: schema version, wildcard patterns, trimmed keys, and
    /// ids for rules that have none.
    pub fn normalize(&mut self, ids: &mut dyn RuleIdGenerator) {
        if self.version == 0 {
            self.version = CURRENT_VERSION;
        }
        for rule in &mut self.rules {
            rule.host = normalize_pattern(&rule.host);
            rule.owner = normalize_pattern(&rule.owner);
            rule.key = rule.key.trim().to_string();
            if rule.id.is_empty() {
                rule.id = ids.next_id();
            }
        }
    }
}

/// Trim a pattern, mapping an empty pattern to the wildcard.
pub fn normalize_pattern(pattern: &str) -> String {
    let trimmed = pattern.trim();
    if trimmed.is_empty() {
        WILDCARD.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Source of ids for rules that were stored without one.
pub trait RuleIdGenerator: std::fmt::Debug {
    /// Produce the next id.
    fn next_id(&mut self) -> String;
}

/// Random `r_xxxxxxxx` ids backed by UUID v4.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomRuleIds;

impl RuleIdGenerator for RandomRuleIds {
    fn next_id(&mut self) -> String {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        format!("r_{}", &uuid[..8])
    }
}

/// Deterministic `r_1`, `r_2`, ... ids.
#[derive(Debug, Default, Clone)]
pub struct SequentialRuleIds {
    next: u64,
}

impl RuleIdGenerator for SequentialRuleIds {
    fn next_id(&mut self) -> String {
        self.next += 1;
        format!("r_{}", self.next)
    }
}
