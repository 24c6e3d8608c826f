//! Rule store discovery and loading.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::expand::expand_path_with;
use super::{CONFIG_RELATIVE_PATH, Config, RuleIdGenerator};
use crate::errors::ConfigError;

/// Environment variable naming an explicit rule store path.
pub const CONFIG_ENV_VAR: &str = "MGIT_CONFIG";

/// Resolve the rule store path.
///
/// A non-blank `explicit` path is expanded and returned. Otherwise the nearest
/// `.mgit/config.json` at or above `cwd` wins, then the one under the enclosing
/// repository root, then `<cwd>/.mgit/config.json`.
pub fn resolve_config_path(explicit: Option<&str>, cwd: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(explicit) = explicit.filter(|p| !p.trim().is_empty()) {
        let home = dirs::home_dir();
        return expand_path_with(explicit, home.as_deref(), cwd, |name| {
            std::env::var(name).ok()
        });
    }

    if let Some(found) = find_nearest_config(cwd) {
        debug!(path = %found.display(), "using nearest config");
        return Ok(found);
    }
    if let Some(root) = find_repo_root(cwd) {
        return Ok(root.join(CONFIG_RELATIVE_PATH));
    }
    Ok(cwd.join(CONFIG_RELATIVE_PATH))
}

/// Walk up from `start` looking for a `.mgit/config.json` file.
pub fn find_nearest_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_RELATIVE_PATH))
        .find(|candidate| candidate.is_file())
}

/// Walk up from `start` looking for a directory containing `.git`.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Read, parse, and normalize the rule store at `path`.
pub fn load_config(path: &Path, ids: &mut dyn RuleIdGenerator) -> Result<Config, ConfigError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ConfigError::NotFound {
                path: display.clone(),
            }
        } else {
            ConfigError::ReadFile {
                path: display.clone(),
                source: e,
            }
        }
    })?;

    let mut cfg: Config = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: display.clone(),
        message: e.to_string(),
    })?;
    cfg.normalize(ids);
    debug!(path = %path.display(), rules = cfg.rules.len(), "loaded config");
    Ok(cfg)
}
