//! Key and config path expansion.

use std::path::{Component, Path, PathBuf};

use crate::errors::ConfigError;

/// Turns a stored path reference (`~/.ssh/id`, `$HOME/keys/id`) into an
/// absolute filesystem path.
pub trait PathExpander: std::fmt::Debug + Send + Sync {
    /// Expand a reference.
    fn expand(&self, reference: &str) -> Result<PathBuf, ConfigError>;
}

/// Expander backed by the real home directory, process environment, and
/// working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct HomeDirExpander;

impl PathExpander for HomeDirExpander {
    fn expand(&self, reference: &str) -> Result<PathBuf, ConfigError> {
        expand_path(reference)
    }
}

/// Expand a path reference against the current process state.
pub fn expand_path(reference: &str) -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    let home = dirs::home_dir();
    expand_path_with(reference, home.as_deref(), &cwd, |name| {
        std::env::var(name).ok()
    })
}

/// Expand a path reference with explicit inputs.
///
/// `~` and `~/...` resolve against `home`; `$VAR` and `${VAR}` are replaced
/// using `lookup` (unset variables become empty); a relative result is joined
/// onto `cwd`; the result is lexically cleaned.
pub fn expand_path_with<F>(
    reference: &str,
    home: Option<&Path>,
    cwd: &Path,
    lookup: F,
) -> Result<PathBuf, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidPath("empty path".to_string()));
    }

    let with_home = if trimmed == "~" || trimmed.starts_with("~/") {
        let home = home.ok_or_else(|| {
            ConfigError::InvalidPath("cannot determine home directory".to_string())
        })?;
        if trimmed == "~" {
            home.display().to_string()
        } else {
            home.join(&trimmed[2..]).display().to_string()
        }
    } else {
        trimmed.to_string()
    };

    let expanded = PathBuf::from(expand_env(&with_home, lookup));
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };
    Ok(clean(&absolute))
}

/// Replace `$NAME` and `${NAME}` occurrences. A `$` not followed by a name is
/// kept as-is.
fn expand_env<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                let name = &braced[..end];
                if !name.is_empty() {
                    out.push_str(&lookup(name).unwrap_or_default());
                }
                rest = &braced[end + 1..];
                continue;
            }
            out.push('$');
            rest = after;
            continue;
        }
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if name_len == 0 {
            out.push('$');
        } else {
            out.push_str(&lookup(&after[..name_len]).unwrap_or_default());
        }
        rest = &after[name_len..];
    }
    out.push_str(rest);
    out
}

/// Lexically clean an absolute path: drop `.` and fold `..`.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
