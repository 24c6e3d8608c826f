//! `GIT_SSH_COMMAND` construction.

use std::path::Path;

/// Environment variable git reads its SSH transport command from.
pub const GIT_SSH_COMMAND_ENV: &str = "GIT_SSH_COMMAND";

/// SSH command pinning `key_path` as the only identity.
///
/// `-F /dev/null` keeps `~/.ssh/config` host overrides from replacing the
/// selected key. Git runs the value through a shell, so the path is quoted.
pub fn build_git_ssh_command(key_path: &Path) -> String {
    format!(
        "ssh -F /dev/null -i {} -o IdentitiesOnly=yes",
        shell_quote(&key_path.to_string_lossy())
    )
}

/// POSIX single-quote a string.
fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    format!("'{}'", s.replace('\'', r#"'"'"'"#))
}
