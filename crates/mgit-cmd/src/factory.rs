//! Factory for shared command dependencies.
//!
//! Holds the global flags and lazily loads the rule store and git client so
//! commands that need neither never touch the filesystem or spawn git.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::debug;

use mgit_core::ConfigError;
use mgit_core::config::{
    Config, HomeDirExpander, PathExpander, RandomRuleIds, Rule, load_config, resolve_config_path,
};
use mgit_core::iostreams::{IOStreams, TestOutput};
use mgit_git::client::GitClient;

/// Shared factory providing lazily-initialized dependencies to all commands.
pub struct Factory {
    /// Application version.
    pub app_version: String,
    /// I/O streams.
    pub io: IOStreams,
    json: bool,
    config_flag: Option<String>,
    cwd_override: Option<PathBuf>,
    /// Rule store; `None` inside when no file exists.
    config: OnceLock<Option<Config>>,
    git_client: OnceLock<GitClient>,
    expander: Box<dyn PathExpander>,
}

impl std::fmt::Debug for Factory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("app_version", &self.app_version)
            .field("json", &self.json)
            .field("config_flag", &self.config_flag)
            .finish_non_exhaustive()
    }
}

impl Factory {
    /// Create a factory bound to the real terminal and working directory.
    pub fn new(app_version: String) -> Self {
        Self::with_io(app_version, IOStreams::system())
    }

    /// Create a test factory with captured I/O.
    pub fn test() -> (Self, TestOutput) {
        let (io, output) = IOStreams::test_with_output();
        (Self::with_io("test".to_string(), io), output)
    }

    fn with_io(app_version: String, io: IOStreams) -> Self {
        Self {
            app_version,
            io,
            json: false,
            config_flag: None,
            cwd_override: None,
            config: OnceLock::new(),
            git_client: OnceLock::new(),
            expander: Box::new(HomeDirExpander),
        }
    }

    /// Explicit rule store path from `--config` or `MGIT_CONFIG`.
    #[must_use]
    pub fn with_config_path(mut self, path: Option<String>) -> Self {
        self.config_flag = path;
        self
    }

    /// Emit JSON instead of text.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Use `dir` as the working directory for config discovery and git.
    #[must_use]
    pub fn with_cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd_override = Some(dir.into());
        self
    }

    /// Use an already loaded rule store.
    #[must_use]
    pub fn with_config(self, config: Config) -> Self {
        let _ = self.config.set(Some(config));
        self
    }

    /// Replace the key path expander.
    #[must_use]
    pub fn with_expander(mut self, expander: Box<dyn PathExpander>) -> Self {
        self.expander = expander;
        self
    }

    /// Whether JSON output was requested.
    pub fn json(&self) -> bool {
        self.json
    }

    /// Expander applied to rule key references.
    pub fn expander(&self) -> &dyn PathExpander {
        self.expander.as_ref()
    }

    /// The working directory.
    pub fn cwd(&self) -> anyhow::Result<PathBuf> {
        match &self.cwd_override {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir().map_err(ConfigError::CurrentDir)?),
        }
    }

    /// Resolved rule store path.
    pub fn config_path(&self) -> anyhow::Result<PathBuf> {
        let cwd = self.cwd()?;
        Ok(resolve_config_path(self.config_flag.as_deref(), &cwd)?)
    }

    fn load(&self) -> anyhow::Result<Option<&Config>> {
        if let Some(cfg) = self.config.get() {
            return Ok(cfg.as_ref());
        }
        let path = self.config_path()?;
        let loaded = match load_config(&path, &mut RandomRuleIds) {
            Ok(cfg) => Some(cfg),
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "no rule store");
                None
            }
            Err(e) => return Err(e.into()),
        };
        let _ = self.config.set(loaded);
        self.config
            .get()
            .map(Option::as_ref)
            .ok_or_else(|| anyhow::anyhow!("failed to initialize config"))
    }

    /// The rule store. A missing file is an error.
    pub fn config(&self) -> anyhow::Result<&Config> {
        match self.load()? {
            Some(cfg) => Ok(cfg),
            None => Err(ConfigError::NotFound {
                path: self.config_path()?.display().to_string(),
            }
            .into()),
        }
    }

    /// Rules from the store, or `None` when no store exists.
    pub fn rules(&self) -> anyhow::Result<Option<&[Rule]>> {
        Ok(self.load()?.map(|cfg| cfg.rules.as_slice()))
    }

    /// Get the git client.
    pub fn git_client(&self) -> anyhow::Result<&GitClient> {
        if let Some(client) = self.git_client.get() {
            return Ok(client);
        }
        let mut client = GitClient::new()?;
        if let Some(dir) = &self.cwd_override {
            client = client.with_repo_dir(dir);
        }
        let _ = self.git_client.set(client);
        self.git_client
            .get()
            .ok_or_else(|| anyhow::anyhow!("failed to initialize git client"))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(dir: &std::path::Path, body: &str) -> PathBuf {
        let path = dir.join(".mgit/config.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_should_load_nearest_config() {
        let tmp = tempfile::tempdir().unwrap();
        write_config(
            tmp.path(),
            r#"{"rules": [{"host": "github.com", "owner": "*", "key": "~/.ssh/gh"}]}"#,
        );
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let (factory, _) = Factory::test();
        let factory = factory.with_cwd(&nested);

        let rules = factory.rules().unwrap().unwrap();
        assert_eq!(rules.len(), 1);
        assert!(rules[0].id.starts_with("r_"));
        assert_eq!(factory.config().unwrap().version, 1);
    }

    #[test]
    fn test_should_treat_missing_config_as_no_rules() {
        let tmp = tempfile::tempdir().unwrap();
        let (factory, _) = Factory::test();
        let factory = factory.with_cwd(tmp.path());

        assert!(factory.rules().unwrap().is_none());
        let err = factory.config().unwrap_err();
        assert!(err.to_string().contains("config not found"));
    }

    #[test]
    fn test_should_fail_on_broken_config() {
        let tmp = tempfile::tempdir().unwrap();
        write_config(tmp.path(), "{not json");
        let (factory, _) = Factory::test();
        let factory = factory.with_cwd(tmp.path());

        let err = factory.rules().unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn test_should_prefer_explicit_config_path() {
        let tmp = tempfile::tempdir().unwrap();
        let explicit = tmp.path().join("rules.json");
        fs::write(&explicit, r#"{"version": 1, "rules": []}"#).unwrap();

        let (factory, _) = Factory::test();
        let factory = factory
            .with_cwd(tmp.path())
            .with_config_path(Some("rules.json".to_string()));

        assert_eq!(factory.config_path().unwrap(), explicit);
        assert!(factory.rules().unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_should_use_injected_config() {
        let (factory, _) = Factory::test();
        let factory = factory.with_config(Config {
            version: 1,
            rules: vec![Rule::new("*", "*", "~/.ssh/any").with_id("any")],
        });
        assert_eq!(factory.rules().unwrap().unwrap()[0].id, "any");
    }
}
