//! Shared test utilities for command testing.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use mgit_core::ConfigError;
use mgit_core::config::{Config, PathExpander, Rule, expand_path_with};
use mgit_core::iostreams::TestOutput;
use tempfile::TempDir;

use crate::factory::Factory;

/// Expander with a fixed home directory and no environment.
#[derive(Debug)]
pub struct FixedHome(pub PathBuf);

impl PathExpander for FixedHome {
    fn expand(&self, reference: &str) -> Result<PathBuf, ConfigError> {
        expand_path_with(reference, Some(&self.0), &self.0, |_| None)
    }
}

/// Rules used by most command tests.
pub fn sample_rules() -> Vec<Rule> {
    vec![
        Rule::new("github.com", "*", "~/.ssh/personal").with_id("personal"),
        Rule::new("github.com", "CompanyOrg", "~/.ssh/work").with_id("work"),
        Rule::new("gitlab.com", "Group/*", "~/.ssh/group").with_id("group"),
    ]
}

/// A factory rooted in a scratch directory, with captured output.
#[derive(Debug)]
pub struct TestHarness {
    /// The factory configured for testing.
    pub factory: Factory,
    /// Captured stdout/stderr output.
    pub output: TestOutput,
    dir: TempDir,
}

impl TestHarness {
    /// Harness with [`sample_rules`] loaded.
    pub fn new() -> Self {
        Self::with_rules(sample_rules())
    }

    /// Harness with the given rules loaded.
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        let h = Self::without_config();
        let factory = h.factory.with_config(Config { version: 1, rules });
        Self { factory, ..h }
    }

    /// Harness whose working directory has no rule store.
    pub fn without_config() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let (factory, output) = Factory::test();
        let factory = factory
            .with_cwd(dir.path())
            .with_expander(Box::new(FixedHome(PathBuf::from("/home/dev"))));
        Self {
            factory,
            output,
            dir,
        }
    }

    /// Switch the factory to JSON output.
    #[must_use]
    pub fn json(self) -> Self {
        self.map_factory(|f| f.with_json(true))
    }

    /// Rebuild the factory, keeping the scratch directory and output.
    #[must_use]
    pub fn map_factory(mut self, f: impl FnOnce(Factory) -> Factory) -> Self {
        self.factory = f(self.factory);
        self
    }

    /// Scratch working directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Turn the working directory into a git repository with `remotes`.
    /// Returns false when git is unavailable.
    pub fn init_repo(&self, remotes: &[(&str, &str)]) -> bool {
        if which_git().is_none() {
            return false;
        }
        git(self.path(), &["init", "-q"]);
        for &(name, url) in remotes {
            git(self.path(), &["remote", "add", name, url]);
        }
        true
    }

    /// Get captured stdout as a string.
    pub fn stdout(&self) -> String {
        self.output.stdout()
    }

    /// Get captured stderr as a string.
    pub fn stderr(&self) -> String {
        self.output.stderr()
    }
}

fn which_git() -> Option<()> {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .ok()
        .filter(std::process::ExitStatus::success)
        .map(|_| ())
}

/// Run git in `dir`, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}
