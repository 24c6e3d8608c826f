//! `mgit config path` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use mgit_core::ios_println;

use crate::factory::Factory;
use crate::report::print_json;

/// Print the rule store path mgit would read.
#[derive(Debug, Args)]
pub struct PathArgs {}

#[derive(Debug, Serialize)]
struct PathOutput {
    path: String,
    exists: bool,
}

impl PathArgs {
    /// Run the config path command.
    pub fn run(&self, factory: &Factory) -> Result<()> {
        let path = factory.config_path()?;
        if factory.json() {
            return print_json(
                &factory.io,
                &PathOutput {
                    exists: path.is_file(),
                    path: path.display().to_string(),
                },
            );
        }
        ios_println!(factory.io, "{}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_helpers::TestHarness;

    #[test]
    fn test_should_default_to_cwd_config() {
        let h = TestHarness::without_config();
        PathArgs {}.run(&h.factory).unwrap();
        assert_eq!(
            h.stdout(),
            format!("{}\n", h.path().join(".mgit/config.json").display())
        );
    }

    #[test]
    fn test_should_find_config_in_parent() {
        let h = TestHarness::without_config();
        fs::create_dir_all(h.path().join(".mgit")).unwrap();
        fs::write(h.path().join(".mgit/config.json"), "{}").unwrap();
        let nested = h.path().join("src/deep");
        fs::create_dir_all(&nested).unwrap();

        let h = h.map_factory(|f| f.with_cwd(&nested).with_json(true));
        PathArgs {}.run(&h.factory).unwrap();

        let json: serde_json::Value = serde_json::from_str(&h.stdout()).unwrap();
        assert_eq!(
            json["path"],
            h.path().join(".mgit/config.json").display().to_string()
        );
        assert_eq!(json["exists"], true);
    }
}
