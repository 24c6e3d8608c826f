//! Configuration commands (`mgit config`).

pub mod path;

use clap::Subcommand;

use crate::factory::Factory;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved rule store path.
    Path(path::PathArgs),
}

impl ConfigCommand {
    /// Run the appropriate config subcommand.
    pub fn run(self, factory: &Factory) -> anyhow::Result<()> {
        match self {
            Self::Path(args) => args.run(factory),
        }
    }
}
