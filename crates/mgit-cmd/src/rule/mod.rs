//! Rule store inspection commands (`mgit rule`).

pub mod list;

use clap::Subcommand;

use crate::factory::Factory;

/// Rule subcommands.
#[derive(Debug, Subcommand)]
pub enum RuleCommand {
    /// Print the routing rules in declaration order.
    #[command(alias = "ls")]
    List(list::ListArgs),
}

impl RuleCommand {
    /// Run the appropriate rule subcommand.
    pub fn run(self, factory: &Factory) -> anyhow::Result<()> {
        match self {
            Self::List(args) => args.run(factory),
        }
    }
}
