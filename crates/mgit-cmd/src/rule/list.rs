//! `mgit rule list` command.

use anyhow::Result;
use clap::Args;

use mgit_core::table::TablePrinter;
use mgit_core::{ios_eprintln, ios_println};

use crate::factory::Factory;
use crate::report::print_json;

/// List the routing rules of the rule store.
#[derive(Debug, Args)]
pub struct ListArgs {}

impl ListArgs {
    /// Run the rule list command.
    pub fn run(&self, factory: &Factory) -> Result<()> {
        let ios = &factory.io;
        let rules = &factory.config()?.rules;

        if factory.json() {
            return print_json(ios, rules);
        }
        if rules.is_empty() {
            ios_eprintln!(ios, "No rules configured");
            return Ok(());
        }

        let cs = ios.color_scheme();
        let mut tp =
            TablePrinter::new(ios).with_headers(&["#", "id", "host", "owner", "key", "priority"]);
        for (i, rule) in rules.iter().enumerate() {
            tp.add_row(vec![
                (i + 1).to_string(),
                cs.bold(&rule.id),
                rule.host.clone(),
                rule.owner.clone(),
                rule.key.clone(),
                rule.priority.to_string(),
            ]);
        }
        ios_println!(ios, "{}", tp.render());
        Ok(())
    }
}
