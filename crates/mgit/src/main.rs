//! mgit - choose the SSH key for a git remote.
//!
//! Matches the remote a git command talks to against the rules in
//! `.mgit/config.json` and reports the `GIT_SSH_COMMAND` override to use.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mgit_cmd::factory::Factory;
use mgit_cmd::report::print_error;
use mgit_core::cmdutil::{is_flag_error, is_silent};
use mgit_core::config::CONFIG_ENV_VAR;

/// Process exit codes.
mod exit_codes {
    pub const OK: i32 = 0;
    pub const ERROR: i32 = 1;
    pub const USAGE: i32 = 2;
}

/// Environment variable holding the log filter.
const DEBUG_ENV_VAR: &str = "MGIT_DEBUG";

/// Select SSH keys for git remotes by host and owner.
#[derive(Debug, Parser)]
#[command(
    name = "mgit",
    version,
    about = "Select SSH keys for git remotes",
    long_about = "Match git remotes against host/owner rules and show the SSH key git should use."
)]
struct Cli {
    /// Path to the rule store.
    #[arg(long, global = true, env = CONFIG_ENV_VAR, value_name = "PATH")]
    config: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Log resolution details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show which SSH key a remote resolves to.
    Resolve(mgit_cmd::resolve::ResolveArgs),
    /// Dry-run a git command and show the key override it would get.
    Plan(mgit_cmd::plan::PlanArgs),
    /// Resolve every remote of the current repository.
    Remotes(mgit_cmd::remotes::RemotesArgs),
    /// Inspect routing rules.
    #[command(subcommand)]
    Rule(mgit_cmd::rule::RuleCommand),
    /// Inspect the rule store location.
    #[command(subcommand)]
    Config(mgit_cmd::config::ConfigCommand),
    /// Show version information.
    Version(mgit_cmd::version::VersionArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(DEBUG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let factory = Factory::new(env!("CARGO_PKG_VERSION").to_string())
        .with_config_path(cli.config)
        .with_json(cli.json);

    let exit_code = if let Some(cmd) = cli.command {
        match run_command(cmd, &factory).await {
            Ok(()) => exit_codes::OK,
            Err(e) if is_silent(&e) => exit_codes::ERROR,
            Err(e) => {
                print_error(&factory.io, &e);
                if is_flag_error(&e) {
                    exit_codes::USAGE
                } else {
                    exit_codes::ERROR
                }
            }
        }
    } else {
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        println!();
        exit_codes::OK
    };

    std::process::exit(exit_code);
}

async fn run_command(cmd: Commands, factory: &Factory) -> anyhow::Result<()> {
    match cmd {
        Commands::Resolve(args) => args.run(factory).await,
        Commands::Plan(args) => args.run(factory).await,
        Commands::Remotes(args) => args.run(factory).await,
        Commands::Rule(sub) => sub.run(factory),
        Commands::Config(sub) => sub.run(factory),
        Commands::Version(args) => {
            args.run(
                &factory.io,
                env!("CARGO_PKG_VERSION"),
                option_env!("MGIT_BUILD_DATE").unwrap_or(""),
            );
            Ok(())
        }
    }
}
