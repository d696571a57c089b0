mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Command};
use libkeysync_core::KeysyncError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    init_logging(&cli);

    let result = run_command(&cli);

    if let Err(e) = result {
        output::output_error(&cli, &e);
        std::process::exit(e.exit_code());
    }
}

/// Logs go to stderr so stdout stays report lines or JSON
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_command(cli: &Cli) -> Result<(), KeysyncError> {
    match &cli.command {
        Command::Sync { host, all } => commands::sync::run(cli, host.clone(), *all),
        Command::Restore { host, opts } => commands::restore::run(cli, host, *opts),
        Command::Backup { key, all, cmd } => {
            commands::backup::run(cli, key.clone(), *all, cmd.clone())
        }
        Command::Check => commands::check::run(cli),
    }
}
