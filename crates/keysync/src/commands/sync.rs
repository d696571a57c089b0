//! Sync command implementation

use libkeysync_core::KeysyncError;

use crate::cli::Cli;
use crate::context::KeysyncContext;
use crate::output::{output_success, CliReporter, OutcomeOutput};

pub fn run(cli: &Cli, host: Option<String>, all: bool) -> Result<(), KeysyncError> {
    if host.is_some() == all {
        return Err(KeysyncError::InvalidArgs(
            "exactly one of --host or --all is required".to_string(),
        ));
    }

    let ctx = KeysyncContext::resolve(cli)?;
    let reporter = CliReporter::new(cli);
    {
        let engine = ctx.reconciler(&reporter);
        match &host {
            Some(host) => engine.sync_host(host)?,
            None => engine.sync_all()?,
        };
    }

    output_success(
        cli,
        OutcomeOutput {
            operation: "sync",
            outcomes: reporter.into_outcomes(),
        },
    );
    Ok(())
}
