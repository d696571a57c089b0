//! Host restore command implementation

use libkeysync_core::KeysyncError;

use crate::cli::{Cli, RestoreArgs};
use crate::context::KeysyncContext;
use crate::output::{output_success, CliReporter, OutcomeOutput};

pub fn run(cli: &Cli, host: &str, opts: RestoreArgs) -> Result<(), KeysyncError> {
    let ctx = KeysyncContext::resolve(cli)?;
    let reporter = CliReporter::new(cli);
    ctx.reconciler(&reporter).restore_host(host, opts.into())?;

    output_success(
        cli,
        OutcomeOutput {
            operation: "restore",
            outcomes: reporter.into_outcomes(),
        },
    );
    Ok(())
}
