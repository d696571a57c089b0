//! Backup and backup-restore command implementation

use libkeysync_core::KeysyncError;

use crate::cli::{BackupCommand, Cli};
use crate::context::KeysyncContext;
use crate::output::{output_success, CliReporter, OutcomeOutput};

pub fn run(
    cli: &Cli,
    key: Option<String>,
    all: bool,
    cmd: Option<BackupCommand>,
) -> Result<(), KeysyncError> {
    if let Some(BackupCommand::Restore { key, opts }) = cmd {
        return restore(cli, &key, opts.into());
    }

    if key.is_some() == all {
        return Err(KeysyncError::InvalidArgs(
            "exactly one of --key or --all is required".to_string(),
        ));
    }

    let ctx = KeysyncContext::resolve(cli)?;
    let reporter = CliReporter::new(cli);
    {
        let engine = ctx.reconciler(&reporter);
        match &key {
            Some(key) => {
                engine.backup_one(key)?;
            }
            None => {
                engine.backup_all()?;
            }
        }
    }

    output_success(
        cli,
        OutcomeOutput {
            operation: "backup",
            outcomes: reporter.into_outcomes(),
        },
    );
    Ok(())
}

fn restore(
    cli: &Cli,
    key: &str,
    opts: libkeysync_core::RestoreOptions,
) -> Result<(), KeysyncError> {
    let ctx = KeysyncContext::resolve(cli)?;
    let reporter = CliReporter::new(cli);
    ctx.reconciler(&reporter).restore_one(key, opts)?;

    output_success(
        cli,
        OutcomeOutput {
            operation: "backup_restore",
            outcomes: reporter.into_outcomes(),
        },
    );
    Ok(())
}
