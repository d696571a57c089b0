use libkeysync_core::{Config, KeysyncError, Reconciler, Reporter};
use libkeysync_gpg::GpgKeyring;
use libkeysync_op::OpStore;
use tracing::debug;

use crate::cli::Cli;

/// Loaded config plus the process-backed collaborators
pub struct KeysyncContext {
    pub config: Config,
    pub keyring: GpgKeyring,
    pub store: OpStore,
}

impl KeysyncContext {
    /// Load and validate the config named by `--config`. Runs no external commands.
    pub fn resolve(cli: &Cli) -> Result<Self, KeysyncError> {
        let config = Config::load(&cli.config)?;
        debug!(
            path = %cli.config.display(),
            keys = config.keys.len(),
            hosts = config.hosts.len(),
            "loaded config"
        );

        let mut keyring = GpgKeyring::new().with_program(&cli.gpg);
        if let Some(homedir) = &cli.gpg_homedir {
            keyring = keyring.with_homedir(homedir);
        }

        Ok(Self {
            config,
            keyring,
            store: OpStore::new().with_program(&cli.op),
        })
    }

    pub fn reconciler<'a>(
        &'a self,
        reporter: &'a dyn Reporter,
    ) -> Reconciler<'a, &'a GpgKeyring, &'a OpStore> {
        Reconciler::new(&self.config, &self.keyring, &self.store, reporter)
    }
}
