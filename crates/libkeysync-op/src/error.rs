use thiserror::Error;

/// Printed when `op whoami` fails
pub const SIGN_IN_GUIDANCE: &str = "1Password CLI not signed in. Sign in first:\n  eval $(op signin)\nor enable desktop app integration:\n  https://developer.1password.com/docs/cli/app-integration/";

/// Errors from invoking the 1Password CLI
#[derive(Debug, Error)]
pub enum OpError {
    #[error("{}", SIGN_IN_GUIDANCE)]
    NotSignedIn,

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("op {command} failed ({status}): {stderr}")]
    CommandFailed {
        command: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("failed to parse op output: {0}")]
    Parse(#[from] serde_json::Error),
}
