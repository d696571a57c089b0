use thiserror::Error;

/// Errors from invoking gpg
#[derive(Debug, Error)]
pub enum GpgError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("gpg {command} failed ({status}): {stderr}")]
    CommandFailed {
        command: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("gpg {command} returned empty output for {target}")]
    EmptyOutput { command: &'static str, target: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
