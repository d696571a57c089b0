//! Process-backed [`Keyring`] over the gpg binary.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::thread;

use libkeysync_core::{KeyMetadata, Keyring};
use tracing::debug;

use crate::listing::parse_key_listing;
use crate::GpgError;

/// Suffix that makes gpg select exactly one (sub)key
const EXACT_KEY_SUFFIX: char = '!';

/// Keyring backed by the `gpg` command line
#[derive(Debug, Clone)]
pub struct GpgKeyring {
    program: PathBuf,
    homedir: Option<PathBuf>,
}

impl Default for GpgKeyring {
    fn default() -> Self {
        Self {
            program: PathBuf::from("gpg"),
            homedir: None,
        }
    }
}

impl GpgKeyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific gpg binary
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Operate on a keyring other than the default (`--homedir`)
    pub fn with_homedir(mut self, homedir: impl Into<PathBuf>) -> Self {
        self.homedir = Some(homedir.into());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["--batch", "--yes", "--no-tty"]);
        if let Some(homedir) = &self.homedir {
            cmd.arg("--homedir").arg(homedir);
        }
        cmd
    }

    /// Run gpg with `args`, feeding `stdin` if given. Non-zero exit is returned
    /// as an `Output`, not an error; callers decide.
    ///
    /// Input is written from a separate thread while the output pipes drain.
    /// A write error only surfaces if gpg still exits successfully; otherwise
    /// gpg's own status and stderr are what the caller sees.
    fn run(&self, args: &[&str], stdin: Option<&[u8]>) -> Result<Output, GpgError> {
        let mut cmd = self.command();
        cmd.args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        debug!(program = %self.program.display(), ?args, "running gpg");

        let mut child = cmd.spawn().map_err(|source| GpgError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        let pipe = child.stdin.take();
        let (output, fed) = thread::scope(|scope| {
            let feeder = match (stdin, pipe) {
                (Some(input), Some(mut pipe)) => Some(scope.spawn(move || pipe.write_all(input))),
                _ => None,
            };
            let output = child.wait_with_output();
            let fed = match feeder {
                Some(handle) => handle.join().unwrap_or_else(|_| {
                    Err(io::Error::new(io::ErrorKind::Other, "stdin writer panicked"))
                }),
                None => Ok(()),
            };
            (output, fed)
        });

        let output = output?;
        if let Err(e) = fed {
            if output.status.success() {
                return Err(e.into());
            }
            debug!(error = %e, status = %output.status, "gpg exited before reading all input");
        }
        Ok(output)
    }

    fn check(command: &'static str, output: Output) -> Result<Output, GpgError> {
        if output.status.success() {
            Ok(output)
        } else {
            Err(GpgError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn export(&self, command: &'static str, target: &str) -> Result<Vec<u8>, GpgError> {
        let output = Self::check(command, self.run(&["--armor", command, target], None)?)?;
        if output.stdout.is_empty() {
            return Err(GpgError::EmptyOutput {
                command,
                target: target.to_string(),
            });
        }
        Ok(output.stdout)
    }
}

/// `fingerprint!`, selecting only that subkey
pub fn exact_key_selector(fingerprint: &str) -> String {
    if fingerprint.ends_with(EXACT_KEY_SUFFIX) {
        fingerprint.to_string()
    } else {
        format!("{}{}", fingerprint, EXACT_KEY_SUFFIX)
    }
}

impl Keyring for GpgKeyring {
    type Error = GpgError;

    fn export_public(&self, fingerprint: &str) -> Result<Vec<u8>, GpgError> {
        self.export("--export", fingerprint)
    }

    fn export_secret(&self, fingerprint: &str) -> Result<Vec<u8>, GpgError> {
        self.export("--export-secret-keys", fingerprint)
    }

    fn export_secret_subkey(&self, fingerprint: &str) -> Result<Vec<u8>, GpgError> {
        self.export("--export-secret-subkeys", &exact_key_selector(fingerprint))
    }

    fn read_metadata(&self, fingerprint: &str) -> Result<KeyMetadata, GpgError> {
        let command = "--list-keys";
        let output = Self::check(
            command,
            self.run(
                &["--with-colons", "--fixed-list-mode", command, fingerprint],
                None,
            )?,
        )?;
        Ok(parse_key_listing(&String::from_utf8_lossy(&output.stdout)))
    }

    fn import(&self, material: &[u8]) -> Result<(), GpgError> {
        Self::check("--import", self.run(&["--import"], Some(material))?)?;
        Ok(())
    }

    fn delete_keypair(&self, fingerprint: &str) -> Result<(), GpgError> {
        let command = "--delete-secret-and-public-key";
        let output = self.run(&[command, fingerprint], None)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.to_lowercase().contains("not found") {
                debug!(fingerprint, "key not in keyring, nothing to delete");
                return Ok(());
            }
        }
        Self::check(command, output)?;
        Ok(())
    }
}
