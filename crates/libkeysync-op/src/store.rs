use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use libkeysync_core::{ItemFields, RemoteItem, SecretStore};
use tracing::debug;

use crate::item::{field_assignments, parse_item};
use crate::OpError;

const ITEM_CATEGORY: &str = "Secure Note";
const ITEM_TAG: &str = "keysync";

/// `op item get` stderr meaning the item does not exist
pub fn is_not_found(stderr: &str) -> bool {
    let stderr = stderr.to_lowercase();
    stderr.contains("not found") || stderr.contains("isn't an item")
}

/// Secret store backed by the 1Password CLI
#[derive(Debug, Clone)]
pub struct OpStore {
    program: PathBuf,
}

impl Default for OpStore {
    fn default() -> Self {
        Self {
            program: PathBuf::from("op"),
        }
    }
}

impl OpStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Argument lists can contain secret material, so only the subcommand is logged.
    fn run(&self, command: &'static str, args: &[String]) -> Result<Output, OpError> {
        debug!(program = %self.program.display(), command, "running op");
        Command::new(&self.program)
            .args(args)
            .env("OP_NO_PROMPT", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| OpError::Spawn {
                program: self.program.display().to_string(),
                source,
            })
    }

    fn check(command: &'static str, output: Output) -> Result<Output, OpError> {
        if output.status.success() {
            Ok(output)
        } else {
            Err(OpError::CommandFailed {
                command,
                status: output.status,
                stderr: stderr_text(&output),
            })
        }
    }
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

fn args<const N: usize>(fixed: [&str; N]) -> Vec<String> {
    fixed.iter().map(|s| s.to_string()).collect()
}

impl SecretStore for OpStore {
    type Error = OpError;

    fn ensure_authenticated(&self) -> Result<(), OpError> {
        let output = self.run("whoami", &args(["whoami", "--format", "json"]))?;
        if !output.status.success() {
            debug!(stderr = %stderr_text(&output), "op whoami failed");
            return Err(OpError::NotSignedIn);
        }
        Ok(())
    }

    fn is_sign_in_error(&self, error: &OpError) -> bool {
        matches!(error, OpError::NotSignedIn)
    }

    fn get_item(&self, title: &str, vault: &str) -> Result<Option<RemoteItem>, OpError> {
        let command = "item get";
        let output = self.run(
            command,
            &args(["item", "get", title, "--vault", vault, "--format", "json", "--reveal"]),
        )?;
        if !output.status.success() && is_not_found(&stderr_text(&output)) {
            debug!(title, vault, "item not found");
            return Ok(None);
        }
        let output = Self::check(command, output)?;
        Ok(Some(parse_item(&output.stdout, vault)?))
    }

    fn create_item(&self, title: &str, vault: &str, fields: &ItemFields) -> Result<(), OpError> {
        let command = "item create";
        let mut argv = args([
            "item",
            "create",
            "--category",
            ITEM_CATEGORY,
            "--vault",
            vault,
            "--title",
            title,
            "--tags",
            ITEM_TAG,
        ]);
        argv.extend(field_assignments(fields));
        Self::check(command, self.run(command, &argv)?)?;
        Ok(())
    }

    fn edit_item(&self, title: &str, vault: &str, fields: &ItemFields) -> Result<(), OpError> {
        let command = "item edit";
        let mut argv = args(["item", "edit", title, "--vault", vault]);
        argv.extend(field_assignments(fields));
        Self::check(command, self.run(command, &argv)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(is_not_found(
            "[ERROR] 2024/05/01 12:00:00 \"laptop-ssh\" isn't an item in the \"Private\" vault."
        ));
        assert!(is_not_found("[ERROR] item Not Found"));
        assert!(!is_not_found("[ERROR] You are not currently signed in."));
    }

    #[test]
    fn test_sign_in_guidance() {
        let msg = OpError::NotSignedIn.to_string();
        assert!(msg.contains("eval $(op signin)"));
        assert!(msg.contains("app-integration"));
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let store = OpStore::new().with_program("/nonexistent/keysync-test-op");
        let err = store.ensure_authenticated().unwrap_err();
        assert!(matches!(err, OpError::Spawn { .. }));
        assert!(!store.is_sign_in_error(&err));
        assert!(store.is_sign_in_error(&OpError::NotSignedIn));
    }

    /// One test drives every operation so the stub is never executed while
    /// another thread still has it open for writing.
    #[cfg(unix)]
    #[test]
    fn test_operations_against_stub_binary() {
        use libkeysync_core::KeyMetadata;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("op");
        let log = dir.path().join("calls");
        std::fs::write(
            &script,
            format!(
                r#"#!/bin/sh
[ "$OP_NO_PROMPT" = "1" ] || {{ echo "prompting" >&2; exit 9; }}
echo "$1 $2 $3" >> "{log}"
case "$1 $2" in
  "whoami --format") echo '{{"account_uuid":"x"}}' ;;
  "item get")
    case "$3" in
      present) echo '{{"title":"present","vault":{{"name":"Private"}},"fields":[{{"label":"fingerprint","value":"BBBB"}}]}}' ;;
      broken) echo "[ERROR] connection refused" >&2; exit 1 ;;
      *) echo "[ERROR] \"$3\" isn't an item in the \"Private\" vault." >&2; exit 1 ;;
    esac ;;
  "item create"|"item edit") ;;
  *) exit 2 ;;
esac
"#,
                log = log.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let store = OpStore::new().with_program(&script);
        store.ensure_authenticated().unwrap();

        let item = store.get_item("present", "Private").unwrap().unwrap();
        assert_eq!(item.field_value("fingerprint"), Some("BBBB"));
        assert!(store.get_item("absent", "Private").unwrap().is_none());
        assert!(matches!(
            store.get_item("broken", "Private"),
            Err(OpError::CommandFailed { .. })
        ));

        let fields = ItemFields {
            fingerprint: "BBBB".to_string(),
            metadata: KeyMetadata::default(),
            public_key: "PUB".to_string(),
            secret_key: "SEC".to_string(),
            sha256_public: "aa".to_string(),
            sha256_secret: "bb".to_string(),
            synced_at: None,
        };
        store.create_item("new", "Private", &fields).unwrap();
        store.edit_item("present", "Private", &fields).unwrap();

        let calls = std::fs::read_to_string(&log).unwrap();
        let calls: Vec<&str> = calls.lines().collect();
        assert_eq!(
            calls,
            vec![
                "whoami --format json",
                "item get present",
                "item get absent",
                "item get broken",
                "item create --category",
                "item edit present",
            ]
        );
    }
}
