use std::cell::RefCell;

use libkeysync_core::{KeysyncError, Outcome, Reporter};
use serde::Serialize;

use crate::cli::Cli;

/// JSON response envelope
#[derive(Serialize)]
pub struct JsonResponse<T: Serialize> {
    pub schema_version: u32,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

#[derive(Serialize)]
pub struct JsonError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

const SCHEMA_VERSION: u32 = 1;

fn print_json<T: Serialize>(value: &T, to_stderr: bool) {
    match serde_json::to_string_pretty(value) {
        Ok(text) if to_stderr => eprintln!("{}", text),
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("error: failed to serialize output: {}", e),
    }
}

/// Output a successful result. Human output is printed by the command itself.
pub fn output_success<T: Serialize>(cli: &Cli, data: T) {
    if cli.json {
        let response = JsonResponse {
            schema_version: SCHEMA_VERSION,
            ok: true,
            data: Some(data),
            error: None,
        };
        print_json(&response, false);
    }
}

/// Output an error
pub fn output_error(cli: &Cli, err: &KeysyncError) {
    let suggestions = err.suggestions();

    if cli.json {
        let mut details = serde_json::Map::new();
        if !suggestions.is_empty() {
            details.insert("suggestions".to_string(), serde_json::json!(suggestions));
        }
        if !err.failures().is_empty() {
            details.insert("failures".to_string(), serde_json::json!(err.failures()));
        }
        let details = if details.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::Value::Object(details)
        };

        let response: JsonResponse<()> = JsonResponse {
            schema_version: SCHEMA_VERSION,
            ok: false,
            data: None,
            error: Some(JsonError {
                code: err.error_code().to_string(),
                message: err.to_string(),
                details,
            }),
        };
        print_json(&response, true);
    } else {
        eprintln!("error: {}", err);
        if !suggestions.is_empty() {
            eprintln!();
            eprintln!("Suggestions:");
            for suggestion in suggestions {
                eprintln!("  - {}", suggestion);
            }
        }
    }
}

/// Print human-readable output (ignored in quiet and JSON modes)
pub fn print_human(cli: &Cli, msg: &str) {
    if !cli.json && !cli.quiet {
        println!("{}", msg);
    }
}

/// Prints each outcome as it happens in human mode and keeps all of them
/// for the JSON envelope.
pub struct CliReporter<'c> {
    cli: &'c Cli,
    outcomes: RefCell<Vec<Outcome>>,
}

impl<'c> CliReporter<'c> {
    pub fn new(cli: &'c Cli) -> Self {
        Self {
            cli,
            outcomes: RefCell::new(Vec::new()),
        }
    }

    pub fn into_outcomes(self) -> Vec<Outcome> {
        self.outcomes.into_inner()
    }
}

impl Reporter for CliReporter<'_> {
    fn report(&self, outcome: &Outcome) {
        if let Outcome::Failed { .. } = outcome {
            // Failures stay visible under --quiet
            if !self.cli.json {
                eprintln!("{}", outcome);
            }
        } else {
            print_human(self.cli, &outcome.to_string());
        }
        self.outcomes.borrow_mut().push(outcome.clone());
    }
}

/// Payload for sync, backup, and restore commands
#[derive(Serialize)]
pub struct OutcomeOutput {
    pub operation: &'static str,
    pub outcomes: Vec<Outcome>,
}
