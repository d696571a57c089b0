//! Per-item outcomes and the sink they are reported through.

use std::cell::RefCell;

use serde::Serialize;

/// Terminal outcome of one per-item operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Created { title: String },
    Updated { title: String },
    Unchanged { title: String },
    Restored { title: String },
    WouldRestore { title: String },
    Failed { name: String, message: String },
}

impl Outcome {
    /// Item title or batch entry name the outcome belongs to
    pub fn subject(&self) -> &str {
        match self {
            Outcome::Created { title }
            | Outcome::Updated { title }
            | Outcome::Unchanged { title }
            | Outcome::Restored { title }
            | Outcome::WouldRestore { title } => title,
            Outcome::Failed { name, .. } => name,
        }
    }

    /// Whether the outcome wrote to the secret store
    pub fn is_write(&self) -> bool {
        matches!(self, Outcome::Created { .. } | Outcome::Updated { .. })
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Created { title } => write!(f, "+ {} created", title),
            Outcome::Updated { title } => write!(f, "- {} updated", title),
            Outcome::Unchanged { title } => write!(f, "= {} unchanged", title),
            Outcome::Restored { title } => write!(f, "restored {} -> GPG keyring", title),
            Outcome::WouldRestore { title } => write!(f, "would restore {} -> GPG keyring", title),
            Outcome::Failed { name, message } => write!(f, "! {}: {}", name, message),
        }
    }
}

/// Receives every terminal outcome as it happens
pub trait Reporter {
    fn report(&self, outcome: &Outcome);
}

/// Discards outcomes
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _outcome: &Outcome) {}
}

/// Collects outcomes in order
#[derive(Debug, Default)]
pub struct CollectingReporter {
    outcomes: RefCell<Vec<Outcome>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes.borrow().clone()
    }

    /// Rendered report lines in order
    pub fn lines(&self) -> Vec<String> {
        self.outcomes.borrow().iter().map(ToString::to_string).collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, outcome: &Outcome) {
        self.outcomes.borrow_mut().push(outcome.clone());
    }
}
