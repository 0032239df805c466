//! Warnings collected during an extraction run
//!
//! Every non-fatal problem degrades the model instead of aborting the run.
//! Each one is recorded here (and logged) so callers can see what was skipped.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Category of a recorded warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// An optional catalog table is absent
    MissingTable,
    /// An item definition could not be parsed; the item was skipped
    ItemParse,
    /// The domain catalog lacks the primary domain-kind column
    DomainColumnFallback,
    /// A referenced domain has no catalog row; its stub was removed
    DomainNotFound,
    /// A domain lookup or definition failed; the entry was removed
    DomainResolution,
    /// A referenced SRID has no catalog row; its stub was kept
    SpatialReferenceNotFound,
    /// A relationship row references items that are not in the item map
    RelationshipUnresolved,
    /// A relationship item definition could not be re-read
    RelationshipParse,
}

/// A single recorded warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    /// What the warning is about (table name, item name, domain name, SRID...)
    pub subject: String,
    pub message: String,
}

/// Ordered warning list for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and emit it through `tracing`
    pub fn record(
        &mut self,
        kind: WarningKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let warning = Warning {
            kind,
            subject: subject.into(),
            message: message.into(),
        };
        warn!(kind = ?warning.kind, subject = %warning.subject, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of warnings of the given kind
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
