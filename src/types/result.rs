use std::fmt::Display;

use serde::Serialize;

use crate::ErrorKind;

/// A single item on the result stream of a source run.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SourceResult {
    /// Identifier of the source that produced this item
    pub source: &'static str,
    /// Discovered hostname or terminal error
    #[serde(flatten)]
    pub kind: ResultKind,
}

/// What a [`SourceResult`] carries. The two cases are mutually exclusive:
/// a run emits any number of `Subdomain` items and at most one terminal
/// `Error` item.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// A hostname discovered for the target domain. May be empty when the
    /// upstream withheld the value (see sentinel normalization).
    Subdomain(String),
    /// The failure that ended the run
    Error(ErrorKind),
}

impl SourceResult {
    /// Create a discovery item for the given source
    #[must_use]
    pub const fn subdomain(source: &'static str, host: String) -> Self {
        Self {
            source,
            kind: ResultKind::Subdomain(host),
        }
    }

    /// Create a terminal error item for the given source
    #[must_use]
    pub const fn error(source: &'static str, error: ErrorKind) -> Self {
        Self {
            source,
            kind: ResultKind::Error(error),
        }
    }

    /// Returns `true` if this item carries an error
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, ResultKind::Error(_))
    }

    /// The discovered hostname, if this item carries one
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        match &self.kind {
            ResultKind::Subdomain(host) => Some(host),
            ResultKind::Error(_) => None,
        }
    }
}

impl Display for SourceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ResultKind::Subdomain(host) => write!(f, "[{}] {host}", self.source),
            ResultKind::Error(e) => write!(f, "[{}] error: {e}", self.source),
        }
    }
}
