//! Human-readable sequential identifiers (`p00001`, `d001`, `R0000000001`).
//!
//! Identifiers are a fixed prefix followed by a zero-padded number of fixed
//! width, so the lexicographically greatest stored identifier is also the
//! numerically greatest one. The next identifier is derived from that one.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Patient,
    Doctor,
    Report,
}

impl IdentifierKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdentifierKind::Patient => "p",
            IdentifierKind::Doctor => "d",
            IdentifierKind::Report => "R",
        }
    }

    pub fn width(&self) -> usize {
        match self {
            IdentifierKind::Patient => 5,
            IdentifierKind::Doctor => 3,
            IdentifierKind::Report => 10,
        }
    }

    /// Largest number that still fits the fixed width.
    pub fn capacity(&self) -> u64 {
        10u64.pow(self.width() as u32) - 1
    }

    pub fn seed(&self) -> String {
        render(*self, 1)
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Patient => write!(f, "patient"),
            IdentifierKind::Doctor => write!(f, "doctor"),
            IdentifierKind::Report => write!(f, "report"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("stored {kind} identifier {value:?} does not match {prefix} followed by {width} digits")]
    Malformed {
        kind: IdentifierKind,
        value: String,
        prefix: &'static str,
        width: usize,
    },

    #[error("{kind} identifier space exhausted")]
    Exhausted { kind: IdentifierKind },
}

/// Parse the numeric suffix of an identifier of the given kind.
pub fn parse_identifier(kind: IdentifierKind, value: &str) -> Result<u64, IdentifierError> {
    let malformed = || IdentifierError::Malformed {
        kind,
        value: value.to_string(),
        prefix: kind.prefix(),
        width: kind.width(),
    };

    let digits = value.strip_prefix(kind.prefix()).ok_or_else(malformed)?;
    if digits.len() != kind.width() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    digits.parse::<u64>().map_err(|_| malformed())
}

pub fn is_valid_identifier(kind: IdentifierKind, value: &str) -> bool {
    parse_identifier(kind, value).is_ok()
}

/// Render `number` as an identifier, failing if it does not fit the width.
pub fn format_identifier(kind: IdentifierKind, number: u64) -> Result<String, IdentifierError> {
    if number == 0 || number > kind.capacity() {
        return Err(IdentifierError::Exhausted { kind });
    }
    Ok(render(kind, number))
}

/// Derive the identifier following `last`, or the seed when the table is empty.
pub fn next_identifier(kind: IdentifierKind, last: Option<&str>) -> Result<String, IdentifierError> {
    match last {
        None => Ok(kind.seed()),
        Some(last) => {
            let current = parse_identifier(kind, last)?;
            format_identifier(kind, current + 1)
        }
    }
}

fn render(kind: IdentifierKind, number: u64) -> String {
    format!("{}{:0width$}", kind.prefix(), number, width = kind.width())
}
