//! DECT number registry with pairing queues and JSON snapshot persistence.

mod pairing;
mod store;

pub use pairing::Registry;
pub use store::{FileStore, MemoryStore, Store};

use crate::error::RouletteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;

/// Smallest DECT number accepted for registration.
pub const MIN_DECT_NUMBER: u32 = 1;

/// Largest DECT number accepted for registration.
pub const MAX_DECT_NUMBER: u32 = 99_998;

/// Shown in place of a partner when nobody can be paired.
pub const NO_PARTNER: &str = "----";

/// Result of a partner draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partner {
    /// A registered number other than the caller
    Number(u32),
    /// Not enough participants to form a pair
    Nobody,
}

impl Partner {
    /// The partner number, if one was drawn.
    pub fn number(&self) -> Option<u32> {
        match self {
            Partner::Number(n) => Some(*n),
            Partner::Nobody => None,
        }
    }
}

impl fmt::Display for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partner::Number(n) => write!(f, "{}", n),
            Partner::Nobody => f.write_str(NO_PARTNER),
        }
    }
}

/// On-disk snapshot of the registry.
///
/// Only membership is persisted; both pairing queues start empty after a
/// restart. Element order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub registered_numbers: Vec<u32>,
    #[serde(default)]
    pub banned_numbers: Vec<u32>,
}

/// Parse a raw request value into an integer.
///
/// Surrounding whitespace and a leading sign are accepted; anything else that
/// is not a base-10 integer is rejected. Integers too large for `i64` are
/// reported as out of range, saturated to the nearest bound.
pub fn parse_number(raw: &str) -> Result<i64, RouletteError> {
    raw.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => RouletteError::OutOfRange(i64::MAX),
        IntErrorKind::NegOverflow => RouletteError::OutOfRange(i64::MIN),
        _ => RouletteError::InvalidNumber(raw.to_string()),
    })
}

/// Check that a number lies in the DECT range.
pub fn validate_dect_number(number: i64) -> Result<u32, RouletteError> {
    if (MIN_DECT_NUMBER as i64..=MAX_DECT_NUMBER as i64).contains(&number) {
        Ok(number as u32)
    } else {
        Err(RouletteError::OutOfRange(number))
    }
}

/// Parse and range-check a DECT number in one step.
pub fn parse_dect_number(raw: &str) -> Result<u32, RouletteError> {
    validate_dect_number(parse_number(raw)?)
}
