//! User-facing save indices and ranges
//!
//! `SaveIndex` addresses a single save for restore: positive values are
//! 1-based positions (1 = oldest), zero and negative values are offsets from
//! the newest save. `SaveRange` is an inclusive 1-based range for delete,
//! written either `n` or `from-to`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SaverError;

/// Absolute (1-based) or newest-relative save address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaveIndex(pub i64);

impl SaveIndex {
    /// The newest save
    pub const NEWEST: SaveIndex = SaveIndex(0);

    /// Resolve to a zero-based position in a history of `len` saves
    ///
    /// Returns `None` when the index points outside the history.
    pub fn resolve(self, len: usize) -> Option<usize> {
        let len = i64::try_from(len).ok()?;
        let position = if self.0 > 0 {
            self.0 - 1
        } else {
            (len - 1).checked_add(self.0)?
        };

        if position < 0 || position >= len {
            None
        } else {
            usize::try_from(position).ok()
        }
    }
}

impl fmt::Display for SaveIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SaveIndex {
    type Err = SaverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(SaveIndex)
            .map_err(|_| SaverError::IndexOutOfRange(format!("Malformed index \"{}\"", s)))
    }
}

impl From<i64> for SaveIndex {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Inclusive 1-based range of saves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRange {
    pub from: i64,
    pub to: i64,
}

impl SaveRange {
    /// Create a range
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// A range covering a single save
    pub fn single(index: i64) -> Self {
        Self::new(index, index)
    }
}

impl fmt::Display for SaveRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}-{}", self.from, self.to)
        }
    }
}

impl FromStr for SaveRange {
    type Err = SaverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SaverError::IndexOutOfRange(format!("Malformed index/range \"{}\"", s));
        let trimmed = s.trim();

        if let Ok(index) = trimmed.parse::<u64>() {
            let index = i64::try_from(index).map_err(|_| malformed())?;
            return Ok(Self::single(index));
        }

        let (from, to) = trimmed.split_once('-').ok_or_else(malformed)?;
        let from: u64 = from.parse().map_err(|_| malformed())?;
        let to: u64 = to.parse().map_err(|_| malformed())?;
        let range = Self::new(
            i64::try_from(from).map_err(|_| malformed())?,
            i64::try_from(to).map_err(|_| malformed())?,
        );

        if range.from > range.to {
            return Err(SaverError::IndexOutOfRange(format!(
                "Range \"{}\" is inverted",
                s
            )));
        }
        Ok(range)
    }
}
