//! Shift codes and the static shift table

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, RosterError};

/// Short roster token naming a shift type, always uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftCode(String);

impl ShiftCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShiftCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Configured start time of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    pub start: NaiveTime,
    /// Off-day markers become date-only events instead of timed spans
    #[serde(default)]
    pub all_day: bool,
}

impl ShiftDefinition {
    fn timed(hour: u32, minute: u32) -> Self {
        Self { start: hms(hour, minute), all_day: false }
    }

    fn off() -> Self {
        Self { start: NaiveTime::MIN, all_day: true }
    }
}

fn hms(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Code → start-time table shared by the extractor (keywords) and the event
/// builder (timings). Both must read the same table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, ShiftDefinition>", into = "BTreeMap<String, ShiftDefinition>")]
pub struct ShiftTable {
    entries: BTreeMap<ShiftCode, ShiftDefinition>,
}

impl ShiftTable {
    /// Build a table, normalizing codes to uppercase.
    ///
    /// # Errors
    /// Returns `RosterError::Config` when the table is empty or contains a
    /// blank code.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ShiftDefinition)>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for (code, definition) in entries {
            let code = ShiftCode::new(code);
            if code.as_str().is_empty() {
                return Err(RosterError::Config("shift table contains a blank code".into()));
            }
            map.insert(code, definition);
        }

        if map.is_empty() {
            return Err(RosterError::Config("shift table must not be empty".into()));
        }

        Ok(Self { entries: map })
    }

    pub fn get(&self, code: &ShiftCode) -> Option<&ShiftDefinition> {
        self.entries.get(code)
    }

    pub fn contains(&self, code: &ShiftCode) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &ShiftCode> {
        self.entries.keys()
    }

    /// Codes ordered for keyword matching: longest first, ties alphabetical,
    /// so `11FBC` is always tried before `BC`.
    pub fn keywords_longest_first(&self) -> Vec<&ShiftCode> {
        let mut codes: Vec<&ShiftCode> = self.entries.keys().collect();
        codes.sort_by(|a, b| {
            b.as_str().chars().count().cmp(&a.as_str().chars().count()).then_with(|| a.cmp(b))
        });
        codes
    }
}

impl Default for ShiftTable {
    fn default() -> Self {
        let entries = BTreeMap::from([
            (ShiftCode::new("BC"), ShiftDefinition::timed(8, 0)),
            (ShiftCode::new("DB"), ShiftDefinition::timed(10, 0)),
            (ShiftCode::new("JB"), ShiftDefinition::timed(16, 0)),
            (ShiftCode::new("RA"), ShiftDefinition::timed(23, 50)),
            (ShiftCode::new("OFF"), ShiftDefinition::off()),
            (ShiftCode::new("11FBC"), ShiftDefinition::timed(8, 0)),
            (ShiftCode::new("11FDB"), ShiftDefinition::timed(10, 0)),
            (ShiftCode::new("11FJB"), ShiftDefinition::timed(16, 0)),
            (ShiftCode::new("11FRA"), ShiftDefinition::timed(0, 0)),
        ]);
        Self { entries }
    }
}

impl TryFrom<BTreeMap<String, ShiftDefinition>> for ShiftTable {
    type Error = RosterError;

    fn try_from(value: BTreeMap<String, ShiftDefinition>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ShiftTable> for BTreeMap<String, ShiftDefinition> {
    fn from(value: ShiftTable) -> Self {
        value.entries.into_iter().map(|(code, def)| (code.0, def)).collect()
    }
}
