//! Schedule extractor - reads the roster month and per-day shift codes from
//! reconstructed roster text
//!
//! The grid is read row-major, Monday first, starting at the Monday on or
//! before day 1. Leading cells belong to the previous month and are skipped.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use rostersync_domain::{Result, RosterError, RosterMonth, ScheduleConfig, ShiftCode, ShiftTable};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Month header plus the shift codes aligned to its days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleExtraction {
    pub month: RosterMonth,
    /// Weekday of day 1, Monday = 0
    pub first_weekday: u32,
    pub days_in_month: u32,
    /// Keyword matches found in the grid region before alignment
    pub raw_match_count: usize,
    /// `codes[i]` is the shift for day `i + 1`
    pub codes: Vec<ShiftCode>,
}

impl ScheduleExtraction {
    pub fn year(&self) -> i32 {
        self.month.year()
    }

    /// Codes keyed by calendar date.
    pub fn day_codes(&self) -> BTreeMap<NaiveDate, ShiftCode> {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(index, code)| {
                let day = u32::try_from(index + 1).ok()?;
                Some((self.month.day(day)?, code.clone()))
            })
            .collect()
    }

    /// Whether fewer codes were found than the month has days.
    pub fn is_partial(&self) -> bool {
        self.codes.len() < self.days_in_month as usize
    }
}

/// Parses roster text using a fixed set of header patterns, a grid marker
/// and the keywords of a shift table.
#[derive(Debug, Clone)]
pub struct ScheduleExtractor {
    header_patterns: Vec<Regex>,
    marker: String,
    keywords: Regex,
}

impl ScheduleExtractor {
    /// # Errors
    /// Returns `RosterError::Config` when a header pattern does not compile,
    /// lacks two capture groups, or the table is empty.
    pub fn new<I, S>(header_patterns: I, marker: impl Into<String>, table: &ShiftTable) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let header_patterns = header_patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                let regex = Regex::new(pattern).map_err(|e| {
                    RosterError::Config(format!("invalid header pattern '{pattern}': {e}"))
                })?;
                if regex.captures_len() < 3 {
                    return Err(RosterError::Config(format!(
                        "header pattern '{pattern}' needs month and year capture groups"
                    )));
                }
                Ok(regex)
            })
            .collect::<Result<Vec<_>>>()?;

        if header_patterns.is_empty() {
            return Err(RosterError::Config("no header patterns configured".into()));
        }

        Ok(Self { header_patterns, marker: marker.into(), keywords: keyword_regex(table)? })
    }

    /// # Errors
    /// See [`ScheduleExtractor::new`].
    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        Self::new(&config.header_patterns, config.grid_marker.clone(), &config.shift_table)
    }

    /// Parse the whole document.
    ///
    /// # Errors
    /// `HeaderNotFound` when no header pattern matches, `InvalidHeader` when
    /// the matched numbers are not a calendar month.
    pub fn extract(&self, text: &str) -> Result<ScheduleExtraction> {
        let month = self.parse_header(text)?;
        let first_weekday = month.first_weekday();
        let days_in_month = month.days_in_month();

        let raw = self.extract_codes(text);
        let raw_match_count = raw.len();
        let expected = first_weekday as usize + days_in_month as usize;

        if raw_match_count > expected {
            warn!(
                month = %month,
                raw_match_count,
                expected,
                "more shift codes than grid cells; dropping the surplus"
            );
        }

        let codes: Vec<ShiftCode> =
            raw.into_iter().skip(first_weekday as usize).take(days_in_month as usize).collect();

        if codes.len() < days_in_month as usize {
            debug!(month = %month, found = codes.len(), days_in_month, "partial roster month");
        }

        Ok(ScheduleExtraction { month, first_weekday, days_in_month, raw_match_count, codes })
    }

    /// Find the roster month in the document header.
    ///
    /// Horizontal whitespace is removed before matching so OCR gaps such as
    /// `7 Я, 2025` still match; line breaks are kept.
    ///
    /// # Errors
    /// See [`ScheduleExtractor::extract`].
    pub fn parse_header(&self, text: &str) -> Result<RosterMonth> {
        let compact = strip_horizontal_whitespace(text);

        let captures = self
            .header_patterns
            .iter()
            .find_map(|pattern| pattern.captures(&compact))
            .ok_or_else(|| RosterError::HeaderNotFound("no month/year header in text".into()))?;

        let month_text = captures.get(1).map_or("", |m| m.as_str());
        let year_text = captures.get(2).map_or("", |m| m.as_str());

        let month = month_text
            .parse::<u32>()
            .map_err(|_| RosterError::InvalidHeader(format!("month '{month_text}' is not a number")))?;
        let year = year_text
            .parse::<i32>()
            .map_err(|_| RosterError::InvalidHeader(format!("year '{year_text}' is not a number")))?;

        RosterMonth::new(year, month)
    }

    /// Every shift keyword in the grid region, in document order and
    /// uppercased, before calendar alignment.
    pub fn extract_codes(&self, text: &str) -> Vec<ShiftCode> {
        let lines: Vec<String> = text.lines().map(strip_horizontal_whitespace).collect();

        let region = match lines.iter().position(|line| line.contains(&self.marker)) {
            Some(index) => &lines[index + 1..],
            None => {
                warn!(marker = %self.marker, "grid marker not found; scanning the whole document");
                &lines[..]
            }
        };

        region
            .iter()
            .flat_map(|line| self.keywords.find_iter(line).map(|m| ShiftCode::new(m.as_str())))
            .collect()
    }
}

/// Alternation of escaped keywords, longest first. The regex engine prefers
/// the leftmost alternative, so `11FBC` wins over `BC` at the same position.
fn keyword_regex(table: &ShiftTable) -> Result<Regex> {
    let keywords = table.keywords_longest_first();
    if keywords.is_empty() {
        return Err(RosterError::Config("shift table must not be empty".into()));
    }

    let alternation =
        keywords.iter().map(|code| regex::escape(code.as_str())).collect::<Vec<_>>().join("|");

    RegexBuilder::new(&format!("(?:{alternation})"))
        .case_insensitive(true)
        .build()
        .map_err(|e| RosterError::Config(format!("cannot build shift keyword pattern: {e}")))
}

/// Drop horizontal whitespace and fold fullwidth digits (U+FF10..U+FF19)
/// to ASCII; line breaks are kept.
fn strip_horizontal_whitespace(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\n' || !c.is_whitespace())
        .map(|c| match c {
            '\u{FF10}'..='\u{FF19}' => char::from(b'0' + (c as u32 - 0xFF10) as u8),
            other => other,
        })
        .collect()
}
