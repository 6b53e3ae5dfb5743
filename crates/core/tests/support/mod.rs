//! Shared test helpers for `rostersync-core` integration tests.
//!
//! In-memory mocks for the OCR and calendar ports plus fixtures that lay a
//! roster out as positioned word boxes.

#![allow(dead_code)]

pub mod calendar;
pub mod ocr;

use rostersync_domain::constants::GRID_MARKER;
use rostersync_domain::PositionedToken;

/// Row height and column width used by the synthetic roster layout.
pub const ROW_HEIGHT: i32 = 40;
pub const COLUMN_WIDTH: i32 = 80;

/// Lay out `rows` as word boxes, one row per line, then emit them in reverse
/// order so the reconstructor has to sort them.
pub fn tokens_for_rows(rows: &[String]) -> Vec<PositionedToken> {
    let mut tokens = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        let y = 50 + row_index as i32 * ROW_HEIGHT;
        for (column, word) in row.split_whitespace().enumerate() {
            // a pixel or two of jitter, well inside the line tolerance
            let jitter = (column as i32 % 3) - 1;
            tokens.push(PositionedToken::at(word, 20 + column as i32 * COLUMN_WIDTH, y + jitter, 60, 20));
        }
    }
    tokens.reverse();
    tokens
}

/// Text rows of a roster photo: header, weekday heading, marker row and the
/// grid. `cells` includes the leading cells of the previous month.
pub fn roster_rows(month: u32, year: i32, cells: &[&str]) -> Vec<String> {
    let mut rows = vec![
        format!("{month} Я, {year}"),
        "姓名 一 二 三 四 五 六 日".to_string(),
        format!("{GRID_MARKER} 5"),
    ];
    rows.extend(cells.chunks(7).map(|week| week.join(" ")));
    rows
}

/// July 2025 (starts on a Tuesday): one leading cell, then `days`.
pub fn july_2025_tokens(days: &[&str]) -> Vec<PositionedToken> {
    let mut cells = vec!["OFF"];
    cells.extend_from_slice(days);
    tokens_for_rows(&roster_rows(7, 2025, &cells))
}
