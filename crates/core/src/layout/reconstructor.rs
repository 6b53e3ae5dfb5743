//! Layout reconstructor - rebuilds text lines from unordered OCR word boxes
//!
//! # Algorithm
//! 1. Walk tokens in input order. Each token joins the first existing line
//!    (in creation order) whose key lies within `tolerance_px` of the token's
//!    y, otherwise it opens a new line keyed by its own y.
//! 2. Sort every line left-to-right by x.
//! 3. Emit lines top-to-bottom by key, tokens space-joined, one `\n` per line.
//!
//! This is a greedy single pass, not a sort: keys are the first token's y, so
//! results depend on input order near the threshold. Rotated or skewed
//! images are not handled.

use std::collections::BTreeMap;

use rostersync_domain::{PositionedToken, TextLine};
use tracing::debug;

/// Lines keyed by their representative y plus the flattened text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconstructedLayout {
    pub lines: BTreeMap<i32, TextLine>,
    pub text: String,
}

impl ReconstructedLayout {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Tokens in reading order (top-to-bottom, then left-to-right).
    pub fn tokens(&self) -> impl Iterator<Item = &PositionedToken> {
        self.lines.values().flat_map(|line| line.tokens.iter())
    }
}

/// Greedy y-proximity line clustering.
#[derive(Debug, Clone, Copy)]
pub struct LayoutReconstructor {
    tolerance_px: u32,
}

impl LayoutReconstructor {
    pub fn new(tolerance_px: u32) -> Self {
        Self { tolerance_px }
    }

    pub fn tolerance_px(&self) -> u32 {
        self.tolerance_px
    }

    /// Cluster `tokens` into lines and flatten them into text.
    ///
    /// An empty input yields an empty layout; callers treat that as "no
    /// schedule found", not as an error.
    pub fn reconstruct(&self, tokens: &[PositionedToken]) -> ReconstructedLayout {
        let mut buckets: Vec<TextLine> = Vec::new();

        for token in tokens {
            let tolerance = self.tolerance_px;
            match buckets.iter_mut().find(|line| line.y_key.abs_diff(token.y) <= tolerance) {
                Some(line) => line.tokens.push(token.clone()),
                None => buckets.push(TextLine::new(token.clone())),
            }
        }

        // A token sharing an existing key always joins that bucket, so keys
        // are unique here.
        let mut lines = BTreeMap::new();
        for mut line in buckets {
            line.tokens.sort_by_key(|t| t.x);
            lines.insert(line.y_key, line);
        }

        let mut text = String::new();
        for line in lines.values() {
            text.push_str(&line.text());
            text.push('\n');
        }

        debug!(tokens = tokens.len(), lines = lines.len(), "reconstructed layout");

        ReconstructedLayout { lines, text }
    }
}

impl Default for LayoutReconstructor {
    fn default() -> Self {
        Self::new(rostersync_domain::constants::DEFAULT_LINE_TOLERANCE_PX)
    }
}
