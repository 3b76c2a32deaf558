/// The roll engine — binds a compiled outline to named, invokable tables
/// and drives bracket expression expansion.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::chance;
use crate::core::outline::Outline;
use crate::core::select::{self, SelectError};

/// Tables may roll other tables from their leaf text. Outlines that nest
/// deeper than this (usually a self-reference) are authoring errors.
const MAX_TABLE_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum RollError {
    #[error("no table named '{0}'")]
    UnknownTable(String),
    #[error("table '{0}' has no branches to roll on")]
    EmptySubtree(String),
    #[error("table recursion exceeded the depth limit while rolling '{0}'")]
    RecursionLimit(String),
    #[error("selection error: {0}")]
    Select(#[from] SelectError),
}

/// The result of rolling a table: the bare leaf text for a single-segment
/// branch, or the whole category path when intermediate segments carry
/// meaning ("manmade", then "Large well").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Roll {
    Text(String),
    Path(Vec<String>),
}

impl Roll {
    /// The terminal segment, regardless of shape.
    pub fn leaf(&self) -> &str {
        match self {
            Roll::Text(text) => text,
            Roll::Path(segments) => segments.last().map(String::as_str).unwrap_or(""),
        }
    }
}

impl fmt::Display for Roll {
    /// Path segments join with a single space — the stringification used
    /// when one table's leaf rolls another table inline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Roll::Text(text) => f.write_str(text),
            Roll::Path(segments) => f.write_str(&segments.join(" ")),
        }
    }
}

/// One invokable generator per top-level outline key. The outline is
/// read-only after construction, so `roll_with` may be called from multiple
/// threads with independent RNGs; `roll` keeps its own deterministic
/// per-engine stream.
pub struct RollEngine {
    outline: Outline,
    seed: u64,
    roll_count: u64,
}

impl RollEngine {
    pub fn new(outline: Outline) -> Self {
        Self {
            outline,
            seed: 0,
            roll_count: 0,
        }
    }

    /// Compile outline text and bind it in one step.
    pub fn from_text(text: &str) -> Self {
        Self::new(Outline::compile(text))
    }

    /// Fix the base seed. Each roll draws from a `StdRng` seeded with
    /// `seed + roll_count`, so a fixed seed replays the same sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Names of the invokable tables, in source order.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.outline.tables()
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.outline.contains(name)
    }

    /// Roll the named table using the engine's own stream.
    pub fn roll(&mut self, name: &str) -> Result<Roll, RollError> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.roll_count));
        self.roll_count += 1;
        self.roll_with(name, &mut rng)
    }

    /// Roll the named table with a caller-supplied RNG.
    pub fn roll_with<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Result<Roll, RollError> {
        self.roll_at(name, rng, 0)
    }

    /// Expand every bracket expression in `text`, innermost first. Exposed
    /// for callers that keep template strings outside an outline.
    pub fn expand<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Result<String, RollError> {
        self.expand_at(text, rng, 0)
    }

    fn roll_at<R: Rng + ?Sized>(
        &self,
        name: &str,
        rng: &mut R,
        depth: usize,
    ) -> Result<Roll, RollError> {
        if depth > MAX_TABLE_DEPTH {
            return Err(RollError::RecursionLimit(name.to_string()));
        }

        // Branches are re-enumerated on every roll; the outline is the
        // source of truth and no cache can drift from it.
        let branches = self
            .outline
            .branches(name)
            .ok_or_else(|| RollError::UnknownTable(name.to_string()))?;
        if branches.is_empty() {
            return Err(RollError::EmptySubtree(name.to_string()));
        }

        // Uniform over branches, not over first-level categories: a bushier
        // subtree is proportionally likelier. Authors weight a table by
        // giving an option more leaves.
        let mut branch = chance::choose_one(rng, &branches).clone();
        let last = branch.len() - 1;
        branch[last] = self.expand_at(&branch[last], rng, depth)?;

        if branch.len() == 1 {
            Ok(Roll::Text(branch.pop().unwrap_or_default()))
        } else {
            Ok(Roll::Path(branch))
        }
    }

    fn expand_at<R: Rng + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
        depth: usize,
    ) -> Result<String, RollError> {
        let mut out = text.to_string();
        // Innermost-first: each pass rewrites one span whose body holds no
        // further '[', then re-scans, so nested forms like [a|[b|c]] peel
        // from the inside out.
        while let Some((open, close)) = innermost_span(&out) {
            let body = &out[open + 1..close];
            let replacement = if self.outline.contains(body) {
                self.roll_at(body, rng, depth + 1)?.to_string()
            } else {
                select::evaluate(&select::classify(body)?, rng)
            };
            out.replace_range(open..=close, &replacement);
        }
        Ok(out)
    }
}

/// Byte offsets of the delimiters of the first innermost `[...]` span: the
/// leftmost `]` that has a `[` before it, paired with the nearest such `[`.
/// Unpaired delimiters are left alone as literal text.
fn innermost_span(text: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(rel) = text[from..].find(']') {
        let close = from + rel;
        if let Some(open) = text[..close].rfind('[') {
            return Some((open, close));
        }
        from = close + 1;
    }
    None
}
