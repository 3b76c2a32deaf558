/// Selection grammar — classifies a bracket expression body into an
/// explicit tagged form, then evaluates it against an RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::chance;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("not a valid selection expression: '{0}'")]
    MalformedSelectionExpression(String),
    #[error("unknown identifier '{0}': not a table name and not a selection expression")]
    UnknownIdentifier(String),
}

/// A classified bracket body, ready to evaluate. Table references are
/// resolved by the engine before classification reaches this grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionExpr {
    /// `[n]` — uniform integer in `[0, n)`.
    Int(u32),
    /// `[a-b]` — uniform integer in `[a, b]` inclusive.
    Range(u32, u32),
    /// `[x|y|z]` — uniform pick of one operand, then evaluate it.
    Alternatives(Vec<Operand>),
}

/// One side of a `|`-delimited list. Unlike a whole bracket body, bare
/// literal text is valid here: it is simply one of the equally weighted
/// choices. An operand that fails the int/range parses falls back to a
/// literal rather than erroring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Int(u32),
    Range(u32, u32),
    Literal(String),
}

/// Classify a bracket body under the selection grammar.
pub fn classify(body: &str) -> Result<SelectionExpr, SelectError> {
    if let Some(n) = parse_int(body) {
        return Ok(SelectionExpr::Int(n));
    }
    if let Some((a, b)) = parse_range(body) {
        if a > b {
            return Err(SelectError::MalformedSelectionExpression(body.to_string()));
        }
        return Ok(SelectionExpr::Range(a, b));
    }
    if body.contains('|') {
        let operands = body.split('|').map(classify_operand).collect();
        return Ok(SelectionExpr::Alternatives(operands));
    }
    if is_identifier(body) {
        Err(SelectError::UnknownIdentifier(body.to_string()))
    } else {
        Err(SelectError::MalformedSelectionExpression(body.to_string()))
    }
}

/// Evaluate a classified expression to its replacement text.
pub fn evaluate<R: Rng + ?Sized>(expr: &SelectionExpr, rng: &mut R) -> String {
    match expr {
        SelectionExpr::Int(n) => chance::uniform_int(rng, *n).to_string(),
        SelectionExpr::Range(a, b) => chance::uniform_int_inclusive(rng, *a, *b).to_string(),
        SelectionExpr::Alternatives(operands) => match chance::choose_one(rng, operands) {
            Operand::Int(n) => chance::uniform_int(rng, *n).to_string(),
            Operand::Range(a, b) => chance::uniform_int_inclusive(rng, *a, *b).to_string(),
            Operand::Literal(text) => text.clone(),
        },
    }
}

fn classify_operand(text: &str) -> Operand {
    if let Some(n) = parse_int(text) {
        return Operand::Int(n);
    }
    if let Some((a, b)) = parse_range(text) {
        if a <= b {
            return Operand::Range(a, b);
        }
    }
    Operand::Literal(text.to_string())
}

/// Strict non-negative integer: all ASCII digits, non-empty, in u32 range.
fn parse_int(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// `a-b` with both sides strict integers.
fn parse_range(text: &str) -> Option<(u32, u32)> {
    let (lo, hi) = text.split_once('-')?;
    Some((parse_int(lo)?, parse_int(hi)?))
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphanumeric() || c == '_')
}
