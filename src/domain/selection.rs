//! Run-id selection expressions
//!
//! Parses expressions like `1,5-6,7` into a concrete set of run ids.
//! A blank expression selects every run, which is not the same thing as
//! selecting none.

use std::collections::BTreeSet;

use thiserror::Error;

/// Malformed selection expression
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Token is neither an integer nor a well-formed range
    #[error("invalid run id '{token}' in selection '{expression}'")]
    InvalidToken { expression: String, token: String },

    /// Range with start greater than end
    #[error("invalid range '{token}' in selection '{expression}': start exceeds end")]
    InvertedRange { expression: String, token: String },
}

/// Which runs of a batch to deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Deploy every run in the batch
    All,
    /// Deploy only runs whose id is in the set
    Ids(BTreeSet<u32>),
}

impl Selection {
    /// Parse a selection expression.
    ///
    /// Comma-separated tokens; each token is a single non-negative integer or
    /// an inclusive range `a-b` with `a <= b`. The result is the union of all
    /// tokens. A blank expression yields [`Selection::All`].
    pub fn parse(expression: &str) -> Result<Self, SelectionError> {
        if expression.trim().is_empty() {
            return Ok(Selection::All);
        }

        let mut ids = BTreeSet::new();
        for raw in expression.split(',') {
            let token = raw.trim();
            if let Some((start, end)) = token.split_once('-') {
                let start: u32 = parse_id(expression, token, start)?;
                let end: u32 = parse_id(expression, token, end)?;
                if start > end {
                    return Err(SelectionError::InvertedRange {
                        expression: expression.to_string(),
                        token: token.to_string(),
                    });
                }
                ids.extend(start..=end);
            } else {
                ids.insert(parse_id(expression, token, token)?);
            }
        }
        Ok(Selection::Ids(ids))
    }

    /// Whether the selection includes the given run id
    pub fn contains(&self, id: u32) -> bool {
        match self {
            Selection::All => true,
            Selection::Ids(ids) => ids.contains(&id),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

fn parse_id(expression: &str, token: &str, part: &str) -> Result<u32, SelectionError> {
    part.trim()
        .parse()
        .map_err(|_| SelectionError::InvalidToken {
            expression: expression.to_string(),
            token: token.to_string(),
        })
}
