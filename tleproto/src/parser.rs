//! A tolerant parser for element-set text in either the 3-line (named) or
//! the bare 2-line form, mixed freely within one document.

use crate::{LINE1_TOKEN, LINE2_TOKEN};
use nom::{branch::alt, bytes::complete::tag, IResult};
use tletypes::prelude::*;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Incomplete element set at record {record}: expected {needed} lines, found {found}")]
    IncompleteRecord {
        /// Zero-based index of the record within the document
        record: usize,
        needed: usize,
        found: usize,
    },
}

/// Parse element sets, dropping a truncated trailing record.
///
/// The dropped record is reported with a warning; every complete record
/// before it is returned in input order.
pub fn parse_element_sets(text: &str) -> Vec<ElementSet> {
    let (sets, truncated) = scan(text);
    if let Some(e) = truncated {
        warn!(error = %e, "Dropping incomplete trailing element set");
    }
    sets
}

/// Parse element sets, failing on a truncated trailing record
pub fn parse_element_sets_checked(text: &str) -> Result<Vec<ElementSet>, ParseError> {
    match scan(text) {
        (sets, None) => Ok(sets),
        (_, Some(e)) => Err(e),
    }
}

fn scan(text: &str) -> (Vec<ElementSet>, Option<ParseError>) {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut sets = Vec::with_capacity(lines.len() / 3 + 1);
    let mut i = 0;
    while i < lines.len() {
        let rest = &lines[i..];
        let named = !is_element_line(rest[0]);
        let needed = if named { 3 } else { 2 };

        if rest.len() < needed {
            let e = ParseError::IncompleteRecord {
                record: sets.len(),
                needed,
                found: rest.len(),
            };
            return (sets, Some(e));
        }

        let set = if named {
            ElementSet::new(rest[0], rest[1], rest[2])
        } else {
            ElementSet::unnamed(rest[0], rest[1])
        };
        sets.push(set);
        i += needed;
    }

    debug!(records = sets.len(), "Parsed element sets");
    (sets, None)
}

fn is_element_line(line: &str) -> bool {
    element_line_token(line).is_ok()
}

fn element_line_token(s: &str) -> IResult<&str, &str> {
    alt((tag(LINE1_TOKEN), tag(LINE2_TOKEN)))(s)
}
