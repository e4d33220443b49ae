use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A named two-line element set
/// https://en.wikipedia.org/wiki/Two-line_element_set
///
/// The element lines are opaque here; they are handed verbatim to a propagator,
/// which is responsible for rejecting malformed ones.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Serialize, Deserialize)]
#[display(fmt = "{}", "name")]
pub struct ElementSet {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl ElementSet {
    /// Name used for records that arrive in the bare 2-line form
    pub const UNKNOWN_NAME: &'static str = "Unknown";

    pub fn new(name: impl Into<String>, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line1: line1.into(),
            line2: line2.into(),
        }
    }

    pub fn unnamed(line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self::new(Self::UNKNOWN_NAME, line1, line2)
    }

    pub fn is_unnamed(&self) -> bool {
        self.name == Self::UNKNOWN_NAME
    }

    /// The 3-line (name, line 1, line 2) text form, newline terminated
    pub fn to_three_line(&self) -> String {
        format!("{}\n{}\n{}\n", self.name, self.line1, self.line2)
    }
}
