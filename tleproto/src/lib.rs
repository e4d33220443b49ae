pub use crate::format::format_element_sets;
pub use crate::parser::{parse_element_sets, parse_element_sets_checked, ParseError};

pub mod format;
pub mod parser;

/// Prefixes that mark line 1 and line 2 of an element set
pub const LINE1_TOKEN: &str = "1 ";
pub const LINE2_TOKEN: &str = "2 ";
