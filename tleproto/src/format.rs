use tletypes::prelude::*;

/// Serialize element sets in the 3-line form.
///
/// Unnamed sets are written with their default name, so re-parsing the
/// output yields an equal sequence.
pub fn format_element_sets(sets: &[ElementSet]) -> String {
    let mut out = String::with_capacity(sets.len() * 160);
    for set in sets {
        out.push_str(&set.to_three_line());
    }
    out
}
