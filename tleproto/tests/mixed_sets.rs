//! Parse a document mixing named and bare element sets

use tleproto::*;

const SETS_BUFFER: &str = include_str!("../test_fixtures/mixed_sets.txt");

#[test]
fn mixed_sets() {
    let sets = parse_element_sets_checked(SETS_BUFFER).unwrap();
    assert_eq!(sets.len(), 4);

    let names: Vec<&str> = sets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["ISS (ZARYA)", "NOAA 19", "Unknown", "TERRA"]);

    for s in sets.iter() {
        assert!(s.line1.starts_with(LINE1_TOKEN));
        assert!(s.line2.starts_with(LINE2_TOKEN));
        assert_eq!(s.line1.len(), 69);
        assert_eq!(s.line2.len(), 69);
    }
}

#[test]
fn mixed_sets_reformat() {
    let sets = parse_element_sets(SETS_BUFFER);
    let text = format_element_sets(&sets);
    assert_eq!(text.lines().count(), 12);
    assert_eq!(parse_element_sets(&text), sets);
}

#[test]
fn many_named_blocks_preserve_order() {
    let mut text = String::new();
    for i in 0..50 {
        text.push_str(&format!("SAT {i}\n1 {i:05}U\n2 {i:05}\n"));
    }
    let sets = parse_element_sets(&text);
    assert_eq!(sets.len(), 50);
    for (i, s) in sets.iter().enumerate() {
        assert_eq!(s.name, format!("SAT {i}"));
        assert_eq!(s.line1, format!("1 {i:05}U"));
    }
}
