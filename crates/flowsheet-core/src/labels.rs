//! # Placeholder Labels
//!
//! Text for slots that have no content yet, and roman numerals for
//! semester/slot ordinals.

use crate::TrackKind;

const ROMAN_MAP: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Honors slot index reserved for the project.
pub const HONORS_PROJECT_INDEX: usize = 7;

/// Roman numeral for 1..=3999; empty string outside that range.
#[must_use]
pub fn to_roman(num: u32) -> String {
    if num == 0 || num >= 4000 {
        return String::new();
    }

    let mut result = String::new();
    let mut remaining = num;
    for &(value, symbol) in &ROMAN_MAP {
        while remaining >= value {
            result.push_str(symbol);
            remaining -= value;
        }
    }
    result
}

/// Honors slots pair up as theory/laboratory: 0 → "Honors I",
/// 1 → "Honors I Laboratory", 2 → "Honors II", and index 7 is the project.
#[must_use]
pub fn honors_slot_label(index: usize) -> String {
    if index == HONORS_PROJECT_INDEX {
        return "Honors Project".to_string();
    }
    let ordinal = to_roman(((index >> 1) + 1) as u32);
    if index & 1 == 1 {
        format!("Honors {} Laboratory", ordinal)
    } else {
        format!("Honors {}", ordinal)
    }
}

/// Minor slots are numbered from one.
#[must_use]
pub fn minor_slot_label(index: usize) -> String {
    format!("Minor Slot {}", index.saturating_add(1))
}

/// Placeholder for a track slot, with or without a bound index.
#[must_use]
pub fn track_slot_label(kind: TrackKind, index: Option<usize>) -> String {
    match (kind, index) {
        (TrackKind::Minor, Some(i)) => minor_slot_label(i),
        (TrackKind::Honors, Some(i)) => honors_slot_label(i),
        (TrackKind::Minor, None) => "Minor Slot".to_string(),
        (TrackKind::Honors, None) => "Honors".to_string(),
    }
}

/// "Semester III" style label for the n-th semester (1-based).
#[must_use]
pub fn semester_label(ordinal: usize) -> String {
    format!("Semester {}", to_roman(ordinal as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roman_numerals() {
        assert_eq!(to_roman(1), "I");
        assert_eq!(to_roman(4), "IV");
        assert_eq!(to_roman(9), "IX");
        assert_eq!(to_roman(14), "XIV");
        assert_eq!(to_roman(1994), "MCMXCIV");
        assert_eq!(to_roman(3999), "MMMCMXCIX");
    }

    #[test]
    fn roman_out_of_range_is_empty() {
        assert_eq!(to_roman(0), "");
        assert_eq!(to_roman(4000), "");
    }

    #[test]
    fn honors_labels_pair_theory_and_lab() {
        assert_eq!(honors_slot_label(0), "Honors I");
        assert_eq!(honors_slot_label(1), "Honors I Laboratory");
        assert_eq!(honors_slot_label(2), "Honors II");
        assert_eq!(honors_slot_label(5), "Honors III Laboratory");
        assert_eq!(honors_slot_label(7), "Honors Project");
    }

    #[test]
    fn minor_labels_are_one_based() {
        assert_eq!(track_slot_label(TrackKind::Minor, Some(0)), "Minor Slot 1");
        assert_eq!(track_slot_label(TrackKind::Minor, None), "Minor Slot");
        assert_eq!(track_slot_label(TrackKind::Honors, None), "Honors");
    }

    #[test]
    fn semester_labels() {
        assert_eq!(semester_label(3), "Semester III");
    }
}
