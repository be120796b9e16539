//! Normalization and range checks applied at the boundary, before anything
//! reaches the record store. Messages are the ones shown to users as-is.

use std::ops::RangeInclusive;

use crate::error::{Result, VocabError};
use crate::models::{EntryChanges, ListFilters};

pub const MONTH_RANGE: RangeInclusive<u32> = 1..=12;
pub const YEAR_RANGE: RangeInclusive<i32> = 1900..=2100;
pub const PAGE_SIZE_RANGE: RangeInclusive<u32> = 1..=1000;

/// Sort type used when the name does not start with a letter.
pub const FALLBACK_SORT_TYPE: char = 'A';

/// A fully checked row ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanEntry {
    pub name: String,
    pub meaning: String,
    pub sort_type: char,
    pub month: u32,
    pub year: i32,
}

/// Parse a single-letter sort type, case-folded. Anything other than exactly
/// one letter A-Z yields `None`.
pub fn parse_sort_type(raw: &str) -> Option<char> {
    let mut chars = raw.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => Some(letter.to_ascii_uppercase()),
        _ => None,
    }
}

/// Uppercase first letter of `name`, or [`FALLBACK_SORT_TYPE`].
pub fn derive_sort_type(name: &str) -> char {
    name.trim()
        .chars()
        .next()
        .filter(char::is_ascii_alphabetic)
        .map(|letter| letter.to_ascii_uppercase())
        .unwrap_or(FALLBACK_SORT_TYPE)
}

/// Split a comma-separated letter list. Blank and malformed tokens are
/// dropped; duplicates collapse.
pub fn parse_sort_type_list(raw: &str) -> Vec<char> {
    let mut letters: Vec<char> = raw.split(',').filter_map(parse_sort_type).collect();
    letters.sort_unstable();
    letters.dedup();
    letters
}

pub(crate) fn required_text(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(VocabError::validation(message))
    } else {
        Ok(trimmed.to_string())
    }
}

pub(crate) fn check_month(month: u32) -> Result<u32> {
    if MONTH_RANGE.contains(&month) {
        Ok(month)
    } else {
        Err(VocabError::validation("Month must be between 1 and 12"))
    }
}

pub(crate) fn check_year(year: i32) -> Result<i32> {
    if YEAR_RANGE.contains(&year) {
        Ok(year)
    } else {
        Err(VocabError::validation("Year must be between 1900 and 2100"))
    }
}

/// Validate a create request. `current` supplies the month/year defaults.
pub(crate) fn clean_new_entry(
    name: &str,
    meaning: &str,
    sort_type: Option<&str>,
    month: Option<u32>,
    year: Option<i32>,
    current: (u32, i32),
) -> Result<CleanEntry> {
    let name = required_text(name, "Vocabulary is required")?;
    let meaning = required_text(meaning, "Meaning is required")?;
    let sort_type = sort_type
        .and_then(parse_sort_type)
        .unwrap_or_else(|| derive_sort_type(&name));
    let month = check_month(month.unwrap_or(current.0))?;
    let year = check_year(year.unwrap_or(current.1))?;

    Ok(CleanEntry {
        name,
        meaning,
        sort_type,
        month,
        year,
    })
}

/// Checked form of [`EntryChanges`]: trimmed text, uppercased sort type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanChanges {
    pub name: Option<String>,
    pub meaning: Option<String>,
    pub sort_type: Option<char>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

pub(crate) fn clean_changes(changes: &EntryChanges) -> Result<CleanChanges> {
    let name = changes
        .name
        .as_deref()
        .map(|name| required_text(name, "Vocabulary is required"))
        .transpose()?;
    let meaning = changes
        .meaning
        .as_deref()
        .map(|meaning| required_text(meaning, "Meaning is required"))
        .transpose()?;
    let sort_type = changes
        .sort_type
        .as_deref()
        .map(|raw| {
            parse_sort_type(raw).ok_or_else(|| VocabError::validation("Sort type must be A-Z"))
        })
        .transpose()?;
    let month = changes.month.map(check_month).transpose()?;
    let year = changes.year.map(check_year).transpose()?;

    Ok(CleanChanges {
        name,
        meaning,
        sort_type,
        month,
        year,
    })
}

/// Reject filters the store cannot answer sensibly.
pub(crate) fn check_filters(filters: &ListFilters) -> Result<()> {
    if filters.page == 0 {
        return Err(VocabError::validation("Page must be 1 or greater"));
    }
    if !PAGE_SIZE_RANGE.contains(&filters.limit) {
        return Err(VocabError::validation("Limit must be between 1 and 1000"));
    }
    if let Some(month) = filters.month {
        if !MONTH_RANGE.contains(&month) {
            return Err(VocabError::validation("Month filter must be between 1 and 12"));
        }
    }
    if let Some(year) = filters.year {
        if !YEAR_RANGE.contains(&year) {
            return Err(VocabError::validation("Year filter must be between 1900 and 2100"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_sort_type_from_leading_letter() {
        assert_eq!(derive_sort_type("apple"), 'A');
        assert_eq!(derive_sort_type("  zephyr"), 'Z');
        assert_eq!(derive_sort_type("123"), 'A');
        assert_eq!(derive_sort_type("école"), 'A');
    }

    #[test]
    fn sort_type_must_be_a_single_letter() {
        assert_eq!(parse_sort_type("b"), Some('B'));
        assert_eq!(parse_sort_type(" Q "), Some('Q'));
        assert_eq!(parse_sort_type("AB"), None);
        assert_eq!(parse_sort_type("7"), None);
        assert_eq!(parse_sort_type(""), None);
    }

    #[test]
    fn sort_type_list_drops_noise() {
        assert_eq!(parse_sort_type_list("a, B,,xx,3,b"), vec!['A', 'B']);
        assert!(parse_sort_type_list(" , ").is_empty());
    }

    #[test]
    fn invalid_sort_type_on_create_is_derived() {
        let clean = clean_new_entry(" love ", " x ", Some("??"), None, None, (4, 2025)).unwrap();
        assert_eq!(clean.name, "love");
        assert_eq!(clean.meaning, "x");
        assert_eq!(clean.sort_type, 'L');
        assert_eq!((clean.month, clean.year), (4, 2025));
    }

    #[test]
    fn create_rejects_blank_text_and_bad_ranges() {
        let err = clean_new_entry("  ", "x", None, None, None, (1, 2025)).unwrap_err();
        assert_eq!(err.to_string(), "Vocabulary is required");

        let err = clean_new_entry("a", "", None, None, None, (1, 2025)).unwrap_err();
        assert_eq!(err.to_string(), "Meaning is required");

        assert!(clean_new_entry("a", "b", None, Some(13), None, (1, 2025))
            .unwrap_err()
            .is_validation());
        assert!(clean_new_entry("a", "b", None, None, Some(1899), (1, 2025))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn changes_reject_invalid_sort_type() {
        let err = clean_changes(&EntryChanges::default().sort_type("12")).unwrap_err();
        assert_eq!(err.to_string(), "Sort type must be A-Z");

        let clean = clean_changes(&EntryChanges::default().sort_type("c").name(" Cat ")).unwrap();
        assert_eq!(clean.sort_type, Some('C'));
        assert_eq!(clean.name.as_deref(), Some("Cat"));
        assert_eq!(clean.meaning, None);
    }

    #[test]
    fn filter_bounds() {
        assert!(check_filters(&ListFilters::default()).is_ok());
        assert!(check_filters(&ListFilters::default().page(0)).is_err());
        assert!(check_filters(&ListFilters::default().limit(0)).is_err());
        assert!(check_filters(&ListFilters::default().limit(1001)).is_err());
        assert!(check_filters(&ListFilters::default().month(0)).is_err());
        assert!(check_filters(&ListFilters::default().year(2101)).is_err());
    }
}
