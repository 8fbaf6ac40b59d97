// WHY: Centralized abbreviation lookup for the abbreviation guard
// Curated English tables; some genuine sentence ends after an abbreviation will be missed

use std::collections::HashSet;

/// Known abbreviations in normalized form (lower-case, outer punctuation trimmed)
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    // titles and honorifics
    "mr", "mrs", "ms", "dr", "prof", "rev", "hon", "sr", "jr", "st", "fr",
    "gen", "col", "capt", "lt", "sgt", "gov", "sen", "rep", "pres", "messrs",
    "mme", "mlle",
    // latin and reference forms
    "etc", "vs", "e.g", "i.e", "cf", "al", "viz", "approx", "ca",
    "fig", "figs", "no", "nos", "vol", "vols", "pp", "ch", "ed", "eds", "op",
    // organisations and places
    "inc", "ltd", "co", "corp", "dept", "univ", "assn", "bros",
    "ave", "blvd", "rd", "mt", "ft",
    "u.s", "u.k", "u.s.a", "d.c", "n.y",
    // calendar
    "jan", "feb", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
    "mon", "tue", "tues", "thu", "thurs", "fri",
    // units and time
    "a.m", "p.m", "lbs", "oz", "mi", "km", "deg",
];

/// Abbreviations that almost always precede more of the same sentence
///
/// A boundary is never placed after these, even when the next token is
/// capitalised ("Dr. Smith", "e.g. Paris").
pub const DEFAULT_NEVER_FINAL: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "rev", "hon", "st", "fr",
    "gen", "col", "capt", "lt", "sgt", "gov", "sen", "rep", "messrs",
    "mme", "mlle",
    "e.g", "i.e", "cf", "vs", "viz",
];

/// Reduce a token (with its trailing dot) to the form stored in the tables
///
/// `"Dr."` → `"dr"`, `"U.S."` → `"u.s"`, `"(e.g."` → `"e.g"`.
pub fn normalize_abbreviation(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()
}

/// Single upper-case letter other than the pronoun "I"
pub fn is_initial(word: &str) -> bool {
    let trimmed = word.trim_end_matches('.');
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_alphabetic() && c.is_uppercase() && c != 'I',
        _ => false,
    }
}

/// Letters separated by dots, e.g. `"n.a.s.a"` (normalized form)
pub fn is_dotted_acronym(normalized: &str) -> bool {
    let mut segments = 0;
    for segment in normalized.split('.') {
        let mut chars = segment.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_alphabetic() => segments += 1,
            _ => return false,
        }
    }
    segments >= 2
}

/// Efficient abbreviation lookup built once per detector
#[derive(Debug, Clone)]
pub struct AbbreviationChecker {
    abbreviations: HashSet<String>,
    never_final: HashSet<String>,
    initials_are_abbreviations: bool,
}

impl AbbreviationChecker {
    /// Build a checker from raw entries; entries are normalized on the way in
    pub fn new<'a>(
        abbreviations: impl IntoIterator<Item = &'a str>,
        never_final: impl IntoIterator<Item = &'a str>,
        initials_are_abbreviations: bool,
    ) -> Self {
        let never_final: HashSet<String> = never_final
            .into_iter()
            .map(normalize_abbreviation)
            .filter(|s| !s.is_empty())
            .collect();
        let mut abbreviations: HashSet<String> = abbreviations
            .into_iter()
            .map(normalize_abbreviation)
            .filter(|s| !s.is_empty())
            .collect();
        // A never-final entry is meaningless unless it is also an abbreviation
        abbreviations.extend(never_final.iter().cloned());

        Self {
            abbreviations,
            never_final,
            initials_are_abbreviations,
        }
    }

    /// Check if a raw word (e.g. `"Dr."`) is an abbreviation
    pub fn is_abbreviation(&self, word: &str) -> bool {
        if self.initials_are_abbreviations && is_initial(word) {
            return true;
        }
        let normalized = normalize_abbreviation(word);
        !normalized.is_empty()
            && (self.abbreviations.contains(&normalized) || is_dotted_acronym(&normalized))
    }

    /// Check if a raw word is an abbreviation that never ends a sentence
    pub fn is_never_final(&self, word: &str) -> bool {
        if self.initials_are_abbreviations && is_initial(word) {
            return true;
        }
        self.never_final.contains(&normalize_abbreviation(word))
    }

    pub fn len(&self) -> usize {
        self.abbreviations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abbreviations.is_empty()
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new(
            DEFAULT_ABBREVIATIONS.iter().copied(),
            DEFAULT_NEVER_FINAL.iter().copied(),
            true,
        )
    }
}
