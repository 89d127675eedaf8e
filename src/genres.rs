// src/genres.rs
//! Lenient parsing of the free-text artist genre field.
//!
//! Upstream data stores genres as a stringified list with inconsistent
//! quoting (`"['pop', 'dance pop']"`, `"pop, dance pop"`, `""`). The text is
//! parsed once, at ingestion, into a [`GenreSet`]. Parsing never fails: the
//! worst outcome is an empty set.

use serde::Serialize;

/// How a genre string was recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseOutcome {
    /// Parsed as a JSON-like list after quote normalisation.
    Structured,
    /// The list parse failed; recovered by splitting on commas.
    Fallback,
    /// Neither path produced a genre.
    Empty,
}

impl ParseOutcome {
    /// True when the parse had to recover from malformed input.
    #[must_use]
    pub fn is_recovery(self) -> bool {
        !matches!(self, Self::Structured)
    }
}

/// Insertion-ordered set of trimmed, non-empty genre tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GenreSet(Vec<String>);

impl GenreSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a genre, keeping the first occurrence. Returns true if inserted.
    pub fn insert(&mut self, genre: &str) -> bool {
        if genre.is_empty() || self.contains(genre) {
            return false;
        }
        self.0.push(genre.to_string());
        true
    }

    #[must_use]
    pub fn contains(&self, genre: &str) -> bool {
        self.0.iter().any(|g| g == genre)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Lower-cased tokens, in order, with duplicates that only differed by
    /// case collapsed.
    #[must_use]
    pub fn lowercased(&self) -> GenreSet {
        let mut out = GenreSet::new();
        for g in &self.0 {
            out.insert(&g.to_lowercase());
        }
        out
    }
}

impl<'a> FromIterator<&'a str> for GenreSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = GenreSet::new();
        for g in iter {
            set.insert(g);
        }
        set
    }
}

/// Parses a raw genre string with the dual-path policy.
#[must_use]
pub fn parse(raw: &str) -> (GenreSet, ParseOutcome) {
    if let Some(set) = parse_structured(raw) {
        if !set.is_empty() {
            return (set, ParseOutcome::Structured);
        }
    }

    let set = parse_fallback(raw);
    if set.is_empty() {
        (set, ParseOutcome::Empty)
    } else {
        (set, ParseOutcome::Fallback)
    }
}

fn parse_structured(raw: &str) -> Option<GenreSet> {
    let normalized = raw.replace('\'', "\"");
    let value: serde_json::Value = serde_json::from_str(&normalized).ok()?;
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(serde_json::Value::as_str)
            .map(str::trim)
            .collect(),
    )
}

fn parse_fallback(raw: &str) -> GenreSet {
    raw.trim()
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|token| token.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(set: &GenreSet) -> Vec<&str> {
        set.iter().collect()
    }

    #[test]
    fn test_parse_shapes() {
        let cases = vec![
            ("['pop', 'dance pop']", vec!["pop", "dance pop"], ParseOutcome::Structured),
            ("[\"funk carioca\"]", vec!["funk carioca"], ParseOutcome::Structured),
            ("pop, dance pop", vec!["pop", "dance pop"], ParseOutcome::Fallback),
            ("[sertanejo, arrocha]", vec!["sertanejo", "arrocha"], ParseOutcome::Fallback),
            ("['pop', 'dance pop'", vec!["pop", "dance pop"], ParseOutcome::Fallback),
            ("pop,, ,rock", vec!["pop", "rock"], ParseOutcome::Fallback),
            ("", vec![], ParseOutcome::Empty),
            ("[]", vec![], ParseOutcome::Empty),
            ("   ", vec![], ParseOutcome::Empty),
        ];

        for (raw, expected, outcome) in cases {
            let (set, got) = parse(raw);
            assert_eq!(tokens(&set), expected, "input: {raw:?}");
            assert_eq!(got, outcome, "input: {raw:?}");
        }
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let (set, _) = parse("['pop', 'rock', 'pop']");
        assert_eq!(tokens(&set), vec!["pop", "rock"]);
    }

    #[test]
    fn test_apostrophes_in_names_fall_back() {
        // Quote normalisation breaks names containing apostrophes; the comma
        // split still recovers something usable.
        let (set, outcome) = parse("['rock n' roll', 'pop']");
        assert_eq!(outcome, ParseOutcome::Fallback);
        assert!(set.contains("pop"));
    }

    #[test]
    fn test_lowercased_collapses_case_duplicates() {
        let (set, _) = parse("['Pop', 'pop', 'MPB']");
        assert_eq!(tokens(&set), vec!["Pop", "pop", "MPB"]);
        assert_eq!(tokens(&set.lowercased()), vec!["pop", "mpb"]);
    }
}
