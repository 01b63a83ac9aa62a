//! Input classification and per-node match predicates.

use crate::model::Variant;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MatchQuery {
    /// Prefix of the hint label.
    Label(String),
    /// Space separated terms that must all occur in the element text.
    Text(String),
}

impl MatchQuery {
    pub fn needle(&self) -> &str {
        match self {
            MatchQuery::Label(needle) | MatchQuery::Text(needle) => needle,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InputStep {
    /// The escape character was just typed; record the offset, filter nothing.
    Escape(usize),
    Filter {
        query: MatchQuery,
        escape_offset: Option<usize>,
    },
}

/// Classification rules shared by one session.
#[derive(Clone, Copy, Debug)]
pub struct InputRules<'a> {
    pub variant: Variant,
    pub alphabet_lower: &'a [char],
    pub escape_char: char,
}

impl InputRules<'_> {
    /// Turn the whole accumulated input into a query.
    ///
    /// Once escaped, everything after the escape character is free text.
    /// Otherwise the last character decides the mode and only the characters
    /// of that class are kept.
    pub fn classify(&self, input: &str, escape_offset: Option<usize>) -> InputStep {
        if let Some(offset) = escape_offset {
            return InputStep::Filter {
                query: MatchQuery::Text(input.chars().skip(offset).collect()),
                escape_offset: Some(offset),
            };
        }
        if let Some(pos) = input.chars().position(|c| c == self.escape_char) {
            let offset = pos + 1;
            if offset == input.chars().count() {
                return InputStep::Escape(offset);
            }
            return InputStep::Filter {
                query: MatchQuery::Text(input.chars().skip(offset).collect()),
                escape_offset: Some(offset),
            };
        }
        let Some(last) = input.chars().last() else {
            return InputStep::Filter {
                query: MatchQuery::Text(String::new()),
                escape_offset: None,
            };
        };
        let is_label_char = |c: char| match self.variant {
            Variant::Numeric => c.is_ascii_digit(),
            Variant::Letter => self.alphabet_lower.contains(&c),
        };
        let query = if is_label_char(last) {
            MatchQuery::Label(input.chars().filter(|c| is_label_char(*c)).collect())
        } else {
            MatchQuery::Text(input.chars().filter(|c| !is_label_char(*c)).collect())
        };
        InputStep::Filter {
            query,
            escape_offset: None,
        }
    }
}

pub fn matches(variant: Variant, query: &MatchQuery, label: &str, text: &str) -> bool {
    match query {
        MatchQuery::Label(prefix) => match variant {
            Variant::Numeric => label.starts_with(prefix.as_str()),
            Variant::Letter => label.to_lowercase().starts_with(&prefix.to_lowercase()),
        },
        MatchQuery::Text(terms) => {
            let haystack = text.to_lowercase();
            terms
                .split(' ')
                .all(|term| haystack.contains(&term.to_lowercase()))
        }
    }
}

/// Whether `input` reads as an integer (leading whitespace and sign allowed).
pub fn looks_numeric(input: &str) -> bool {
    let trimmed = input.trim_start();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    unsigned.chars().next().map_or(false, |c| c.is_ascii_digit())
}

/// Position of the earliest whitespace token of `text` starting with `input`,
/// ignoring tokens at or past `limit`.
pub fn word_position(text: &str, input: &str, limit: usize) -> Option<usize> {
    let input = input.to_lowercase();
    text.to_lowercase()
        .split(' ')
        .take(limit)
        .position(|token| token.starts_with(&input))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTERS: [char; 5] = ['a', 's', 'd', 'f', 'g'];

    fn numeric() -> InputRules<'static> {
        InputRules {
            variant: Variant::Numeric,
            alphabet_lower: &LETTERS,
            escape_char: '\\',
        }
    }

    fn letter() -> InputRules<'static> {
        InputRules {
            variant: Variant::Letter,
            alphabet_lower: &LETTERS,
            escape_char: '\\',
        }
    }

    fn filter(query: MatchQuery) -> InputStep {
        InputStep::Filter {
            query,
            escape_offset: None,
        }
    }

    #[test]
    fn numeric_trailing_digit_selects_label_mode() {
        assert_eq!(
            numeric().classify("ab1", None),
            filter(MatchQuery::Label("1".into()))
        );
        assert_eq!(
            numeric().classify("1a2", None),
            filter(MatchQuery::Label("12".into()))
        );
        assert_eq!(
            numeric().classify("1 foo", None),
            filter(MatchQuery::Text(" foo".into()))
        );
    }

    #[test]
    fn letter_membership_selects_label_mode() {
        assert_eq!(
            letter().classify("s", None),
            filter(MatchQuery::Label("s".into()))
        );
        assert_eq!(
            letter().classify("S", None),
            filter(MatchQuery::Text("S".into()))
        );
        assert_eq!(
            letter().classify("xa", None),
            filter(MatchQuery::Label("a".into()))
        );
        assert_eq!(
            letter().classify("ax", None),
            filter(MatchQuery::Text("x".into()))
        );
    }

    #[test]
    fn escape_switches_to_text_after_offset() {
        assert_eq!(numeric().classify("12\\", None), InputStep::Escape(3));
        assert_eq!(
            numeric().classify("12\\99 red", Some(3)),
            InputStep::Filter {
                query: MatchQuery::Text("99 red".into()),
                escape_offset: Some(3),
            }
        );
        // replaying a whole escaped input at once finds the escape itself
        assert_eq!(
            letter().classify("\\sad", None),
            InputStep::Filter {
                query: MatchQuery::Text("sad".into()),
                escape_offset: Some(1),
            }
        );
    }

    #[test]
    fn empty_input_matches_everything() {
        let step = letter().classify("", None);
        assert_eq!(step, filter(MatchQuery::Text(String::new())));
        assert!(matches(Variant::Letter, &MatchQuery::Text(String::new()), "a", ""));
    }

    #[test]
    fn label_predicates() {
        let q = MatchQuery::Label("1".into());
        assert!(matches(Variant::Numeric, &q, "12", ""));
        assert!(!matches(Variant::Numeric, &q, "21", ""));
        let q = MatchQuery::Label("sa".into());
        assert!(matches(Variant::Letter, &q, "SAD", ""));
        assert!(!matches(Variant::Letter, &q, "as", ""));
    }

    #[test]
    fn text_predicate_requires_every_term() {
        let q = MatchQuery::Text("new ART".into());
        assert!(matches(Variant::Numeric, &q, "1", "Newest articles"));
        assert!(!matches(Variant::Numeric, &q, "1", "Newest posts"));
        // literal, not a pattern
        let q = MatchQuery::Text("(".into());
        assert!(!matches(Variant::Letter, &q, "a", "plain"));
    }

    #[test]
    fn numeric_detection_and_word_positions() {
        assert!(looks_numeric("12"));
        assert!(looks_numeric(" -3x"));
        assert!(!looks_numeric("x3"));
        assert!(!looks_numeric(""));
        assert_eq!(word_position("Read the Docs", "do", 37), Some(2));
        assert_eq!(word_position("Read the Docs", "do", 2), None);
        assert_eq!(word_position("Read", "x", 37), None);
    }
}
