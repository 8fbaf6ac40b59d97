// WHY: Main detector interface over caller-supplied token streams
// Candidates ending in a sentence-final mark are decided by the ordered rules in `rules`

use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, info, trace};

use crate::error::{ConfigError, SplitError};

pub mod abbreviations;
pub mod normalization;
pub mod position;
pub mod rules;

pub use abbreviations::AbbreviationChecker;
pub use normalization::{normalize_sentence, normalize_sentence_into};
pub use position::{BytePos, CharIndex, CharPos};
pub use rules::{BoundaryRule, RuleContext, Verdict, RULE_ORDER};

/// A token over the source text; offsets are half-open char offsets
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// True when `next` starts exactly where this token ends
    pub fn is_adjacent_to(&self, next: &Token) -> bool {
        self.end == next.start
    }
}

/// A detected sentence, aligned to token boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SentenceSpan {
    /// Char offset of the first token's start
    pub start: usize,
    /// Char offset of the last token's end (exclusive)
    pub end: usize,
    /// Index of the first covered token
    pub first_token: usize,
    /// Number of covered tokens, always at least one
    pub token_count: usize,
}

impl SentenceSpan {
    fn covering(tokens: &[Token], first: usize, last: usize) -> Self {
        Self {
            start: tokens[first].start,
            end: tokens[last].end,
            first_token: first,
            token_count: last - first + 1,
        }
    }

    /// Indices of the tokens this sentence covers
    pub fn token_range(&self) -> Range<usize> {
        self.first_token..self.first_token + self.token_count
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Take over the zero-width tokens that directly follow this sentence
    fn absorb_trailing(&mut self, tail: &SentenceSpan) {
        self.end = self.end.max(tail.end);
        self.token_count += tail.token_count;
    }

    /// Borrow the sentence text out of a pre-built char index
    pub fn slice<'a>(&self, index: &CharIndex<'a>) -> Option<&'a str> {
        index.slice(self.start, self.end)
    }

    /// Borrow the sentence text out of the source string
    ///
    /// Builds a char index on every call; use [`SentenceSpan::slice`] when
    /// extracting many sentences from one text.
    pub fn text<'a>(&self, text: &'a str) -> Option<&'a str> {
        CharIndex::new(text).slice(self.start, self.end)
    }
}

/// Configuration for sentence boundary detection rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceBoundaryRules {
    /// Characters that can terminate a sentence; `"..."` is covered by `.`
    pub end_punctuation: Vec<char>,
    /// Closing quotes/brackets that may trail a sentence-final mark
    pub closing_chars: Vec<char>,
    /// Known abbreviations (any case, trailing dot optional)
    pub abbreviations: Vec<String>,
    /// Abbreviations after which a boundary is never placed
    pub never_final: Vec<String>,
    /// Treat single upper-case letters ("J.") as never-final abbreviations
    pub initials_are_abbreviations: bool,
}

impl Default for SentenceBoundaryRules {
    fn default() -> Self {
        Self {
            end_punctuation: vec!['.', '?', '!', '\u{2026}'],
            closing_chars: vec!['"', '\'', ')', ']', '}', '\u{201D}', '\u{2019}', '\u{00BB}'],
            abbreviations: abbreviations::DEFAULT_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
            never_final: abbreviations::DEFAULT_NEVER_FINAL.iter().map(|s| s.to_string()).collect(),
            initials_are_abbreviations: true,
        }
    }
}

impl SentenceBoundaryRules {
    /// Reject tables the detector cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end_punctuation.is_empty() {
            return Err(ConfigError::Invalid("end_punctuation must not be empty".to_string()));
        }
        if let Some(c) = self.end_punctuation.iter().find(|c| self.closing_chars.contains(c)) {
            return Err(ConfigError::Invalid(format!(
                "{c:?} cannot be both sentence-final and closing"
            )));
        }
        for entry in self.abbreviations.iter().chain(&self.never_final) {
            if abbreviations::normalize_abbreviation(entry).is_empty() {
                return Err(ConfigError::Invalid(format!("abbreviation {entry:?} has no letters")));
            }
        }
        Ok(())
    }

    /// Build the lookup table used by the abbreviation guard
    pub fn abbreviation_checker(&self) -> AbbreviationChecker {
        AbbreviationChecker::new(
            self.abbreviations.iter().map(String::as_str),
            self.never_final.iter().map(String::as_str),
            self.initials_are_abbreviations,
        )
    }

    /// Text with trailing closing characters removed
    pub fn strip_closing<'a>(&self, text: &'a str) -> &'a str {
        text.trim_end_matches(|c| self.closing_chars.contains(&c))
    }

    /// Non-empty text made only of closing characters
    pub fn is_closing_only(&self, text: &str) -> bool {
        !text.is_empty() && text.chars().all(|c| self.closing_chars.contains(&c))
    }

    /// Text ends with a sentence-final mark, ignoring trailing closers
    pub fn ends_with_final_mark(&self, text: &str) -> bool {
        self.strip_closing(text)
            .chars()
            .next_back()
            .is_some_and(|c| self.end_punctuation.contains(&c))
    }
}

/// Main sentence detector; immutable after construction and safe to share
#[derive(Debug, Clone)]
pub struct SentenceDetector {
    rules: SentenceBoundaryRules,
    abbreviations: AbbreviationChecker,
}

impl SentenceDetector {
    /// Create new sentence detector with custom rules
    pub fn new(rules: SentenceBoundaryRules) -> Result<Self, ConfigError> {
        rules.validate()?;
        let abbreviations = rules.abbreviation_checker();
        info!(
            abbreviations = abbreviations.len(),
            end_punctuation = rules.end_punctuation.len(),
            closing_chars = rules.closing_chars.len(),
            "Built sentence detector rule tables"
        );
        Ok(Self {
            rules,
            abbreviations,
        })
    }

    /// Create sentence detector with default rules
    pub fn with_default_rules() -> Result<Self, ConfigError> {
        Self::new(SentenceBoundaryRules::default())
    }

    pub fn rules(&self) -> &SentenceBoundaryRules {
        &self.rules
    }

    /// Split a token stream into sentence spans
    ///
    /// All tokens are validated before any span is produced, so a contract
    /// violation never yields a partial result.
    ///
    /// Spans are never empty. Zero-width tokens join the following sentence,
    /// or the previous one at the end of the stream; a stream made only of
    /// zero-width tokens yields no spans.
    pub fn split(&self, text: &str, tokens: &[Token]) -> Result<Vec<SentenceSpan>, SplitError> {
        let index = CharIndex::new(text);
        validate_tokens(&index, tokens)?;

        let mut sentences = Vec::new();
        let mut sentence_first = 0;
        let mut i = 0;

        while i < tokens.len() {
            if !self.rules.ends_with_final_mark(&tokens[i].text) {
                i += 1;
                continue;
            }

            let ctx = RuleContext {
                tokens,
                index: i,
                text: &index,
                rules: &self.rules,
                abbreviations: &self.abbreviations,
            };
            let (rule, verdict) = rules::decide(&ctx);
            trace!(token = i, ?rule, ?verdict, "Evaluated boundary candidate");

            match verdict {
                Verdict::Boundary { end_token } => {
                    let span = SentenceSpan::covering(tokens, sentence_first, end_token);
                    if span.is_empty() {
                        // Only zero-width tokens so far: they open the next sentence instead
                        trace!(token = end_token, "Carrying zero-width tokens forward");
                    } else {
                        sentences.push(span);
                        sentence_first = end_token + 1;
                    }
                    i = end_token + 1;
                }
                Verdict::Suppress => i += 1,
            }
        }

        // Trailing tokens without a final mark still form a sentence
        if sentence_first < tokens.len() {
            let tail = SentenceSpan::covering(tokens, sentence_first, tokens.len() - 1);
            if !tail.is_empty() {
                sentences.push(tail);
            } else if let Some(previous) = sentences.last_mut() {
                previous.absorb_trailing(&tail);
            } else {
                debug!("Every token is zero-width; no sentence to emit");
            }
        }

        debug!(tokens = tokens.len(), sentences = sentences.len(), "Split token stream");
        Ok(sentences)
    }
}

fn validate_tokens(index: &CharIndex<'_>, tokens: &[Token]) -> Result<(), SplitError> {
    let text_len = index.char_len();
    let mut previous_start: Option<usize> = None;

    for (i, token) in tokens.iter().enumerate() {
        if token.end < token.start || token.end > text_len {
            return Err(SplitError::OutOfRangeOffset {
                index: i,
                start: token.start,
                end: token.end,
                text_len,
            });
        }
        if let Some(previous_start) = previous_start {
            if token.start < previous_start {
                return Err(SplitError::UnorderedTokens {
                    index: i,
                    start: token.start,
                    previous_start,
                });
            }
        }
        previous_start = Some(token.start);
    }
    Ok(())
}

/// Format one sentence for line output
/// Returns: index<TAB>sentence<TAB>(start,end)
pub fn format_sentence_output(index: usize, content: &str, span: &SentenceSpan) -> String {
    format!("{}\t{}\t({},{})", index, content, span.start, span.end)
}
