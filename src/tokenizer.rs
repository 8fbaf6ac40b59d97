// Fallback tokenizer for input that arrives without token annotations
//
// Produces char-offset tokens in the shape the detector expects: words and
// trailing dots are separate tokens ("Dr", "."), while dotted acronyms
// ("U.S.") and decimal numbers ("3.14") stay whole.

use anyhow::Result;
use regex_automata::meta::Regex;
use tracing::debug;

use crate::sentence_detector::Token;

/// Alternatives in priority order; the meta regex uses leftmost-first matching
const TOKEN_PATTERN: &str = concat!(
    r"(?:\p{L}\.){2,}",
    r"|\p{N}+(?:[.,]\p{N}+)*",
    r"|\.\.\.|…",
    r"|[\p{L}\p{N}_]+(?:['’\-][\p{L}\p{N}_]+)*",
    r"|\S",
);

/// Regex-driven tokenizer; build once and reuse
pub struct Tokenizer {
    pattern: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(TOKEN_PATTERN)?;
        debug!("Compiled tokenizer pattern");
        Ok(Self { pattern })
    }

    /// Tokenize `text`; offsets are char offsets, matching [`Token`]
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        // Running char count up to `last_byte`, so the scan stays linear
        let mut last_byte = 0;
        let mut last_char = 0;

        for m in self.pattern.find_iter(text) {
            let start = last_char + text[last_byte..m.start()].chars().count();
            let surface = &text[m.start()..m.end()];
            let end = start + surface.chars().count();
            tokens.push(Token::new(surface, start, end));
            last_byte = m.end();
            last_char = end;
        }

        debug!(tokens = tokens.len(), "Tokenized {} bytes", text.len());
        tokens
    }
}
