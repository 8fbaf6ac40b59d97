// WHY: Ordered boundary rules evaluated for every candidate token
//
// A candidate is a token whose text ends with a sentence-final mark once
// trailing closing characters are ignored. Rules run in `RULE_ORDER`; the
// first one that returns a verdict decides the candidate.

use super::abbreviations::AbbreviationChecker;
use super::position::CharIndex;
use super::{SentenceBoundaryRules, Token};

/// Disambiguation rules in their fixed precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryRule {
    /// Suppress boundaries after known abbreviations
    AbbreviationGuard,
    /// Suppress boundaries at a `.` between two digits
    NumericGuard,
    /// Move the boundary past directly adjacent closing quotes/brackets
    BracketAbsorption,
    /// Commit a boundary after the candidate
    DefaultBoundary,
}

pub const RULE_ORDER: [BoundaryRule; 4] = [
    BoundaryRule::AbbreviationGuard,
    BoundaryRule::NumericGuard,
    BoundaryRule::BracketAbsorption,
    BoundaryRule::DefaultBoundary,
];

/// Outcome of a rule for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The mark does not end a sentence
    Suppress,
    /// The sentence ends after the token at `end_token`
    Boundary { end_token: usize },
}

/// Everything a rule may look at for one candidate token
pub struct RuleContext<'a> {
    pub tokens: &'a [Token],
    pub index: usize,
    pub text: &'a CharIndex<'a>,
    pub rules: &'a SentenceBoundaryRules,
    pub abbreviations: &'a AbbreviationChecker,
}

impl<'a> RuleContext<'a> {
    pub fn candidate(&self) -> &'a Token {
        &self.tokens[self.index]
    }

    pub fn next_token(&self) -> Option<&'a Token> {
        self.tokens.get(self.index + 1)
    }

    fn previous_token(&self) -> Option<&'a Token> {
        self.index.checked_sub(1).map(|i| &self.tokens[i])
    }

    /// Candidate text with trailing closing characters removed
    fn stripped_candidate(&self) -> &'a str {
        self.rules.strip_closing(&self.candidate().text)
    }

    /// Word to test against the abbreviation tables
    ///
    /// `"Dr."` is used as-is; a bare `"."` borrows the directly adjacent
    /// preceding token, so `"Dr"` + `"."` yields `"Dr."`.
    fn abbreviation_form(&self) -> Option<String> {
        let stripped = self.stripped_candidate();
        if !stripped.ends_with('.') || stripped.ends_with("..") {
            return None;
        }
        if stripped != "." {
            return Some(stripped.to_string());
        }
        let previous = self.previous_token()?;
        if !previous.is_adjacent_to(self.candidate()) {
            return None;
        }
        Some(format!("{}.", previous.text))
    }

    /// First letter or digit of the next token that has one
    ///
    /// Pure punctuation tokens such as an opening quote are skipped.
    fn next_word_initial(&self) -> Option<char> {
        self.tokens[self.index + 1..]
            .iter()
            .find_map(|t| t.text.chars().find(|c| c.is_alphanumeric()))
    }
}

impl BoundaryRule {
    /// Evaluate this rule; `None` defers to the next rule in order
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Verdict> {
        match self {
            BoundaryRule::AbbreviationGuard => abbreviation_guard(ctx),
            BoundaryRule::NumericGuard => numeric_guard(ctx),
            BoundaryRule::BracketAbsorption => bracket_absorption(ctx),
            BoundaryRule::DefaultBoundary => Some(Verdict::Boundary { end_token: ctx.index }),
        }
    }
}

/// Run the rules in precedence order and report which one decided
pub fn decide(ctx: &RuleContext<'_>) -> (BoundaryRule, Verdict) {
    for rule in RULE_ORDER {
        if let Some(verdict) = rule.evaluate(ctx) {
            return (rule, verdict);
        }
    }
    // DefaultBoundary always answers
    (BoundaryRule::DefaultBoundary, Verdict::Boundary { end_token: ctx.index })
}

fn abbreviation_guard(ctx: &RuleContext<'_>) -> Option<Verdict> {
    let form = ctx.abbreviation_form()?;
    if !ctx.abbreviations.is_abbreviation(&form) {
        return None;
    }
    // Last token of the stream: let the later rules place the boundary
    ctx.next_token()?;

    let capitalised_next = ctx.next_word_initial().is_some_and(char::is_uppercase);
    if capitalised_next && !ctx.abbreviations.is_never_final(&form) {
        return None;
    }
    Some(Verdict::Suppress)
}

fn numeric_guard(ctx: &RuleContext<'_>) -> Option<Verdict> {
    let candidate = ctx.candidate();
    if !candidate.text.ends_with('.') || candidate.end == 0 {
        return None;
    }
    let dot = candidate.end - 1;
    if ctx.text.char_at(dot) != Some('.') || dot == 0 {
        return None;
    }
    let before = ctx.text.char_at(dot - 1)?;
    let after = ctx.text.char_at(dot + 1)?;
    if before.is_ascii_digit() && after.is_ascii_digit() {
        Some(Verdict::Suppress)
    } else {
        None
    }
}

fn bracket_absorption(ctx: &RuleContext<'_>) -> Option<Verdict> {
    let mut end_token = ctx.index;
    while let Some(next) = ctx.tokens.get(end_token + 1) {
        if !ctx.tokens[end_token].is_adjacent_to(next) || !ctx.rules.is_closing_only(&next.text) {
            break;
        }
        end_token += 1;
    }
    (end_token > ctx.index).then_some(Verdict::Boundary { end_token })
}
