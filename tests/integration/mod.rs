// Integration test utilities and common code
// Shared token builders and LIF document builders for the integration tests

#![allow(dead_code)]

use sentsplit::lif::{uri, Container, Envelope};
use sentsplit::Token;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Locate each surface string in `text`, left to right, and build char-offset tokens
pub fn tokens_from_surfaces(text: &str, surfaces: &[&str]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(surfaces.len());
    let mut byte_cursor = 0;
    for surface in surfaces {
        let found = text[byte_cursor..]
            .find(surface)
            .unwrap_or_else(|| panic!("token {surface:?} not found after byte {byte_cursor} in {text:?}"));
        let start_byte = byte_cursor + found;
        let start = text[..start_byte].chars().count();
        let end = start + surface.chars().count();
        tokens.push(Token::new(*surface, start, end));
        byte_cursor = start_byte + surface.len();
    }
    tokens
}

/// Sentence texts for a split result
pub fn sentence_texts(text: &str, spans: &[sentsplit::SentenceSpan]) -> Vec<String> {
    spans
        .iter()
        .map(|s| s.text(text).expect("span inside text").to_string())
        .collect()
}

/// Assert the coverage and alignment properties of a split result
pub fn assert_well_formed(tokens: &[Token], spans: &[sentsplit::SentenceSpan]) {
    let mut expected_first = 0;
    for (i, span) in spans.iter().enumerate() {
        assert!(span.token_count > 0, "sentence {i} covers no tokens");
        assert!(!span.is_empty(), "sentence {i} is empty at offset {}", span.start);
        assert_eq!(span.first_token, expected_first, "sentence {i} leaves a gap or overlaps");
        let range = span.token_range();
        assert_eq!(span.start, tokens[range.start].start, "sentence {i} start not on a token start");
        assert_eq!(span.end, tokens[range.end - 1].end, "sentence {i} end not on a token end");
        if i > 0 {
            assert!(span.start >= spans[i - 1].end, "sentence {i} overlaps its predecessor");
        }
        expected_first = range.end;
    }
    assert_eq!(expected_first, tokens.len(), "not every token is covered");
}

/// LIF envelope with the text and one Token view, as an upstream tokenizer would send
pub fn tokenized_lif(text: &str, tokens: &[Token]) -> String {
    let mut container = Container::new(text, Some("en"));
    let view = container.new_view();
    for (i, token) in tokens.iter().enumerate() {
        view.new_annotation(format!("tok{i}"), uri::TOKEN, token.start, token.end)
            .add_feature("word", token.text.as_str());
    }
    view.add_contains(uri::TOKEN, "integration-test", "generated-by-test");
    Envelope::lif(&container)
        .and_then(|e| e.to_pretty_json())
        .expect("Failed to serialize test envelope")
}

/// LIF envelope with text only
pub fn simple_lif(text: &str) -> String {
    Envelope::lif(&Container::new(text, Some("en")))
        .and_then(|e| e.to_pretty_json())
        .expect("Failed to serialize test envelope")
}

/// Parse a service response that must be a LIF envelope
pub fn parse_lif(output: &str) -> Container {
    let envelope: Envelope = serde_json::from_str(output).expect("response is not JSON");
    assert_eq!(envelope.discriminator, uri::LIF, "unexpected response: {output}");
    serde_json::from_value(envelope.payload).expect("payload is not a LIF container")
}

/// Test fixture holding rule files in a temporary directory
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();
        Self { temp_dir, root_path }
    }

    /// Write a rule file with the given TOML content
    pub fn create_rule_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root_path.join(name);
        fs::write(&path, content).expect("Failed to write rule file");
        path
    }
}
