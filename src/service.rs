// WHY: LIF adapter so the detector can run as an annotation service
// `execute` never fails; every problem comes back as an error envelope

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::SplitError;
use crate::lif::{uri, Container, Envelope, IoSpecification, ServiceMetadata, View};
use crate::sentence_detector::{CharIndex, SentenceDetector, Token};
use crate::tokenizer::Tokenizer;

pub const SERVICE_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "::SplitterService");
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_VENDOR: &str = "http://www.cs.brandeis.edu/";
pub const SERVICE_DESCRIPTION: &str = "Takes tokenized input and detects sentences.";

/// Reasons a single request could not be annotated
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unsupported discriminator: {0}")]
    UnsupportedDiscriminator(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Token view {0} holds no Token annotations")]
    EmptyTokenView(String),

    #[error("Token annotation {id} has invalid offsets: {reason}")]
    InvalidAnnotation { id: String, reason: &'static str },

    #[error(transparent)]
    Split(#[from] SplitError),

    #[error("Unable to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Sentence splitting service speaking LIF envelopes
pub struct SplitterService {
    detector: Arc<SentenceDetector>,
    tokenizer: Tokenizer,
    metadata: String,
}

impl SplitterService {
    /// Wrap a (possibly shared) detector
    pub fn new(detector: Arc<SentenceDetector>) -> Result<Self> {
        let metadata = Envelope::new(uri::META, serde_json::to_value(Self::describe())?).to_pretty_json()?;
        info!("Initialized {} v{}", SERVICE_NAME, SERVICE_VERSION);
        Ok(Self {
            detector,
            tokenizer: Tokenizer::new()?,
            metadata,
        })
    }

    pub fn with_default_rules() -> Result<Self> {
        Self::new(Arc::new(SentenceDetector::with_default_rules()?))
    }

    pub fn detector(&self) -> &SentenceDetector {
        &self.detector
    }

    /// Service descriptor: what the splitter consumes and produces
    pub fn describe() -> ServiceMetadata {
        let io = |annotation: &str| IoSpecification {
            encoding: "UTF-8".to_string(),
            language: vec!["en".to_string()],
            format: vec![uri::LIF.to_string()],
            annotations: vec![annotation.to_string()],
        };
        ServiceMetadata {
            name: SERVICE_NAME.to_string(),
            description: SERVICE_DESCRIPTION.to_string(),
            version: SERVICE_VERSION.to_string(),
            vendor: SERVICE_VENDOR.to_string(),
            license: uri::APACHE2.to_string(),
            requires: io(uri::TOKEN),
            produces: io(uri::SENTENCE),
        }
    }

    /// Pretty-printed META envelope, built once at construction
    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    /// Process one request document and return the response document
    pub fn execute(&self, input: &str) -> String {
        let envelope = match serde_json::from_str::<Envelope>(input) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!("Input is not a JSON envelope ({e}); treating it as plain text");
                Envelope::text(input)
            }
        };

        if envelope.discriminator == uri::ERROR {
            debug!("Passing error envelope through unchanged");
            return input.to_string();
        }

        match self.process(envelope) {
            Ok(output) => output,
            Err(e) => {
                warn!("Request failed: {e}");
                error_json(&e.to_string())
            }
        }
    }

    fn process(&self, envelope: Envelope) -> Result<String, ServiceError> {
        let mut container = match envelope.discriminator.as_str() {
            uri::LIF | uri::JSON_LD => serde_json::from_value::<Container>(envelope.payload)
                .map_err(|e| ServiceError::InvalidPayload(e.to_string()))?,
            uri::TEXT => match envelope.payload {
                Value::String(text) => Container::new(text, Some("en")),
                other => {
                    return Err(ServiceError::InvalidPayload(format!(
                        "text payload must be a string, got {other}"
                    )))
                }
            },
            other => return Err(ServiceError::UnsupportedDiscriminator(other.to_string())),
        };

        let count = self.annotate(&mut container)?;
        debug!(sentences = count, "Annotated container");
        Ok(Envelope::lif(&container)?.to_pretty_json()?)
    }

    /// Add a sentence view to `container`; returns the number of sentences
    pub fn annotate(&self, container: &mut Container) -> Result<usize, ServiceError> {
        let text = container.text.value.clone();
        let index = CharIndex::new(&text);

        let tokens = match container.find_views_that_contain(uri::TOKEN).last() {
            Some(view) => {
                debug!("Using tokens from view {}", view.id);
                let tokens = tokens_from_view(view, &index)?;
                if tokens.is_empty() && !text.trim().is_empty() {
                    warn!(view = %view.id, annotations = view.annotations.len(), "Token view yields no tokens");
                    return Err(ServiceError::EmptyTokenView(view.id.clone()));
                }
                tokens
            }
            None => {
                debug!("No token view present; tokenizing text");
                self.tokenizer.tokenize(&text)
            }
        };

        let sentences = self.detector.split(&text, &tokens)?;

        let view = container.new_view();
        for (id, sentence) in sentences.iter().enumerate() {
            let sentence_text = sentence.slice(&index).unwrap_or_default();
            view.new_annotation(format!("s{id}"), uri::SENTENCE, sentence.start, sentence.end)
                .add_feature("text", sentence_text);
        }
        view.add_contains(uri::SENTENCE, SERVICE_NAME, &format!("sentsplit-{SERVICE_VERSION}"));

        Ok(sentences.len())
    }
}

/// Build detector tokens from the Token annotations of a view
///
/// Both the full type URI and the short `"Token"` form are accepted.
///
/// Surface text is sliced from the container text; when the offsets do not
/// fit the text the token keeps an empty surface and the detector reports the
/// range violation.
fn tokens_from_view(view: &View, index: &CharIndex<'_>) -> Result<Vec<Token>, ServiceError> {
    let mut tokens = Vec::with_capacity(view.annotations.len());
    for annotation in view.annotations.iter().filter(|a| uri::matches(&a.kind, uri::TOKEN)) {
        let (start, end) = match (annotation.start, annotation.end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(ServiceError::InvalidAnnotation {
                    id: annotation.id.clone(),
                    reason: "missing start or end",
                })
            }
        };
        let (Ok(start), Ok(end)) = (usize::try_from(start), usize::try_from(end)) else {
            return Err(ServiceError::InvalidAnnotation {
                id: annotation.id.clone(),
                reason: "negative offset",
            });
        };
        let surface = index.slice(start, end).unwrap_or_default();
        tokens.push(Token::new(surface, start, end));
    }
    Ok(tokens)
}

fn error_json(message: &str) -> String {
    Envelope::error(message)
        .to_pretty_json()
        .unwrap_or_else(|_| format!("{{\"discriminator\":\"{}\"}}", uri::ERROR))
}
