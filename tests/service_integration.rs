// LIF adapter tests: metadata, plain text, tokenized LIF and error envelopes

use sentsplit::lif::{uri, Envelope, ServiceMetadata};
use sentsplit::{SentenceBoundaryRules, SentenceDetector, SplitterService};
use std::sync::{Arc, OnceLock};

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{parse_lif, simple_lif, tokenized_lif, tokens_from_surfaces};

static SHARED_SERVICE: OnceLock<SplitterService> = OnceLock::new();

fn get_service() -> &'static SplitterService {
    SHARED_SERVICE.get_or_init(|| SplitterService::with_default_rules().unwrap())
}

const EXAMPLE_TEXT: &str = "Mr. Jones went to Washington. He arrived at 3.30 p.m. on Monday.\n\nThe meeting (which ran late) ended early. \"Good,\" said Dr. Lee.";

#[test]
fn test_metadata() {
    let json = get_service().metadata();
    let envelope: Envelope = serde_json::from_str(json).expect("Unable to parse metadata json");
    assert_eq!(envelope.discriminator, uri::META);

    let metadata: ServiceMetadata = serde_json::from_value(envelope.payload).unwrap();
    assert_eq!(metadata.vendor, "http://www.cs.brandeis.edu/");
    assert_eq!(metadata.name, "sentsplit::SplitterService");
    assert_eq!(metadata.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(metadata.license, uri::APACHE2);

    let requires = &metadata.requires;
    assert_eq!(requires.encoding, "UTF-8");
    assert!(requires.language.contains(&"en".to_string()));
    assert_eq!(requires.format, vec![uri::LIF]);
    assert_eq!(requires.annotations, vec![uri::TOKEN]);

    let produces = &metadata.produces;
    assert_eq!(produces.encoding, "UTF-8");
    assert!(produces.language.contains(&"en".to_string()));
    assert_eq!(produces.format, vec![uri::LIF]);
    assert_eq!(produces.annotations, vec![uri::SENTENCE]);
}

#[test]
fn test_execute_without_lif() {
    let output = get_service().execute("This input is not a well-formed LIF JSON");
    let container = parse_lif(&output);
    assert_eq!(container.text.value, "This input is not a well-formed LIF JSON");
    assert_eq!(container.text.language.as_deref(), Some("en"));

    let views = container.find_views_that_contain(uri::SENTENCE);
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].annotations.len(), 1);
}

#[test]
fn test_execute_with_text_envelope() {
    let input = serde_json::to_string(&Envelope::text("One. Two.")).unwrap();
    let container = parse_lif(&get_service().execute(&input));
    let view = container.views.last().unwrap();
    let texts: Vec<_> = view.annotations.iter().filter_map(|a| a.feature_str("text")).collect();
    assert_eq!(texts, vec!["One.", "Two."]);
}

#[test]
fn test_execute_with_no_tokenized_input() {
    let container = parse_lif(&get_service().execute(&simple_lif(EXAMPLE_TEXT)));
    let view = container.views.last().unwrap();
    assert_eq!(view.id, "v1");
    let texts: Vec<_> = view.annotations.iter().filter_map(|a| a.feature_str("text")).collect();
    assert_eq!(
        texts,
        vec![
            "Mr. Jones went to Washington.",
            "He arrived at 3.30 p.m. on Monday.",
            "The meeting (which ran late) ended early.",
            "\"Good,\" said Dr. Lee.",
        ]
    );
}

#[test]
fn test_execute_with_tokenized_input() {
    let text = "Dr. Smith arrived. John Jr. is asleep. Me too.";
    let tokens = tokens_from_surfaces(
        text,
        &["Dr", ".", "Smith", "arrived", ".", "John", "Jr", ".", "is", "asleep", ".", "Me", "too", "."],
    );
    let container = parse_lif(&get_service().execute(&tokenized_lif(text, &tokens)));

    assert_eq!(container.views.len(), 2, "token view kept, sentence view added");
    let view = &container.views[1];
    assert_eq!(view.id, "v2");

    let contains = &view.metadata.contains[uri::SENTENCE];
    assert_eq!(contains.producer.as_deref(), Some("sentsplit::SplitterService"));
    assert_eq!(
        contains.kind.as_deref(),
        Some(format!("sentsplit-{}", env!("CARGO_PKG_VERSION")).as_str())
    );

    let summary: Vec<(String, i64, i64, String)> = view
        .annotations
        .iter()
        .map(|a| {
            assert_eq!(a.kind, uri::SENTENCE);
            (a.id.clone(), a.start.unwrap(), a.end.unwrap(), a.feature_str("text").unwrap().to_string())
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("s0".to_string(), 0, 18, "Dr. Smith arrived.".to_string()),
            ("s1".to_string(), 19, 38, "John Jr. is asleep.".to_string()),
            ("s2".to_string(), 39, 46, "Me too.".to_string()),
        ]
    );
}

#[test]
fn test_last_token_view_wins() {
    let text = "Stop. Go.";
    // An older, coarser tokenization followed by the one to use
    let coarse = tokens_from_surfaces(text, &["Stop. Go."]);
    let fine = tokens_from_surfaces(text, &["Stop", ".", "Go", "."]);

    let mut container = parse_lif(&tokenized_lif(text, &coarse));
    let second = parse_lif(&tokenized_lif(text, &fine)).views.remove(0);
    let view = container.new_view();
    view.metadata = second.metadata;
    view.annotations = second.annotations;

    let input = serde_json::to_string(&Envelope::lif(&container).unwrap()).unwrap();
    let output = parse_lif(&get_service().execute(&input));
    let sentences = &output.views.last().unwrap().annotations;
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[1].start, Some(6));
}

/// Tokens typed with the short `"Token"` name used under the LIF context
#[test]
fn test_short_form_token_types() {
    let input = serde_json::json!({
        "discriminator": uri::LIF,
        "payload": {
            "@context": "http://vocab.lappsgrid.org/context-1.0.0.jsonld",
            "text": {"@value": "Stop. Go on.", "@language": "en"},
            "views": [{
                "id": "v1",
                "metadata": {"contains": {(uri::TOKEN): {"producer": "upstream", "type": "tokenizer"}}},
                "annotations": [
                    {"id": "tok0", "@type": "Token", "start": 0, "end": 4},
                    {"id": "tok1", "@type": "Token", "start": 4, "end": 5},
                    {"id": "tok2", "@type": "Token", "start": 6, "end": 8},
                    {"id": "tok3", "@type": "Token", "start": 9, "end": 11},
                    {"id": "tok4", "@type": "Token", "start": 11, "end": 12}
                ]
            }]
        }
    })
    .to_string();

    let container = parse_lif(&get_service().execute(&input));
    let view = container.views.last().unwrap();
    let texts: Vec<_> = view.annotations.iter().filter_map(|a| a.feature_str("text")).collect();
    assert_eq!(texts, vec!["Stop.", "Go on."]);
}

#[test]
fn test_token_view_without_tokens_is_reported() {
    let mut container = sentsplit::lif::Container::new("Nothing was tokenized here.", Some("en"));
    container.new_view().add_contains(uri::TOKEN, "upstream", "tokenizer");
    let input = Envelope::lif(&container).unwrap().to_pretty_json().unwrap();

    let envelope: Envelope = serde_json::from_str(&get_service().execute(&input)).unwrap();
    assert_eq!(envelope.discriminator, uri::ERROR);
    assert_eq!(envelope.payload, "Token view v1 holds no Token annotations");
}

#[test]
fn test_error_envelope_returned_unchanged() {
    let input = Envelope::error("previous service failed").to_pretty_json().unwrap();
    assert_eq!(get_service().execute(&input), input);
}

#[test]
fn test_unsupported_discriminator() {
    let input = r#"{"discriminator": "http://vocab.lappsgrid.org/ns/media/xml", "payload": "<x/>"}"#;
    let envelope: Envelope = serde_json::from_str(&get_service().execute(input)).unwrap();
    assert_eq!(envelope.discriminator, uri::ERROR);
    assert!(envelope.payload.as_str().unwrap().starts_with("Unsupported discriminator"));
}

#[test]
fn test_detector_errors_become_error_envelopes() {
    let text = "Hi.";
    let tokens = vec![sentsplit::Token::new("Hi", 0, 2), sentsplit::Token::new(".", 2, 9)];
    let envelope: Envelope = serde_json::from_str(&get_service().execute(&tokenized_lif(text, &tokens))).unwrap();
    assert_eq!(envelope.discriminator, uri::ERROR);
    assert!(envelope.payload.as_str().unwrap().contains("token 1"));
}

#[test]
fn test_malformed_lif_payload() {
    let input = format!(r#"{{"discriminator": "{}", "payload": {{"views": 12}}}}"#, uri::LIF);
    let envelope: Envelope = serde_json::from_str(&get_service().execute(&input)).unwrap();
    assert_eq!(envelope.discriminator, uri::ERROR);
    assert!(envelope.payload.as_str().unwrap().starts_with("Invalid payload"));
}

#[test]
fn test_service_with_custom_rules() {
    let rules = SentenceBoundaryRules {
        never_final: vec!["etc".to_string()],
        ..SentenceBoundaryRules::default()
    };
    let detector = Arc::new(SentenceDetector::new(rules).unwrap());
    let service = SplitterService::new(Arc::clone(&detector)).unwrap();

    let container = parse_lif(&service.execute("Apples, pears, etc. Bananas too."));
    assert_eq!(container.views.last().unwrap().annotations.len(), 1);
}
