// LIF (LAPPS Interchange Format) envelope and container types
//
// Only the parts the splitter reads or writes are modelled; unknown fields in
// metadata maps survive a round trip through `serde_json::Value`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Discriminator and vocabulary URIs
pub mod uri {
    pub const TEXT: &str = "http://vocab.lappsgrid.org/ns/media/text";
    pub const LIF: &str = "http://vocab.lappsgrid.org/ns/media/jsonld#lif";
    pub const JSON_LD: &str = "http://vocab.lappsgrid.org/ns/media/jsonld";
    pub const ERROR: &str = "http://vocab.lappsgrid.org/ns/error";
    pub const META: &str = "http://vocab.lappsgrid.org/ns/meta";
    pub const TOKEN: &str = "http://vocab.lappsgrid.org/Token";
    pub const SENTENCE: &str = "http://vocab.lappsgrid.org/Sentence";
    pub const APACHE2: &str = "http://vocab.lappsgrid.org/ns/license#apache-2.0";

    /// True when `kind` names the vocabulary type `uri`, either in full or by
    /// the short name the LIF context maps to it (`"Token"` for `.../Token`)
    pub fn matches(kind: &str, uri: &str) -> bool {
        kind == uri || uri.rsplit('/').next().is_some_and(|short| kind == short)
    }
}

pub const LIF_CONTEXT: &str = "http://vocab.lappsgrid.org/context-1.0.0.jsonld";

/// Outer `{discriminator, payload}` wrapper used for every exchange
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope {
    pub discriminator: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

impl Envelope {
    pub fn new(discriminator: impl Into<String>, payload: Value) -> Self {
        Self {
            discriminator: discriminator.into(),
            payload,
            parameters: Map::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(uri::TEXT, Value::String(text.into()))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(uri::ERROR, Value::String(message.into()))
    }

    pub fn lif(container: &Container) -> serde_json::Result<Self> {
        Ok(Self::new(uri::LIF, serde_json::to_value(container)?))
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `{"@value": ..., "@language": ...}`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TextValue {
    #[serde(rename = "@value", default)]
    pub value: String,
    #[serde(rename = "@language", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

fn default_context() -> Value {
    Value::String(LIF_CONTEXT.to_string())
}

/// Primary text plus the annotation views layered over it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Container {
    #[serde(rename = "@context", default = "default_context")]
    pub context: Value,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub text: TextValue,
    #[serde(default)]
    pub views: Vec<View>,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            context: default_context(),
            metadata: Map::new(),
            text: TextValue::default(),
            views: Vec::new(),
        }
    }
}

impl Container {
    pub fn new(text: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            text: TextValue {
                value: text.into(),
                language: language.map(str::to_string),
            },
            ..Self::default()
        }
    }

    /// Views that hold annotations of `annotation_type`, in document order
    ///
    /// A view qualifies when its metadata lists the type under `contains`, or,
    /// for producers that skip that bookkeeping, when it has such annotations.
    pub fn find_views_that_contain(&self, annotation_type: &str) -> Vec<&View> {
        self.views
            .iter()
            .filter(|view| {
                view.metadata.contains.keys().any(|key| uri::matches(key, annotation_type))
                    || view.annotations.iter().any(|a| uri::matches(&a.kind, annotation_type))
            })
            .collect()
    }

    /// Append an empty view with the next free `v<N>` id
    pub fn new_view(&mut self) -> &mut View {
        let mut n = self.views.len() + 1;
        while self.views.iter().any(|v| v.id == format!("v{n}")) {
            n += 1;
        }
        self.views.push(View::new(format!("v{n}")));
        let last = self.views.len() - 1;
        &mut self.views[last]
    }
}

/// Provenance for one annotation type inside a view
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Contains {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ViewMetadata {
    #[serde(default)]
    pub contains: BTreeMap<String, Contains>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct View {
    pub id: String,
    #[serde(default)]
    pub metadata: ViewMetadata,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl View {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: ViewMetadata::default(),
            annotations: Vec::new(),
        }
    }

    /// Append an annotation; offsets that do not fit the JSON integer range are left unset
    pub fn new_annotation(
        &mut self,
        id: impl Into<String>,
        kind: &str,
        start: usize,
        end: usize,
    ) -> &mut Annotation {
        self.annotations.push(Annotation {
            id: id.into(),
            kind: kind.to_string(),
            label: None,
            start: i64::try_from(start).ok(),
            end: i64::try_from(end).ok(),
            features: Map::new(),
        });
        let last = self.annotations.len() - 1;
        &mut self.annotations[last]
    }

    /// Record which tool produced annotations of `annotation_type`
    pub fn add_contains(&mut self, annotation_type: &str, producer: &str, kind: &str) {
        self.metadata.contains.insert(
            annotation_type.to_string(),
            Contains {
                producer: Some(producer.to_string()),
                kind: Some(kind.to_string()),
                extra: Map::new(),
            },
        );
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub features: Map<String, Value>,
}

impl Annotation {
    pub fn add_feature(&mut self, name: &str, value: impl Into<Value>) {
        self.features.insert(name.to_string(), value.into());
    }

    pub fn feature_str(&self, name: &str) -> Option<&str> {
        self.features.get(name).and_then(Value::as_str)
    }
}

/// Input or output requirements advertised in service metadata
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct IoSpecification {
    pub encoding: String,
    pub language: Vec<String>,
    pub format: Vec<String>,
    pub annotations: Vec<String>,
}

/// Descriptor returned by the service's metadata call
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub vendor: String,
    pub license: String,
    pub requires: IoSpecification,
    pub produces: IoSpecification,
}
