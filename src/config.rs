// WHY: TOML rule files layered over the built-in rule tables
//
// Example:
//
// ```toml
// extra_abbreviations = ["approx", "dept"]
// extra_never_final = ["gen"]
// closing_chars = ["\"", ")", "»"]
// initials_are_abbreviations = false
// ```

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::sentence_detector::SentenceBoundaryRules;

/// Optional overrides read from a rule file; absent fields keep the defaults
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleOverrides {
    /// Replaces the sentence-final marks
    pub end_punctuation: Option<Vec<char>>,
    /// Replaces the closing quote/bracket characters
    pub closing_chars: Option<Vec<char>>,
    /// Added to the default abbreviations
    #[serde(default)]
    pub extra_abbreviations: Vec<String>,
    /// Added to the default never-final subset
    #[serde(default)]
    pub extra_never_final: Vec<String>,
    /// Replaces the whole abbreviation list before extras are added
    pub abbreviations: Option<Vec<String>>,
    /// Replaces the whole never-final list before extras are added
    pub never_final: Option<Vec<String>>,
    pub initials_are_abbreviations: Option<bool>,
}

impl RuleOverrides {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read rule file {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Layer these overrides on top of `base` and validate the result
    pub fn apply(self, base: SentenceBoundaryRules) -> Result<SentenceBoundaryRules, ConfigError> {
        let mut rules = base;
        if let Some(end_punctuation) = self.end_punctuation {
            rules.end_punctuation = end_punctuation;
        }
        if let Some(closing_chars) = self.closing_chars {
            rules.closing_chars = closing_chars;
        }
        if let Some(abbreviations) = self.abbreviations {
            rules.abbreviations = abbreviations;
        }
        if let Some(never_final) = self.never_final {
            rules.never_final = never_final;
        }
        rules.abbreviations.extend(self.extra_abbreviations);
        rules.never_final.extend(self.extra_never_final);
        if let Some(initials) = self.initials_are_abbreviations {
            rules.initials_are_abbreviations = initials;
        }

        rules.validate()?;
        Ok(rules)
    }
}

/// Load a rule file and merge it over the default tables
pub fn load_rules(path: impl AsRef<Path>) -> Result<SentenceBoundaryRules, ConfigError> {
    let path = path.as_ref();
    let rules = RuleOverrides::from_file(path)?.apply(SentenceBoundaryRules::default())?;
    info!(
        abbreviations = rules.abbreviations.len(),
        never_final = rules.never_final.len(),
        "Loaded rule file {}",
        path.display()
    );
    Ok(rules)
}

/// Load a rule file without blocking the runtime
pub async fn load_rules_async(path: impl AsRef<Path>) -> Result<SentenceBoundaryRules, ConfigError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await.map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = RuleOverrides::from_toml_str(&content)?.apply(SentenceBoundaryRules::default())?;
    info!(
        abbreviations = rules.abbreviations.len(),
        never_final = rules.never_final.len(),
        "Loaded rule file {}",
        path.display()
    );
    Ok(rules)
}
