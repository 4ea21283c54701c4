//! The normalized shape every source collector produces.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Popularity metric key (repository stars).
pub const METRIC_STARS: &str = "stars";
/// Momentum metric key (stars gained over the trending window).
pub const METRIC_MOMENTUM: &str = "trending_stars";
/// Fork count, informational only.
pub const METRIC_FORKS: &str = "forks";

/// An external signal (repository, video, post) before scoring.
///
/// Descriptors have no identity beyond `source` + `name` and are never
/// persisted directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(default)]
    pub source: String,
    /// Repository `owner/repo` or content title.
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub metrics: BTreeMap<String, u64>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Source-specific extras such as `created_at` / `pushed_at`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Descriptor {
    pub fn new(source: &str, name: &str, description: &str) -> Self {
        Descriptor {
            source: source.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    pub fn with_metric(mut self, key: &str, value: u64) -> Self {
        self.metrics.insert(key.to_string(), value);
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Metric value, 0 when absent.
    pub fn metric(&self, key: &str) -> u64 {
        self.metrics.get(key).copied().unwrap_or(0)
    }

    pub fn stars(&self) -> u64 {
        self.metric(METRIC_STARS)
    }

    pub fn momentum(&self) -> u64 {
        self.metric(METRIC_MOMENTUM)
    }

    /// Lowercased `name + " " + description`, the text keyword rules match against.
    pub fn match_text(&self) -> String {
        format!("{} {}", self.name, self.description).to_lowercase()
    }

    /// Last `/` segment of the name: `openai/chatgpt` → `chatgpt`.
    pub fn project_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Lowercased language, empty when unknown.
    pub fn language_lower(&self) -> String {
        self.language
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default()
    }
}

/// True when `text` (already lowercased) contains any of `keywords`.
pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| !k.is_empty() && text.contains(&k.to_lowercase()))
}
