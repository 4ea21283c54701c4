//! Collector abstractions.
//!
//! Two levels:
//! - [`Source`] fetches one platform's hot list as descriptors
//! - [`RepoLookup`] answers repository queries (search, trending, details)
//!
//! [`collect_all`] runs a set of sources in isolation: a failing source
//! contributes an empty list and its [`SourceError`], the rest continue.


use ideapool_core::Descriptor;

use crate::error::SourceError;

// ──────────────────────────────────────────────
// Traits
// ──────────────────────────────────────────────

/// A hot-content feed.
pub trait Source {
    /// Stable id such as `"github"` or `"bilibili"`.
    fn id(&self) -> &str;

    fn fetch(&self) -> Result<Vec<Descriptor>, SourceError>;
}

/// Repository queries against a code host.
pub trait RepoLookup {
    /// Recently created, popular repositories across the configured
    /// categories, best first.
    fn search_repos(&self) -> Result<Vec<Descriptor>, SourceError>;

    /// Trending repositories with momentum where the host reports it.
    fn trending_repos(&self) -> Result<Vec<Descriptor>, SourceError>;

    fn repo_details(&self, owner: &str, repo: &str) -> Result<Descriptor, SourceError>;
}

// ──────────────────────────────────────────────
// FetchOutcome
// ──────────────────────────────────────────────

/// What one source yielded. `error` is set exactly when the fetch failed,
/// in which case `descriptors` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub source: String,
    pub descriptors: Vec<Descriptor>,
    pub error: Option<SourceError>,
}

impl FetchOutcome {
    pub fn from_result(source: &str, result: Result<Vec<Descriptor>, SourceError>) -> Self {
        match result {
            Ok(descriptors) => FetchOutcome {
                source: source.to_string(),
                descriptors,
                error: None,
            },
            Err(error) => {
                tracing::warn!(source, error = %error, "source failed; continuing without it");
                FetchOutcome {
                    source: source.to_string(),
                    descriptors: Vec::new(),
                    error: Some(error),
                }
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Fetch one source, folding failure into the outcome.
pub fn collect(source: &dyn Source) -> FetchOutcome {
    let outcome = FetchOutcome::from_result(source.id(), source.fetch());
    tracing::debug!(
        source = source.id(),
        count = outcome.descriptors.len(),
        "source collected"
    );
    outcome
}

/// Fetch every source in order.
pub fn collect_all(sources: &[Box<dyn Source>]) -> Vec<FetchOutcome> {
    sources.iter().map(|s| collect(s.as_ref())).collect()
}

/// Pair each source id with its descriptors, in collection order.
pub fn by_source(outcomes: &[FetchOutcome]) -> Vec<(String, Vec<Descriptor>)> {
    outcomes
        .iter()
        .map(|o| (o.source.clone(), o.descriptors.clone()))
        .collect()
}
