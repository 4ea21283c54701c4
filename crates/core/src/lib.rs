//! ideapool-core: scoring, idea generation and ranking.
//!
//! Turns normalized external signals ([`Descriptor`]s) into ranked
//! monetization idea candidates. Everything here is pure and synchronous;
//! fetching descriptors lives in `ideapool-sources` and persistence in
//! `ideapool-storage`.
//!
//! # Public API
//!
//! - [`score()`] -- five-band potential rubric producing a [`PotentialScore`]
//! - [`suitable_types()`] / [`generate()`] / [`generate_all()`] -- idea templates
//! - [`rank()`] -- stable descending sort by composite score
//! - [`hot::hot_ideas()`] -- keyword potential for hot-content feeds
//! - [`Config`] -- thresholds, keyword sets and the template catalog

pub mod config;
pub mod descriptor;
pub mod fallback;
pub mod generate;
pub mod hot;
pub mod rank;
pub mod score;

// ── Convenience re-exports ───────────────────────────────────────────

pub use config::{
    Config, ConfigError, HotRules, HotTopicTemplate, IdeaTemplate, Preferences, ScoringRules,
    SearchSettings, SourcesConfig, SuitabilityRules,
};
pub use descriptor::{contains_any, Descriptor, METRIC_FORKS, METRIC_MOMENTUM, METRIC_STARS};
pub use generate::{generate, generate_all, suitable_types, IdeaCandidate, IdeaType};
pub use rank::{composite_score, rank};
pub use score::{score, tier_for, BandBreakdown, PotentialScore, Tier};
