//! ideapool-sources: collectors that turn external platforms into
//! [`Descriptor`](ideapool_core::Descriptor)s.
//!
//! Every collector is blocking, uses a fixed per-call timeout and never
//! retries. Failures are returned as [`SourceError`] and folded into a
//! [`FetchOutcome`] by [`collect_all`], so one broken platform never stops
//! a run.

pub mod bilibili;
pub mod command;
mod error;
pub mod github;
mod http;
mod source;
pub mod topics;

pub use bilibili::BilibiliSource;
pub use command::CommandSource;
pub use error::SourceError;
pub use github::{parse_repo_url, GithubClient};
pub use http::urlencoded;
pub use source::{by_source, collect, collect_all, FetchOutcome, RepoLookup, Source};
pub use topics::TopicSearchSource;

use ideapool_core::Config;

/// The hot-content sources listed in `config.sources.enabled`, in that
/// order. Unknown ids are logged and skipped.
pub fn enabled_sources(config: &Config) -> Vec<Box<dyn Source>> {
    let sources = &config.sources;
    let mut enabled: Vec<Box<dyn Source>> = Vec::new();

    for id in &sources.enabled {
        match id.as_str() {
            github::SOURCE_ID => {
                enabled.push(Box::new(GithubClient::new(sources, &config.search)))
            }
            bilibili::SOURCE_ID => enabled.push(Box::new(BilibiliSource::new(sources))),
            "douyin" => enabled.push(Box::new(TopicSearchSource::douyin(&sources.douyin_topics))),
            "xiaohongshu" => enabled.push(Box::new(TopicSearchSource::xiaohongshu(
                &sources.xiaohongshu_topics,
            ))),
            "twitter" => enabled.push(Box::new(CommandSource::twitter(
                &sources.twitter_command,
                sources.command_timeout_secs,
            ))),
            other => tracing::warn!(source = other, "unknown source in config; skipping"),
        }
    }
    enabled
}
