//! Offline collection: sources that need no network.

use ideapool_core::hot::hot_ideas;
use ideapool_core::Config;
use ideapool_sources::{by_source, collect_all, enabled_sources, SourceError};

fn offline_config() -> Config {
    let mut config = Config::default();
    config.sources.enabled = vec![
        "douyin".to_string(),
        "xiaohongshu".to_string(),
        "twitter".to_string(),
    ];
    config.sources.twitter_command = vec!["ideapool-test-missing-bird".to_string()];
    config
}

#[test]
fn broken_command_does_not_stop_the_run() {
    let config = offline_config();
    let outcomes = collect_all(&enabled_sources(&config));

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].descriptors.len(), 4);
    assert_eq!(outcomes[1].descriptors.len(), 4);
    assert!(matches!(
        outcomes[2].error,
        Some(SourceError::Command { .. })
    ));
    assert!(outcomes[2].descriptors.is_empty());
}

#[test]
fn topic_links_feed_hot_ideas() {
    let config = offline_config();
    let outcomes = collect_all(&enabled_sources(&config));
    let ideas = hot_ideas(&by_source(&outcomes), &config.hot);

    assert!(!ideas.is_empty());
    assert!(ideas.len() <= config.hot.max_ideas);
    for pair in ideas.windows(2) {
        assert!(pair[0].potential >= pair[1].potential);
    }
    assert!(ideas.iter().all(|i| i.source != "twitter"));
}
