//! End-to-end tests for the score → generate → rank pipeline.

use ideapool_core::{
    composite_score, generate_all, rank, score, suitable_types, Config, Descriptor, IdeaType,
    Tier, METRIC_MOMENTUM, METRIC_STARS,
};

fn repo(name: &str, description: &str, stars: u64, momentum: u64) -> Descriptor {
    Descriptor::new("github", name, description)
        .with_metric(METRIC_STARS, stars)
        .with_metric(METRIC_MOMENTUM, momentum)
        .with_url(&format!("https://github.com/{name}"))
}

// ──────────────────────────────────────────────
// Scoring
// ──────────────────────────────────────────────

#[test]
fn popularity_band_boundary_at_1000() {
    let config = Config::default();
    let above = score(&repo("a/b", "", 1001, 0), &config.scoring);
    let at = score(&repo("a/b", "", 1000, 0), &config.scoring);
    assert_eq!(above.bands.popularity, 30);
    assert_eq!(at.bands.popularity, 25);
}

#[test]
fn every_large_star_count_gets_full_popularity() {
    let config = Config::default();
    for stars in [1001, 5_000, 250_000, u64::MAX] {
        assert_eq!(
            score(&repo("a/b", "", stars, 0), &config.scoring).bands.popularity,
            30
        );
    }
}

#[test]
fn score_and_tier_agree() {
    let config = Config::default();
    let cases = [
        repo("x/agent-kit", "Enterprise AI agent platform with an API", 5000, 300),
        repo("x/notes", "Personal notes app", 60, 12),
        repo("x/quiet", "", 0, 0),
    ];
    for d in &cases {
        let s = score(d, &config.scoring);
        assert_eq!(s.score, s.bands.total());
        let expected = if s.score >= 70 {
            Tier::High
        } else if s.score >= 50 {
            Tier::Medium
        } else {
            Tier::Low
        };
        assert_eq!(s.tier, expected);
    }
}

#[test]
fn custom_keyword_sets_change_scores() {
    let mut config = Config::default();
    config.scoring.ai_keywords = vec!["quantum".to_string()];
    let d = repo("x/qk", "A quantum toolkit", 0, 0);
    assert_eq!(score(&d, &config.scoring).bands.domain, 15);
    let d = repo("x/llm", "An LLM toolkit", 0, 0);
    assert_eq!(score(&d, &config.scoring).bands.domain, 0);
}

// ──────────────────────────────────────────────
// Generation + ranking
// ──────────────────────────────────────────────

#[test]
fn low_signal_repo_gets_default_pair() {
    let config = Config::default();
    let d = repo("x/quiet", "", 10, 0);
    assert_eq!(
        suitable_types(&d, &config.suitability),
        vec![IdeaType::DeploymentService, IdeaType::Training]
    );
}

#[test]
fn generated_ideas_rank_consistently() {
    let config = Config::default();
    let d = repo(
        "langchain-ai/langchain",
        "Build context-aware reasoning applications with an LLM framework and API",
        90_000,
        400,
    );
    let ideas = generate_all(&d, Some(&config.preferences), &config);
    assert_eq!(ideas.len(), 4);
    assert!(ideas.iter().all(|i| i.project == "langchain"));

    let ranked = rank(ideas);
    for pair in ranked.windows(2) {
        assert!(composite_score(&pair[0]) >= composite_score(&pair[1]));
    }
}

#[test]
fn preferences_budget_extremes_respect_templates() {
    let mut config = Config::default();
    let d = repo("x/y", "enterprise framework guide", 500, 0);
    for budget in [0, 1_000_000] {
        config.preferences.budget = budget;
        for idea in generate_all(&d, Some(&config.preferences), &config) {
            let t = config.template(idea.idea_type).unwrap();
            assert!((t.cost_range[0]..=t.cost_range[1]).contains(&idea.cost));
            assert!(idea.time_needed >= t.time_range[0] && idea.time_needed <= t.time_range[1]);
        }
    }
}
