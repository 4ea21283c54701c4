//! Orchestration: collectors → scorer → generator → ranker → pool.
//!
//! [`Pipeline`] borrows its collectors as trait objects so runs can be
//! driven by fakes in tests.

use ideapool_core::fallback::fallback_ideas;
use ideapool_core::hot::{filter_ai_related, hot_ideas};
use ideapool_core::{
    contains_any, generate_all, rank, score, Config, Descriptor, IdeaCandidate, PotentialScore,
    METRIC_MOMENTUM,
};
use ideapool_sources::{
    by_source, collect_all, parse_repo_url, FetchOutcome, RepoLookup, Source, SourceError,
};
use ideapool_storage::{AssetPool, NewIdea, StoreError};
use serde::Serialize;

/// Source id recorded for the repository search step of a daily run.
pub const REPO_SEARCH_SOURCE: &str = "github_search";

/// Max opportunities returned by [`Pipeline::hot_opportunities`].
const MAX_OPPORTUNITIES: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    InvalidUrl(SourceError),

    #[error("could not fetch {owner}/{repo}: {source}")]
    Lookup {
        owner: String,
        repo: String,
        #[source]
        source: SourceError,
    },
}

/// A repository with its rubric score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRepo {
    pub repo: Descriptor,
    pub potential: PotentialScore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectAnalysis {
    pub project: Descriptor,
    pub potential: PotentialScore,
    pub ideas: Vec<IdeaCandidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyOptions {
    pub count: usize,
    pub multi_source: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRun {
    pub ideas: Vec<IdeaCandidate>,
    /// One outcome per hot-content source, then the repository search.
    pub outcomes: Vec<FetchOutcome>,
    pub used_fallback: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Opportunities {
    pub repos: Vec<ScoredRepo>,
    pub error: Option<SourceError>,
}

pub struct Pipeline<'a> {
    config: &'a Config,
    repos: &'a dyn RepoLookup,
    sources: &'a [Box<dyn Source>],
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, repos: &'a dyn RepoLookup, sources: &'a [Box<dyn Source>]) -> Self {
        Pipeline {
            config,
            repos,
            sources,
        }
    }

    fn score_all(&self, repos: Vec<Descriptor>) -> Vec<ScoredRepo> {
        let mut scored: Vec<ScoredRepo> = repos
            .into_iter()
            .map(|repo| {
                let potential = score(&repo, &self.config.scoring);
                ScoredRepo { repo, potential }
            })
            .collect();
        scored.sort_by(|a, b| b.potential.score.cmp(&a.potential.score));
        scored
    }

    /// Hot-topic candidates from every source, best `count` first.
    fn hot_candidates(&self, count: usize, outcomes: &mut Vec<FetchOutcome>) -> Vec<IdeaCandidate> {
        let collected = collect_all(self.sources);
        let mut hot_data = by_source(&collected);
        outcomes.extend(collected);

        if self.config.hot.ai_only {
            for (_, items) in hot_data.iter_mut() {
                *items = filter_ai_related(items.iter(), &self.config.hot);
            }
        }

        let hot = hot_ideas(&hot_data, &self.config.hot);
        tracing::info!(hot = hot.len(), "hot content scored");
        hot.into_iter()
            .take(count)
            .map(|h| h.into_candidate(&self.config.hot_topic))
            .collect()
    }

    /// Template ideas for the best `count` searched repositories.
    fn repo_candidates(&self, count: usize, outcomes: &mut Vec<FetchOutcome>) -> Vec<IdeaCandidate> {
        let outcome = FetchOutcome::from_result(REPO_SEARCH_SOURCE, self.repos.search_repos());
        let repos: Vec<Descriptor> = outcome
            .descriptors
            .iter()
            .take(self.config.search.max_results)
            .cloned()
            .collect();
        outcomes.push(outcome);

        let scored = self.score_all(repos);
        tracing::info!(repos = scored.len(), "repositories scored");

        scored
            .iter()
            .take(count)
            .flat_map(|s| generate_all(&s.repo, Some(&self.config.preferences), self.config))
            .collect()
    }

    /// The daily run: hot topics, then repository ideas, then the built-in
    /// fallback when both came up empty. Ranked and cut to `count`.
    pub fn daily_ideas(&self, options: DailyOptions) -> DailyRun {
        let mut outcomes = Vec::new();
        let mut ideas = Vec::new();

        if options.multi_source {
            ideas.extend(self.hot_candidates(options.count, &mut outcomes));
        }
        ideas.extend(self.repo_candidates(options.count, &mut outcomes));

        let used_fallback = ideas.is_empty();
        if used_fallback {
            tracing::info!("no candidates collected; using built-in ideas");
            ideas = fallback_ideas();
        }

        let mut ranked = rank(ideas);
        ranked.truncate(options.count);
        tracing::info!(ideas = ranked.len(), "daily run finished");

        DailyRun {
            ideas: ranked,
            outcomes,
            used_fallback,
        }
    }

    /// Fetch one repository by URL, score it and generate its ideas.
    pub fn analyze_project(&self, url: &str) -> Result<ProjectAnalysis, AnalyzeError> {
        let (owner, repo) = parse_repo_url(url).map_err(AnalyzeError::InvalidUrl)?;
        let project = self
            .repos
            .repo_details(&owner, &repo)
            .map_err(|source| AnalyzeError::Lookup {
                owner: owner.clone(),
                repo: repo.clone(),
                source,
            })?;

        let potential = score(&project, &self.config.scoring);
        let ideas = generate_all(&project, Some(&self.config.preferences), self.config);
        Ok(ProjectAnalysis {
            project,
            potential,
            ideas,
        })
    }

    /// Trending repositories that mention an opportunity keyword, best
    /// score first, at most 10.
    ///
    /// When momentum is reported it must reach `search.min_weekly_stars`.
    pub fn hot_opportunities(&self) -> Opportunities {
        let (trending, error) = match self.repos.trending_repos() {
            Ok(repos) => (repos, None),
            Err(error) => {
                tracing::warn!(error = %error, "trending repositories unavailable");
                (Vec::new(), Some(error))
            }
        };

        let keywords = &self.config.hot.opportunity_keywords;
        let min_momentum = self.config.search.min_weekly_stars;
        let candidates: Vec<Descriptor> = trending
            .into_iter()
            .filter(|d| contains_any(&d.match_text(), keywords))
            .filter(|d| !d.metrics.contains_key(METRIC_MOMENTUM) || d.momentum() >= min_momentum)
            .collect();

        let mut repos = self.score_all(candidates);
        repos.truncate(MAX_OPPORTUNITIES);
        Opportunities { repos, error }
    }
}

/// Store candidates as pending ideas, returning their ids in order.
pub fn save_ideas(pool: &mut AssetPool, ideas: &[IdeaCandidate]) -> Result<Vec<String>, StoreError> {
    let mut ids = Vec::with_capacity(ideas.len());
    for idea in ideas {
        ids.push(pool.add_idea(NewIdea::from_serialize(idea)?)?);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideapool_core::{IdeaType, METRIC_STARS};

    struct FakeRepos {
        search: Result<Vec<Descriptor>, SourceError>,
        trending: Result<Vec<Descriptor>, SourceError>,
        details: Option<Descriptor>,
    }

    impl FakeRepos {
        fn empty() -> Self {
            FakeRepos {
                search: Ok(Vec::new()),
                trending: Ok(Vec::new()),
                details: None,
            }
        }
    }

    impl RepoLookup for FakeRepos {
        fn search_repos(&self) -> Result<Vec<Descriptor>, SourceError> {
            self.search.clone()
        }

        fn trending_repos(&self) -> Result<Vec<Descriptor>, SourceError> {
            self.trending.clone()
        }

        fn repo_details(&self, owner: &str, repo: &str) -> Result<Descriptor, SourceError> {
            self.details.clone().ok_or(SourceError::Status {
                source_id: format!("{owner}/{repo}"),
                status: 404,
            })
        }
    }

    struct FakeSource(&'static str, Vec<Descriptor>);

    impl Source for FakeSource {
        fn id(&self) -> &str {
            self.0
        }

        fn fetch(&self) -> Result<Vec<Descriptor>, SourceError> {
            Ok(self.1.clone())
        }
    }

    fn repo(name: &str, description: &str, stars: u64) -> Descriptor {
        Descriptor::new("github", name, description)
            .with_metric(METRIC_STARS, stars)
            .with_url(&format!("https://github.com/{name}"))
    }

    fn down() -> SourceError {
        SourceError::Request {
            source_id: "github".to_string(),
            message: "offline".to_string(),
        }
    }

    #[test]
    fn everything_down_uses_fallback() {
        let config = Config::default();
        let repos = FakeRepos {
            search: Err(down()),
            ..FakeRepos::empty()
        };
        let pipeline = Pipeline::new(&config, &repos, &[]);

        let run = pipeline.daily_ideas(DailyOptions {
            count: 3,
            multi_source: true,
        });
        assert!(run.used_fallback);
        assert_eq!(run.ideas.len(), 3);
        // consulting (10000/mo, 1 day) ranks first
        assert_eq!(run.ideas[0].idea_type, IdeaType::Consulting);
        assert!(run.outcomes.iter().any(|o| o.error.is_some()));
    }

    #[test]
    fn repo_ideas_are_ranked_and_cut() {
        let config = Config::default();
        let repos = FakeRepos {
            search: Ok(vec![
                repo("acme/agent-platform", "Enterprise LLM agent platform API", 5000),
                repo("x/small", "a tiny thing", 5),
            ]),
            ..FakeRepos::empty()
        };
        let pipeline = Pipeline::new(&config, &repos, &[]);

        let run = pipeline.daily_ideas(DailyOptions {
            count: 1,
            multi_source: false,
        });
        assert!(!run.used_fallback);
        assert_eq!(run.ideas.len(), 1);
        assert_eq!(run.ideas[0].project, "agent-platform");
        assert_eq!(run.outcomes.len(), 1);
        assert_eq!(run.outcomes[0].source, REPO_SEARCH_SOURCE);
    }

    #[test]
    fn hot_topics_become_candidates() {
        let config = Config::default();
        let repos = FakeRepos::empty();
        let sources: Vec<Box<dyn Source>> = vec![Box::new(FakeSource(
            "bilibili",
            vec![
                Descriptor::new("bilibili", "AI side hustle tools", ""),
                Descriptor::new("bilibili", "cooking", ""),
            ],
        ))];
        let pipeline = Pipeline::new(&config, &repos, &sources);

        let run = pipeline.daily_ideas(DailyOptions {
            count: 5,
            multi_source: true,
        });
        assert!(!run.used_fallback);
        assert_eq!(run.ideas.len(), 2);
        assert!(run.ideas.iter().all(|i| i.idea_type == IdeaType::HotTopic));
        assert!(run.ideas.iter().all(|i| i.expected_income == 3000));
    }

    #[test]
    fn multi_source_off_skips_sources() {
        let config = Config::default();
        let repos = FakeRepos::empty();
        let sources: Vec<Box<dyn Source>> = vec![Box::new(FakeSource(
            "bilibili",
            vec![Descriptor::new("bilibili", "AI tools", "")],
        ))];
        let pipeline = Pipeline::new(&config, &repos, &sources);

        let run = pipeline.daily_ideas(DailyOptions {
            count: 3,
            multi_source: false,
        });
        assert!(run.used_fallback);
    }

    #[test]
    fn analyze_rejects_bad_url() {
        let config = Config::default();
        let repos = FakeRepos::empty();
        let pipeline = Pipeline::new(&config, &repos, &[]);
        assert!(matches!(
            pipeline.analyze_project("https://example.com/a/b"),
            Err(AnalyzeError::InvalidUrl(_))
        ));
        assert!(matches!(
            pipeline.analyze_project("https://github.com/a/b"),
            Err(AnalyzeError::Lookup { .. })
        ));
    }

    #[test]
    fn analyze_scores_and_generates() {
        let config = Config::default();
        let repos = FakeRepos {
            details: Some(
                repo("langchain-ai/langchain", "LLM framework", 90_000).with_language("Python"),
            ),
            ..FakeRepos::empty()
        };
        let pipeline = Pipeline::new(&config, &repos, &[]);

        let analysis = pipeline
            .analyze_project("https://github.com/langchain-ai/langchain")
            .unwrap();
        assert_eq!(analysis.project.name, "langchain-ai/langchain");
        // 30 popularity + 5 momentum + 20 domain + 15 monetization
        assert_eq!(analysis.potential.score, 70);
        assert!(!analysis.ideas.is_empty());
    }

    #[test]
    fn opportunities_filter_and_sort() {
        let config = Config::default();
        let repos = FakeRepos {
            trending: Ok(vec![
                repo("a/css-grid", "layout helpers", 5000).with_metric(METRIC_MOMENTUM, 500),
                repo("b/gpt-helper", "small gpt wrapper", 60).with_metric(METRIC_MOMENTUM, 30),
                repo("c/agent-os", "agent platform", 4000).with_metric(METRIC_MOMENTUM, 200),
                repo("d/slow-llm", "llm thing", 4000).with_metric(METRIC_MOMENTUM, 3),
            ]),
            ..FakeRepos::empty()
        };
        let pipeline = Pipeline::new(&config, &repos, &[]);

        let found = pipeline.hot_opportunities();
        assert!(found.error.is_none());
        let names: Vec<&str> = found.repos.iter().map(|s| s.repo.name.as_str()).collect();
        assert_eq!(names, vec!["c/agent-os", "b/gpt-helper"]);
    }

    #[test]
    fn opportunities_report_failure() {
        let config = Config::default();
        let repos = FakeRepos {
            trending: Err(down()),
            ..FakeRepos::empty()
        };
        let found = Pipeline::new(&config, &repos, &[]).hot_opportunities();
        assert!(found.repos.is_empty());
        assert!(found.error.is_some());
    }

    #[test]
    fn saved_ideas_keep_candidate_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut pool = AssetPool::open(dir.path());
        let ids = save_ideas(&mut pool, &fallback_ideas()).unwrap();
        assert_eq!(ids.len(), 3);

        let stored = pool.get_idea(&ids[0]).unwrap();
        assert_eq!(stored.idea_type, "deployment_service");
        assert_eq!(stored.extra["cost"], serde_json::json!(500));
        assert!(stored.extra.contains_key("implementation"));
    }
}
