//! Configuration: thresholds, keyword sets, the idea-template catalog and
//! user preferences.
//!
//! Loaded from TOML. Every section is optional and falls back to the
//! built-in catalog, so an empty file is a valid config.
//!
//! # Example
//!
//! ```toml
//! [search]
//! min_stars = 100
//! categories = ["AI agent framework", "LLM tools"]
//!
//! [preferences]
//! budget = 600
//! time_available = 3
//! skills = ["Rust", "Web"]
//!
//! [templates.training]
//! name = "{project_name} workshop"
//! description = "Hands-on workshop for {project_name}"
//! target_users = ["developers"]
//! cost_range = [0, 150]
//! income_range = [800, 12000]
//! time_range = [2, 5]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::generate::IdeaType;

/// Placeholder substituted with the project's short name in templates.
pub const PROJECT_NAME_PLACEHOLDER: &str = "{project_name}";

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("could not render config: {0}")]
    Render(String),
}

// ──────────────────────────────────────────────
// Sections
// ──────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchSettings,
    pub scoring: ScoringRules,
    pub suitability: SuitabilityRules,
    pub hot: HotRules,
    pub hot_topic: HotTopicTemplate,
    pub preferences: Preferences,
    pub sources: SourcesConfig,
    /// Idea templates keyed by idea type (`deployment_service`, `consulting`, ...).
    pub templates: BTreeMap<String, IdeaTemplate>,
}

/// `[search]`: repository search thresholds and filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Minimum popularity for searched repositories.
    pub min_stars: u64,
    /// Minimum momentum for hot opportunities, applied when a source reports it.
    pub min_weekly_stars: u64,
    /// Only repositories created within this many days are searched.
    pub days: i64,
    pub per_page: u32,
    pub max_results: usize,
    /// One search query per category.
    pub categories: Vec<String>,
    /// Repositories whose name or description contains any of these are dropped.
    pub exclude_keywords: Vec<String>,
}

/// `[scoring]`: keyword sets used by the potential rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub ai_keywords: Vec<String>,
    pub hot_languages: Vec<String>,
    pub monetization_keywords: Vec<String>,
    pub library_keywords: Vec<String>,
    /// Business-model tiers, checked in order; first match wins.
    pub business_tiers: Vec<KeywordTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTier {
    pub points: u32,
    pub keywords: Vec<String>,
}

/// `[suitability]`: which idea types fit a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuitabilityRules {
    pub deployment_min_stars: u64,
    pub training_min_stars: u64,
    pub consulting_keywords: Vec<String>,
    pub training_keywords: Vec<String>,
    pub customization_keywords: Vec<String>,
    /// Skills that lift expected income to the template midpoint.
    pub monetizable_skills: Vec<String>,
}

/// One entry of the idea-template catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaTemplate {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub target_users: Vec<String>,
    pub cost_range: [u64; 2],
    pub income_range: [u64; 2],
    /// Days.
    pub time_range: [f64; 2],
}

impl IdeaTemplate {
    pub fn render_name(&self, project_name: &str) -> String {
        self.name.replace(PROJECT_NAME_PLACEHOLDER, project_name)
    }

    pub fn render_description(&self, project_name: &str) -> String {
        self.description
            .replace(PROJECT_NAME_PLACEHOLDER, project_name)
    }
}

/// `[hot]`: keyword potential for hot-content feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotRules {
    pub money_keywords: Vec<String>,
    pub ai_keywords: Vec<String>,
    pub tool_keywords: Vec<String>,
    pub money_points: u32,
    pub ai_points: u32,
    pub tool_points: u32,
    /// Flat bonus per source id.
    pub source_bonus: BTreeMap<String, u32>,
    /// Keywords for `filter_ai_related`.
    pub ai_filter_keywords: Vec<String>,
    /// Only AI-related hot content feeds the daily run.
    pub ai_only: bool,
    /// Trending repositories must mention one of these to be an opportunity.
    pub opportunity_keywords: Vec<String>,
    pub max_ideas: usize,
}

/// `[hot_topic]`: fixed economics for ideas derived from hot content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotTopicTemplate {
    pub target_users: Vec<String>,
    pub cost: u64,
    pub expected_income: u64,
    pub time_needed: f64,
}

/// `[preferences]`: the user's budget, time and skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub budget: u64,
    /// Days per week.
    pub time_available: f64,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
}

/// `[sources]`: collector endpoints and limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Source ids to collect from during the daily run.
    pub enabled: Vec<String>,
    pub github_api: String,
    pub trending_api: String,
    pub trending_since: String,
    pub bilibili_api: String,
    /// Bilibili ranking zone (36 = tech).
    pub bilibili_rid: u32,
    pub douyin_topics: Vec<String>,
    pub xiaohongshu_topics: Vec<String>,
    /// argv of the command backing the twitter source.
    pub twitter_command: Vec<String>,
    pub http_timeout_secs: u64,
    pub command_timeout_secs: u64,
    pub user_agent: String,
}

// ──────────────────────────────────────────────
// Defaults
// ──────────────────────────────────────────────

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search: SearchSettings::default(),
            scoring: ScoringRules::default(),
            suitability: SuitabilityRules::default(),
            hot: HotRules::default(),
            hot_topic: HotTopicTemplate::default(),
            preferences: Preferences::default(),
            sources: SourcesConfig::default(),
            templates: default_templates(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            min_stars: 50,
            min_weekly_stars: 20,
            days: 7,
            per_page: 20,
            max_results: 20,
            categories: strings(&[
                "AI LLM Agent",
                "AI automation",
                "chatbot GPT",
                "AI agent framework",
                "LLM tools",
            ]),
            exclude_keywords: strings(&["awesome-", "tutorial", "course", "book"]),
        }
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        ScoringRules {
            ai_keywords: strings(&[
                "ai", "llm", "gpt", "chatgpt", "claude", "agent", "openai", "anthropic",
            ]),
            hot_languages: strings(&["python", "typescript", "rust", "go"]),
            monetization_keywords: strings(&[
                "api",
                "sdk",
                "cli",
                "framework",
                "platform",
                "tool",
                "automation",
                "chatbot",
                "assistant",
                "dashboard",
            ]),
            library_keywords: strings(&["library", "package"]),
            business_tiers: vec![
                KeywordTier {
                    points: 10,
                    keywords: strings(&["saas", "enterprise"]),
                },
                KeywordTier {
                    points: 7,
                    keywords: strings(&["api", "service"]),
                },
                KeywordTier {
                    points: 5,
                    keywords: strings(&["tool", "app"]),
                },
            ],
        }
    }
}

impl Default for SuitabilityRules {
    fn default() -> Self {
        SuitabilityRules {
            deployment_min_stars: 50,
            training_min_stars: 100,
            consulting_keywords: strings(&["framework", "platform", "architecture"]),
            training_keywords: strings(&["tutorial", "guide", "learn"]),
            customization_keywords: strings(&["enterprise", "business", "saas", "api"]),
            monetizable_skills: strings(&["python", "ai", "web", "javascript"]),
        }
    }
}

impl Default for HotRules {
    fn default() -> Self {
        HotRules {
            money_keywords: strings(&["赚钱", "副业", "创业", "变现", "商业化", "盈利"]),
            ai_keywords: strings(&["ai", "人工智能", "gpt", "agent", "自动化"]),
            tool_keywords: strings(&["工具", "平台", "系统", "软件", "app"]),
            money_points: 20,
            ai_points: 15,
            tool_points: 10,
            source_bonus: [("github".to_string(), 15), ("bilibili".to_string(), 10)]
                .into_iter()
                .collect(),
            ai_filter_keywords: strings(&[
                "ai",
                "artificial intelligence",
                "人工智能",
                "llm",
                "gpt",
                "chatgpt",
                "claude",
                "agent",
                "智能体",
                "自动化",
                "machine learning",
                "deep learning",
                "nlp",
                "computer vision",
            ]),
            ai_only: false,
            opportunity_keywords: strings(&[
                "ai",
                "llm",
                "gpt",
                "agent",
                "chatbot",
                "ml",
                "machine learning",
            ]),
            max_ideas: 10,
        }
    }
}

impl Default for HotTopicTemplate {
    fn default() -> Self {
        HotTopicTemplate {
            target_users: strings(&["founders", "content creators", "developers"]),
            cost: 100,
            expected_income: 3000,
            time_needed: 3.0,
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            budget: 1000,
            time_available: 2.0,
            skills: strings(&["Python", "AI", "Web"]),
            interests: strings(&["AI tools", "automation", "SaaS"]),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            enabled: strings(&["github", "douyin", "bilibili", "xiaohongshu", "twitter"]),
            github_api: "https://api.github.com".to_string(),
            trending_api: "https://api.gitterapp.com/repositories".to_string(),
            trending_since: "weekly".to_string(),
            bilibili_api: "https://api.bilibili.com/x/web-interface/ranking/v2".to_string(),
            bilibili_rid: 36,
            douyin_topics: strings(&["AI赚钱", "副业", "创业", "AI工具"]),
            xiaohongshu_topics: strings(&["AI赚钱", "副业", "创业", "自媒体"]),
            twitter_command: strings(&["bird", "search", "AI trending", "--limit", "10"]),
            http_timeout_secs: 10,
            command_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) ideapool/0.1".to_string(),
        }
    }
}

fn default_templates() -> BTreeMap<String, IdeaTemplate> {
    let mut templates = BTreeMap::new();
    templates.insert(
        IdeaType::DeploymentService.as_str().to_string(),
        IdeaTemplate {
            name: "{project_name} deployment service".to_string(),
            description: "Deploy {project_name} for customers and provide technical support"
                .to_string(),
            target_users: strings(&["non-technical users", "enterprise users", "founders"]),
            cost_range: [100, 500],
            income_range: [2000, 10000],
            time_range: [1.0, 3.0],
        },
    );
    templates.insert(
        IdeaType::Consulting.as_str().to_string(),
        IdeaTemplate {
            name: "{project_name} technical consulting".to_string(),
            description: "Consulting and solution design around {project_name}".to_string(),
            target_users: strings(&["enterprises", "founders", "product managers"]),
            cost_range: [0, 100],
            income_range: [5000, 20000],
            time_range: [0.5, 2.0],
        },
    );
    templates.insert(
        IdeaType::Training.as_str().to_string(),
        IdeaTemplate {
            name: "{project_name} training course".to_string(),
            description: "Tutorials and training courses for {project_name}".to_string(),
            target_users: strings(&["learners", "developers", "corporate staff"]),
            cost_range: [0, 200],
            income_range: [1000, 50000],
            time_range: [3.0, 7.0],
        },
    );
    templates.insert(
        IdeaType::Customization.as_str().to_string(),
        IdeaTemplate {
            name: "{project_name} custom development".to_string(),
            description: "Custom feature development built on {project_name}".to_string(),
            target_users: strings(&["enterprises", "founders", "product teams"]),
            cost_range: [500, 2000],
            income_range: [5000, 50000],
            time_range: [7.0, 30.0],
        },
    );
    templates
}

// ──────────────────────────────────────────────
// Loading and validation
// ──────────────────────────────────────────────

impl Config {
    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.fill_missing_templates();
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })?;
        config.fill_missing_templates();
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Render(e.to_string()))
    }

    /// A `[templates.*]` table in the file replaces the whole catalog;
    /// put back the built-in entries it left out.
    fn fill_missing_templates(&mut self) {
        for (key, template) in default_templates() {
            self.templates.entry(key).or_insert(template);
        }
    }

    pub fn template(&self, idea_type: IdeaType) -> Option<&IdeaTemplate> {
        self.templates.get(idea_type.as_str())
    }

    /// Check every template range and catalog entry.
    ///
    /// Returns `Err` listing all problems found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for idea_type in IdeaType::CATALOG {
            if !self.templates.contains_key(idea_type.as_str()) {
                errors.push(format!(
                    "missing template for '{}', add a [templates.{}] section",
                    idea_type.as_str(),
                    idea_type.as_str()
                ));
            }
        }

        for (key, template) in &self.templates {
            if template.cost_range[0] > template.cost_range[1] {
                errors.push(format!("templates.{key}.cost_range: min exceeds max"));
            }
            if template.income_range[0] > template.income_range[1] {
                errors.push(format!("templates.{key}.income_range: min exceeds max"));
            }
            let [tmin, tmax] = template.time_range;
            if !tmin.is_finite() || !tmax.is_finite() || tmin < 0.0 || tmin > tmax {
                errors.push(format!(
                    "templates.{key}.time_range: expected 0 <= min <= max"
                ));
            }
        }

        if !self.preferences.time_available.is_finite() || self.preferences.time_available < 0.0 {
            errors.push("preferences.time_available: must be a non-negative number".to_string());
        }
        if !self.hot_topic.time_needed.is_finite() || self.hot_topic.time_needed < 0.0 {
            errors.push("hot_topic.time_needed: must be a non-negative number".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [preferences]
            budget = 300
            "#,
        )
        .unwrap();
        assert_eq!(config.preferences.budget, 300);
        assert_eq!(config.preferences.time_available, 2.0);
        assert_eq!(config.search.min_stars, 50);
    }

    #[test]
    fn single_template_override_keeps_rest_of_catalog() {
        let config = Config::from_toml_str(
            r#"
            [templates.training]
            name = "{project_name} workshop"
            description = "Workshop for {project_name}"
            cost_range = [0, 150]
            income_range = [800, 12000]
            time_range = [2, 5]
            "#,
        )
        .unwrap();
        let training = config.template(IdeaType::Training).unwrap();
        assert_eq!(training.time_range, [2.0, 5.0]);
        assert!(training.target_users.is_empty());
        assert_eq!(config.templates.len(), 4);
        assert_eq!(
            config.template(IdeaType::Customization),
            Config::default().template(IdeaType::Customization)
        );
    }

    #[test]
    fn missing_catalog_entry_is_reported() {
        let mut config = Config::default();
        config.templates.remove("training");
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("'training'")));
    }

    #[test]
    fn inverted_range_is_reported() {
        let mut config = Config::default();
        if let Some(t) = config.templates.get_mut("consulting") {
            t.cost_range = [200, 100];
        }
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("templates.consulting.cost_range"));
    }

    #[test]
    fn toml_round_trip() {
        let config = Config::default();
        let rendered = config.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn render_substitutes_project_name() {
        let config = Config::default();
        let t = config.template(IdeaType::Consulting).unwrap();
        assert_eq!(t.render_name("langchain"), "langchain technical consulting");
        assert!(t.render_description("langchain").contains("langchain"));
    }
}
