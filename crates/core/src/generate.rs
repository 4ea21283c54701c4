//! Idea generation from the template catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{Config, IdeaTemplate, Preferences, SuitabilityRules};
use crate::descriptor::{contains_any, Descriptor};

/// Monetization idea kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaType {
    DeploymentService,
    Consulting,
    Training,
    Customization,
    /// Derived from hot content rather than a template.
    HotTopic,
}

impl IdeaType {
    /// Types backed by a template in the catalog.
    pub const CATALOG: [IdeaType; 4] = [
        IdeaType::DeploymentService,
        IdeaType::Consulting,
        IdeaType::Training,
        IdeaType::Customization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaType::DeploymentService => "deployment_service",
            IdeaType::Consulting => "consulting",
            IdeaType::Training => "training",
            IdeaType::Customization => "customization",
            IdeaType::HotTopic => "hot_topic",
        }
    }
}

impl fmt::Display for IdeaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdeaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deployment_service" => Ok(IdeaType::DeploymentService),
            "consulting" => Ok(IdeaType::Consulting),
            "training" => Ok(IdeaType::Training),
            "customization" => Ok(IdeaType::Customization),
            "hot_topic" => Ok(IdeaType::HotTopic),
            other => Err(format!("unknown idea type '{}'", other)),
        }
    }
}

/// An unsaved idea produced by the generator (or a hot-content feed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaCandidate {
    #[serde(rename = "type")]
    pub idea_type: IdeaType,
    pub name: String,
    pub description: String,
    pub target_users: Vec<String>,
    pub cost: u64,
    /// Per month.
    pub expected_income: u64,
    /// Days.
    pub time_needed: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implementation: Vec<String>,
}

/// Idea types that fit a descriptor, in catalog order.
///
/// Never empty: when no rule fires the result is
/// `[DeploymentService, Training]`.
pub fn suitable_types(descriptor: &Descriptor, rules: &SuitabilityRules) -> Vec<IdeaType> {
    let text = descriptor.match_text();
    let stars = descriptor.stars();
    let mut suitable = Vec::new();

    if stars > rules.deployment_min_stars {
        suitable.push(IdeaType::DeploymentService);
    }
    if contains_any(&text, &rules.consulting_keywords) {
        suitable.push(IdeaType::Consulting);
    }
    if contains_any(&text, &rules.training_keywords) || stars > rules.training_min_stars {
        suitable.push(IdeaType::Training);
    }
    if contains_any(&text, &rules.customization_keywords) {
        suitable.push(IdeaType::Customization);
    }

    if suitable.is_empty() {
        suitable = vec![IdeaType::DeploymentService, IdeaType::Training];
    }
    suitable
}

/// Instantiate one template for a descriptor.
///
/// Returns `None` when the catalog has no template for `idea_type`.
pub fn generate(
    descriptor: &Descriptor,
    idea_type: IdeaType,
    preferences: Option<&Preferences>,
    config: &Config,
) -> Option<IdeaCandidate> {
    let template = config.template(idea_type)?;
    let project_name = descriptor.project_name();
    let (cost, expected_income, time_needed) =
        adjust_for_user(template, preferences, &config.suitability.monetizable_skills);

    Some(IdeaCandidate {
        idea_type,
        name: template.render_name(project_name),
        description: template.render_description(project_name),
        target_users: template.target_users.clone(),
        cost,
        expected_income,
        time_needed,
        project: project_name.to_string(),
        project_url: descriptor.url.clone(),
        source: (!descriptor.source.is_empty()).then(|| descriptor.source.clone()),
        potential: None,
        tags: descriptor.tags.iter().cloned().collect(),
        implementation: Vec::new(),
    })
}

/// Every suitable idea for a descriptor.
pub fn generate_all(
    descriptor: &Descriptor,
    preferences: Option<&Preferences>,
    config: &Config,
) -> Vec<IdeaCandidate> {
    suitable_types(descriptor, &config.suitability)
        .into_iter()
        .filter_map(|t| generate(descriptor, t, preferences, config))
        .collect()
}

/// `(cost, expected_income, time_needed)` for a template under preferences.
///
/// Without preferences every field takes the template minimum.
pub fn adjust_for_user(
    template: &IdeaTemplate,
    preferences: Option<&Preferences>,
    monetizable_skills: &[String],
) -> (u64, u64, f64) {
    let [cost_min, cost_max] = template.cost_range;
    let [income_min, income_max] = template.income_range;
    let [time_min, time_max] = template.time_range;

    let Some(prefs) = preferences else {
        return (cost_min, income_min, time_min);
    };

    let cost = (prefs.budget / 2).max(cost_min).min(cost_max);
    let time_needed = prefs.time_available.max(time_min).min(time_max);

    let has_monetizable_skill = prefs.skills.iter().any(|skill| {
        monetizable_skills
            .iter()
            .any(|m| m.eq_ignore_ascii_case(skill.trim()))
    });
    let expected_income = if has_monetizable_skill {
        income_min + (income_max - income_min) / 2
    } else {
        income_min
    };

    (cost, expected_income, time_needed)
}
