//! Keyword potential for hot-content feeds (videos, posts, trending repos).
//!
//! Unlike the repository rubric in [`crate::score`], every matching keyword
//! adds points, and the total is capped at 100.

use serde::{Deserialize, Serialize};

use crate::config::{HotRules, HotTopicTemplate};
use crate::descriptor::{contains_any, Descriptor};
use crate::generate::{IdeaCandidate, IdeaType};

pub const MAX_HOT_POTENTIAL: u32 = 100;

/// A hot-content item with its potential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotIdea {
    pub source: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub potential: u32,
    pub tags: Vec<String>,
}

impl HotIdea {
    /// Turn into a candidate with the fixed hot-topic economics.
    pub fn into_candidate(self, template: &HotTopicTemplate) -> IdeaCandidate {
        IdeaCandidate {
            idea_type: IdeaType::HotTopic,
            name: self.title,
            description: self.description,
            target_users: template.target_users.clone(),
            cost: template.cost,
            expected_income: template.expected_income,
            time_needed: template.time_needed,
            project: String::new(),
            project_url: self.url,
            source: Some(self.source),
            potential: Some(self.potential),
            tags: self.tags,
            implementation: Vec::new(),
        }
    }
}

fn count_matches(text: &str, keywords: &[String]) -> u32 {
    keywords
        .iter()
        .filter(|k| !k.is_empty() && text.contains(&k.to_lowercase()))
        .count() as u32
}

/// Potential of a single item, 0..=100.
pub fn hot_potential(item: &Descriptor, rules: &HotRules) -> u32 {
    let text = item.match_text();
    let mut score = count_matches(&text, &rules.money_keywords) * rules.money_points
        + count_matches(&text, &rules.ai_keywords) * rules.ai_points
        + count_matches(&text, &rules.tool_keywords) * rules.tool_points;
    score += rules.source_bonus.get(&item.source).copied().unwrap_or(0);
    score.min(MAX_HOT_POTENTIAL)
}

/// Keep only items that mention an AI keyword in title or description.
pub fn filter_ai_related<'a, I>(items: I, rules: &HotRules) -> Vec<Descriptor>
where
    I: IntoIterator<Item = &'a Descriptor>,
{
    items
        .into_iter()
        .filter(|item| contains_any(&item.match_text(), &rules.ai_filter_keywords))
        .cloned()
        .collect()
}

/// Score every item across sources, drop zero-potential ones, and keep the
/// best `rules.max_ideas` (highest potential first, stable).
///
/// `hot_data` pairs each source id with its items in collection order; ties
/// keep that order.
pub fn hot_ideas(hot_data: &[(String, Vec<Descriptor>)], rules: &HotRules) -> Vec<HotIdea> {
    let mut ideas: Vec<HotIdea> = hot_data
        .iter()
        .flat_map(|(source, items)| {
            items.iter().filter_map(move |item| {
                let potential = hot_potential(item, rules);
                (potential > 0).then(|| HotIdea {
                    source: source.clone(),
                    title: item.name.clone(),
                    description: item.description.clone(),
                    url: item.url.clone(),
                    potential,
                    tags: item.tags.iter().cloned().collect(),
                })
            })
        })
        .collect();

    ideas.sort_by(|a, b| b.potential.cmp(&a.potential));
    ideas.truncate(rules.max_ideas);
    ideas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> HotRules {
        HotRules::default()
    }

    #[test]
    fn every_matching_keyword_counts() {
        let d = Descriptor::new("douyin", "AI赚钱 副业", "");
        // 赚钱 + 副业 = 40, ai = 15
        assert_eq!(hot_potential(&d, &rules()), 55);
    }

    #[test]
    fn source_bonus_applies() {
        let d = Descriptor::new("bilibili", "cooking", "");
        assert_eq!(hot_potential(&d, &rules()), 10);
        let d = Descriptor::new("github", "cooking", "");
        assert_eq!(hot_potential(&d, &rules()), 15);
        let d = Descriptor::new("twitter", "cooking", "");
        assert_eq!(hot_potential(&d, &rules()), 0);
    }

    #[test]
    fn potential_is_capped() {
        let d = Descriptor::new(
            "github",
            "赚钱 副业 创业 变现 商业化 盈利",
            "ai gpt agent 工具 平台 app",
        );
        assert_eq!(hot_potential(&d, &rules()), MAX_HOT_POTENTIAL);
    }

    #[test]
    fn ai_filter() {
        let items = vec![
            Descriptor::new("bilibili", "Deep learning from scratch", ""),
            Descriptor::new("bilibili", "Cooking show", "pasta night"),
        ];
        let filtered = filter_ai_related(&items, &rules());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Deep learning from scratch");
    }

    #[test]
    fn hot_ideas_drop_zero_and_sort() {
        let data = vec![
            (
                "twitter".to_string(),
                vec![
                    Descriptor::new("twitter", "weather today", ""),
                    Descriptor::new("twitter", "new gpt agent", ""),
                ],
            ),
            (
                "bilibili".to_string(),
                vec![Descriptor::new("bilibili", "cooking", "")],
            ),
        ];
        let ideas = hot_ideas(&data, &rules());
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].title, "new gpt agent");
        assert_eq!(ideas[0].source, "twitter");
        assert_eq!(ideas[1].title, "cooking");
    }

    #[test]
    fn hot_ideas_truncate() {
        let data = vec![(
            "github".to_string(),
            (0..25)
                .map(|i| Descriptor::new("github", &format!("repo{i}"), ""))
                .collect(),
        )];
        assert_eq!(hot_ideas(&data, &rules()).len(), 10);
    }

    #[test]
    fn equal_potential_keeps_collection_order() {
        let data = vec![
            (
                "weibo".to_string(),
                vec![Descriptor::new("weibo", "副业 ideas", "")],
            ),
            (
                "douyin".to_string(),
                vec![Descriptor::new("douyin", "创业 stories", "")],
            ),
            (
                "bilibili".to_string(),
                vec![Descriptor::new("bilibili", "gpt tips", "")],
            ),
        ];
        let ideas = hot_ideas(&data, &rules());
        let sources: Vec<&str> = ideas.iter().map(|i| i.source.as_str()).collect();
        // weibo and douyin tie at 20; bilibili is 15 + 10
        assert_eq!(sources, vec!["bilibili", "weibo", "douyin"]);
    }

    #[test]
    fn english_words_are_not_default_keywords() {
        let d = Descriptor::new("douyin", "startup tool platform", "make money with automation");
        assert_eq!(hot_potential(&d, &rules()), 0);
        let d = Descriptor::new("douyin", "自动化 工具", "");
        assert_eq!(hot_potential(&d, &rules()), 25);
    }

    #[test]
    fn candidate_uses_hot_topic_economics() {
        let template = HotTopicTemplate::default();
        let idea = HotIdea {
            source: "bilibili".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            url: "https://example.com".to_string(),
            potential: 40,
            tags: vec!["tech".to_string()],
        }
        .into_candidate(&template);
        assert_eq!(idea.idea_type, IdeaType::HotTopic);
        assert_eq!(idea.cost, 100);
        assert_eq!(idea.expected_income, 3000);
        assert_eq!(idea.time_needed, 3.0);
        assert_eq!(idea.potential, Some(40));
    }
}
