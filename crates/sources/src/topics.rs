//! Topic search links for platforms that need a login to read.
//!
//! Nothing is fetched: each configured topic becomes a descriptor pointing
//! at the platform's search page for it.

use ideapool_core::Descriptor;

use crate::error::SourceError;
use crate::http::urlencoded;
use crate::source::Source;

const MAX_TOPICS: usize = 5;

pub struct TopicSearchSource {
    id: &'static str,
    platform: &'static str,
    kind: &'static str,
    search_url: &'static str,
    topics: Vec<String>,
}

impl TopicSearchSource {
    pub fn douyin(topics: &[String]) -> Self {
        TopicSearchSource {
            id: "douyin",
            platform: "抖音",
            kind: "videos",
            search_url: "https://www.douyin.com/search/",
            topics: topics.to_vec(),
        }
    }

    pub fn xiaohongshu(topics: &[String]) -> Self {
        TopicSearchSource {
            id: "xiaohongshu",
            platform: "小红书",
            kind: "notes",
            search_url: "https://www.xiaohongshu.com/search_result?keyword=",
            topics: topics.to_vec(),
        }
    }

    fn descriptor(&self, topic: &str) -> Descriptor {
        Descriptor::new(
            self.id,
            &format!("{} trending {}", topic, self.kind),
            &format!("Popular {} content on {}", topic, self.id),
        )
        .with_url(&format!("{}{}", self.search_url, urlencoded(topic)))
        .with_tags([topic, self.platform])
    }
}

impl Source for TopicSearchSource {
    fn id(&self) -> &str {
        self.id
    }

    fn fetch(&self) -> Result<Vec<Descriptor>, SourceError> {
        Ok(self
            .topics
            .iter()
            .filter(|t| !t.trim().is_empty())
            .take(MAX_TOPICS)
            .map(|t| self.descriptor(t))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn douyin_links_are_encoded() {
        let source = TopicSearchSource::douyin(&topics(&["AI赚钱"]));
        let items = source.fetch().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, "douyin");
        assert_eq!(items[0].url, "https://www.douyin.com/search/AI%E8%B5%9A%E9%92%B1");
        assert!(items[0].name.contains("AI赚钱"));
        assert!(items[0].tags.contains("抖音"));
    }

    #[test]
    fn at_most_five_topics() {
        let source =
            TopicSearchSource::xiaohongshu(&topics(&["a", "b", "", "c", "d", "e", "f"]));
        let items = source.fetch().unwrap();
        assert_eq!(items.len(), 5);
        assert!(items[0]
            .url
            .starts_with("https://www.xiaohongshu.com/search_result?keyword="));
    }
}
