//! Bilibili zone ranking.

use ideapool_core::{Descriptor, SourcesConfig};
use serde::Deserialize;

use crate::error::SourceError;
use crate::http::{agent, get_json, JsonGet};
use crate::source::Source;

pub const SOURCE_ID: &str = "bilibili";

const MAX_ITEMS: usize = 10;
const MAX_DESCRIPTION_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
struct RankingResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<RankingData>,
}

#[derive(Debug, Default, Deserialize)]
struct RankingData {
    #[serde(default)]
    list: Vec<RankingItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RankingItem {
    title: String,
    desc: String,
    bvid: String,
    stat: Stat,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Stat {
    view: u64,
    like: u64,
}

impl RankingItem {
    fn into_descriptor(self) -> Descriptor {
        let description: String = self.desc.chars().take(MAX_DESCRIPTION_CHARS).collect();
        Descriptor::new(SOURCE_ID, &self.title, &description)
            .with_url(&format!("https://www.bilibili.com/video/{}", self.bvid))
            .with_metric("play", self.stat.view)
            .with_metric("like", self.stat.like)
            .with_tags(["B站", "科技"])
    }
}

fn into_descriptors(response: RankingResponse) -> Result<Vec<Descriptor>, SourceError> {
    if response.code != 0 {
        return Err(SourceError::parse(
            SOURCE_ID,
            format!("api code {}: {}", response.code, response.message),
        ));
    }
    Ok(response
        .data
        .unwrap_or_default()
        .list
        .into_iter()
        .take(MAX_ITEMS)
        .map(RankingItem::into_descriptor)
        .collect())
}

/// Decode a ranking body into at most 10 descriptors.
pub fn parse_ranking(body: &str) -> Result<Vec<Descriptor>, SourceError> {
    let response: RankingResponse =
        serde_json::from_str(body).map_err(|e| SourceError::parse(SOURCE_ID, e.to_string()))?;
    into_descriptors(response)
}

pub struct BilibiliSource {
    agent: ureq::Agent,
    api: String,
    rid: u32,
    user_agent: String,
    timeout_secs: u64,
}

impl BilibiliSource {
    pub fn new(config: &SourcesConfig) -> Self {
        BilibiliSource {
            agent: agent(config.http_timeout_secs),
            api: config.bilibili_api.clone(),
            rid: config.bilibili_rid,
            user_agent: config.user_agent.clone(),
            timeout_secs: config.http_timeout_secs,
        }
    }
}

impl Source for BilibiliSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn fetch(&self) -> Result<Vec<Descriptor>, SourceError> {
        let query = [("rid", self.rid.to_string()), ("type", "all".to_string())];
        let headers = [
            ("User-Agent", self.user_agent.as_str()),
            ("Referer", "https://www.bilibili.com/"),
        ];
        let response: RankingResponse = get_json(
            &self.agent,
            JsonGet {
                source_id: SOURCE_ID,
                url: &self.api,
                query: &query,
                headers: &headers,
                timeout_secs: self.timeout_secs,
            },
        )?;
        into_descriptors(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ranking_and_truncates() {
        let long_desc = "字".repeat(150);
        let items: Vec<String> = (0..12)
            .map(|i| {
                format!(
                    r#"{{"title": "video {i}", "desc": "{long_desc}", "bvid": "BV{i}", "stat": {{"view": {}, "like": {}}}}}"#,
                    i * 100,
                    i
                )
            })
            .collect();
        let body = format!(r#"{{"code": 0, "data": {{"list": [{}]}}}}"#, items.join(","));

        let videos = parse_ranking(&body).unwrap();
        assert_eq!(videos.len(), 10);
        assert_eq!(videos[3].name, "video 3");
        assert_eq!(videos[3].url, "https://www.bilibili.com/video/BV3");
        assert_eq!(videos[3].metric("play"), 300);
        assert_eq!(videos[3].metric("like"), 3);
        assert_eq!(videos[3].description.chars().count(), 100);
        assert!(videos[3].tags.contains("科技"));
    }

    #[test]
    fn api_error_code_is_reported() {
        let err = parse_ranking(r#"{"code": -352, "message": "risk control"}"#).unwrap_err();
        assert!(err.to_string().contains("-352"));
    }

    #[test]
    fn missing_list_is_empty() {
        assert!(parse_ranking(r#"{"code": 0, "data": {}}"#).unwrap().is_empty());
    }
}
