//! GitHub repository search, trending and details.
//!
//! Search goes through the public REST API (`/search/repositories`), one
//! query per configured category. Trending uses an unofficial endpoint and
//! falls back to search when it is unavailable. Requests are anonymous.

use std::collections::HashSet;

use ideapool_core::{
    contains_any, Descriptor, SearchSettings, SourcesConfig, METRIC_FORKS, METRIC_MOMENTUM,
    METRIC_STARS,
};
use serde::Deserialize;
use time::{Duration, OffsetDateTime};

use crate::error::SourceError;
use crate::http::{agent, get_json, get_text, JsonGet};
use crate::source::{RepoLookup, Source};

pub const SOURCE_ID: &str = "github";

/// How many search results the hot-content feed keeps.
const HOT_FEED_LIMIT: usize = 10;

// ──────────────────────────────────────────────
// Wire types
// ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RepoItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RepoItem {
    full_name: String,
    stargazers_count: u64,
    forks_count: Option<u64>,
    trending_stars: Option<u64>,
    language: Option<String>,
    description: Option<String>,
    html_url: String,
    created_at: Option<String>,
    pushed_at: Option<String>,
    topics: Vec<String>,
    license: Option<License>,
    open_issues_count: Option<u64>,
    watchers_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct License {
    spdx_id: Option<String>,
}

impl RepoItem {
    fn into_descriptor(self) -> Descriptor {
        let mut d = Descriptor::new(
            SOURCE_ID,
            &self.full_name,
            self.description.as_deref().unwrap_or_default(),
        )
        .with_url(&self.html_url)
        .with_metric(METRIC_STARS, self.stargazers_count)
        .with_tags(self.topics);

        if let Some(momentum) = self.trending_stars {
            d = d.with_metric(METRIC_MOMENTUM, momentum);
        }
        if let Some(forks) = self.forks_count {
            d = d.with_metric(METRIC_FORKS, forks);
        }
        if let Some(n) = self.open_issues_count {
            d = d.with_metric("open_issues", n);
        }
        if let Some(n) = self.watchers_count {
            d = d.with_metric("watchers", n);
        }
        if let Some(language) = self.language.filter(|l| !l.is_empty()) {
            d = d.with_language(&language);
        }

        let attributes = [
            ("created_at", self.created_at),
            ("pushed_at", self.pushed_at),
            ("license", self.license.and_then(|l| l.spdx_id)),
        ];
        for (key, value) in attributes {
            if let Some(value) = value {
                d.attributes.insert(key.to_string(), value);
            }
        }
        d
    }
}

// ──────────────────────────────────────────────
// Pure helpers
// ──────────────────────────────────────────────

/// True when `name + description` mentions an excluded keyword.
pub fn should_exclude(descriptor: &Descriptor, exclude_keywords: &[String]) -> bool {
    contains_any(&descriptor.match_text(), exclude_keywords)
}

/// Decode a `/search/repositories` body.
pub fn parse_search_response(body: &str) -> Result<Vec<Descriptor>, SourceError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| SourceError::parse(SOURCE_ID, e.to_string()))?;
    Ok(response
        .items
        .into_iter()
        .map(RepoItem::into_descriptor)
        .collect())
}

/// Sort by stars (highest first), keep the first occurrence of each name,
/// and truncate to `max`.
pub fn dedupe_by_stars(mut repos: Vec<Descriptor>, max: usize) -> Vec<Descriptor> {
    repos.sort_by(|a, b| b.stars().cmp(&a.stars()));
    let mut seen = HashSet::new();
    repos.retain(|r| seen.insert(r.name.clone()));
    repos.truncate(max);
    repos
}

/// `https://github.com/<owner>/<repo>[...]` → `(owner, repo)`.
///
/// Accepts the URL with or without scheme, `www.`, a trailing slash or a
/// `.git` suffix.
pub fn parse_repo_url(url: &str) -> Result<(String, String), SourceError> {
    let invalid = || SourceError::InvalidUrl(url.to_string());

    let trimmed = url.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    let path = without_www.strip_prefix("github.com/").ok_or_else(invalid)?;

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let owner = segments.next().ok_or_else(invalid)?;
    let repo = segments.next().ok_or_else(invalid)?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return Err(invalid());
    }
    Ok((owner.to_string(), repo.to_string()))
}

/// `YYYY-MM-DD` for `days` before `now`.
fn created_since(now: OffsetDateTime, days: i64) -> String {
    let date = (now - Duration::days(days)).date();
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

/// `<category> created:>YYYY-MM-DD stars:>N`
pub fn search_query(category: &str, since: &str, min_stars: u64) -> String {
    format!("{} created:>{} stars:>{}", category, since, min_stars)
}

// ──────────────────────────────────────────────
// GithubClient
// ──────────────────────────────────────────────

pub struct GithubClient {
    agent: ureq::Agent,
    api: String,
    trending_api: String,
    trending_since: String,
    user_agent: String,
    timeout_secs: u64,
    search: SearchSettings,
}

impl GithubClient {
    pub fn new(sources: &SourcesConfig, search: &SearchSettings) -> Self {
        GithubClient {
            agent: agent(sources.http_timeout_secs),
            api: sources.github_api.trim_end_matches('/').to_string(),
            trending_api: sources.trending_api.clone(),
            trending_since: sources.trending_since.clone(),
            user_agent: sources.user_agent.clone(),
            timeout_secs: sources.http_timeout_secs,
            search: search.clone(),
        }
    }

    fn headers(&self) -> [(&str, &str); 2] {
        [
            ("Accept", "application/vnd.github+json"),
            ("User-Agent", self.user_agent.as_str()),
        ]
    }

    fn search_category(&self, category: &str, since: &str) -> Result<Vec<Descriptor>, SourceError> {
        let url = format!("{}/search/repositories", self.api);
        let query = [
            ("q", search_query(category, since, self.search.min_stars)),
            ("sort", "stars".to_string()),
            ("order", "desc".to_string()),
            ("per_page", self.search.per_page.to_string()),
        ];
        let body = get_text(
            &self.agent,
            JsonGet {
                source_id: SOURCE_ID,
                url: &url,
                query: &query,
                headers: &self.headers(),
                timeout_secs: self.timeout_secs,
            },
        )?;
        parse_search_response(&body)
    }

    fn fetch_trending(&self) -> Result<Vec<Descriptor>, SourceError> {
        let query = [
            ("language", String::new()),
            ("since", self.trending_since.clone()),
        ];
        let items: Vec<RepoItem> = get_json(
            &self.agent,
            JsonGet {
                source_id: SOURCE_ID,
                url: &self.trending_api,
                query: &query,
                headers: &[("User-Agent", self.user_agent.as_str())],
                timeout_secs: self.timeout_secs,
            },
        )?;
        Ok(items
            .into_iter()
            .take(self.search.max_results)
            .map(RepoItem::into_descriptor)
            .filter(|d| !should_exclude(d, &self.search.exclude_keywords))
            .collect())
    }
}

impl RepoLookup for GithubClient {
    /// One search per category. A failing category is logged and skipped;
    /// the call only fails when every category failed.
    fn search_repos(&self) -> Result<Vec<Descriptor>, SourceError> {
        let since = created_since(OffsetDateTime::now_utc(), self.search.days);
        let mut found = Vec::new();
        let mut last_error = None;
        let mut any_ok = false;

        for category in &self.search.categories {
            match self.search_category(category, &since) {
                Ok(repos) => {
                    any_ok = true;
                    found.extend(repos.into_iter().map(|mut d| {
                        d.attributes
                            .insert("category".to_string(), category.clone());
                        d
                    }));
                }
                Err(error) => {
                    tracing::warn!(category = %category, error = %error, "repository search failed");
                    last_error = Some(error);
                }
            }
        }

        match last_error {
            Some(error) if !any_ok => Err(error),
            _ => {
                found.retain(|d| !should_exclude(d, &self.search.exclude_keywords));
                Ok(dedupe_by_stars(found, self.search.max_results))
            }
        }
    }

    /// Trending list, or the search results when the trending endpoint
    /// fails.
    fn trending_repos(&self) -> Result<Vec<Descriptor>, SourceError> {
        match self.fetch_trending() {
            Ok(repos) => Ok(repos),
            Err(error) => {
                tracing::warn!(error = %error, "trending endpoint failed; falling back to search");
                self.search_repos()
            }
        }
    }

    fn repo_details(&self, owner: &str, repo: &str) -> Result<Descriptor, SourceError> {
        let url = format!("{}/repos/{}/{}", self.api, owner, repo);
        let item: RepoItem = get_json(
            &self.agent,
            JsonGet {
                source_id: SOURCE_ID,
                url: &url,
                query: &[],
                headers: &self.headers(),
                timeout_secs: self.timeout_secs,
            },
        )?;
        if item.full_name.is_empty() {
            return Err(SourceError::parse(SOURCE_ID, "response has no full_name"));
        }
        Ok(item.into_descriptor())
    }
}

impl Source for GithubClient {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    /// Top searched repositories, tagged for the hot-content feed.
    fn fetch(&self) -> Result<Vec<Descriptor>, SourceError> {
        Ok(self
            .search_repos()?
            .into_iter()
            .take(HOT_FEED_LIMIT)
            .map(|d| d.with_tags(["AI", "GitHub"]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const SEARCH_BODY: &str = r#"{
        "total_count": 2,
        "items": [
            {
                "full_name": "acme/agent-kit",
                "stargazers_count": 1200,
                "forks_count": 80,
                "language": "Python",
                "description": "LLM agent framework",
                "html_url": "https://github.com/acme/agent-kit",
                "created_at": "2025-05-28T10:00:00Z",
                "pushed_at": "2025-06-01T08:00:00Z",
                "topics": ["llm", "agents"],
                "license": {"spdx_id": "MIT"}
            },
            {
                "full_name": "bob/awesome-ai",
                "stargazers_count": 300,
                "language": null,
                "description": null,
                "html_url": "https://github.com/bob/awesome-ai"
            }
        ]
    }"#;

    fn excludes() -> Vec<String> {
        SearchSettings::default().exclude_keywords
    }

    #[test]
    fn parse_search_response_maps_fields() {
        let repos = parse_search_response(SEARCH_BODY).unwrap();
        assert_eq!(repos.len(), 2);

        let first = &repos[0];
        assert_eq!(first.name, "acme/agent-kit");
        assert_eq!(first.stars(), 1200);
        assert_eq!(first.metric(METRIC_FORKS), 80);
        assert_eq!(first.language.as_deref(), Some("Python"));
        assert_eq!(first.attributes["pushed_at"], "2025-06-01T08:00:00Z");
        assert_eq!(first.attributes["license"], "MIT");
        assert!(first.tags.contains("llm"));

        let second = &repos[1];
        assert_eq!(second.description, "");
        assert!(second.language.is_none());
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        assert!(matches!(
            parse_search_response("<html>rate limited</html>"),
            Err(SourceError::Parse { .. })
        ));
    }

    #[test]
    fn exclude_filter_matches_name_or_description() {
        let repos = parse_search_response(SEARCH_BODY).unwrap();
        assert!(!should_exclude(&repos[0], &excludes()));
        assert!(should_exclude(&repos[1], &excludes()));

        let d = Descriptor::new("github", "x/learn-rust", "A free course on Rust");
        assert!(should_exclude(&d, &excludes()));
    }

    /// Answer one request on a local socket with `body` and return the base URL.
    fn serve_once(body: &'static str) -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let reply = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(api: String) -> GithubClient {
        let sources = SourcesConfig {
            github_api: api,
            http_timeout_secs: 5,
            ..SourcesConfig::default()
        };
        let search = SearchSettings {
            categories: vec!["AI agent".to_string()],
            ..SearchSettings::default()
        };
        GithubClient::new(&sources, &search)
    }

    #[test]
    fn search_decodes_through_parse_search_response() {
        let client = client_for(serve_once(SEARCH_BODY));
        let repos = client.search_repos().unwrap();
        let names: Vec<&str> = repos.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["acme/agent-kit"]);
        assert_eq!(repos[0].attributes["category"], "AI agent");
        assert_eq!(repos[0].attributes["license"], "MIT");
    }

    #[test]
    fn search_with_malformed_body_fails_as_parse_error() {
        let client = client_for(serve_once("<html>rate limited</html>"));
        assert!(matches!(
            client.search_repos(),
            Err(SourceError::Parse { .. })
        ));
    }

    #[test]
    fn dedupe_keeps_highest_and_truncates() {
        let repos = vec![
            Descriptor::new("github", "a/one", "").with_metric(METRIC_STARS, 10),
            Descriptor::new("github", "b/two", "").with_metric(METRIC_STARS, 500),
            Descriptor::new("github", "a/one", "").with_metric(METRIC_STARS, 10),
            Descriptor::new("github", "c/three", "").with_metric(METRIC_STARS, 90),
        ];
        let top = dedupe_by_stars(repos, 2);
        let names: Vec<&str> = top.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["b/two", "c/three"]);
    }

    #[test]
    fn parse_repo_url_variants() {
        for url in [
            "https://github.com/openai/whisper",
            "http://www.github.com/openai/whisper/",
            "github.com/openai/whisper.git",
            "https://github.com/openai/whisper/tree/main/docs",
        ] {
            assert_eq!(
                parse_repo_url(url).unwrap(),
                ("openai".to_string(), "whisper".to_string()),
                "{url}"
            );
        }
    }

    #[test]
    fn parse_repo_url_rejects_other_hosts() {
        for url in ["https://gitlab.com/a/b", "https://github.com/only-owner", "", "not a url"] {
            assert_eq!(
                parse_repo_url(url),
                Err(SourceError::InvalidUrl(url.to_string()))
            );
        }
    }

    #[test]
    fn search_query_format() {
        let since = created_since(datetime!(2025-06-08 12:00:00 UTC), 7);
        assert_eq!(since, "2025-06-01");
        assert_eq!(
            search_query("AI automation", &since, 50),
            "AI automation created:>2025-06-01 stars:>50"
        );
    }
}
