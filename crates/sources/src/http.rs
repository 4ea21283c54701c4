//! Blocking JSON-over-HTTP helpers shared by the HTTP collectors.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::SourceError;

/// A `ureq` agent with a global per-call timeout.
pub(crate) fn agent(timeout_secs: u64) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .build();
    ureq::Agent::new_with_config(config)
}

/// Parameters for one GET request.
pub(crate) struct JsonGet<'a> {
    pub source_id: &'a str,
    pub url: &'a str,
    pub query: &'a [(&'a str, String)],
    pub headers: &'a [(&'a str, &'a str)],
    pub timeout_secs: u64,
}

/// GET `url` and decode the body as `T`.
pub(crate) fn get_json<T: DeserializeOwned>(
    agent: &ureq::Agent,
    request: JsonGet<'_>,
) -> Result<T, SourceError> {
    send(agent, &request)?
        .into_body()
        .read_json::<T>()
        .map_err(|e| SourceError::parse(request.source_id, e.to_string()))
}

/// GET `url` and return the raw body for a caller-side decoder.
pub(crate) fn get_text(agent: &ureq::Agent, request: JsonGet<'_>) -> Result<String, SourceError> {
    send(agent, &request)?
        .into_body()
        .read_to_string()
        .map_err(|e| SourceError::parse(request.source_id, e.to_string()))
}

fn send(
    agent: &ureq::Agent,
    request: &JsonGet<'_>,
) -> Result<ureq::http::Response<ureq::Body>, SourceError> {
    tracing::debug!(source = request.source_id, url = request.url, "fetching");

    let mut builder = agent.get(request.url);
    for (key, value) in request.query {
        builder = builder.query(*key, value);
    }
    for (key, value) in request.headers {
        builder = builder.header(*key, *value);
    }

    builder
        .call()
        .map_err(|e| classify_error(e, request.source_id, request.timeout_secs))
}

fn classify_error(err: ureq::Error, source_id: &str, timeout_secs: u64) -> SourceError {
    match err {
        ureq::Error::StatusCode(status) => SourceError::Status {
            source_id: source_id.to_string(),
            status,
        },
        ureq::Error::Timeout(_) => SourceError::Timeout {
            source_id: source_id.to_string(),
            secs: timeout_secs,
        },
        other => SourceError::Request {
            source_id: source_id.to_string(),
            message: other.to_string(),
        },
    }
}

/// Percent-encode a path or query component (spaces become `%20`).
pub fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => out.push(ch),
            ' ' => out.push_str("%20"),
            _ => {
                for byte in ch.to_string().as_bytes() {
                    out.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencoded_keeps_unreserved() {
        assert_eq!(urlencoded("AI-tools_1.0~"), "AI-tools_1.0~");
    }

    #[test]
    fn urlencoded_escapes_spaces_and_utf8() {
        assert_eq!(urlencoded("AI trending"), "AI%20trending");
        assert_eq!(urlencoded("副业"), "%E5%89%AF%E4%B8%9A");
    }

    #[test]
    fn status_errors_keep_the_code() {
        let err = classify_error(ureq::Error::StatusCode(403), "github", 10);
        assert_eq!(
            err,
            SourceError::Status {
                source_id: "github".to_string(),
                status: 403
            }
        );
    }
}
