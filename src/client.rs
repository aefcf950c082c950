//! HTTP client for the RSCS backend.
//!
//! # Endpoints
//!
//! | Method | Path | Returns |
//! |--------|------|---------|
//! | `GET` | `/agencies?title={n}&include_checksum=true` | `[Entity]` |
//! | `GET` | `/titles/{t}` | [`TitleDetail`] |
//! | `GET` | `/sections/{id}` | [`SectionDetail`] |
//! | `GET` | `/summaries` | `[SummaryRecord]` |
//!
//! Paths are joined onto the configured base URL
//! (default `http://localhost:8080/api`).
//!
//! # Failure policy
//!
//! - Transport errors and non-2xx statuses are returned as [`FetchError`].
//! - An empty, `null`, or malformed agency list body is a valid empty
//!   collection: the dashboard then shows zero totals rather than an error.
//! - Detail endpoints have no such leniency: a body that does not decode is a
//!   [`FetchError::Decode`].
//!
//! No retries. Every request has the configured timeout.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::error::FetchError;
use crate::models::{Entity, SectionDetail, SummaryRecord, TitleDetail};

/// Query parameters of the agency list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgencyQuery {
    /// Restrict totals to one CFR title.
    pub title: Option<u32>,
    /// Ask the backend to attach `content_checksum` to each row.
    pub include_checksum: bool,
}

/// Anything that can produce the flat agency collection.
///
/// [`ApiClient`] is the production implementation; tests substitute canned
/// collections.
#[async_trait]
pub trait AgencySource: Send + Sync {
    async fn fetch_agencies(&self, query: &AgencyQuery) -> Result<Vec<Entity>, FetchError>;
}

/// Typed client over the backend's JSON API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Http {
                endpoint: base.to_string(),
                source,
            })?;
        Ok(Self { http, base })
    }

    /// Build a client from `[api]` settings.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let base = config.base_url()?;
        Ok(Self::new(
            base,
            Duration::from_secs(config.api.timeout_secs),
        )?)
    }

    /// Full URL for `segments` under the base path. Segments are
    /// percent-encoded, so a title like `"40/1"` cannot escape its slot.
    pub fn endpoint_url(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl {
                endpoint: segments.join("/"),
                reason: format!("{} cannot be a base URL", self.base),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET /agencies`, tolerant of empty or malformed bodies.
    pub async fn list_agencies(&self, query: &AgencyQuery) -> Result<Vec<Entity>, FetchError> {
        let mut url = self.endpoint_url(&["agencies"])?;
        if query.title.is_some() || query.include_checksum {
            let mut pairs = url.query_pairs_mut();
            if let Some(title) = query.title {
                pairs.append_pair("title", &title.to_string());
            }
            if query.include_checksum {
                pairs.append_pair("include_checksum", "true");
            }
        }

        let body = self.get_text("agencies", url).await?;
        Ok(parse_agency_list(&body))
    }

    /// `GET /titles/{t}`.
    pub async fn get_title(&self, title: &str) -> Result<TitleDetail, FetchError> {
        let url = self.endpoint_url(&["titles", title])?;
        self.get_json(&format!("titles/{}", title), url).await
    }

    /// `GET /sections/{id}`.
    pub async fn get_section(&self, id: &str) -> Result<SectionDetail, FetchError> {
        let url = self.endpoint_url(&["sections", id])?;
        self.get_json(&format!("sections/{}", id), url).await
    }

    /// `GET /summaries`. A `null` body is an empty list.
    pub async fn list_summaries(&self) -> Result<Vec<SummaryRecord>, FetchError> {
        let url = self.endpoint_url(&["summaries"])?;
        let list: Option<Vec<SummaryRecord>> = self.get_json("summaries", url).await?;
        Ok(list.unwrap_or_default())
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, url: Url) -> Result<T, FetchError> {
        let body = self.get_text(endpoint, url).await?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn get_text(&self, endpoint: &str, url: Url) -> Result<String, FetchError> {
        tracing::debug!(%url, "GET");
        let http_err = |source| FetchError::Http {
            endpoint: endpoint.to_string(),
            source,
        };

        let response = self.http.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        let body = response.text().await.map_err(http_err)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl AgencySource for ApiClient {
    async fn fetch_agencies(&self, query: &AgencyQuery) -> Result<Vec<Entity>, FetchError> {
        self.list_agencies(query).await
    }
}

/// Decode an agency list body. Anything that is not a JSON array becomes an
/// empty collection; inside an array, rows that do not decode are skipped
/// one by one so a single bad row cannot hide the rest.
pub fn parse_agency_list(body: &str) -> Vec<Entity> {
    if body.trim().is_empty() {
        return Vec::new();
    }
    let rows = match serde_json::from_str::<Option<Vec<serde_json::Value>>>(body) {
        Ok(rows) => rows.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "agency list body is malformed, treating as empty");
            return Vec::new();
        }
    };

    let total = rows.len();
    let entities: Vec<Entity> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<Entity>(row) {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed agency row");
                None
            }
        })
        .collect();
    if entities.len() < total {
        tracing::warn!(
            skipped = total - entities.len(),
            kept = entities.len(),
            "agency list contained malformed rows"
        );
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let c = client("http://localhost:8080/api");
        assert_eq!(
            c.endpoint_url(&["titles", "40"]).unwrap().as_str(),
            "http://localhost:8080/api/titles/40"
        );
        let c = client("http://localhost:8080/api/");
        assert_eq!(
            c.endpoint_url(&["agencies"]).unwrap().as_str(),
            "http://localhost:8080/api/agencies"
        );
        let c = client("http://localhost:8080");
        assert_eq!(
            c.endpoint_url(&["sections", "1.1"]).unwrap().as_str(),
            "http://localhost:8080/sections/1.1"
        );
    }

    #[test]
    fn endpoint_escapes_segments() {
        let c = client("http://localhost:8080/api");
        let url = c.endpoint_url(&["titles", "40/1"]).unwrap();
        assert_eq!(url.path(), "/api/titles/40%2F1");
    }

    #[test]
    fn agency_list_tolerates_bad_bodies() {
        assert!(parse_agency_list("").is_empty());
        assert!(parse_agency_list("   \n").is_empty());
        assert!(parse_agency_list("null").is_empty());
        assert!(parse_agency_list("{\"oops\": true}").is_empty());
        assert!(parse_agency_list("<html>").is_empty());
    }

    #[test]
    fn agency_list_skips_only_the_bad_rows() {
        let list = parse_agency_list(
            r#"[
                {"id": "agriculture-department", "name": "Agriculture", "total_words": 3000},
                {"id": "", "name": "No id"},
                {"name": "Missing id"},
                {"id": "forest-service", "name": "Forest Service", "parent_id": "agriculture-department"}
            ]"#,
        );
        let ids: Vec<&str> = list.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["agriculture-department", "forest-service"]);
    }

    #[test]
    fn agency_list_parses_rows() {
        let list = parse_agency_list(r#"[{"id": 1, "name": "Dept A", "total_words": 10}]"#);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Dept A");
    }
}
