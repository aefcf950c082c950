//! Contract tests for `ApiClient` against a mock RSCS backend.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET | `/api/agencies` | `agencies_*` |
//! | GET | `/api/titles/{t}` | `title_*` |
//! | GET | `/api/sections/{id}` | `section_*` |
//! | GET | `/api/summaries` | `summaries_*` |

use std::time::Duration;

use rscs_dashboard::client::{AgencyQuery, ApiClient};
use rscs_dashboard::dashboard::{Dashboard, LoadState};
use rscs_dashboard::error::FetchError;
use rscs_dashboard::explainer::ExplainerStore;
use rscs_dashboard::models::{EntityId, SummaryKind};
use rscs_dashboard::sort::SortState;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> ApiClient {
    let base = format!("{}/api", server.uri()).parse().unwrap();
    ApiClient::new(base, Duration::from_secs(5)).unwrap()
}

// ── GET /api/agencies ────────────────────────────────────────────────

#[tokio::test]
async fn agencies_returns_entities() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agencies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "name": "Dept A", "total_words": 1000, "avg_rscs": 10, "parent_id": null, "lsa_counts": 5 },
            { "id": 2, "name": "Agency B", "total_words": 500, "avg_rscs": 5, "parent_id": 1, "lsa_counts": 2 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let list = test_client(&server)
        .list_agencies(&AgencyQuery::default())
        .await
        .unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1].parent_id, Some(EntityId::from(1)));
    assert_eq!(list[0].lsa_counts, Some(5));
}

#[tokio::test]
async fn agencies_keyed_by_slug() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agencies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "agriculture-department", "name": "Department of Agriculture", "total_words": 3000, "avg_rscs": 12.0, "parent_id": null },
            { "id": "forest-service", "name": "Forest Service", "total_words": 800, "avg_rscs": 9.0, "parent_id": "agriculture-department" },
            { "id": null, "name": "Broken row" }
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let list = client.list_agencies(&AgencyQuery::default()).await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, EntityId::new("agriculture-department"));
    assert_eq!(
        list[1].parent_id,
        Some(EntityId::new("agriculture-department"))
    );

    let mut dashboard = Dashboard::new(SortState::default(), ExplainerStore::provide());
    dashboard.refresh(&client).await;
    assert_eq!(dashboard.summary().words_label(), "3,000 words");
    dashboard.toggle_expanded(EntityId::new("agriculture-department"));
    assert_eq!(dashboard.rows().len(), 2);
}

#[tokio::test]
async fn agencies_sends_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agencies"))
        .and(query_param("title", "10"))
        .and(query_param("include_checksum", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "name": "Dept A", "content_checksum": "abcdef123456" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let query = AgencyQuery {
        title: Some(10),
        include_checksum: true,
    };
    let list = test_client(&server).list_agencies(&query).await.unwrap();
    assert_eq!(list[0].content_checksum.as_deref(), Some("abcdef123456"));
}

#[tokio::test]
async fn agencies_without_filters_sends_no_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agencies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    test_client(&server)
        .list_agencies(&AgencyQuery::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn agencies_empty_or_malformed_body_is_empty_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agencies"))
        .and(query_param("title", "1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/agencies"))
        .and(query_param("title", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    for title in [1, 2] {
        let query = AgencyQuery {
            title: Some(title),
            include_checksum: false,
        };
        assert!(client.list_agencies(&query).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn agencies_server_error_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agencies"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal error\n"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .list_agencies(&AgencyQuery::default())
        .await
        .unwrap_err();
    match &err {
        FetchError::Status { status, body, .. } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "Internal error");
        }
        other => panic!("expected Status, got {:?}", other),
    }
    assert_eq!(err.endpoint(), "agencies");
}

#[tokio::test]
async fn agencies_connection_refused_is_http_error() {
    // Nothing listens on port 1.
    let client = ApiClient::new(
        "http://127.0.0.1:1/api".parse().unwrap(),
        Duration::from_secs(5),
    )
    .unwrap();

    let err = client
        .list_agencies(&AgencyQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Http { .. }), "got {:?}", err);
    assert!(err.to_string().starts_with("HTTP error calling agencies"));
}

#[tokio::test]
async fn dashboard_refresh_against_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agencies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "name": "Dept A", "total_words": 1000, "avg_rscs": 10, "parent_id": null },
            { "id": 2, "name": "Dept B", "total_words": 2000, "avg_rscs": 20, "parent_id": null }
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut dashboard = Dashboard::new(SortState::default(), ExplainerStore::provide());
    assert!(dashboard.refresh(&client).await);
    assert_eq!(dashboard.load_state(), &LoadState::Ready);
    assert_eq!(dashboard.summary().words_label(), "3,000 words");
    assert_eq!(dashboard.summary().rscs_label(), "15.0 per 1,000 words");
}

// ── GET /api/titles/{t} ──────────────────────────────────────────────

#[tokio::test]
async fn title_returns_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/titles/40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "40",
            "title": "Title 40",
            "total_words": 50000,
            "avg_rscs": 15.5,
            "summary": "This is a summary for Title 40."
        })))
        .mount(&server)
        .await;

    let detail = test_client(&server).get_title("40").await.unwrap();
    assert_eq!(detail.total_words, 50000);
    assert_eq!(detail.avg_rscs, 15.5);
    assert_eq!(detail.title.as_deref(), Some("Title 40"));
}

#[tokio::test]
async fn title_not_found_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/titles/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(client.get_title("99").await.is_err());
    assert!(rscs_dashboard::detail::load_title(&client, "99")
        .await
        .is_none());
}

// ── GET /api/sections/{id} ───────────────────────────────────────────

#[tokio::test]
async fn section_returns_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sections/123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "123",
            "section": "§ 123",
            "text": "This is the full text of section 123.",
            "rscs_per_1k": 12.3,
            "summary": "Summary of section 123."
        })))
        .mount(&server)
        .await;

    let detail = test_client(&server).get_section("123").await.unwrap();
    assert_eq!(detail.section, "§ 123");
    assert_eq!(detail.rscs_per_1k, 12.3);
}

#[tokio::test]
async fn section_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sections/5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server).get_section("5").await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }), "got {:?}", err);
}

// ── GET /api/summaries ───────────────────────────────────────────────

#[tokio::test]
async fn summaries_parse_and_null_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/summaries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "kind": "title",
                "key": "40",
                "text": "Protection of Environment.",
                "model": "gemini",
                "created_at": "2025-03-01T12:00:00Z"
            }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/summaries"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let first = client.list_summaries().await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].kind, SummaryKind::Title);

    let second = client.list_summaries().await.unwrap();
    assert!(second.is_empty());
}
