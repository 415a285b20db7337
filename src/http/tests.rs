//! Tests for the HTTP client module

use super::*;
use crate::detail::DetailRequest;
use crate::error::{Error, ErrorCode};
use crate::pagination::{PageRequest, PaginationMeta};
use crate::resource::ResourceStrategy;
use crate::types::{AcceptFormat, JsonObject};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_request(page: u32) -> PageRequest {
    PageRequest {
        sort: vec!["-id".to_string()],
        per_page: 2,
        page,
        filters: BTreeMap::new(),
        fields: Vec::new(),
        accept: AcceptFormat::Json,
        full_reload: page == 1,
    }
}

fn client_for(server: &MockServer) -> RestClient {
    let config = RestClientConfig::builder(server.uri(), "/v1/users").build();
    RestClient::new(config).unwrap()
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_rest_client_config_default() {
    let config = RestClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.query, QueryParamNames::default());
    assert_eq!(config.query.per_page, "per-page");
    assert!(config.user_agent.starts_with("solidafy-restlist/"));
}

#[test]
fn test_rest_client_config_builder() {
    let config = RestClientConfig::builder("https://api.example.com", "/v1/users/")
        .timeout(Duration::from_secs(5))
        .header("X-Api-Key", "secret")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.list_path, "/v1/users/");
    assert_eq!(config.detail_path, "/v1/users/{id}");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(
        config.default_headers.get("X-Api-Key"),
        Some(&"secret".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_detail_path_requires_placeholder() {
    let config = RestClientConfig::builder("https://api.example.com", "/v1/users")
        .detail_path("/v1/users/one")
        .build();
    let err = RestClient::new(config).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "detail_path"));
}

#[test]
fn test_invalid_base_url() {
    let config = RestClientConfig::builder("not a url", "/v1/users").build();
    assert!(matches!(
        RestClient::new(config).unwrap_err(),
        Error::InvalidUrl(_)
    ));
}

#[test]
fn test_urls() {
    let config = RestClientConfig::builder("https://api.example.com/", "/v1/users")
        .detail_path("/v1/users/{id}/profile")
        .build();
    let client = RestClient::new(config).unwrap();

    assert_eq!(
        client.list_url().unwrap().as_str(),
        "https://api.example.com/v1/users"
    );
    assert_eq!(
        client.detail_url("42").unwrap().as_str(),
        "https://api.example.com/v1/users/42/profile"
    );
}

#[test]
fn test_detail_url_keeps_id_in_one_segment() {
    let client = RestClient::new(RestClientConfig::builder("https://api.example.com", "/v1/users").build()).unwrap();

    let url = client.detail_url("a?admin=1").unwrap();
    assert_eq!(url.query(), None);
    assert!(url.path().ends_with("/a%3Fadmin=1"));

    let url = client.detail_url("../orders/7").unwrap();
    assert_eq!(url.path(), "/v1/users/..%2Forders%2F7");

    let url = client.detail_url("x#frag").unwrap();
    assert_eq!(url.fragment(), None);
    assert_eq!(url.path(), "/v1/users/x%23frag");

    let url = client.detail_url("caf\u{e9} 1").unwrap();
    assert_eq!(url.path(), "/v1/users/caf%C3%A9%201");
}

#[test]
fn test_detail_url_rejects_dot_segments() {
    let client = RestClient::new(RestClientConfig::builder("https://api.example.com", "/v1/users").build()).unwrap();

    for id in ["", ".", ".."] {
        let err = client.detail_url(id).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "id"));
    }
}

#[test]
fn test_page_query() {
    let client = RestClient::new(RestClientConfig::builder("https://api.example.com", "/users").build()).unwrap();
    let mut request = page_request(3);
    request.sort = vec!["name".to_string(), "-created_at".to_string()];
    request.fields = vec!["id".to_string(), "name".to_string()];
    request.filters.insert("status".to_string(), "active".to_string());

    let query = client.page_query(&request);
    let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(
        pairs,
        vec![
            ("page", "3"),
            ("per-page", "2"),
            ("sort", "name,-created_at"),
            ("fields", "id,name"),
            ("status", "active"),
        ]
    );
}

#[test]
fn test_page_query_custom_names() {
    let names = QueryParamNames {
        page: "p".to_string(),
        per_page: "limit".to_string(),
        sort: "order".to_string(),
        fields: "select".to_string(),
    };
    let client = RestClient::new(
        RestClientConfig::builder("https://api.example.com", "/users")
            .query_params(names)
            .build(),
    )
    .unwrap();

    let mut request = page_request(1);
    request.sort.clear();
    let query = client.page_query(&request);
    assert_eq!(
        query,
        vec![
            ("p".to_string(), "1".to_string()),
            ("limit".to_string(), "2".to_string()),
        ]
    );

    let detail = DetailRequest {
        id: "1".to_string(),
        fields: vec!["a".to_string()],
        accept: AcceptFormat::Json,
    };
    assert_eq!(
        client.detail_query(&detail),
        vec![("select".to_string(), "a".to_string())]
    );
}

#[test]
fn test_rest_client_debug() {
    let client = RestClient::new(RestClientConfig::builder("https://api.example.com", "/users").build()).unwrap();
    let debug = format!("{client:?}");
    assert!(debug.contains("RestClient"));
    assert!(debug.contains("has_pre_process: false"));
}

// ============================================================================
// Request Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_page_sends_query_and_reads_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(query_param("page", "1"))
        .and(query_param("per-page", "2"))
        .and(query_param("sort", "-id"))
        .and(query_param_is_missing("fields"))
        .and(header("Accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1}, {"id": 2}]))
                .insert_header("X-Pagination-Current-Page", "1")
                .insert_header("X-Pagination-Total-Count", "5")
                .insert_header("X-Pagination-Page-Count", "3")
                .insert_header("X-Pagination-Per-Page", "2"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let reply = client_for(&mock_server)
        .fetch_page(&page_request(1))
        .await
        .unwrap();

    assert_eq!(
        reply.pagination,
        PaginationMeta {
            current_page: 1,
            total_count: 5,
            page_count: 3,
            per_page: 2
        }
    );
    let body: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(body, json!([{"id": 1}, {"id": 2}]));
}

#[tokio::test]
async fn test_fetch_page_with_filters_and_xml_accept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(query_param("role", "admin"))
        .and(header("Accept", "application/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<response/>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut request = page_request(2);
    request.filters.insert("role".to_string(), "admin".to_string());
    request.accept = AcceptFormat::Xml;

    let reply = client_for(&mock_server).fetch_page(&request).await.unwrap();
    assert_eq!(reply.body, "<response/>");
    assert_eq!(reply.pagination, PaginationMeta::default());
}

#[tokio::test]
async fn test_fetch_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/42"))
        .and(query_param("fields", "id,email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42, "email": "a@b.c"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = DetailRequest {
        id: "42".to_string(),
        fields: vec!["id".to_string(), "email".to_string()],
        accept: AcceptFormat::Json,
    };
    let reply = client_for(&mock_server).fetch_detail(&request).await.unwrap();
    assert!(reply.body.contains("a@b.c"));
}

#[tokio::test]
async fn test_default_headers_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(header("X-Api-Key", "secret123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = RestClientConfig::builder(mock_server.uri(), "/v1/users")
        .header("X-Api-Key", "secret123")
        .build();
    let client = RestClient::new(config).unwrap();
    assert!(client.fetch_page(&page_request(1)).await.is_ok());
}

#[tokio::test]
async fn test_http_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let request = DetailRequest {
        id: "missing".to_string(),
        ..Default::default()
    };
    let err = client_for(&mock_server)
        .fetch_detail(&request)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 404, ref body } if body == "Not found"));
    assert_eq!(err.code(), ErrorCode::HttpStatus(404));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .fetch_page(&page_request(1))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::HttpStatus(500));
}

#[tokio::test]
async fn test_timeout_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let config = RestClientConfig::builder(mock_server.uri(), "/v1/users")
        .timeout(Duration::from_millis(50))
        .build();
    let err = RestClient::new(config)
        .unwrap()
        .fetch_page(&page_request(1))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { timeout_ms: 50 }));
    assert_eq!(err.code(), ErrorCode::Timeout);
}

#[tokio::test]
async fn test_connection_refused_is_network() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let client = RestClient::new(RestClientConfig::builder(uri, "/v1/users").build()).unwrap();
    let err = client.fetch_page(&page_request(1)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Network);
}

#[test]
fn test_pre_process_hook() {
    let client = RestClient::new(RestClientConfig::builder("https://api.example.com", "/users").build())
        .unwrap()
        .with_pre_process(Arc::new(|mut record: JsonObject| {
            record.insert("seen".to_string(), json!(true));
            record
        }));

    let record = client.pre_process(json!({"id": 1}).as_object().cloned().unwrap());
    assert_eq!(record.get("seen"), Some(&json!(true)));
}
