//! Transport tests against a local mock HTTP server

use httpmock::prelude::*;
use opennms_client::{
    AcceptType, AuthConfig, Filter, OnmsClient, OnmsError, OnmsHttp, RequestOptions, ReqwestHttp,
    ResponseBody, ServerConfig,
};
use std::time::Duration;

fn server_config(server: &MockServer) -> ServerConfig {
    ServerConfig::builder(server.url("/opennms"))
        .name("Demo")
        .auth(AuthConfig::new("demo", "demo"))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_basic_auth_and_json_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/opennms/rest/info")
                .header("authorization", "Basic ZGVtbzpkZW1v")
                .header("accept", "application/json");
            then.status(200)
                .header("content-type", "application/json")
                .body(include_str!("fixtures/info.json"));
        })
        .await;

    let client = OnmsClient::new(server_config(&server));
    let info = client.server_metadata().await.unwrap();

    mock.assert_async().await;
    assert_eq!(info.version, "24.0.0");
    assert_eq!(info.package_name.as_deref(), Some("opennms"));
}

#[tokio::test]
async fn test_per_request_credentials_override_server() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            // admin:admin
            when.path("/opennms/rest/info")
                .header("authorization", "Basic YWRtaW46YWRtaW4=");
            then.status(200).body(r#"{"version": "25.1.0"}"#);
        })
        .await;

    let http = ReqwestHttp::new(server_config(&server));
    let options = RequestOptions::json().with_auth(AuthConfig::new("admin", "admin"));
    let result = http.get("rest/info", &options).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.status, 200);
    assert_eq!(result.into_json().unwrap()["version"], "25.1.0");
}

#[tokio::test]
async fn test_xml_body_is_returned_raw() {
    let server = MockServer::start_async().await;
    let xml = r#"<?xml version="1.0"?><nodes count="0" totalCount="0"/>"#;
    let mock = server
        .mock_async(|when, then| {
            when.path("/opennms/rest/nodes").header("accept", "application/xml");
            then.status(200).header("content-type", "application/xml").body(xml);
        })
        .await;

    let http = ReqwestHttp::new(server_config(&server));
    let options = RequestOptions::accepting("application/xml").unwrap();
    let result = http.get("rest/nodes", &options).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.content_type.as_deref(), Some("application/xml"));
    assert_eq!(result.body, ResponseBody::Text(xml.to_string()));
}

#[tokio::test]
async fn test_plain_text_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.path("/opennms/rest/alarms/count").header("accept", "text/plain");
            then.status(200).header("content-type", "text/plain").body("42");
        })
        .await;

    let http = ReqwestHttp::new(server_config(&server));
    let options = RequestOptions {
        accept: AcceptType::PlainText,
        ..RequestOptions::default()
    };
    let text = http.get("rest/alarms/count", &options).await.unwrap().into_text().unwrap();
    assert_eq!(text, "42");
}

#[tokio::test]
async fn test_unsupported_accept_type_never_reaches_server() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200);
        })
        .await;

    let err = RequestOptions::accepting("text/csv").unwrap_err();
    assert!(matches!(err, OnmsError::UnsupportedAcceptType(ref mime) if mime == "text/csv"));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_error_status_carries_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.path("/opennms/rest/nodes/999");
            then.status(500).body("Internal Server Error");
        })
        .await;

    let client = OnmsClient::new(server_config(&server));
    let err = client.nodes().get(999, false).await.unwrap_err();

    assert!(err.is_transport());
    match err {
        OnmsError::Status { method, path, status, body } => {
            assert_eq!(method, "GET");
            assert_eq!(path, "rest/nodes/999");
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected Status, got {other}"),
    }
}

#[tokio::test]
async fn test_filter_becomes_query_parameters() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.path("/opennms/rest/nodes")
                .query_param("label", "my router")
                .query_param("limit", "5");
            then.status(200).body(r#"{"count": 0, "totalCount": 0}"#);
        })
        .await;

    let client = OnmsClient::new(server_config(&server));
    let filter = Filter::new().param("label", "my router").limit(5);
    let nodes = client.nodes().find(Some(&filter)).await.unwrap();

    mock.assert_async().await;
    assert!(nodes.is_empty());
}

#[tokio::test]
async fn test_empty_body_reads_as_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/opennms/api/v2/situation-feedback/210");
            then.status(204);
        })
        .await;

    let http = ReqwestHttp::new(server_config(&server));
    let result = http
        .post_json(
            "api/v2/situation-feedback/210",
            &serde_json::json!([]),
            &RequestOptions::json(),
        )
        .await
        .unwrap();
    assert_eq!(result.status, 204);
    assert_eq!(result.body, ResponseBody::Empty);
}

#[tokio::test]
async fn test_request_timeout_is_a_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.path("/opennms/rest/info");
            then.status(200).delay(Duration::from_secs(2)).body("{}");
        })
        .await;

    let http = ReqwestHttp::new(server_config(&server));
    let options = RequestOptions::json().with_timeout(Duration::from_millis(100));
    let err = http.get("rest/info", &options).await.unwrap_err();

    assert!(err.is_transport());
    assert!(matches!(err, OnmsError::Transport(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn test_connection_refused_is_a_transport_error() {
    let config = ServerConfig::builder("http://127.0.0.1:1/opennms/").build().unwrap();
    let err = OnmsClient::new(config).server_metadata().await.unwrap_err();
    assert!(matches!(err, OnmsError::Transport(_)));
    assert!(err.is_transport());
}
