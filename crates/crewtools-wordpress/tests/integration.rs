//! Integration tests for the WordPress tool against a mocked site.
//!
//! Each test stands up a wiremock server in place of a WordPress install
//! and checks the outgoing request shape (Basic auth, JSON body, status
//! defaulting) and the error behavior: unlike the Google tools, every
//! failure here propagates as an error instead of a failure result.

use crewtools_core::{CrewState, Tool, ToolError, env_keys};
use crewtools_wordpress::{WordPressConfig, WordPressCredentials, WordPressPost};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointing at the mock site with inline credentials.
fn config_for(server: &MockServer) -> WordPressConfig {
    WordPressConfig {
        credentials: WordPressCredentials {
            url: Some(server.uri()),
            username: Some("admin".into()),
            password: Some("secret".into()),
        },
        accept_invalid_certs: false,
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Posting
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn post_sends_basic_auth_and_defaults_to_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/posts"))
        .and(header("Authorization", "Basic YWRtaW46c2VjcmV0"))
        .and(body_json(json!({
            "title": "Hello",
            "content": "<p>First post</p>",
            "status": "draft"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42,
            "link": "https://blog.example.com/?p=42",
            "status": "draft",
            "type": "post"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tool = WordPressPost::new(config_for(&server));
    let result = tool
        .invoke(json!({"title": "Hello", "content": "<p>First post</p>"}))
        .await
        .unwrap();

    assert_eq!(
        result,
        json!({
            "id": 42,
            "url": "https://blog.example.com/?p=42",
            "status": "draft"
        })
    );
}

#[tokio::test]
async fn post_passes_publish_status_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/posts"))
        .and(body_json(json!({
            "title": "Live",
            "content": "now",
            "status": "publish"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7,
            "link": "https://blog.example.com/live/",
            "status": "publish"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tool = WordPressPost::new(config_for(&server));
    let result = tool
        .invoke(json!({"title": "Live", "content": "now", "status": "publish"}))
        .await
        .unwrap();
    assert_eq!(result["status"], "publish");
}

#[tokio::test]
async fn trailing_slash_in_site_url_is_trimmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/posts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let config = WordPressConfig {
        credentials: WordPressCredentials {
            url: Some(format!("{}/", server.uri())),
            username: Some("admin".into()),
            password: Some("secret".into()),
        },
        accept_invalid_certs: false,
    };
    let tool = WordPressPost::new(config);
    let result = tool
        .invoke(json!({"title": "T", "content": "C"}))
        .await
        .unwrap();
    assert_eq!(result["id"], 1);
}

// ═══════════════════════════════════════════════════════════════════════
//  Errors
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn non_2xx_response_surfaces_body_in_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/posts"))
        .respond_with(
            ResponseTemplate::new(403).set_body_string(r#"{"code":"rest_cannot_create"}"#),
        )
        .mount(&server)
        .await;

    let tool = WordPressPost::new(config_for(&server));
    let err = tool
        .invoke(json!({"title": "T", "content": "C"}))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::Api { .. }));
    assert_eq!(
        err.to_string(),
        r#"WordPress API error: {"code":"rest_cannot_create"}"#
    );
}

#[tokio::test]
async fn connection_errors_surface_as_transport_errors() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    drop(server);

    let tool = WordPressPost::new(config);
    let err = tool
        .invoke(json!({"title": "T", "content": "C"}))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::Transport { .. }));
    assert!(err.to_string().contains("Failed to post to WordPress"));
}

// ═══════════════════════════════════════════════════════════════════════
//  Crew-state credential fallback
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn credentials_resolve_from_crew_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/posts"))
        .and(header("Authorization", "Basic YWRtaW46c2VjcmV0"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let state = CrewState::new();
    state.set_env_var(env_keys::WORDPRESS_URL, &server.uri());
    state.set_env_var(env_keys::WORDPRESS_USERNAME, "admin");
    state.set_env_var(env_keys::WORDPRESS_PASSWORD, "secret");

    let tool = WordPressPost::new(WordPressConfig::default()).with_state(state);
    let result = tool
        .invoke(json!({"title": "T", "content": "C"}))
        .await
        .unwrap();
    assert_eq!(result["id"], 9);
}
