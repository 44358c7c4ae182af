//! Blogger v3 publisher.
//!
//! Posts are created with `POST {api_base}/blogs/{blog_id}/posts/` using the
//! bearer token from the stored credential file. An expired token is
//! refreshed before the insert, and a `401` triggers one refresh and retry.
//! Refreshed credentials are written back to the file.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{info, warn};

use super::credentials::{CredentialStore, StoredCredentials};
use super::{PublishReceipt, Publisher};
use crate::config::PublishConfig;
use crate::constants::post::MAX_LABELS;
use crate::types::{BlogError, Post, Result, truncate_chars};

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Serialize)]
struct BlogRef<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct InsertPostRequest<'a> {
    kind: &'static str,
    blog: BlogRef<'a>,
    title: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<&'a [String]>,
}

pub struct BloggerPublisher {
    client: reqwest::Client,
    api_base: String,
    token_uri: String,
    blog_id: Option<String>,
    store: CredentialStore,
}

impl std::fmt::Debug for BloggerPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BloggerPublisher")
            .field("api_base", &self.api_base)
            .field("token_uri", &self.token_uri)
            .field("blog_id", &self.blog_id)
            .field("token_file", &self.store.path())
            .finish()
    }
}

impl BloggerPublisher {
    pub fn new(config: &PublishConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token_uri: config.token_uri.clone(),
            blog_id: config
                .blog_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            store: CredentialStore::new(config.token_file.clone()),
        })
    }

    async fn refresh(&self, credentials: &mut StoredCredentials) -> Result<()> {
        credentials.refresh(&self.client, &self.token_uri).await?;
        self.store.save(credentials)?;
        info!(token_file = %self.store.path().display(), "Refreshed Blogger access token");
        Ok(())
    }

    async fn insert(
        &self,
        blog_id: &str,
        request: &InsertPostRequest<'_>,
        credentials: &StoredCredentials,
    ) -> Result<reqwest::Response> {
        let url = format!("{}/blogs/{}/posts/", self.api_base, blog_id);
        let token = credentials.access_token();
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token.expose_secret())
            .json(request)
            .send()
            .await?)
    }
}

#[async_trait]
impl Publisher for BloggerPublisher {
    async fn publish(&self, post: &Post) -> Result<Option<PublishReceipt>> {
        let Some(blog_id) = self.blog_id.as_deref() else {
            warn!(title = %post.title, "BLOGGER_BLOG_ID not set, skipping post");
            return Ok(None);
        };
        let Some(mut credentials) = self.store.load()? else {
            warn!(
                token_file = %self.store.path().display(),
                title = %post.title,
                "Blogger credential not found, skipping post"
            );
            return Ok(None);
        };

        let mut refreshed = false;
        if credentials.is_expired(Utc::now()) || !credentials.has_access_token() {
            if credentials.can_refresh() {
                self.refresh(&mut credentials).await?;
                refreshed = true;
            } else {
                warn!("Blogger access token expired and cannot be refreshed, sending it anyway");
            }
        }

        let labels = &post.labels[..post.labels.len().min(MAX_LABELS)];
        let labels = (!labels.is_empty()).then_some(labels);
        let request = InsertPostRequest {
            kind: "blogger#post",
            blog: BlogRef { id: blog_id },
            title: &post.title,
            content: &post.content,
            labels,
        };

        let mut response = self.insert(blog_id, &request, &credentials).await?;
        if response.status() == StatusCode::UNAUTHORIZED && !refreshed && credentials.can_refresh() {
            info!("Blogger rejected the access token, refreshing and retrying once");
            self.refresh(&mut credentials).await?;
            response = self.insert(blog_id, &request, &credentials).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlogError::Publish(format!(
                "Blogger returned {}: {}",
                status,
                truncate_chars(&body, 200)
            )));
        }

        let receipt: PublishReceipt = response.json().await?;
        info!(
            post_id = %receipt.id,
            url = receipt.url.as_deref().unwrap_or(""),
            "Posted"
        );
        Ok(Some(receipt))
    }

    fn name(&self) -> &str {
        "blogger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn post(labels: usize) -> Post {
        Post {
            title: "Study abroad in 2026".to_string(),
            content: "<p>body</p>".to_string(),
            labels: (0..labels).map(|i| format!("l{i}")).collect(),
        }
    }

    fn config(server: &MockServer, dir: &TempDir, blog_id: Option<&str>) -> PublishConfig {
        PublishConfig {
            blog_id: blog_id.map(str::to_string),
            token_file: dir.path().join("token.json"),
            api_base: server.uri(),
            token_uri: format!("{}/token", server.uri()),
        }
    }

    fn write_token(dir: &TempDir) {
        std::fs::write(dir.path().join("token.json"), r#"{"access_token": "ya29.token"}"#).unwrap();
    }

    #[tokio::test]
    async fn test_publish_posts_to_blogger() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        write_token(&dir);

        Mock::given(method("POST"))
            .and(path("/blogs/42/posts/"))
            .and(header("authorization", "Bearer ya29.token"))
            .and(body_partial_json(json!({
                "kind": "blogger#post",
                "blog": {"id": "42"},
                "title": "Study abroad in 2026"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "7001",
                "url": "https://blog.example.org/2026/01/study.html"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let publisher = BloggerPublisher::new(&config(&server, &dir, Some("42"))).unwrap();
        let receipt = publisher.publish(&post(25)).await.unwrap().unwrap();
        assert_eq!(receipt.id, "7001");
        assert_eq!(receipt.url.as_deref(), Some("https://blog.example.org/2026/01/study.html"));

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["labels"].as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_labels_omitted_when_empty() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        write_token(&dir);

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
            .mount(&server)
            .await;

        let publisher = BloggerPublisher::new(&config(&server, &dir, Some("42"))).unwrap();
        publisher.publish(&post(0)).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("labels").is_none());
    }

    #[tokio::test]
    async fn test_missing_blog_id_skips() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        write_token(&dir);

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let publisher = BloggerPublisher::new(&config(&server, &dir, Some("  "))).unwrap();
        assert!(publisher.publish(&post(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_token_skips() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let publisher = BloggerPublisher::new(&config(&server, &dir, Some("42"))).unwrap();
        assert!(publisher.publish(&post(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_api_error_is_publish_error() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        write_token(&dir);

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&server)
            .await;

        let publisher = BloggerPublisher::new(&config(&server, &dir, Some("42"))).unwrap();
        let err = publisher.publish(&post(1)).await.unwrap_err();
        assert!(matches!(err, BlogError::Publish(ref msg) if msg.contains("401")));
    }

    fn write_refreshable_token(dir: &TempDir, expiry: &str) {
        let token = json!({
            "access_token": "ya29.stale",
            "refresh_token": "1//refresh",
            "client_id": "client-id",
            "client_secret": "client-secret",
            "expiry": expiry,
            "scopes": ["https://www.googleapis.com/auth/blogger"]
        });
        std::fs::write(dir.path().join("token.json"), token.to_string()).unwrap();
    }

    async fn mount_token_endpoint(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=1%2F%2Frefresh"))
            .and(body_string_contains("client_id=client-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.fresh",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_before_insert() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        write_refreshable_token(&dir, "2020-01-01T00:00:00Z");
        mount_token_endpoint(&server, 1).await;

        Mock::given(method("POST"))
            .and(path("/blogs/42/posts/"))
            .and(header("authorization", "Bearer ya29.fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "9"})))
            .expect(1)
            .mount(&server)
            .await;

        let publisher = BloggerPublisher::new(&config(&server, &dir, Some("42"))).unwrap();
        let receipt = publisher.publish(&post(1)).await.unwrap().unwrap();
        assert_eq!(receipt.id, "9");

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("token.json")).unwrap())
                .unwrap();
        assert_eq!(saved["access_token"], "ya29.fresh");
        assert_eq!(saved["refresh_token"], "1//refresh");
        assert_eq!(saved["scopes"][0], "https://www.googleapis.com/auth/blogger");
        let expiry: chrono::DateTime<Utc> = saved["expiry"].as_str().unwrap().parse().unwrap();
        assert!(expiry > Utc::now());
    }

    #[tokio::test]
    async fn test_unauthorized_triggers_one_refresh_and_retry() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        write_refreshable_token(&dir, "2999-01-01T00:00:00Z");
        mount_token_endpoint(&server, 1).await;

        Mock::given(method("POST"))
            .and(path("/blogs/42/posts/"))
            .and(header("authorization", "Bearer ya29.stale"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token revoked"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/blogs/42/posts/"))
            .and(header("authorization", "Bearer ya29.fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "10"})))
            .expect(1)
            .mount(&server)
            .await;

        let publisher = BloggerPublisher::new(&config(&server, &dir, Some("42"))).unwrap();
        let receipt = publisher.publish(&post(1)).await.unwrap().unwrap();
        assert_eq!(receipt.id, "10");
    }

    #[tokio::test]
    async fn test_failed_refresh_is_publish_error() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        write_refreshable_token(&dir, "2020-01-01T00:00:00Z");

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/blogs/42/posts/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let publisher = BloggerPublisher::new(&config(&server, &dir, Some("42"))).unwrap();
        let err = publisher.publish(&post(1)).await.unwrap_err();
        assert!(matches!(err, BlogError::Publish(ref msg) if msg.contains("invalid_grant")));
    }

    #[tokio::test]
    async fn test_expired_without_refresh_fields_sends_stored_token() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("token.json"),
            r#"{"access_token": "ya29.token", "expiry": "2020-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/blogs/42/posts/"))
            .and(header("authorization", "Bearer ya29.token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "11"})))
            .expect(1)
            .mount(&server)
            .await;

        let publisher = BloggerPublisher::new(&config(&server, &dir, Some("42"))).unwrap();
        assert!(publisher.publish(&post(1)).await.unwrap().is_some());
    }
}
