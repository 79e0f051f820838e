//! HTTP clients for the bloglist API.
//!
//! [`BlogClient`] covers the `/api/blogs` resource and owns the bearer token
//! used for create and remove. [`LoginClient`] exchanges credentials for a
//! [`Session`].

mod errors;

pub use errors::{ApiError, ApiErrorKind};
use anyhow::Context;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::models::{Credentials, NewPost, Post, PostUpdate, Session};

/// Standard User-Agent header for bloglist requests.
pub const USER_AGENT: &str = concat!("bloglist/", env!("CARGO_PKG_VERSION"));

fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Parses an endpoint URL that path segments can be appended to.
fn parse_endpoint(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim().trim_end_matches('/'))
        .with_context(|| format!("Invalid endpoint URL: {raw}"))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("Endpoint URL has no path: {raw}");
    }
    Ok(url)
}

/// Ids that would address a parent path once placed in the URL.
fn is_dot_segment(id: &str) -> bool {
    let decoded = id.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Reads a JSON body from a response, mapping non-success statuses.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::from_reqwest(&e))?;
    if !status.is_success() {
        return Err(ApiError::http_status(status.as_u16(), &body));
    }
    serde_json::from_str(&body)
        .map_err(|e| ApiError::parse(format!("Invalid response body: {e}"), &body))
}

/// Client for the blogs resource.
///
/// The auth token is a field of the instance; `set_token` after login and
/// `set_token(None)` on logout.
pub struct BlogClient {
    http: reqwest::Client,
    base: Url,
    /// Full `Authorization` header value (`Bearer <token>`)
    authorization: Option<String>,
}

impl BlogClient {
    /// Creates a client for the blogs resource at `base_url`
    /// (e.g. `http://localhost:3003/api/blogs`).
    ///
    /// # Errors
    /// Returns an error if `base_url` is not a hierarchical URL or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_client()?,
            base: parse_endpoint(base_url)?,
            authorization: None,
        })
    }

    /// Creates a client from the effective config.
    ///
    /// # Errors
    /// Returns an error if the configured API URL is invalid.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(&config.blogs_url()?)
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Sets or clears the bearer token.
    pub fn set_token(&mut self, token: Option<&str>) {
        self.authorization = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| format!("Bearer {t}"));
    }

    pub fn has_token(&self) -> bool {
        self.authorization.is_some()
    }

    /// `<base>/<id>[/<action>]` with the id as one escaped path segment.
    fn item_url(&self, id: &str, action: Option<&str>) -> Result<Url, ApiError> {
        if id.is_empty() || is_dot_segment(id) {
            return Err(ApiError::invalid_request(format!("Invalid blog id: {id:?}")));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::invalid_request(format!("Cannot extend {}", self.base)))?
            .pop_if_empty()
            .push(id)
            .extend(action);
        Ok(url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.authorization {
            Some(value) => builder.header(reqwest::header::AUTHORIZATION, value),
            None => builder,
        }
    }

    /// Fetches every post. No authentication required.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status, or an
    /// unexpected body.
    pub async fn list_all(&self) -> Result<Vec<Post>, ApiError> {
        debug!(url = %self.base, "listing blogs");
        let response = self
            .http
            .get(self.base.clone())
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;
        read_json(response).await
    }

    /// Creates a post as the token's owner.
    ///
    /// # Errors
    /// Returns [`ApiErrorKind::Unauthorized`] when the server rejects the
    /// token (or none is set), and other kinds on transport or body errors.
    pub async fn create(&self, post: &NewPost) -> Result<Post, ApiError> {
        debug!(title = %post.title, "creating blog");
        let response = self
            .authorized(self.http.post(self.base.clone()))
            .json(post)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;
        read_json(response).await
    }

    /// Registers one like. The server returns the post with the new count.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status, or an
    /// unexpected body.
    pub async fn like(&self, id: &str) -> Result<Post, ApiError> {
        debug!(id, "liking blog");
        let url = self.item_url(id, Some("like"))?;
        let response = self
            .http
            .put(url)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;
        read_json(response).await
    }

    /// Sends a partial post to the update endpoint.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status, or an
    /// unexpected body.
    pub async fn update(&self, id: &str, changes: &PostUpdate) -> Result<Post, ApiError> {
        debug!(id, "updating blog");
        let response = self
            .http
            .put(self.item_url(id, None)?)
            .json(changes)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;
        read_json(response).await
    }

    /// Deletes a post. Only the creator's token is accepted by the server.
    ///
    /// # Errors
    /// Returns [`ApiErrorKind::Unauthorized`] for a missing or foreign
    /// token, and other kinds on transport errors.
    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        debug!(id, "removing blog");
        let response = self
            .authorized(self.http.delete(self.item_url(id, None)?))
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::http_status(status.as_u16(), &body))
    }
}

/// Client for the login endpoint.
pub struct LoginClient {
    http: reqwest::Client,
    url: Url,
}

impl LoginClient {
    /// # Errors
    /// Returns an error if `url` is invalid or the HTTP client cannot be
    /// built.
    pub fn new(url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_client()?,
            url: parse_endpoint(url)?,
        })
    }

    /// Creates a client from the effective config.
    ///
    /// # Errors
    /// Returns an error if the configured API URL is invalid.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(&config.login_url()?)
    }

    /// Exchanges credentials for a session.
    ///
    /// # Errors
    /// Returns [`ApiErrorKind::Unauthorized`] for rejected credentials, and
    /// other kinds on transport or body errors.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        debug!(username = %credentials.username, "logging in");
        let response = self
            .http
            .post(self.url.clone())
            .json(credentials)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;
        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;

    fn blogs_client(server: &MockServer) -> BlogClient {
        BlogClient::new(&format!("{}/api/blogs", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_list_all_is_unauthenticated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/blogs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "title": "A", "author": "x", "url": "u", "likes": 3},
                {"id": "2", "title": "B", "author": "y", "url": "v"}
            ])))
            .mount(&server)
            .await;

        let mut client = blogs_client(&server);
        client.set_token(Some("secret"));
        let posts = client.list_all().await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].likes(), 0);
        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_create_sends_bearer_token_and_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/blogs"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({"title": "T", "author": "A", "url": "U"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "new-id", "title": "T", "author": "A", "url": "U", "likes": 0,
                "user": {"id": "u1", "name": "Alice", "username": "alice"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = blogs_client(&server);
        client.set_token(Some("tok"));
        let created = client
            .create(&NewPost {
                title: "T".into(),
                author: "A".into(),
                url: "U".into(),
            })
            .await
            .unwrap();

        assert_eq!(created.id, "new-id");
        assert_eq!(created.likes(), 0);
    }

    #[tokio::test]
    async fn test_create_without_token_surfaces_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/blogs"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "token invalid"})),
            )
            .mount(&server)
            .await;

        let client = blogs_client(&server);
        let err = client
            .create(&NewPost {
                title: "T".into(),
                author: "A".into(),
                url: "U".into(),
            })
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(err.server_message.as_deref(), Some("token invalid"));
        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_like_puts_to_like_endpoint_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/blogs/42/like"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "42", "title": "T", "author": "A", "url": "U", "likes": 6
            })))
            .mount(&server)
            .await;

        let updated = blogs_client(&server).like("42").await.unwrap();

        assert_eq!(updated.likes(), 6);
        let requests: Vec<Request> = server.received_requests().await.unwrap();
        assert!(requests[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_update_sends_partial_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/blogs/7"))
            .and(body_json(json!({"title": "Renamed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "7", "title": "Renamed", "author": "A", "url": "U", "likes": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let changes = PostUpdate {
            title: Some("Renamed".into()),
            ..PostUpdate::default()
        };
        let updated = blogs_client(&server).update("7", &changes).await.unwrap();
        assert_eq!(updated.title, "Renamed");
    }

    #[tokio::test]
    async fn test_remove_sends_token_and_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/blogs/9"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = blogs_client(&server);
        client.set_token(Some("tok"));
        client.remove("9").await.unwrap();
    }

    #[tokio::test]
    async fn test_item_id_is_escaped_as_one_segment() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/blogs/..%2Fusers%2F7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = blogs_client(&server);
        client.set_token(Some("tok"));
        client.remove("../users/7").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/api/blogs/..%2Fusers%2F7");
    }

    #[tokio::test]
    async fn test_like_escapes_query_characters_in_id() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/blogs/a%3Fb/like"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "a?b", "title": "T", "likes": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let liked = blogs_client(&server).like("a?b").await.unwrap();
        assert_eq!(liked.id, "a?b");
    }

    #[tokio::test]
    async fn test_dot_ids_are_rejected_without_a_request() {
        let server = MockServer::start().await;
        let mut client = blogs_client(&server);
        client.set_token(Some("tok"));

        for id in ["", ".", "..", "%2e%2E"] {
            let err = client.remove(id).await.unwrap_err();
            assert_eq!(err.kind, ApiErrorKind::InvalidRequest);
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_endpoint() {
        assert!(BlogClient::new("not a url").is_err());
        assert!(LoginClient::new("mailto:someone@example.test").is_err());
    }

    #[tokio::test]
    async fn test_set_token_none_clears_header() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/blogs/9"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut client = blogs_client(&server);
        client.set_token(Some("tok"));
        client.set_token(None);
        let err = client.remove("9").await.unwrap_err();

        assert!(!client.has_token());
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_login_returns_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(body_json(json!({"username": "alice", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Alice", "username": "alice", "token": "tok"
            })))
            .mount(&server)
            .await;

        let session = LoginClient::new(&format!("{}/api/login", server.uri()))
            .unwrap()
            .login(&Credentials {
                username: "alice".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();

        assert_eq!(session.token, "tok");
        assert_eq!(session.display_name(), "Alice");
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/blogs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = blogs_client(&server).list_all().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Parse);
    }
}
