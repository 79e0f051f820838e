//! Create, like, update and remove.

use tracing::{debug, error, info, warn};

use super::App;
use crate::models::PostUpdate;
use crate::storage::Storage;

const CREATE_FAILED: &str = "Blog creation failed. Please check your inputs.";
const LIKE_FAILED: &str = "Failed to like the blog.";
const UPDATE_FAILED: &str = "Failed to update the blog.";
const REMOVE_FAILED: &str = "Failed to delete the blog. Only the creator can delete a blog.";

impl<S: Storage> App<S> {
    /// Submits the creation form as the logged-in user.
    ///
    /// On success the returned post is appended, the title and url are
    /// cleared and the form is closed. On failure the fields are kept.
    /// Returns true on success.
    pub async fn submit_blog(&mut self) -> bool {
        let Some(user) = self.state.user.as_ref() else {
            warn!("Blog creation attempted without a session");
            self.state.notification.failure(CREATE_FAILED);
            return false;
        };
        let author = user.display_name().to_string();
        let payload = self.state.blog_form.payload(&author);

        match self.client.create(&payload).await {
            Ok(created) => {
                info!(id = %created.id, "Added new blog: {}", created.title);
                self.state
                    .notification
                    .success(format!("a new blog {} by {author} added", created.title));
                self.state.posts.push(created);
                self.state.blog_form.clear();
                self.state.form_open = false;
                true
            }
            Err(e) => {
                error!(kind = %e.kind, "Failed to create blog: {e}");
                self.state.notification.failure(CREATE_FAILED);
                false
            }
        }
    }

    /// Sets the creation form fields and submits them.
    pub async fn create_blog(&mut self, title: &str, url: &str) -> bool {
        self.state.blog_form.title = title.to_string();
        self.state.blog_form.url = url.to_string();
        self.submit_blog().await
    }

    /// Likes a post and swaps in the server's copy. Requires a session.
    pub async fn like(&mut self, id: &str) -> bool {
        if self.state.user.is_none() {
            warn!(id, "Like attempted without a session");
            self.state.notification.failure(LIKE_FAILED);
            return false;
        }

        match self.client.like(id).await {
            Ok(updated) => {
                self.state.notification.success(format!(
                    "Liked blog: {}. New likes: {}",
                    updated.title,
                    updated.likes()
                ));
                if !self.state.posts.replace(updated) {
                    debug!(id, "liked blog is not in the local list");
                }
                true
            }
            Err(e) => {
                error!(kind = %e.kind, id, "Failed to like blog: {e}");
                self.state.notification.failure(LIKE_FAILED);
                false
            }
        }
    }

    /// Sends a partial update and swaps in the server's copy.
    pub async fn update(&mut self, id: &str, changes: &PostUpdate) -> bool {
        match self.client.update(id, changes).await {
            Ok(updated) => {
                self.state
                    .notification
                    .success(format!("Updated blog: {}", updated.title));
                if !self.state.posts.replace(updated) {
                    debug!(id, "updated blog is not in the local list");
                }
                true
            }
            Err(e) => {
                error!(kind = %e.kind, id, "Failed to update blog: {e}");
                self.state.notification.failure(UPDATE_FAILED);
                false
            }
        }
    }

    /// Confirmation text for removing a post, or `None` if it is not listed.
    pub fn remove_prompt(&self, id: &str) -> Option<String> {
        let post = self.state.posts.get(id)?;
        Some(format!(
            "Remove blog {} by {}?",
            post.title,
            post.owner_label()
        ))
    }

    /// Deletes a post. The server only accepts the creator's token.
    pub async fn remove(&mut self, id: &str) -> bool {
        let title = self
            .state
            .posts
            .get(id)
            .map_or_else(|| id.to_string(), |post| post.title.clone());

        match self.client.remove(id).await {
            Ok(()) => {
                info!(id, "removed blog");
                self.state.posts.remove(id);
                self.state
                    .notification
                    .success(format!("Successfully removed blog: {title}"));
                true
            }
            Err(e) => {
                error!(kind = %e.kind, id, "Failed to delete blog: {e}");
                self.state.notification.failure(REMOVE_FAILED);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::app::Severity;
    use crate::app::test_support::{alice, app_for, post_json};
    use crate::models::Post;
    use crate::storage::MemoryStorage;

    fn post(id: &str, title: &str, likes: u64, owner: Option<&str>) -> Post {
        serde_json::from_value(post_json(id, title, likes, owner)).unwrap()
    }

    fn logged_in(server: &MockServer) -> App<MemoryStorage> {
        let mut app = app_for(server, MemoryStorage::new());
        let user = alice("1");
        app.client.set_token(Some(&user.token));
        app.state.user = Some(user);
        app
    }

    #[tokio::test]
    async fn test_create_appends_post_and_resets_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/blogs"))
            .and(header("authorization", "Bearer alice-token"))
            .and(body_json(json!({"title": "T", "author": "Alice", "url": "U"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "server-id", "title": "T", "author": "Alice", "url": "U", "likes": 0,
                "user": {"id": "1", "name": "Alice", "username": "alice"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = logged_in(&server);
        app.open_form();
        assert!(app.create_blog("T", "U").await);

        let created = app.state.posts.get("server-id").unwrap();
        assert_eq!(
            (created.title.as_str(), created.author.as_str(), created.url.as_str()),
            ("T", "Alice", "U")
        );
        assert_eq!(created.likes(), 0);
        assert!(app.controls(created).remove);
        assert_eq!(app.state.blog_form.title, "");
        assert_eq!(app.state.blog_form.url, "");
        assert!(!app.state.form_open);
        assert_eq!(
            app.state.notification.current(),
            Some(("a new blog T by Alice added", Severity::Success))
        );
    }

    #[tokio::test]
    async fn test_failed_create_keeps_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/blogs"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "url missing"})))
            .mount(&server)
            .await;

        let mut app = logged_in(&server);
        app.open_form();
        assert!(!app.create_blog("T", "").await);

        assert_eq!(app.state.blog_form.title, "T");
        assert!(app.state.form_open);
        assert!(app.state.posts.is_empty());
        assert_eq!(
            app.state.notification.current(),
            Some((CREATE_FAILED, Severity::Failure))
        );
    }

    #[tokio::test]
    async fn test_create_without_session_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = app_for(&server, MemoryStorage::new());
        assert!(!app.create_blog("T", "U").await);
        assert_eq!(
            app.state.notification.current(),
            Some((CREATE_FAILED, Severity::Failure))
        );
    }

    #[tokio::test]
    async fn test_like_replaces_post_wholesale() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/blogs/42/like"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "42", "title": "Liked", "author": "Writer",
                "url": "https://example.test/42", "likes": 6
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = logged_in(&server);
        let other = post("7", "Other", 9, Some("2"));
        app.state
            .posts
            .replace_all(vec![other.clone(), post("42", "Liked", 5, Some("2"))]);

        assert!(app.like("42").await);

        let liked = app.state.posts.get("42").unwrap();
        assert_eq!(liked.likes(), 6);
        // The server copy had no user; the local copy follows it.
        assert!(liked.user.is_none());
        assert_eq!(app.state.posts.get("7"), Some(&other));
        assert_eq!(
            app.state.notification.current(),
            Some(("Liked blog: Liked. New likes: 6", Severity::Success))
        );
    }

    #[tokio::test]
    async fn test_like_failure_leaves_list() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/blogs/42/like"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut app = logged_in(&server);
        app.state.posts.replace_all(vec![post("42", "T", 5, None)]);

        assert!(!app.like("42").await);
        assert_eq!(app.state.posts.get("42").unwrap().likes(), 5);
        assert_eq!(
            app.state.notification.current(),
            Some((LIKE_FAILED, Severity::Failure))
        );
    }

    #[tokio::test]
    async fn test_update_replaces_post() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/blogs/42"))
            .and(body_json(json!({"url": "https://new.test"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "42", "title": "T", "author": "A", "url": "https://new.test", "likes": 5
            })))
            .mount(&server)
            .await;

        let mut app = logged_in(&server);
        app.state.posts.replace_all(vec![post("42", "T", 5, None)]);

        let changes = PostUpdate {
            url: Some("https://new.test".into()),
            ..PostUpdate::default()
        };
        assert!(app.update("42", &changes).await);
        assert_eq!(app.state.posts.get("42").unwrap().url, "https://new.test");
    }

    #[tokio::test]
    async fn test_remove_drops_post_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/blogs/42"))
            .and(header("authorization", "Bearer alice-token"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = logged_in(&server);
        app.state
            .posts
            .replace_all(vec![post("42", "Mine", 1, Some("1")), post("7", "Other", 0, None)]);

        assert_eq!(
            app.remove_prompt("42").as_deref(),
            Some("Remove blog Mine by Owner Name?")
        );
        assert!(app.remove("42").await);

        assert!(app.state.posts.get("42").is_none());
        assert_eq!(app.state.posts.len(), 1);
        assert_eq!(
            app.state.notification.current(),
            Some(("Successfully removed blog: Mine", Severity::Success))
        );
    }

    #[tokio::test]
    async fn test_remove_by_non_owner_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/blogs/42"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "only the creator can delete"})),
            )
            .mount(&server)
            .await;

        let mut app = logged_in(&server);
        app.state.posts.replace_all(vec![post("42", "Theirs", 1, Some("2"))]);

        assert!(!app.controls(app.state.posts.get("42").unwrap()).remove);
        assert!(!app.remove("42").await);
        assert_eq!(app.state.posts.len(), 1);
        assert_eq!(
            app.state.notification.current(),
            Some((REMOVE_FAILED, Severity::Failure))
        );
    }
}
