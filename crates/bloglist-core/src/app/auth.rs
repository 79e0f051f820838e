//! Login and logout.

use tracing::{error, info, warn};

use super::App;
use crate::api::ApiError;
use crate::storage::Storage;

const LOGIN_FAILED: &str = "wrong username or password";

impl<S: Storage> App<S> {
    /// Sets the login form fields and submits them.
    pub async fn login_with(&mut self, username: &str, password: &str) -> bool {
        self.state.login_form.username = username.to_string();
        self.state.login_form.password = password.to_string();
        self.login().await
    }

    /// Submits the login form.
    ///
    /// On success the session is persisted, the token is handed to the blog
    /// client, the form is cleared and the list is re-fetched. On failure
    /// nothing changes except the notification. Returns true on success.
    pub async fn login(&mut self) -> bool {
        let credentials = self.state.login_form.credentials();

        let session = match self.login_client.login(&credentials).await {
            Ok(session) => session,
            Err(e) => {
                error!(kind = %e.kind, username = %credentials.username, "Wrong credentials: {e}");
                self.state.notification.failure(login_failure_message(&e));
                return false;
            }
        };

        if !session.has_token() || !session.has_identity() {
            error!(username = %credentials.username, "Login response is missing a token or identity");
            self.state.notification.failure(LOGIN_FAILED);
            return false;
        }

        if let Err(e) = self.sessions.save(&session) {
            error!("Failed to persist session: {e:#}");
            self.state
                .notification
                .failure("Logged in, but the session could not be saved.");
            return false;
        }

        info!(username = %session.username, "logged in");
        self.client.set_token(Some(&session.token));
        self.state.login_form.clear();
        self.state
            .notification
            .success(format!("Welcome, {}!", session.display_name()));
        self.state.user = Some(session);

        self.fetch_posts().await;
        true
    }

    /// Forgets the session and reloads the list anonymously.
    pub async fn logout(&mut self) {
        if let Err(e) = self.sessions.clear() {
            warn!("Failed to clear stored session: {e:#}");
        }
        self.client.set_token(None);
        if let Some(user) = self.state.user.take() {
            info!(username = %user.username, "logged out");
        }
        self.state.posts.clear();
        self.state.blog_form.clear();
        self.state.form_open = false;

        self.fetch_posts().await;
    }
}

/// Server-provided message when present, otherwise the generic one.
fn login_failure_message(e: &ApiError) -> String {
    e.server_message
        .clone()
        .unwrap_or_else(|| LOGIN_FAILED.to_string())
}
