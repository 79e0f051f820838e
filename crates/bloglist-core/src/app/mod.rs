//! Application state and the actions that mutate it.
//!
//! [`App`] owns the API clients, the session slot and the [`AppState`]
//! views render from. Every action is an `async fn(&mut self)` awaited on
//! the caller's task; failures never escape an action: they become a
//! [`Notification`] plus a log event.

mod auth;
mod form;
mod list;
mod notification;
mod posts;

use std::time::Duration;

pub use form::{BlogForm, LoginForm};
pub use list::{PostControls, PostList, is_owner};
pub use notification::{DEFAULT_TIMEOUT, Notification, Severity};
use tracing::{debug, error, info, warn};

use crate::api::{BlogClient, LoginClient};
use crate::config::Config;
use crate::models::{Post, Session};
use crate::session::{SessionStore, StoredSession};
use crate::storage::Storage;

/// Everything a view reads.
#[derive(Debug, Default)]
pub struct AppState {
    /// Logged-in user, if any
    pub user: Option<Session>,
    pub posts: PostList,
    pub login_form: LoginForm,
    pub blog_form: BlogForm,
    /// Whether the creation form is shown
    pub form_open: bool,
    pub notification: Notification,
}

impl AppState {
    pub fn new(notification_timeout: Duration) -> Self {
        Self {
            notification: Notification::new(notification_timeout),
            ..Self::default()
        }
    }
}

/// Outcome of [`App::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Startup {
    pub restore: Restore,
    /// Whether the initial list fetch succeeded
    pub fetched: bool,
}

/// How startup resolved the stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restore {
    /// A stored session was adopted
    Restored,
    /// A stored value was unusable and has been removed
    Discarded,
    /// Nothing was stored
    Anonymous,
}

pub struct App<S: Storage> {
    client: BlogClient,
    login_client: LoginClient,
    sessions: SessionStore<S>,
    pub state: AppState,
}

impl<S: Storage> App<S> {
    pub fn new(
        client: BlogClient,
        login_client: LoginClient,
        storage: S,
        notification_timeout: Duration,
    ) -> Self {
        Self {
            client,
            login_client,
            sessions: SessionStore::new(storage),
            state: AppState::new(notification_timeout),
        }
    }

    /// Builds an app against the configured API.
    ///
    /// # Errors
    /// Returns an error if the configured API URL is invalid.
    pub fn from_config(config: &Config, storage: S) -> anyhow::Result<Self> {
        Ok(Self::new(
            BlogClient::from_config(config)?,
            LoginClient::from_config(config)?,
            storage,
            config.notification_timeout(),
        ))
    }

    pub fn client(&self) -> &BlogClient {
        &self.client
    }

    pub fn sessions(&self) -> &SessionStore<S> {
        &self.sessions
    }

    pub fn current_user(&self) -> Option<&Session> {
        self.state.user.as_ref()
    }

    /// Restores the stored session, then performs the initial list fetch.
    ///
    /// Exactly one list fetch happens whatever the stored session held.
    pub async fn start(&mut self) -> Startup {
        let restore = self.restore_session();
        let fetched = self.fetch_posts().await;
        Startup { restore, fetched }
    }

    fn restore_session(&mut self) -> Restore {
        match self.sessions.load() {
            StoredSession::Valid(session) => {
                debug!(username = %session.username, "restored session");
                self.client.set_token(Some(&session.token));
                self.state.user = Some(session);
                Restore::Restored
            }
            StoredSession::Corrupt => {
                warn!("Discarding corrupt stored session");
                if let Err(e) = self.sessions.clear() {
                    warn!("Failed to clear stored session: {e:#}");
                }
                Restore::Discarded
            }
            StoredSession::Missing => Restore::Anonymous,
        }
    }

    /// Replaces the post list with the server's listing.
    ///
    /// On failure the list keeps its previous contents. Returns true on
    /// success.
    pub async fn fetch_posts(&mut self) -> bool {
        match self.client.list_all().await {
            Ok(posts) => {
                info!(count = posts.len(), "fetched blogs");
                self.state.posts.replace_all(posts);
                true
            }
            Err(e) => {
                error!(kind = %e.kind, "Failed to fetch blogs: {e}");
                false
            }
        }
    }

    /// Flips a post's detail view. Returns the new expanded state.
    pub fn toggle_details(&mut self, id: &str) -> bool {
        self.state.posts.toggle(id)
    }

    pub fn open_form(&mut self) {
        self.state.form_open = true;
    }

    pub fn close_form(&mut self) {
        self.state.form_open = false;
    }

    /// Controls the current viewer gets for `post`.
    pub fn controls(&self, post: &Post) -> PostControls {
        PostControls::for_viewer(post, self.current_user())
    }

    /// Posts in display order.
    pub fn sorted_posts(&self) -> Vec<&Post> {
        self.state.posts.sorted()
    }

    /// Clears the notification once it has expired. Returns true if cleared.
    pub fn tick(&mut self) -> bool {
        self.state.notification.check_and_clear()
    }
}
