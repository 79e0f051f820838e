//! Transient input state for the login and creation forms.

use crate::models::{Credentials, NewPost};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }

    pub fn clear(&mut self) {
        self.username.clear();
        self.password.clear();
    }
}

/// Creation form fields. The author is not a field: it is always the
/// logged-in user's display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogForm {
    pub title: String,
    pub url: String,
}

impl BlogForm {
    pub fn payload(&self, author: &str) -> NewPost {
        NewPost {
            title: self.title.clone(),
            author: author.to_string(),
            url: self.url.clone(),
        }
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.url.clear();
    }
}
