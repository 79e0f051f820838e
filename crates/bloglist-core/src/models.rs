//! Wire types shared by the API clients and the app state.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Label used when a post's creator has neither a name nor a username.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Deserializes an identifier sent either as a JSON string or a number.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Locally persisted proof of authentication.
///
/// Missing fields deserialize as empty strings so a stored value without a
/// token can be detected and discarded instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub token: String,
    /// User id, when the login endpoint includes it in the response.
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
}

impl Session {
    /// Name shown for the logged-in user: `name`, falling back to `username`.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }

    /// Returns true if the session carries a usable token.
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Returns true if the session names who it belongs to.
    pub fn has_identity(&self) -> bool {
        !self.name.trim().is_empty() || !self.username.trim().is_empty()
    }

    /// Current user's id.
    ///
    /// Prefers the explicit `id` field; otherwise reads the `id` claim from
    /// the token payload (the token is a JWT signed with `{ username, id }`).
    pub fn user_id(&self) -> Option<String> {
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            return Some(id.to_string());
        }
        token_claim_id(&self.token)
    }
}

/// Extracts the `id` claim from a JWT without verifying it.
fn token_claim_id(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    match claims.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Denormalized reference to a post's creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
}

/// A post's `user` field: populated by the server, or a bare id when the
/// reference was not populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Owner {
    User(UserRef),
    Id(String),
}

impl Owner {
    pub fn id(&self) -> Option<&str> {
        let id = match self {
            Owner::User(user) => user.id.as_str(),
            Owner::Id(id) => id.as_str(),
        };
        (!id.is_empty()).then_some(id)
    }

    /// `name`, falling back to `username`, falling back to [`UNKNOWN_AUTHOR`].
    pub fn label(&self) -> &str {
        match self {
            Owner::User(user) if !user.name.trim().is_empty() => &user.name,
            Owner::User(user) if !user.username.trim().is_empty() => &user.username,
            _ => UNKNOWN_AUTHOR,
        }
    }
}

/// A user-submitted post ("blog").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub url: String,
    /// Server-authoritative like count; absent or null counts as zero.
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default)]
    pub user: Option<Owner>,
}

impl Post {
    pub fn likes(&self) -> u64 {
        self.likes.unwrap_or(0)
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.user.as_ref().and_then(Owner::id)
    }

    pub fn owner_label(&self) -> &str {
        self.user.as_ref().map_or(UNKNOWN_AUTHOR, Owner::label)
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub url: String,
}

/// Partial post sent to the update endpoint. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
}

impl PostUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.url.is_none() && self.likes.is_none()
    }
}

/// Login request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
