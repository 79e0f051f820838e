use std::fmt;

use serde_json::Value;

/// Categories of API failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Non-success HTTP status other than an auth rejection
    HttpStatus,
    /// 401/403: missing, invalid, or foreign token
    Unauthorized,
    /// Connection refused, timeout, or other transport failure
    Connection,
    /// Response body did not match the expected shape
    Parse,
    /// Request could not be built, e.g. an id that is not a path segment
    InvalidRequest,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::Connection => write!(f, "connection"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::InvalidRequest => write!(f, "invalid_request"),
        }
    }
}

/// Structured error from the bloglist API.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// One-line summary suitable for logs
    pub message: String,
    /// Message from the server's `{"error": ...}` body, if any
    pub server_message: Option<String>,
    /// Raw response body or transport detail
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            server_message: None,
            details: None,
        }
    }

    /// Creates an error from a non-success response.
    pub fn http_status(status: u16, body: &str) -> Self {
        let kind = if status == 401 || status == 403 {
            ApiErrorKind::Unauthorized
        } else {
            ApiErrorKind::HttpStatus
        };
        let server_message = extract_server_message(body);
        let message = match &server_message {
            Some(msg) => format!("HTTP {status}: {msg}"),
            None => format!("HTTP {status}"),
        };
        Self {
            kind,
            status: Some(status),
            message,
            server_message,
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Connection, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidRequest, message)
    }

    pub fn parse(message: impl Into<String>, body: &str) -> Self {
        Self {
            details: (!body.is_empty()).then(|| body.to_string()),
            ..Self::new(ApiErrorKind::Parse, message)
        }
    }

    /// Classifies a reqwest transport error.
    pub(crate) fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::connection(format!("Request timed out: {e}"))
        } else if e.is_connect() {
            Self::connection(format!("Connection failed: {e}"))
        } else if e.is_decode() {
            Self::new(ApiErrorKind::Parse, format!("Failed to decode response: {e}"))
        } else {
            Self::connection(format!("Request error: {e}"))
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

/// Pulls a human-readable message out of `{"error": "..."}` or
/// `{"error": {"message": "..."}}` bodies.
fn extract_server_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    let error = json.get("error")?;
    let msg = match error {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("message")?.as_str()?,
        _ => return None,
    };
    let msg = msg.trim();
    (!msg.is_empty()).then(|| msg.to_string())
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
