use thiserror::Error;

use crate::classify::{AuthReason, ErrorCategory, FacebookError};

/// Top-level error type for the `fbgraph-api` crate.
///
/// Graph API failures are sorted into one variant per [`ErrorCategory`], each
/// carrying the provider's error verbatim. The remaining variants cover
/// transport, decoding, and local argument problems.
#[derive(Debug, Error)]
pub enum Error {
    // ── Classified Graph API errors ─────────────────────────────────
    /// The token lacks a permission the call needs (code 10, 200-299).
    #[error("Insufficient permission (HTTP {status}): {error}")]
    Permission { status: u16, error: FacebookError },

    /// No usable token: missing locally, or rejected by Facebook.
    #[error("Authorization required ({reason}){}", detail(.error.as_ref()))]
    AuthRequired {
        reason: AuthReason,
        /// `None` when the call never left the process.
        status: Option<u16>,
        error: Option<FacebookError>,
    },

    /// Application, user, or ad account throttling.
    #[error("Rate limited (HTTP {status}): {error}")]
    RateLimited { status: u16, error: FacebookError },

    /// Facebook rejected a write as a duplicate of an earlier one (code 506).
    #[error("Duplicate content (HTTP {status}): {error}")]
    DuplicateContent { status: u16, error: FacebookError },

    #[error("Invalid parameter (HTTP {status}): {error}")]
    InvalidParameter { status: u16, error: FacebookError },

    #[error("Resource not found (HTTP {status}): {error}")]
    ResourceNotFound { status: u16, error: FacebookError },

    /// Any code without a more specific category.
    #[error("Graph API error (HTTP {status}): {error}")]
    Api { status: u16, error: FacebookError },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// `publish` got a success response without an `id`.
    #[error("Response did not contain an id: {body}")]
    MissingId { body: String },

    // ── Arguments ───────────────────────────────────────────────────
    /// Object ids must be a single non-empty path segment.
    #[error("Invalid object id {0:?}")]
    InvalidObjectId(String),

    /// A caller-supplied argument was rejected before any request was made.
    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// A cursor without a server-issued URL cannot be followed directly.
    #[error("Paging cursor has no URL to follow")]
    NoFullUrl,
}

fn detail(error: Option<&FacebookError>) -> String {
    error.map(|e| format!(": {e}")).unwrap_or_default()
}

impl Error {
    /// The classification of a Graph API failure; `None` for local and
    /// transport errors.
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Permission { .. } => Some(ErrorCategory::Permission),
            Self::AuthRequired { .. } => Some(ErrorCategory::AuthRequired),
            Self::RateLimited { .. } => Some(ErrorCategory::RateLimit),
            Self::DuplicateContent { .. } => Some(ErrorCategory::DuplicateContent),
            Self::InvalidParameter { .. } => Some(ErrorCategory::InvalidParameter),
            Self::ResourceNotFound { .. } => Some(ErrorCategory::ResourceNotFound),
            Self::Api { .. } => Some(ErrorCategory::Generic),
            _ => None,
        }
    }

    /// The provider's error, when the failure came from Facebook.
    pub fn facebook_error(&self) -> Option<&FacebookError> {
        match self {
            Self::Permission { error, .. }
            | Self::RateLimited { error, .. }
            | Self::DuplicateContent { error, .. }
            | Self::InvalidParameter { error, .. }
            | Self::ResourceNotFound { error, .. }
            | Self::Api { error, .. } => Some(error),
            Self::AuthRequired { error, .. } => error.as_ref(),
            _ => None,
        }
    }

    /// HTTP status of the failed call, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Permission { status, .. }
            | Self::RateLimited { status, .. }
            | Self::DuplicateContent { status, .. }
            | Self::InvalidParameter { status, .. }
            | Self::ResourceNotFound { status, .. }
            | Self::Api { status, .. } => Some(*status),
            Self::AuthRequired { status, .. } => *status,
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the token is missing, expired, or revoked.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthRequired { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::ResourceNotFound { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` for a duplicate-content rejection, which callers
    /// retrying a write may treat as success.
    pub fn is_duplicate_content(&self) -> bool {
        matches!(self, Self::DuplicateContent { .. })
    }
}
