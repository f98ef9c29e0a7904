//! CLI error types with miette diagnostics.
//!
//! Maps `fbgraph_api::Error` categories into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use fbgraph_api::{AuthReason, Error as GraphError};
use fbgraph_config::ConfigError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const DUPLICATE: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const RATE_LIMITED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Graph API")]
    #[diagnostic(
        code(fbgraph::connection_failed),
        help("Check network access, --base-url, and proxy settings.")
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(fbgraph::tls_error),
        help("Check ca_cert in your profile, or use --insecure (-k) against a local proxy.")
    )]
    TlsError { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(fbgraph::timeout),
        help("Increase the timeout with --timeout.")
    )]
    Timeout,

    // ── Authorization ────────────────────────────────────────────────
    #[error("Authorization required: {reason}")]
    #[diagnostic(
        code(fbgraph::auth_required),
        help(
            "{message}\n\
             Pass --access-token, set FBGRAPH_ACCESS_TOKEN, or run: fbgraph config set-token"
        )
    )]
    AuthRequired { reason: String, message: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(fbgraph::permission),
        help("The token is missing a permission this call needs. Re-authorize with the required scope.")
    )]
    Permission { message: String },

    #[error("App secret and access token are both required for appsecret_proof")]
    #[diagnostic(
        code(fbgraph::no_credentials),
        help("Set them in profile '{profile}' or pass --access-token and --app-secret.")
    )]
    NoCredentials { profile: String },

    // ── Graph API results ────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(code(fbgraph::not_found))]
    NotFound { message: String },

    #[error("Duplicate content: {message}")]
    #[diagnostic(
        code(fbgraph::duplicate),
        help("Facebook rejected this write as identical to an earlier one.")
    )]
    Duplicate { message: String },

    #[error("Rate limited: {message}")]
    #[diagnostic(
        code(fbgraph::rate_limited),
        help("Wait before retrying; call volume is throttled for this app, user, or ad account.")
    )]
    RateLimited { message: String },

    #[error("Graph API error (HTTP {status}): {message}")]
    #[diagnostic(code(fbgraph::api_error), help("fbtrace_id: {trace_id}"))]
    ApiError {
        status: u16,
        message: String,
        trace_id: String,
    },

    #[error("Unexpected response: {message}")]
    #[diagnostic(code(fbgraph::response))]
    Response { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fbgraph::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fbgraph::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fbgraph config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(fbgraph::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(fbgraph::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Prompt failed: {0}")]
    #[diagnostic(code(fbgraph::prompt))]
    Prompt(#[from] dialoguer::Error),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(fbgraph::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthRequired { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Permission { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Duplicate { .. } => exit_code::DUPLICATE,
            Self::RateLimited { .. } => exit_code::RATE_LIMITED,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Config(ConfigError::Validation { .. } | ConfigError::UnknownProfile(_)) => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── Error → CliError mapping ─────────────────────────────────────────

impl From<GraphError> for CliError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::AuthRequired { reason, error, .. } => {
                let message = match (reason, error) {
                    (_, Some(e)) => e.to_string(),
                    (AuthReason::NoAccessToken, None) => "This call needs an access token.".into(),
                    (_, None) => String::new(),
                };
                Self::AuthRequired {
                    reason: reason.to_string(),
                    message,
                }
            }
            GraphError::Permission { error, .. } => Self::Permission {
                message: error.to_string(),
            },
            GraphError::ResourceNotFound { error, .. } => Self::NotFound {
                message: error.to_string(),
            },
            GraphError::DuplicateContent { error, .. } => Self::Duplicate {
                message: error.to_string(),
            },
            GraphError::RateLimited { error, .. } => Self::RateLimited {
                message: error.to_string(),
            },
            GraphError::InvalidParameter { error, .. } => Self::Validation {
                field: "parameter".into(),
                reason: error.to_string(),
            },
            GraphError::Api { status, error } => Self::ApiError {
                status,
                trace_id: error.fbtrace_id.clone().unwrap_or_else(|| "-".into()),
                message: error.to_string(),
            },
            GraphError::Transport(e) if e.is_timeout() => Self::Timeout,
            GraphError::Transport(e) => Self::ConnectionFailed { source: e.into() },
            GraphError::Tls(message) => Self::TlsError { message },
            GraphError::InvalidUrl(e) => Self::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },
            GraphError::InvalidObjectId(id) => Self::Validation {
                field: "id".into(),
                reason: format!("{id:?} is not a single path segment"),
            },
            GraphError::InvalidArgument { field, reason } => Self::Validation {
                field: field.into(),
                reason,
            },
            err @ (GraphError::Deserialization { .. }
            | GraphError::MissingId { .. }
            | GraphError::NoFullUrl) => Self::Response {
                message: err.to_string(),
            },
        }
    }
}
