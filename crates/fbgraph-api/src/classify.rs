//! Facebook error envelopes and their classification.
//!
//! Failed calls return `{"error": {"code", "error_subcode", "type", "message", ...}}`.
//! [`classify`] sorts the numeric code and HTTP status into an
//! [`ErrorCategory`]; [`into_error`] turns the pair into the matching
//! [`Error`] variant. The provider's code and message are always kept.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Documented Graph API error codes and ranges.
pub mod codes {
    use std::ops::{Range, RangeInclusive};

    pub const UNKNOWN: i64 = 1;
    pub const SERVICE: i64 = 2;
    pub const TOO_MANY_CALLS: i64 = 4;
    pub const PERMISSION_DENIED: i64 = 10;
    pub const USER_TOO_MANY_CALLS: i64 = 17;
    pub const PAGE_TOO_MANY_CALLS: i64 = 32;
    pub const INVALID_PARAMETER: i64 = 100;
    pub const SESSION_KEY: i64 = 102;
    pub const SIGNATURE: i64 = 104;
    pub const ACCESS_TOKEN: i64 = 190;
    pub const EDIT_FEED_TOO_MANY_USER_CALLS: i64 = 341;
    pub const EDIT_FEED_TOO_MANY_USER_ACTION_CALLS: i64 = 342;
    pub const DUPLICATE_MESSAGE: i64 = 506;
    pub const APP_TOO_MANY_CALLS: i64 = 613;
    pub const OBJECT_NOT_FOUND: i64 = 803;
    pub const PATH_UNKNOWN: i64 = 2500;

    /// User permission errors (`200`..`299`).
    pub const PERMISSION_RANGE: Range<i64> = 200..300;
    /// Session errors (`450`..`499`).
    pub const SESSION_RANGE: Range<i64> = 450..500;
    /// Parameter errors other than the ones listed individually.
    pub const PARAMETER_RANGE: Range<i64> = 101..200;
    /// Marketing API throttling.
    pub const ADS_RATE_LIMIT_RANGE: RangeInclusive<i64> = 80_000..=80_014;

    /// `100` + `33`: object does not exist or is not visible.
    pub const SUBCODE_NONEXISTENT_OBJECT: i64 = 33;
    pub const SUBCODE_APP_NOT_INSTALLED: i64 = 458;
    pub const SUBCODE_USER_CHECKPOINTED: i64 = 459;
    pub const SUBCODE_PASSWORD_CHANGED: i64 = 460;
    pub const SUBCODE_EXPIRED: i64 = 463;
    pub const SUBCODE_UNCONFIRMED_USER: i64 = 464;
    pub const SUBCODE_INVALID_TOKEN: i64 = 467;
}

// ── Error envelope ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: Option<FacebookError>,
}

/// The `error` object of a failed Graph API call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacebookError {
    /// `0` on the wire is normalised to `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::decode::optional_code"
    )]
    pub code: Option<i64>,
    #[serde(
        default,
        rename = "error_subcode",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::decode::optional_code"
    )]
    pub subcode: Option<i64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "error_user_msg", skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    #[serde(default, rename = "error_user_title", skip_serializing_if = "Option::is_none")]
    pub user_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbtrace_id: Option<String>,
}

impl FacebookError {
    /// An error with only a message, for bodies that carried no envelope.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

impl std::fmt::Display for FacebookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)?;
        match (self.code, self.subcode) {
            (Some(code), Some(sub)) => write!(f, " (code {code}, subcode {sub})"),
            (Some(code), None) => write!(f, " (code {code})"),
            _ => Ok(()),
        }
    }
}

// ── Categories ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    Permission,
    AuthRequired,
    RateLimit,
    DuplicateContent,
    InvalidParameter,
    ResourceNotFound,
    Generic,
}

/// Why an authorization error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum AuthReason {
    #[strum(to_string = "no access token configured")]
    NoAccessToken,
    #[strum(to_string = "invalid access token")]
    InvalidToken,
    #[strum(to_string = "access token expired")]
    Expired,
    #[strum(to_string = "access token revoked")]
    Revoked,
    #[strum(to_string = "user action required")]
    UserActionRequired,
    #[strum(to_string = "session invalid")]
    SessionInvalid,
    #[strum(to_string = "unauthorized")]
    Unauthorized,
}

fn is_rate_limit(code: i64) -> bool {
    matches!(
        code,
        codes::TOO_MANY_CALLS
            | codes::USER_TOO_MANY_CALLS
            | codes::PAGE_TOO_MANY_CALLS
            | codes::EDIT_FEED_TOO_MANY_USER_CALLS
            | codes::EDIT_FEED_TOO_MANY_USER_ACTION_CALLS
            | codes::APP_TOO_MANY_CALLS
    ) || codes::ADS_RATE_LIMIT_RANGE.contains(&code)
}

fn is_auth(code: i64) -> bool {
    matches!(
        code,
        codes::SESSION_KEY | codes::SIGNATURE | codes::ACCESS_TOKEN
    ) || codes::SESSION_RANGE.contains(&code)
}

/// Classify a failed call.
///
/// Permission and authorization codes win over the HTTP status. Past those,
/// a 404 is always [`ErrorCategory::ResourceNotFound`]. Other statuses are
/// only consulted for bodies without a code.
pub fn classify(status: u16, error: &FacebookError) -> ErrorCategory {
    let Some(code) = error.code else {
        return match status {
            401 => ErrorCategory::AuthRequired,
            403 => ErrorCategory::Permission,
            404 => ErrorCategory::ResourceNotFound,
            429 => ErrorCategory::RateLimit,
            _ => ErrorCategory::Generic,
        };
    };

    if code == codes::PERMISSION_DENIED || codes::PERMISSION_RANGE.contains(&code) {
        ErrorCategory::Permission
    } else if is_auth(code) {
        ErrorCategory::AuthRequired
    } else if status == 404 {
        ErrorCategory::ResourceNotFound
    } else if is_rate_limit(code) {
        ErrorCategory::RateLimit
    } else if code == codes::DUPLICATE_MESSAGE {
        ErrorCategory::DuplicateContent
    } else if code == codes::OBJECT_NOT_FOUND
        || code == codes::PATH_UNKNOWN
        || (code == codes::INVALID_PARAMETER
            && error.subcode == Some(codes::SUBCODE_NONEXISTENT_OBJECT))
    {
        ErrorCategory::ResourceNotFound
    } else if code == codes::INVALID_PARAMETER || codes::PARAMETER_RANGE.contains(&code) {
        ErrorCategory::InvalidParameter
    } else {
        ErrorCategory::Generic
    }
}

/// Refine an [`ErrorCategory::AuthRequired`] classification.
pub fn auth_reason(error: &FacebookError) -> AuthReason {
    match (error.code, error.subcode) {
        (None, _) => AuthReason::Unauthorized,
        (Some(codes::ACCESS_TOKEN), Some(codes::SUBCODE_EXPIRED)) => AuthReason::Expired,
        (
            Some(codes::ACCESS_TOKEN),
            Some(
                codes::SUBCODE_APP_NOT_INSTALLED
                | codes::SUBCODE_PASSWORD_CHANGED
                | codes::SUBCODE_INVALID_TOKEN,
            ),
        ) => AuthReason::Revoked,
        (
            Some(codes::ACCESS_TOKEN),
            Some(codes::SUBCODE_USER_CHECKPOINTED | codes::SUBCODE_UNCONFIRMED_USER),
        ) => AuthReason::UserActionRequired,
        (Some(code), _) if codes::SESSION_RANGE.contains(&code) => AuthReason::SessionInvalid,
        _ => AuthReason::InvalidToken,
    }
}

/// Build the [`Error`] for a failed call.
pub fn into_error(status: u16, error: FacebookError) -> Error {
    match classify(status, &error) {
        ErrorCategory::Permission => Error::Permission { status, error },
        ErrorCategory::AuthRequired => Error::AuthRequired {
            reason: auth_reason(&error),
            status: Some(status),
            error: Some(error),
        },
        ErrorCategory::RateLimit => Error::RateLimited { status, error },
        ErrorCategory::DuplicateContent => Error::DuplicateContent { status, error },
        ErrorCategory::InvalidParameter => Error::InvalidParameter { status, error },
        ErrorCategory::ResourceNotFound => Error::ResourceNotFound { status, error },
        ErrorCategory::Generic => Error::Api { status, error },
    }
}
