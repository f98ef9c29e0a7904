use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::Error;

/// Object ids that stand for "the token's owner" and so never work anonymously.
const TOKEN_BOUND_IDS: &[&str] = &["me"];

/// Whether a read of `object_id` needs an access token to make sense.
pub fn requires_token(object_id: &str) -> bool {
    TOKEN_BOUND_IDS
        .iter()
        .any(|alias| object_id.eq_ignore_ascii_case(alias))
}

// ── App secret proof ─────────────────────────────────────────────────

/// `appsecret_proof` query parameter: hex HMAC-SHA256 of the access token,
/// keyed by the app secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AppSecretProof(String);

impl AppSecretProof {
    pub const PARAM: &'static str = "appsecret_proof";

    pub fn compute(app_secret: &SecretString, access_token: &SecretString) -> Self {
        let mut mac = Hmac::<Sha256>::new_from_slice(app_secret.expose_secret().as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(access_token.expose_secret().as_bytes());
        Self(hex::encode(mac.finalize().into_bytes()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AppSecretProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppSecretProof([REDACTED])")
    }
}

// ── API version ──────────────────────────────────────────────────────

/// Graph API version, rendered as the `vMAJOR.MINOR` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    pub major: u16,
    pub minor: u16,
}

impl ApiVersion {
    pub const DEFAULT: Self = Self::new(19, 0);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    /// Accepts `v19.0`, `19.0`, and `v19`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidArgument {
            field: "api_version",
            reason: format!("expected vMAJOR.MINOR, got {s:?}"),
        };
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let (major, minor) = body.split_once('.').unwrap_or((body, "0"));
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn proof_matches_reference_hmac() {
        let secret = SecretString::from("app-secret");
        let token = SecretString::from("user-token");
        let proof = AppSecretProof::compute(&secret, &token);
        assert_eq!(
            proof.as_str(),
            "b5a94d985eb7b68467d28ca5375162d12b9ca8fe238615acc927c8a9c08d2e95"
        );
    }

    #[test]
    fn proof_debug_is_redacted() {
        let proof = AppSecretProof::compute(&"s".into(), &"t".into());
        assert_eq!(format!("{proof:?}"), "AppSecretProof([REDACTED])");
    }

    #[test]
    fn version_parsing() {
        assert_eq!("v19.0".parse::<ApiVersion>().unwrap(), ApiVersion::new(19, 0));
        assert_eq!("18.3".parse::<ApiVersion>().unwrap(), ApiVersion::new(18, 3));
        assert_eq!("v20".parse::<ApiVersion>().unwrap(), ApiVersion::new(20, 0));
        assert!("latest".parse::<ApiVersion>().is_err());
        assert_eq!(ApiVersion::new(2, 12).to_string(), "v2.12");
    }

    #[test]
    fn me_requires_a_token() {
        assert!(requires_token("me"));
        assert!(requires_token("ME"));
        assert!(!requires_token("20531316728"));
    }
}
