// Per-field decoders for Facebook's wire conventions.
//
// Used through `#[serde(with = "...")]` / `deserialize_with` on model fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Facebook's default datetime layout: `2012-03-15T20:34:55+0000`.
pub const FACEBOOK_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parse any datetime shape the Graph API emits.
///
/// Accepts the `+0000` offset form, RFC 3339, a bare `YYYY-MM-DD` date
/// (midnight UTC) and unix seconds as a string.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_str(raw, FACEBOOK_DATETIME_FORMAT) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

/// `Option<DateTime<Utc>>` in any of the shapes [`parse_datetime`] accepts, or
/// an integer unix timestamp (`date_format=U`).
pub mod datetime {
    use serde::de::Error;

    use super::{DateTime, Deserialize, Deserializer, Serializer, TimeZone, Utc, Value};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => super::parse_datetime(&s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("unrecognised datetime {s:?}"))),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid unix timestamp {n}"))),
            Some(other) => Err(D::Error::custom(format!("expected a datetime, got {other}"))),
        }
    }

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => s.serialize_str(&dt.format(super::FACEBOOK_DATETIME_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }
}

/// Object wrapped as `{"data": {...}}`, e.g. profile pictures.
pub mod data_object {
    use super::{Deserialize, DeserializeOwned, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    struct Wrapper<T> {
        data: Option<T>,
    }

    #[derive(Serialize)]
    struct WrapperRef<'a, T> {
        data: &'a T,
    }

    pub fn deserialize<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Wrapper<T>>::deserialize(d)?.and_then(|w| w.data))
    }

    #[allow(clippy::ref_option)]
    pub fn serialize<S, T>(value: &Option<T>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(data) => WrapperRef { data }.serialize(s),
            None => s.serialize_none(),
        }
    }
}

/// Numeric error codes, tolerating numeric strings. `0` means "no code".
pub fn optional_code<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let code = match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(code.filter(|c| *c != 0))
}

/// Numbers that Facebook sometimes sends as strings (`"fan_count": "12"`).
pub fn optional_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected an unsigned integer, got {n}"))),
        Some(Value::String(s)) => s
            .parse::<u64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an unsigned integer, got {s:?}"))),
        Some(other) => Err(D::Error::custom(format!(
            "expected an unsigned integer, got {other}"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    struct Stamped {
        #[serde(default, with = "datetime")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn parses_facebook_offset_format() {
        let dt = parse_datetime("2012-03-15T20:34:55+0000").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2012, 3, 15));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (20, 34, 55));
    }

    #[test]
    fn parses_non_utc_offsets_into_utc() {
        let dt = parse_datetime("2012-03-15T20:34:55-0700").unwrap();
        assert_eq!(dt.hour(), 3);
        assert_eq!(dt.day(), 16);
    }

    #[test]
    fn parses_rfc3339_and_bare_dates() {
        assert!(parse_datetime("2024-06-15T10:30:00Z").is_some());
        let d = parse_datetime("2024-06-15").unwrap();
        assert_eq!(d.hour(), 0);
        assert!(parse_datetime("not a date").is_none());
    }

    #[test]
    fn datetime_field_accepts_unix_seconds() {
        let s: Stamped = serde_json::from_value(json!({"at": 1_331_843_695})).unwrap();
        assert_eq!(s.at.unwrap().year(), 2012);

        let missing: Stamped = serde_json::from_value(json!({})).unwrap();
        assert!(missing.at.is_none());
    }

    #[test]
    fn datetime_field_rejects_garbage() {
        let err = serde_json::from_value::<Stamped>(json!({"at": "soon"})).unwrap_err();
        assert!(err.to_string().contains("unrecognised datetime"));
    }

    #[test]
    fn datetime_serializes_in_facebook_format() {
        let s: Stamped = serde_json::from_value(json!({"at": "2012-03-15T20:34:55+0000"})).unwrap();
        let out = serde_json::to_value(&s).unwrap();
        assert_eq!(out["at"], json!("2012-03-15T20:34:55+0000"));
    }

    #[test]
    fn optional_code_treats_zero_as_absent() {
        #[derive(Deserialize)]
        struct C {
            #[serde(default, deserialize_with = "optional_code")]
            code: Option<i64>,
        }
        let zero: C = serde_json::from_value(json!({"code": 0})).unwrap();
        assert!(zero.code.is_none());
        let text: C = serde_json::from_value(json!({"code": "190"})).unwrap();
        assert_eq!(text.code, Some(190));
    }
}
