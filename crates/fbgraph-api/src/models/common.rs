// Small value types shared across Graph objects.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::ExtraData;
use crate::paging::{PagingEnvelope, Summary};

// ── References ───────────────────────────────────────────────────────

/// A pointer to another node: `{"id": "...", "name": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

/// A connection inlined into its parent (`fields=comments.limit(5)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize"))]
pub struct Embedded<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<PagingEnvelope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

impl<T> Default for Embedded<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            paging: None,
            summary: None,
            extra: ExtraData::new(),
        }
    }
}

impl<T> Embedded<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn total_count(&self) -> Option<u64> {
        self.summary.as_ref().and_then(|s| s.total_count)
    }
}

// ── Places ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

// ── Pictures and tags ────────────────────────────────────────────────

/// The object inside a `picture` field's `data` wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default)]
    pub is_silhouette: bool,
    #[serde(flatten)]
    pub extra: ExtraData,
}

/// A person or page tagged in a photo or post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Horizontal position as a percentage of the photo width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::decode::datetime"
    )]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

// ── Birthday ─────────────────────────────────────────────────────────

/// A user birthday. Depending on the granted permission Facebook returns
/// `MM/DD/YYYY`, `MM/DD`, or just `YYYY`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Birthday {
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub year: Option<u16>,
}

impl FromStr for Birthday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || format!("unrecognised birthday {s:?}");
        let parts: Vec<&str> = s.trim().split('/').collect();
        let birthday = match parts.as_slice() {
            [year] => Self {
                year: Some(year.parse().map_err(|_| bad())?),
                ..Self::default()
            },
            [month, day] => Self {
                month: Some(month.parse().map_err(|_| bad())?),
                day: Some(day.parse().map_err(|_| bad())?),
                year: None,
            },
            [month, day, year] => Self {
                month: Some(month.parse().map_err(|_| bad())?),
                day: Some(day.parse().map_err(|_| bad())?),
                year: Some(year.parse().map_err(|_| bad())?),
            },
            _ => return Err(bad()),
        };
        let month_ok = birthday.month.is_none_or(|m| (1..=12).contains(&m));
        let day_ok = birthday.day.is_none_or(|d| (1..=31).contains(&d));
        if month_ok && day_ok {
            Ok(birthday)
        } else {
            Err(bad())
        }
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day, self.year) {
            (Some(m), Some(d), Some(y)) => write!(f, "{m:02}/{d:02}/{y:04}"),
            (Some(m), Some(d), None) => write!(f, "{m:02}/{d:02}"),
            (_, _, Some(y)) => write!(f, "{y:04}"),
            _ => Ok(()),
        }
    }
}

impl Serialize for Birthday {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Birthday {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn birthday_accepts_partial_forms() {
        let full: Birthday = "03/15/1984".parse().unwrap();
        assert_eq!((full.month, full.day, full.year), (Some(3), Some(15), Some(1984)));
        assert_eq!(full.to_string(), "03/15/1984");

        let no_year: Birthday = "12/01".parse().unwrap();
        assert_eq!(no_year.year, None);
        assert_eq!(no_year.to_string(), "12/01");

        let year_only: Birthday = "1990".parse().unwrap();
        assert_eq!(year_only.year, Some(1990));
        assert_eq!(year_only.month, None);

        assert!("13/40/2000".parse::<Birthday>().is_err());
        assert!("soon".parse::<Birthday>().is_err());
    }

    #[test]
    fn reference_keeps_unknown_fields() {
        let r: Reference =
            serde_json::from_value(json!({"id": "1", "name": "A", "category": "Band"})).unwrap();
        assert_eq!(r.id, "1");
        assert_eq!(r.extra["category"], json!("Band"));
    }

    #[test]
    fn embedded_reads_summary_total() {
        let e: Embedded<Reference> = serde_json::from_value(json!({
            "data": [{"id": "1"}],
            "summary": {"total_count": 12}
        }))
        .unwrap();
        assert_eq!(e.data.len(), 1);
        assert_eq!(e.total_count(), Some(12));
    }

    #[test]
    fn embedded_round_trips_keys_beside_data() {
        let input = json!({
            "data": [{"id": "8"}],
            "count": 4,
            "paging": {
                "cursors": {"before": "A", "after": "B", "marker": 1},
                "next": "https://graph.facebook.com/v19.0/1/likes?after=B"
            }
        });
        let e: Embedded<Reference> = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(e.extra["count"], json!(4));
        assert_eq!(serde_json::to_value(&e).unwrap(), input);
    }

    #[test]
    fn absent_options_are_not_written_as_null() {
        let place: Place = serde_json::from_value(json!({
            "name": "Cafe",
            "location": {"city": "Oslo"}
        }))
        .unwrap();
        assert_eq!(
            serde_json::to_value(&place).unwrap(),
            json!({"name": "Cafe", "location": {"city": "Oslo"}})
        );
        let r: Reference = serde_json::from_value(json!({"id": "8"})).unwrap();
        assert_eq!(serde_json::to_value(&r).unwrap(), json!({"id": "8"}));
    }
}
