// Page and post insights.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::{ExtraData, lenient_enum};

lenient_enum! {
    /// Insight metric names. Any metric the API accepts can be requested;
    /// unlisted ones travel as `Metric::Unknown`.
    pub enum Metric {
        PageImpressions => "page_impressions",
        PageImpressionsUnique => "page_impressions_unique",
        PageEngagedUsers => "page_engaged_users",
        PagePostEngagements => "page_post_engagements",
        PageFans => "page_fans",
        PageFanAdds => "page_fan_adds",
        PageFanRemoves => "page_fan_removes",
        PageViewsTotal => "page_views_total",
        PostImpressions => "post_impressions",
        PostImpressionsUnique => "post_impressions_unique",
        PostEngagedUsers => "post_engaged_users",
        PostClicks => "post_clicks",
        PostReactionsByTypeTotal => "post_reactions_by_type_total",
    }
}

lenient_enum! {
    /// Aggregation window of an insight.
    pub enum Period {
        Day => "day",
        Week => "week",
        Days28 => "days_28",
        Month => "month",
        Lifetime => "lifetime",
        TotalOverRange => "total_over_range",
    }
}

/// A metric value: a plain count, a breakdown by key (reactions by type,
/// fans by country), or anything else verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(i64),
    Number(f64),
    Breakdown(BTreeMap<String, Value>),
    Other(Value),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
            Self::Count(n) => Some(*n as f64),
            Self::Number(n) => Some(*n),
            Self::Breakdown(_) | Self::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightValue {
    pub value: MetricValue,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::decode::datetime"
    )]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub values: Vec<InsightValue>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

impl Insight {
    /// The most recent value, which is last on the wire.
    pub fn latest(&self) -> Option<&InsightValue> {
        self.values.last()
    }
}
