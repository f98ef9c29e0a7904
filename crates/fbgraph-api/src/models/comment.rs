use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{Reference, Tag};
use crate::fields::ExtraData;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub from: Option<Reference>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub message_tags: Vec<Tag>,
    #[serde(default)]
    pub parent: Option<Reference>,
    #[serde(default, deserialize_with = "crate::decode::optional_u64")]
    pub like_count: Option<u64>,
    #[serde(default, deserialize_with = "crate::decode::optional_u64")]
    pub comment_count: Option<u64>,
    #[serde(default)]
    pub can_remove: bool,
    #[serde(default)]
    pub user_likes: bool,
    #[serde(default, with = "crate::decode::datetime")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: ExtraData,
}
