use serde::{Deserialize, Serialize};

use super::common::{Location, Picture};
use crate::fields::ExtraData;

/// A Facebook Page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "crate::decode::optional_u64")]
    pub fan_count: Option<u64>,
    #[serde(default, deserialize_with = "crate::decode::optional_u64")]
    pub followers_count: Option<u64>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default, with = "crate::decode::data_object")]
    pub picture: Option<Picture>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn counts_may_arrive_as_strings() {
        let page: Page = serde_json::from_value(json!({
            "id": "20531316728",
            "name": "Facebook",
            "fan_count": "188000000",
            "followers_count": 190000000,
            "location": {"city": "Menlo Park", "latitude": 37.48}
        }))
        .unwrap();
        assert_eq!(page.fan_count, Some(188_000_000));
        assert_eq!(page.followers_count, Some(190_000_000));
        assert_eq!(page.location.unwrap().city.as_deref(), Some("Menlo Park"));
    }
}
