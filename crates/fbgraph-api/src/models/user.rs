use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{Birthday, Picture, Reference};
use crate::fields::{ExtraData, lenient_enum};

lenient_enum! {
    pub enum Gender {
        Male => "male",
        Female => "female",
    }
}

/// A Facebook user. Most fields need a matching permission and are absent
/// otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub birthday: Option<Birthday>,
    #[serde(default)]
    pub location: Option<Reference>,
    #[serde(default)]
    pub hometown: Option<Reference>,
    #[serde(default, with = "crate::decode::data_object")]
    pub picture: Option<Picture>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default, with = "crate::decode::datetime")]
    pub updated_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

impl User {
    /// Best available display name.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.short_name.as_deref())
            .unwrap_or(&self.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_profile_with_picture_and_birthday() {
        let user: User = serde_json::from_value(json!({
            "id": "4",
            "name": "Mark Zuckerberg",
            "gender": "male",
            "birthday": "05/14",
            "picture": {"data": {"url": "https://cdn/x.jpg", "is_silhouette": false}},
            "updated_time": "2012-03-15T20:34:55+0000",
            "unexpected_field": 42
        }))
        .unwrap();

        assert_eq!(user.display_name(), "Mark Zuckerberg");
        assert_eq!(user.gender, Some(Gender::Male));
        assert_eq!(user.birthday.unwrap().day, Some(14));
        assert_eq!(
            user.picture.unwrap().url.as_deref(),
            Some("https://cdn/x.jpg")
        );
        assert_eq!(
            user.updated_time.unwrap().to_rfc3339(),
            "2012-03-15T20:34:55+00:00"
        );
        assert_eq!(user.extra["unexpected_field"], json!(42));
    }

    #[test]
    fn unlisted_gender_is_kept() {
        let user: User = serde_json::from_value(json!({"id": "1", "gender": "custom"})).unwrap();
        assert_eq!(user.gender, Some(Gender::Unknown("custom".into())));
    }
}
