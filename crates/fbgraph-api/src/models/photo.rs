use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{Embedded, Place, Reference, Tag};
use crate::fields::ExtraData;

/// One rendition of a photo in the `images` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(flatten)]
    pub extra: ExtraData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub from: Option<Reference>,
    #[serde(default)]
    pub album: Option<Reference>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub images: Vec<ImageSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Embedded<Tag>>,
    #[serde(default)]
    pub place: Option<Place>,
    #[serde(default, with = "crate::decode::datetime")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::decode::datetime")]
    pub updated_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

impl Photo {
    /// The widest rendition, if the `images` field was requested.
    pub fn largest_image(&self) -> Option<&ImageSource> {
        self.images.iter().max_by_key(|i| i.width)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_tags_and_renditions() {
        let photo: Photo = serde_json::from_value(json!({
            "id": "10150146071831729",
            "images": [
                {"source": "https://cdn/s.jpg", "width": 130, "height": 97},
                {"source": "https://cdn/l.jpg", "width": 720, "height": 540}
            ],
            "tags": {"data": [{"id": "1", "name": "A", "x": 42.5, "y": 10.0}]}
        }))
        .unwrap();
        assert_eq!(photo.largest_image().unwrap().source, "https://cdn/l.jpg");
        let tags = photo.tags.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.data[0].x, Some(42.5));
    }
}
