// Feed posts
//
// A post's shape depends on its `type` discriminator. The discriminator is
// read first, then the matching variant takes the attributes only it owns.
// Everything not claimed by the common fields or the variant is kept in
// `Post::extra`.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::common::{Embedded, Place, Reference};
use super::comment::Comment;
use crate::decode::{self, FACEBOOK_DATETIME_FORMAT};
use crate::fields::{ExtraData, FieldError, FieldMap, lenient_enum};

lenient_enum! {
    /// Wire values of the post `type` discriminator.
    pub enum PostType {
        Status => "status",
        Link => "link",
        Photo => "photo",
        Video => "video",
        Music => "music",
        Event => "event",
        Checkin => "checkin",
    }
}

// ── Variant cases ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAttachment {
    pub link: Option<String>,
    pub name: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoAttachment {
    pub object_id: Option<String>,
    pub picture: Option<String>,
    pub link: Option<String>,
    pub name: Option<String>,
}

/// Video and music posts: `source` is the playable media URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub source: Option<String>,
    pub object_id: Option<String>,
    pub picture: Option<String>,
    pub link: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttachment {
    pub object_id: Option<String>,
    pub link: Option<String>,
    pub name: Option<String>,
}

/// The variant part of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostContent {
    Status,
    Link(LinkAttachment),
    Photo(PhotoAttachment),
    Video(MediaAttachment),
    Music(MediaAttachment),
    Event(EventAttachment),
    Checkin,
    /// Missing or unrecognised `type`; the raw value is kept when present.
    Unknown { raw_type: Option<String> },
}

impl Default for PostContent {
    fn default() -> Self {
        Self::Unknown { raw_type: None }
    }
}

impl PostContent {
    /// The discriminator this content is written back with.
    pub fn type_str(&self) -> Option<&str> {
        Some(match self {
            Self::Status => "status",
            Self::Link(_) => "link",
            Self::Photo(_) => "photo",
            Self::Video(_) => "video",
            Self::Music(_) => "music",
            Self::Event(_) => "event",
            Self::Checkin => "checkin",
            Self::Unknown { raw_type } => return raw_type.as_deref(),
        })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }

    fn take(kind: Option<PostType>, raw: Option<String>, f: &mut FieldMap) -> Result<Self, FieldError> {
        Ok(match kind {
            Some(PostType::Status) => Self::Status,
            Some(PostType::Link) => Self::Link(LinkAttachment {
                link: f.take("link")?,
                name: f.take("name")?,
                caption: f.take("caption")?,
                description: f.take("description")?,
                picture: f.take("picture")?,
            }),
            Some(PostType::Photo) => Self::Photo(PhotoAttachment {
                object_id: f.take("object_id")?,
                picture: f.take("picture")?,
                link: f.take("link")?,
                name: f.take("name")?,
            }),
            Some(PostType::Video) => Self::Video(MediaAttachment::take(f)?),
            Some(PostType::Music) => Self::Music(MediaAttachment::take(f)?),
            Some(PostType::Event) => Self::Event(EventAttachment {
                object_id: f.take("object_id")?,
                link: f.take("link")?,
                name: f.take("name")?,
            }),
            Some(PostType::Checkin) => Self::Checkin,
            Some(PostType::Unknown(_)) | None => Self::Unknown { raw_type: raw },
        })
    }

    fn put(&self, f: &mut FieldMap) -> Result<(), serde_json::Error> {
        match self {
            Self::Link(a) => {
                f.put("link", &a.link)?;
                f.put("name", &a.name)?;
                f.put("caption", &a.caption)?;
                f.put("description", &a.description)?;
                f.put("picture", &a.picture)?;
            }
            Self::Photo(a) => {
                f.put("object_id", &a.object_id)?;
                f.put("picture", &a.picture)?;
                f.put("link", &a.link)?;
                f.put("name", &a.name)?;
            }
            Self::Video(a) | Self::Music(a) => {
                f.put("source", &a.source)?;
                f.put("object_id", &a.object_id)?;
                f.put("picture", &a.picture)?;
                f.put("link", &a.link)?;
                f.put("name", &a.name)?;
                f.put("description", &a.description)?;
            }
            Self::Event(a) => {
                f.put("object_id", &a.object_id)?;
                f.put("link", &a.link)?;
                f.put("name", &a.name)?;
            }
            Self::Status | Self::Checkin | Self::Unknown { .. } => {}
        }
        if let Some(t) = self.type_str() {
            f.put("type", &t)?;
        }
        Ok(())
    }
}

impl MediaAttachment {
    fn take(f: &mut FieldMap) -> Result<Self, FieldError> {
        Ok(Self {
            source: f.take("source")?,
            object_id: f.take("object_id")?,
            picture: f.take("picture")?,
            link: f.take("link")?,
            name: f.take("name")?,
            description: f.take("description")?,
        })
    }
}

// ── Post ─────────────────────────────────────────────────────────────

/// A feed entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Post {
    pub id: String,
    pub from: Option<Reference>,
    pub to: Option<Embedded<Reference>>,
    pub with_tags: Option<Embedded<Reference>>,
    pub message: Option<String>,
    pub story: Option<String>,
    pub place: Option<Place>,
    pub application: Option<Reference>,
    pub status_type: Option<String>,
    pub permalink_url: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub updated_time: Option<DateTime<Utc>>,
    pub comments: Option<Embedded<Comment>>,
    pub likes: Option<Embedded<Reference>>,
    pub content: PostContent,
    pub extra: ExtraData,
}

impl Post {
    /// Decode a post from the fields of a JSON object.
    pub fn from_fields(mut f: FieldMap) -> Result<Self, FieldError> {
        let raw_type = f.peek_str("type").map(str::to_owned);
        if raw_type.is_some() {
            f.take_value("type");
        }
        let kind = raw_type.as_deref().map(PostType::from_wire);
        let content = PostContent::take(kind, raw_type, &mut f)?;

        Ok(Self {
            id: f.take_or_default("id")?,
            from: f.take("from")?,
            to: f.take("to")?,
            with_tags: f.take("with_tags")?,
            message: f.take("message")?,
            story: f.take("story")?,
            place: f.take("place")?,
            application: f.take("application")?,
            status_type: f.take("status_type")?,
            permalink_url: f.take("permalink_url")?,
            created_time: f
                .take_with("created_time", decode::datetime::deserialize)?
                .flatten(),
            updated_time: f
                .take_with("updated_time", decode::datetime::deserialize)?
                .flatten(),
            comments: f.take("comments")?,
            likes: f.take("likes")?,
            content,
            extra: f.into_extra(),
        })
    }

    /// Encode back to the wire shape, extra fields included.
    pub fn to_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let fmt_time =
            |t: &Option<DateTime<Utc>>| t.map(|d| d.format(FACEBOOK_DATETIME_FORMAT).to_string());

        let mut f = FieldMap::default();
        f.put("id", &self.id)?;
        f.put("from", &self.from)?;
        f.put("to", &self.to)?;
        f.put("with_tags", &self.with_tags)?;
        f.put("message", &self.message)?;
        f.put("story", &self.story)?;
        f.put("place", &self.place)?;
        f.put("application", &self.application)?;
        f.put("status_type", &self.status_type)?;
        f.put("permalink_url", &self.permalink_url)?;
        f.put("created_time", &fmt_time(&self.created_time))?;
        f.put("updated_time", &fmt_time(&self.updated_time))?;
        f.put("comments", &self.comments)?;
        f.put("likes", &self.likes)?;
        self.content.put(&mut f)?;
        f.merge_extra(&self.extra);
        Ok(f.into_map())
    }

    pub fn post_type(&self) -> Option<&str> {
        self.content.type_str()
    }
}

impl<'de> Deserialize<'de> for Post {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(d)?;
        Self::from_fields(FieldMap::new(map)).map_err(D::Error::custom)
    }
}

impl Serialize for Post {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_fields().map_err(S::Error::custom)?.serialize(s)
    }
}
