// Request parameter types: field selectors, query parameters, form bodies,
// and image size requests.

use bytes::Bytes;
use reqwest::multipart;

use crate::error::Error;
use crate::paging::PagingCursor;

// ── Field selector ───────────────────────────────────────────────────

/// Ordered, de-duplicated set of field names sent as `fields=a,b,c`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelector(Vec<String>);

impl FieldSelector {
    /// Let the server pick its default fields.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields.into_iter().collect()
    }

    /// Parse a comma-separated list, ignoring blanks.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(',').map(str::trim).filter(|f| !f.is_empty()))
    }

    pub fn push(&mut self, field: impl Into<String>) {
        let field = field.into();
        if !self.0.contains(&field) {
            self.0.push(field);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The `fields` query value, or `None` when no projection was requested.
    pub fn to_param(&self) -> Option<String> {
        (!self.0.is_empty()).then(|| self.0.join(","))
    }
}

impl<S: Into<String>> FromIterator<S> for FieldSelector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut sel = Self::default();
        for f in iter {
            sel.push(f);
        }
        sel
    }
}

impl From<&[&str]> for FieldSelector {
    fn from(fields: &[&str]) -> Self {
        Self::new(fields.iter().copied())
    }
}

// ── Query parameters ─────────────────────────────────────────────────

/// Ordered query parameters. Later inserts of the same key replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Insert only if the key is not already present.
    pub fn insert_missing(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        if !self.contains_key(&key) {
            self.0.push((key, value.to_string()));
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Fill in a cursor's window without overriding explicit parameters.
    pub fn merge_cursor(&mut self, cursor: &PagingCursor) {
        for (k, v) in cursor.to_query_parameters() {
            self.insert_missing(k, v);
        }
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut p = Self::default();
        for (k, v) in iter {
            p.insert(k, v);
        }
        p
    }
}

// ── Form bodies ──────────────────────────────────────────────────────

/// A binary part of a multipart upload (photo, video).
#[derive(Debug, Clone)]
pub struct Attachment {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Body of a `POST`: text fields plus optional binary attachments.
///
/// Sent form-encoded unless an attachment is present, in which case the
/// whole form goes out as `multipart/form-data`.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: Vec<(String, String)>,
    attachments: Vec<Attachment>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn attachment(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.attachments.push(Attachment {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        });
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn is_multipart(&self) -> bool {
        !self.attachments.is_empty()
    }

    pub(crate) fn into_multipart(self) -> Result<multipart::Form, Error> {
        let mut form = multipart::Form::new();
        for (k, v) in self.fields {
            form = form.text(k, v);
        }
        for a in self.attachments {
            let part = multipart::Part::stream(a.bytes)
                .file_name(a.file_name)
                .mime_str(&a.content_type)
                .map_err(|e| Error::InvalidArgument {
                    field: "content_type",
                    reason: e.to_string(),
                })?;
            form = form.part(a.field, part);
        }
        Ok(form)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |form, (k, v)| form.text(k, v))
    }
}

// ── Images ───────────────────────────────────────────────────────────

/// Predefined picture sizes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageType {
    Square,
    Small,
    Normal,
    Large,
    Album,
}

/// How to size a requested image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSpec {
    Type(ImageType),
    Size { width: u32, height: u32 },
}

impl ImageSpec {
    pub(crate) fn to_params(self) -> Params {
        match self {
            Self::Type(t) => Params::new().with("type", t),
            Self::Size { width, height } => Params::new()
                .with("width", width)
                .with("height", height),
        }
    }
}

impl From<ImageType> for ImageSpec {
    fn from(t: ImageType) -> Self {
        Self::Type(t)
    }
}
