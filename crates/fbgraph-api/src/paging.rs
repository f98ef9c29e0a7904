// Paging cursors and paged results
//
// Collection responses carry a `paging` envelope whose `previous` / `next`
// URLs encode the window for the neighbouring page. We lift those query
// strings into `PagingCursor` values; callers hand a cursor back to
// `GraphClient::fetch_connections` to move through the collection. Nothing
// here ever walks more than one page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::fields::ExtraData;

/// Wire name of the paging token parameter.
const PAGING_TOKEN_PARAM: &str = "__paging_token";

// ── Cursor ───────────────────────────────────────────────────────────

/// A window over a Graph collection.
///
/// Every field is optional; unset fields are omitted from the query string.
/// `full_url` keeps the exact URL the server handed out, when there was one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingCursor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    since: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    until: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    paging_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    full_url: Option<String>,
}

impl PagingCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Unix seconds.
    pub fn with_since(mut self, since: i64) -> Self {
        self.since = Some(since);
        self
    }

    /// Unix seconds.
    pub fn with_until(mut self, until: i64) -> Self {
        self.until = Some(until);
        self
    }

    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self
    }

    pub fn with_paging_token(mut self, token: impl Into<String>) -> Self {
        self.paging_token = Some(token.into());
        self
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    pub fn since(&self) -> Option<i64> {
        self.since
    }

    pub fn until(&self) -> Option<i64> {
        self.until
    }

    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }

    pub fn before(&self) -> Option<&str> {
        self.before.as_deref()
    }

    pub fn paging_token(&self) -> Option<&str> {
        self.paging_token.as_deref()
    }

    pub fn full_url(&self) -> Option<&str> {
        self.full_url.as_deref()
    }

    /// Build a cursor from query-string pairs.
    ///
    /// Unrecognised keys are ignored. Numeric fields that fail to parse are
    /// left unset.
    pub fn from_query_parameters<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut c = Self::default();
        for (k, v) in pairs {
            let v = v.as_ref();
            match k.as_ref() {
                "limit" => c.limit = v.parse().ok(),
                "offset" => c.offset = v.parse().ok(),
                "since" => c.since = v.parse().ok(),
                "until" => c.until = v.parse().ok(),
                "after" => c.after = Some(v.to_owned()),
                "before" => c.before = Some(v.to_owned()),
                PAGING_TOKEN_PARAM => c.paging_token = Some(v.to_owned()),
                _ => {}
            }
        }
        c
    }

    /// Build a cursor from a `paging.previous` / `paging.next` URL.
    pub fn from_url(raw: &str) -> Option<Self> {
        let url = Url::parse(raw).ok()?;
        let mut c = Self::from_query_parameters(url.query_pairs());
        c.full_url = Some(raw.to_owned());
        Some(c)
    }

    /// The cursor as query parameters. Unset fields are omitted entirely.
    pub fn to_query_parameters(&self) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        if let Some(v) = self.limit {
            params.insert("limit", v.to_string());
        }
        if let Some(v) = self.offset {
            params.insert("offset", v.to_string());
        }
        if let Some(v) = self.since {
            params.insert("since", v.to_string());
        }
        if let Some(v) = self.until {
            params.insert("until", v.to_string());
        }
        if let Some(ref v) = self.after {
            params.insert("after", v.clone());
        }
        if let Some(ref v) = self.before {
            params.insert("before", v.clone());
        }
        if let Some(ref v) = self.paging_token {
            params.insert(PAGING_TOKEN_PARAM, v.clone());
        }
        params
    }
}

// ── Wire envelope ────────────────────────────────────────────────────

/// The `paging` object of a collection response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagingEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursors: Option<Cursors>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cursors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

impl PagingEnvelope {
    /// Cursor for the following page, `None` when this is the last one.
    pub fn next_cursor(&self) -> Option<PagingCursor> {
        let mut cursor = PagingCursor::from_url(self.next.as_deref()?)?;
        if cursor.after.is_none() {
            cursor.after = self.cursors.as_ref().and_then(|c| c.after.clone());
        }
        Some(cursor)
    }

    /// Cursor for the preceding page, `None` when this is the first one.
    pub fn previous_cursor(&self) -> Option<PagingCursor> {
        let mut cursor = PagingCursor::from_url(self.previous.as_deref()?)?;
        if cursor.before.is_none() {
            cursor.before = self.cursors.as_ref().and_then(|c| c.before.clone());
        }
        Some(cursor)
    }
}

/// The `summary` object some connections attach (`summary=true`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::decode::optional_u64"
    )]
    pub total_count: Option<u64>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

/// A whole collection response: `{ data, paging, summary }`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub paging: Option<PagingEnvelope>,
    #[serde(default)]
    pub summary: Option<Summary>,
}

impl<T> ListEnvelope<T> {
    pub fn into_paged(self) -> PagedResult<T> {
        let (previous_page, next_page) = match self.paging {
            Some(ref p) => (p.previous_cursor(), p.next_cursor()),
            None => (None, None),
        };
        PagedResult {
            items: self.data,
            previous_page,
            next_page,
            total_count: self.summary.and_then(|s| s.total_count),
        }
    }
}

// ── Paged result ─────────────────────────────────────────────────────

/// One page of a connection.
///
/// `total_count` is whatever the server reported in `summary.total_count`
/// and can exceed `items().len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    previous_page: Option<PagingCursor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_page: Option<PagingCursor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_count: Option<u64>,
}

impl<T> PagedResult<T> {
    pub fn new(
        items: Vec<T>,
        previous_page: Option<PagingCursor>,
        next_page: Option<PagingCursor>,
        total_count: Option<u64>,
    ) -> Self {
        Self {
            items,
            previous_page,
            next_page,
            total_count,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn next_page(&self) -> Option<&PagingCursor> {
        self.next_page.as_ref()
    }

    pub fn previous_page(&self) -> Option<&PagingCursor> {
        self.previous_page.as_ref()
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }
}

impl<T> IntoIterator for PagedResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedResult<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn query_round_trip_keeps_present_fields_and_omits_absent() {
        let pairs = [
            ("limit", "25"),
            ("until", "1364849754"),
            ("after", "QVFIUm"),
            ("__paging_token", "enc_AdC"),
        ];
        let cursor = PagingCursor::from_query_parameters(pairs);
        let out = cursor.to_query_parameters();

        assert_eq!(out.len(), 4);
        for (k, v) in pairs {
            assert_eq!(out.get(k).map(String::as_str), Some(v), "key {k}");
        }
        assert!(!out.contains_key("offset"));
        assert!(!out.contains_key("since"));
        assert!(!out.contains_key("before"));
        assert!(out.values().all(|v| v != "null"));
    }

    #[test]
    fn empty_cursor_has_no_parameters() {
        assert!(PagingCursor::new().to_query_parameters().is_empty());
    }

    #[test]
    fn unknown_keys_and_bad_numbers_are_ignored() {
        let cursor = PagingCursor::from_query_parameters([
            ("access_token", "secret"),
            ("limit", "lots"),
            ("offset", "10"),
        ]);
        assert_eq!(cursor.limit(), None);
        assert_eq!(cursor.offset(), Some(10));
        assert_eq!(cursor.to_query_parameters().len(), 1);
    }

    #[test]
    fn from_url_keeps_full_url() {
        let raw = "https://graph.facebook.com/v19.0/me/feed?limit=5&after=XYZ&access_token=t";
        let cursor = PagingCursor::from_url(raw).unwrap();
        assert_eq!(cursor.after(), Some("XYZ"));
        assert_eq!(cursor.limit(), Some(5));
        assert_eq!(cursor.full_url(), Some(raw));
        assert!(!cursor.to_query_parameters().contains_key("access_token"));
    }

    #[test]
    fn envelope_without_next_is_terminal() {
        let env: ListEnvelope<serde_json::Value> = serde_json::from_value(json!({
            "data": [{"id": "1"}],
            "paging": {"cursors": {"before": "B", "after": "A"}}
        }))
        .unwrap();
        let page = env.into_paged();
        assert_eq!(page.len(), 1);
        assert!(page.next_page().is_none());
        assert!(page.previous_page().is_none());
    }

    #[test]
    fn envelope_fills_cursor_tokens_from_cursors_object() {
        let env: ListEnvelope<serde_json::Value> = serde_json::from_value(json!({
            "data": [],
            "paging": {
                "cursors": {"before": "B", "after": "A"},
                "next": "https://graph.facebook.com/v19.0/1/comments?limit=10",
                "previous": "https://graph.facebook.com/v19.0/1/comments?limit=10&before=B2"
            },
            "summary": {"total_count": 42, "can_comment": true}
        }))
        .unwrap();
        let page = env.into_paged();
        assert_eq!(page.next_page().unwrap().after(), Some("A"));
        assert_eq!(page.previous_page().unwrap().before(), Some("B2"));
        assert_eq!(page.total_count(), Some(42));
        assert!(page.is_empty());
    }

    #[test]
    fn total_count_may_exceed_items() {
        let env: ListEnvelope<serde_json::Value> = serde_json::from_value(json!({
            "data": [{"id": "friend"}],
            "summary": {"total_count": "350"}
        }))
        .unwrap();
        let page = env.into_paged();
        assert_eq!(page.len(), 1);
        assert_eq!(page.total_count(), Some(350));
    }
}
