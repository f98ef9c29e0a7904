// Variant field resolution
//
// Polymorphic Graph objects are decoded in two steps: the JSON object is
// first read into a `FieldMap`, then the target type *takes* the fields it
// owns. Whatever is left over becomes the object's extra data, so fields
// Facebook adds later survive a fetch/serialize round trip untouched.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Unmapped response fields, keyed by their original name.
pub type ExtraData = Map<String, Value>;

/// A field that was present but could not be decoded into its target type.
#[derive(Debug, Error)]
#[error("field `{field}`: {source}")]
pub struct FieldError {
    pub field: String,
    #[source]
    pub source: serde_json::Error,
}

/// Plain intermediate representation of a JSON object under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: Map<String, Value>,
}

impl FieldMap {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Peek at a string field without consuming it.
    pub fn peek_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Remove a raw value. `null` is treated as absent.
    pub fn take_value(&mut self, key: &str) -> Option<Value> {
        match self.fields.remove(key) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }

    /// Remove and decode a field. Absent and `null` both yield `None`.
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, FieldError> {
        self.take_value(key)
            .map(|v| {
                serde_json::from_value(v).map_err(|source| FieldError {
                    field: key.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    /// Remove and decode a field, falling back to `T::default()`.
    pub fn take_or_default<T: DeserializeOwned + Default>(
        &mut self,
        key: &str,
    ) -> Result<T, FieldError> {
        Ok(self.take(key)?.unwrap_or_default())
    }

    /// Remove a field and run it through a custom decoder.
    pub fn take_with<T>(
        &mut self,
        key: &str,
        decode: impl FnOnce(Value) -> Result<T, serde_json::Error>,
    ) -> Result<Option<T>, FieldError> {
        self.take_value(key)
            .map(|v| {
                decode(v).map_err(|source| FieldError {
                    field: key.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    /// Insert a serializable value. `None`-like values (`null`) are skipped.
    pub fn put(&mut self, key: &str, value: &impl Serialize) -> Result<(), serde_json::Error> {
        let v = serde_json::to_value(value)?;
        if !v.is_null() {
            self.fields.insert(key.to_owned(), v);
        }
        Ok(())
    }

    /// Merge extra data back in without overwriting mapped fields.
    pub fn merge_extra(&mut self, extra: &ExtraData) {
        for (k, v) in extra {
            self.fields.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }

    /// Whatever was not taken.
    pub fn into_extra(self) -> ExtraData {
        self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

// ── Lenient enums ────────────────────────────────────────────────────

/// Declare a string-valued enum that never fails to decode.
///
/// Every listed variant maps to its wire value (compared case-insensitively).
/// Anything else lands in `Unknown(raw)` and is written back verbatim.
macro_rules! lenient_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this crate does not recognise, kept verbatim.
            Unknown(String),
        }

        impl $name {
            /// The wire representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Unknown(raw) => raw.as_str(),
                }
            }

            pub fn from_wire(raw: &str) -> Self {
                $(
                    if raw.eq_ignore_ascii_case($wire) {
                        return Self::$variant;
                    }
                )+
                Self::Unknown(raw.to_owned())
            }

            pub fn is_unknown(&self) -> bool {
                matches!(self, Self::Unknown(_))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from_wire(s))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let raw = <::serde_json::Value as ::serde::Deserialize>::deserialize(d)?;
                Ok(match raw {
                    ::serde_json::Value::String(s) => Self::from_wire(&s),
                    other => Self::Unknown(other.to_string()),
                })
            }
        }
    };
}

/// Declare an integer-coded enum that never fails to decode.
///
/// Unlisted codes land in `Unknown(code)`.
macro_rules! lenient_code_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A code this crate does not recognise, kept verbatim.
            Unknown(i64),
        }

        impl $name {
            pub fn code(self) -> i64 {
                match self {
                    $( Self::$variant => $code, )+
                    Self::Unknown(code) => code,
                }
            }

            pub fn from_code(code: i64) -> Self {
                match code {
                    $( $code => Self::$variant, )+
                    other => Self::Unknown(other),
                }
            }

            pub fn is_unknown(self) -> bool {
                matches!(self, Self::Unknown(_))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_i64(self.code())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let raw = <::serde_json::Value as ::serde::Deserialize>::deserialize(d)?;
                let code = match &raw {
                    ::serde_json::Value::Number(n) => n.as_i64(),
                    ::serde_json::Value::String(s) => s.parse::<i64>().ok(),
                    _ => None,
                };
                code.map(Self::from_code).ok_or_else(|| {
                    <D::Error as ::serde::de::Error>::custom(format!(
                        "expected an integer code, got {raw}"
                    ))
                })
            }
        }
    };
}

pub(crate) use lenient_code_enum;
pub(crate) use lenient_enum;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    lenient_enum! {
        enum Color {
            Red => "red",
            Blue => "blue",
        }
    }

    lenient_code_enum! {
        enum Level {
            Low => 1,
            High => 9,
        }
    }

    fn map(v: Value) -> FieldMap {
        match v {
            Value::Object(m) => FieldMap::new(m),
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn take_consumes_and_leaves_rest_as_extra() {
        let mut fields = map(json!({"id": "1", "name": "A", "x": [1, {"y": null}]}));
        let id: Option<String> = fields.take("id").unwrap();
        let name: Option<String> = fields.take("name").unwrap();
        assert_eq!(id.as_deref(), Some("1"));
        assert_eq!(name.as_deref(), Some("A"));

        let extra = fields.into_extra();
        assert_eq!(extra.len(), 1);
        assert_eq!(extra["x"], json!([1, {"y": null}]));
    }

    #[test]
    fn null_is_absent() {
        let mut fields = map(json!({"name": null}));
        let name: Option<String> = fields.take("name").unwrap();
        assert!(name.is_none());
        assert!(fields.into_extra().is_empty());
    }

    #[test]
    fn type_mismatch_names_the_field() {
        let mut fields = map(json!({"count": "many"}));
        let err = fields.take::<u32>("count").unwrap_err();
        assert_eq!(err.field, "count");
        assert!(err.to_string().starts_with("field `count`"));
    }

    #[test]
    fn merge_extra_does_not_clobber_mapped_fields() {
        let mut fields = FieldMap::default();
        fields.put("id", &"1").unwrap();
        fields.put("skipped", &Option::<String>::None).unwrap();
        let mut extra = ExtraData::new();
        extra.insert("id".into(), json!("other"));
        extra.insert("new".into(), json!(true));
        fields.merge_extra(&extra);

        let out = fields.into_map();
        assert_eq!(out["id"], json!("1"));
        assert_eq!(out["new"], json!(true));
        assert!(!out.contains_key("skipped"));
    }

    #[test]
    fn lenient_string_enum_falls_back_to_unknown() {
        let known: Color = serde_json::from_value(json!("RED")).unwrap();
        assert_eq!(known, Color::Red);

        let unknown: Color = serde_json::from_value(json!("mauve")).unwrap();
        assert_eq!(unknown, Color::Unknown("mauve".into()));
        assert_eq!(serde_json::to_value(&unknown).unwrap(), json!("mauve"));
    }

    #[test]
    fn lenient_code_enum_falls_back_to_unknown() {
        let known: Level = serde_json::from_value(json!(9)).unwrap();
        assert_eq!(known, Level::High);

        let from_string: Level = serde_json::from_value(json!("1")).unwrap();
        assert_eq!(from_string, Level::Low);

        let unknown: Level = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(unknown, Level::Unknown(42));
        assert_eq!(unknown.code(), 42);
    }
}
