use bytestring::ByteString;

use crate::error::Amf0Error;

/// An AMF0 string. A thin alias over [`ByteString`] so that object keys and
/// string values share storage and comparison semantics.
pub type AmfString = ByteString;

/// Builds an [`AmfString`], rejecting inputs that cannot be represented with
/// AMF0's U16 length prefix (spec.md §4.1: "constructing a String with
/// > 65,535 bytes fails with `invalid_argument`").
pub fn amf_string(s: impl Into<String>) -> Result<AmfString, Amf0Error> {
    let s = s.into();
    if s.len() > u16::MAX as usize {
        return Err(Amf0Error::StringTooLong);
    }
    Ok(ByteString::from(s))
}

/// An ordered key→value list, used for both AMF0 `Object` and `EcmaArray`.
///
/// Keys are not required to be unique at the wire level; [`AmfObject::lookup`]
/// returns the first match, matching spec.md §3's stated lookup semantics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AmfObject(pub Vec<(AmfString, AmfValue)>);

impl AmfObject {
    /// An empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// First value whose key equals `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&AmfValue> {
        self.0.iter().find(|(k, _)| k.as_ref() == name).map(|(_, v)| v)
    }

    /// Alias of [`AmfObject::lookup`] using EcmaArray terminology (spec.md
    /// §4.1: `ecma_array.find(name)`).
    pub fn find(&self, name: &str) -> Option<&AmfValue> {
        self.lookup(name)
    }

    /// Appends a key/value pair, preserving wire order.
    pub fn push(&mut self, key: AmfString, value: AmfValue) {
        self.0.push((key, value));
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &(AmfString, AmfValue)> {
        self.0.iter()
    }
}

/// The AMF0 tagged-variant value model (spec.md §3, §4.1): eight cases.
#[derive(Debug, Clone, PartialEq)]
pub enum AmfValue {
    /// `00` — IEEE-754 double.
    Number(f64),
    /// `01` — single byte, zero/non-zero.
    Boolean(bool),
    /// `02` — U16-length-prefixed UTF-8 string.
    String(AmfString),
    /// `03` — ordered key/value pairs terminated by an empty key + [`AmfValue::ObjectEnd`].
    Object(AmfObject),
    /// `08` — U32 declared count, then up to that many key/value pairs.
    EcmaArray(AmfObject),
    /// `09` — the object/array terminator sentinel. Never appears as a
    /// top-level decoded value in well-formed input; retained as a variant
    /// so the decoder can represent it uniformly while scanning for it.
    ObjectEnd,
    /// `0a` — U32 count followed by exactly that many values, no sentinel.
    StrictArray(Vec<AmfValue>),
    /// `0b` — a `Number` plus a 16-bit timezone field that is read and
    /// discarded (spec.md §4.2); only the millisecond value survives.
    Date {
        /// Milliseconds since the epoch.
        value: f64,
    },
}

impl AmfValue {
    /// Fallible `String` constructor honoring the 65,535-byte wire limit.
    pub fn string(s: impl Into<String>) -> Result<Self, Amf0Error> {
        Ok(AmfValue::String(amf_string(s)?))
    }

    /// The value as `f64`, for `Number` and `Date`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AmfValue::Number(n) => Some(*n),
            AmfValue::Date { value } => Some(*value),
            _ => None,
        }
    }

    /// The value as a string slice, for `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AmfValue::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// The value as a bool, for `Boolean`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AmfValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as an object, for both `Object` and `EcmaArray`.
    pub fn as_object(&self) -> Option<&AmfObject> {
        match self {
            AmfValue::Object(o) | AmfValue::EcmaArray(o) => Some(o),
            _ => None,
        }
    }

    /// The value as a slice, for `StrictArray`.
    pub fn as_strict_array(&self) -> Option<&[AmfValue]> {
        match self {
            AmfValue::StrictArray(values) => Some(values),
            _ => None,
        }
    }

    /// Widens an `Object` (or passes through an existing `EcmaArray`) into
    /// an `EcmaArray`-shaped ordered copy of its entries (spec.md §4.1:
    /// `object.to_ecma_array()`).
    pub fn to_ecma_array(&self) -> Option<AmfObject> {
        self.as_object().cloned()
    }
}

impl From<f64> for AmfValue {
    fn from(value: f64) -> Self {
        AmfValue::Number(value)
    }
}

impl From<bool> for AmfValue {
    fn from(value: bool) -> Self {
        AmfValue::Boolean(value)
    }
}
