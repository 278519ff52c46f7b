use std::string::FromUtf8Error;

/// Errors produced while decoding or constructing AMF0 values.
///
/// Internally rich (distinct variants per failure), but every caller
/// outside this crate collapses it to the single wire-level failure
/// spec.md describes: `DecodeError("Failed to decode")`. See
/// [`Amf0Error::is_decode_failure`].
#[derive(Debug, thiserror::Error)]
pub enum Amf0Error {
    /// The buffer ended before a complete value could be read.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// The first byte of a value did not match any known AMF0 marker.
    #[error("unknown AMF0 marker: 0x{0:02x}")]
    UnknownMarker(u8),
    /// A string payload was not valid UTF-8.
    #[error("invalid utf-8 string: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
    /// A `String` value was constructed (or would decode) with more than
    /// 65,535 bytes, which cannot be represented by the U16 length prefix.
    #[error("AMF0 string exceeds 65535 bytes")]
    StringTooLong,
    /// Catch-all for internal inconsistency (e.g. an EcmaArray/Object pair
    /// list ending mid-key).
    #[error("{0}")]
    Custom(String),
}

impl Amf0Error {
    /// True for every variant spec.md treats as the single `DecodeError`
    /// surface at the FLV parser boundary.
    pub fn is_decode_failure(&self) -> bool {
        true
    }
}
