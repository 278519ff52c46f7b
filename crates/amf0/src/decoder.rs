use crate::error::Amf0Error;
use crate::value::{amf_string, AmfObject, AmfValue};

const MARKER_NUMBER: u8 = 0x00;
const MARKER_BOOLEAN: u8 = 0x01;
const MARKER_STRING: u8 = 0x02;
const MARKER_OBJECT: u8 = 0x03;
const MARKER_ECMA_ARRAY: u8 = 0x08;
const MARKER_OBJECT_END: u8 = 0x09;
const MARKER_STRICT_ARRAY: u8 = 0x0a;
const MARKER_DATE: u8 = 0x0b;

/// Decodes a single [`AmfValue`] from the front of `bytes`.
///
/// Pure function per spec.md §4.2: returns the value and the number of
/// bytes consumed, or an error. Never reads past `bytes.len()`.
pub fn decode(bytes: &[u8]) -> Result<(AmfValue, usize), Amf0Error> {
    let mut cur = Cursor::new(bytes);
    let value = cur.decode_value()?;
    Ok((value, cur.pos))
}

/// A cursor over a borrowed byte slice, tracking how much has been
/// consumed. Kept internal: the public surface of this crate is the pure
/// [`decode`] function plus [`crate::encoder::encode`].
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Amf0Error> {
        if self.remaining() < n {
            return Err(Amf0Error::UnexpectedEof);
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, Amf0Error> {
        Ok(self.take(1)?[0])
    }

    fn read_u16_be(&mut self) -> Result<u16, Amf0Error> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u32_be(&mut self) -> Result<u32, Amf0Error> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Big-endian IEEE-754 double. spec.md §6 describes the wire layout as
    /// "native IEEE-754 bytes reversed from big-endian"; resolved against
    /// the original decoder's byte-swap union (see SPEC_FULL.md §2), that
    /// is exactly a standard big-endian read — no extra reversal here, per
    /// spec.md §9's explicit instruction to use a portable
    /// `from_be_bytes` helper rather than a union.
    fn read_be_f64(&mut self) -> Result<f64, Amf0Error> {
        let b = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(f64::from_be_bytes(buf))
    }

    fn read_normal_string(&mut self) -> Result<String, Amf0Error> {
        let len = self.read_u16_be()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(Amf0Error::from)
    }

    fn decode_value(&mut self) -> Result<AmfValue, Amf0Error> {
        let marker = self.read_u8()?;
        match marker {
            MARKER_NUMBER => Ok(AmfValue::Number(self.read_be_f64()?)),
            MARKER_BOOLEAN => {
                let b = self.read_u8()?;
                Ok(AmfValue::Boolean(b != 0))
            }
            MARKER_STRING => {
                let s = self.read_normal_string()?;
                Ok(AmfValue::String(amf_string(s)?))
            }
            MARKER_OBJECT => Ok(AmfValue::Object(self.decode_pairs_until_sentinel()?)),
            MARKER_ECMA_ARRAY => {
                let declared = self.read_u32_be()? as usize;
                Ok(AmfValue::EcmaArray(self.decode_ecma_pairs(declared)?))
            }
            MARKER_OBJECT_END => Ok(AmfValue::ObjectEnd),
            MARKER_STRICT_ARRAY => {
                let count = self.read_u32_be()? as usize;
                let mut items = Vec::with_capacity(count.min(1 << 20));
                for _ in 0..count {
                    items.push(self.decode_value()?);
                }
                Ok(AmfValue::StrictArray(items))
            }
            MARKER_DATE => {
                let value = self.read_be_f64()?;
                // timezone field: read and discard (spec.md §4.2).
                let _timezone = self.take(2)?;
                Ok(AmfValue::Date { value })
            }
            other => Err(Amf0Error::UnknownMarker(other)),
        }
    }

    /// `Object`: pairs terminated by an empty key followed by `ObjectEnd`.
    fn decode_pairs_until_sentinel(&mut self) -> Result<AmfObject, Amf0Error> {
        let mut object = AmfObject::new();
        loop {
            let key = self.read_normal_string()?;
            if key.is_empty() {
                let marker = self.read_u8()?;
                if marker == MARKER_OBJECT_END {
                    return Ok(object);
                }
                // Spec requires stopping on the first terminator observed;
                // an empty key not followed by ObjectEnd is malformed.
                return Err(Amf0Error::Custom("empty object key without ObjectEnd".into()));
            }
            let key = amf_string(key)?;
            let value = self.decode_value()?;
            object.push(key, value);
        }
    }

    /// `EcmaArray`: up to `declared` pairs, early-terminable by `ObjectEnd`
    /// even if fewer than `declared` were read (spec.md §4.2).
    fn decode_ecma_pairs(&mut self, declared: usize) -> Result<AmfObject, Amf0Error> {
        let mut object = AmfObject::new();
        for _ in 0..declared {
            // An ObjectEnd sentinel is preceded by an empty key, exactly
            // like the Object case; peek for it without a full rewind by
            // reading the key first (mirrors the Object path).
            let key = self.read_normal_string()?;
            if key.is_empty() && self.peek_is_object_end() {
                self.pos += 1; // consume the ObjectEnd marker
                return Ok(object);
            }
            let key = amf_string(key)?;
            let value = self.decode_value()?;
            object.push(key, value);
        }
        // A trailing empty-key + ObjectEnd sentinel may still follow the
        // last declared pair (the normal encoded case): consume the whole
        // three-byte terminator (`00 00 09`), not just the marker, exactly
        // as `decode_pairs_until_sentinel` does — a bare one-byte peek here
        // would leave the `00 00` length prefix unconsumed and corrupt
        // whatever is decoded next.
        if self.remaining() >= 3
            && self.bytes[self.pos] == 0
            && self.bytes[self.pos + 1] == 0
            && self.bytes[self.pos + 2] == MARKER_OBJECT_END
        {
            self.pos += 3;
        }
        Ok(object)
    }

    fn peek_is_object_end(&self) -> bool {
        self.bytes.get(self.pos) == Some(&MARKER_OBJECT_END)
    }
}
