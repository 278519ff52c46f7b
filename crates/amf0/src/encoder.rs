use crate::value::{AmfObject, AmfValue};

const MARKER_NUMBER: u8 = 0x00;
const MARKER_BOOLEAN: u8 = 0x01;
const MARKER_STRING: u8 = 0x02;
const MARKER_OBJECT: u8 = 0x03;
const MARKER_ECMA_ARRAY: u8 = 0x08;
const MARKER_OBJECT_END: u8 = 0x09;
const MARKER_STRICT_ARRAY: u8 = 0x0a;
const MARKER_DATE: u8 = 0x0b;

/// Encodes a single [`AmfValue`] to its AMF0 wire form.
///
/// Not named in spec.md's module list directly, but required to exercise
/// spec.md §8 invariant 1 ("for any valid AMF0 value, encoding then
/// decoding yields a value equal to it"). Strings longer than 65,535 bytes
/// cannot occur here because [`crate::value::amf_string`] already rejects
/// them at construction time.
pub fn encode(value: &AmfValue) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(value, &mut out);
    out
}

fn encode_into(value: &AmfValue, out: &mut Vec<u8>) {
    match value {
        AmfValue::Number(n) => {
            out.push(MARKER_NUMBER);
            out.extend_from_slice(&n.to_be_bytes());
        }
        AmfValue::Boolean(b) => {
            out.push(MARKER_BOOLEAN);
            out.push(if *b { 1 } else { 0 });
        }
        AmfValue::String(s) => {
            out.push(MARKER_STRING);
            encode_normal_string(s, out);
        }
        AmfValue::Object(obj) => {
            out.push(MARKER_OBJECT);
            encode_pairs(obj, out);
            encode_object_end(out);
        }
        AmfValue::EcmaArray(obj) => {
            out.push(MARKER_ECMA_ARRAY);
            out.extend_from_slice(&(obj.len() as u32).to_be_bytes());
            encode_pairs(obj, out);
            encode_object_end(out);
        }
        AmfValue::ObjectEnd => {
            encode_object_end(out);
        }
        AmfValue::StrictArray(items) => {
            out.push(MARKER_STRICT_ARRAY);
            out.extend_from_slice(&(items.len() as u32).to_be_bytes());
            for item in items {
                encode_into(item, out);
            }
        }
        AmfValue::Date { value } => {
            out.push(MARKER_DATE);
            out.extend_from_slice(&value.to_be_bytes());
            out.extend_from_slice(&0i16.to_be_bytes());
        }
    }
}

fn encode_normal_string(s: &str, out: &mut Vec<u8>) {
    out.extend_from_slice(&(s.len() as u16).to_be_bytes());
    out.extend_from_slice(s.as_bytes());
}

fn encode_pairs(obj: &AmfObject, out: &mut Vec<u8>) {
    for (key, value) in obj.iter() {
        encode_normal_string(key.as_ref(), out);
        encode_into(value, out);
    }
}

fn encode_object_end(out: &mut Vec<u8>) {
    out.extend_from_slice(&0u16.to_be_bytes());
    out.push(MARKER_OBJECT_END);
}
