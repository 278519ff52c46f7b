//! AMF0 ("Action Message Format", version 0) value model, decoder and
//! encoder for the metadata subtree ("onMetaData") embedded in FLV script
//! tags.
//!
//! The wire format and decode semantics are normative; see the module-level
//! docs on [`decode`] and [`encode`].

mod decoder;
mod encoder;
mod error;
mod value;

pub use decoder::decode;
pub use encoder::encode;
pub use error::Amf0Error;
pub use value::{amf_string, AmfObject, AmfString, AmfValue};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_amf_number() {
        let input = [0x00, 0x40, 0x28, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let (value, consumed) = decode(&input).unwrap();
        assert_eq!(value, AmfValue::Number(12.0));
        assert_eq!(consumed, 9);
    }

    #[test]
    fn s4_amf_string() {
        let input = b"\x02\x00\x05hello";
        let (value, consumed) = decode(input).unwrap();
        assert_eq!(value, AmfValue::String("hello".into()));
        assert_eq!(consumed, 8);
    }

    #[test]
    fn empty_string_consumes_three_bytes() {
        let input = [0x02, 0x00, 0x00];
        let (value, consumed) = decode(&input).unwrap();
        assert_eq!(value, AmfValue::String("".into()));
        assert_eq!(consumed, 3);
    }

    #[test]
    fn boolean_true_and_false() {
        assert_eq!(decode(&[0x01, 0x00]).unwrap().0, AmfValue::Boolean(false));
        assert_eq!(decode(&[0x01, 0x01]).unwrap().0, AmfValue::Boolean(true));
        assert_eq!(decode(&[0x01, 0x7f]).unwrap().0, AmfValue::Boolean(true));
    }

    #[test]
    fn date_skips_timezone() {
        let mut input = vec![0x0b];
        input.extend_from_slice(&1000.5f64.to_be_bytes());
        input.extend_from_slice(&0i16.to_be_bytes());
        let (value, consumed) = decode(&input).unwrap();
        assert_eq!(value, AmfValue::Date { value: 1000.5 });
        assert_eq!(consumed, 11);
    }

    #[test]
    fn object_terminated_by_sentinel() {
        let mut input = vec![0x03]; // Object marker
        input.extend_from_slice(b"\x00\x03foo");
        input.push(0x01); // Boolean
        input.push(0x01);
        input.extend_from_slice(&[0x00, 0x00, 0x09]); // empty key + ObjectEnd
        let (value, consumed) = decode(&input).unwrap();
        match value {
            AmfValue::Object(obj) => {
                assert_eq!(obj.lookup("foo"), Some(&AmfValue::Boolean(true)));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(consumed, input.len());
    }

    #[test]
    fn ecma_array_early_terminates_on_sentinel() {
        let mut input = vec![0x08]; // EcmaArray marker
        input.extend_from_slice(&5u32.to_be_bytes()); // declares 5, provides 1
        input.extend_from_slice(b"\x00\x03bar");
        input.push(0x00); // Number
        input.extend_from_slice(&1.0f64.to_be_bytes());
        input.extend_from_slice(&[0x00, 0x00, 0x09]);
        let (value, consumed) = decode(&input).unwrap();
        match value {
            AmfValue::EcmaArray(obj) => {
                assert_eq!(obj.len(), 1);
                assert_eq!(obj.find("bar"), Some(&AmfValue::Number(1.0)));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(consumed, input.len());
    }

    #[test]
    fn strict_array_has_no_sentinel() {
        let mut input = vec![0x0a];
        input.extend_from_slice(&2u32.to_be_bytes());
        input.push(0x00);
        input.extend_from_slice(&1.0f64.to_be_bytes());
        input.push(0x00);
        input.extend_from_slice(&2.0f64.to_be_bytes());
        let (value, consumed) = decode(&input).unwrap();
        assert_eq!(
            value,
            AmfValue::StrictArray(vec![AmfValue::Number(1.0), AmfValue::Number(2.0)])
        );
        assert_eq!(consumed, input.len());
    }

    #[test]
    fn unknown_marker_fails() {
        assert!(decode(&[0xff]).is_err());
    }

    #[test]
    fn truncated_input_fails_without_reading_past_end() {
        assert!(decode(&[0x00, 0x01, 0x02]).is_err());
    }

    #[test]
    fn string_over_limit_rejected() {
        let long = "x".repeat(u16::MAX as usize + 1);
        assert!(matches!(AmfValue::string(long), Err(Amf0Error::StringTooLong)));
    }

    #[test]
    fn ecma_array_followed_by_sibling_in_strict_array() {
        // A StrictArray of two elements: a fully-declared EcmaArray (so the
        // post-loop sentinel check in `decode_ecma_pairs` is the only thing
        // that consumes its trailing `00 00 09`), then a sibling Number. If
        // that sentinel were left unconsumed, this second element would
        // start on the stray `00 00` and misread it as `Number` instead of
        // `3.0`.
        let mut ecma = vec![0x08]; // EcmaArray marker
        ecma.extend_from_slice(&1u32.to_be_bytes()); // declares 1, provides 1
        ecma.extend_from_slice(b"\x00\x03bar");
        ecma.push(0x00); // Number
        ecma.extend_from_slice(&1.0f64.to_be_bytes());
        ecma.extend_from_slice(&[0x00, 0x00, 0x09]); // sentinel

        let mut input = vec![0x0a]; // StrictArray marker
        input.extend_from_slice(&2u32.to_be_bytes());
        input.extend_from_slice(&ecma);
        input.push(0x00); // Number
        input.extend_from_slice(&3.0f64.to_be_bytes());

        let (value, consumed) = decode(&input).unwrap();
        match value {
            AmfValue::StrictArray(elements) => {
                assert_eq!(elements.len(), 2);
                match &elements[0] {
                    AmfValue::EcmaArray(obj) => {
                        assert_eq!(obj.find("bar"), Some(&AmfValue::Number(1.0)));
                    }
                    other => panic!("unexpected {other:?}"),
                }
                assert_eq!(elements[1], AmfValue::Number(3.0));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(consumed, input.len());
    }

    #[test]
    fn round_trips_every_variant() {
        let mut obj = AmfObject::new();
        obj.push("k".into(), AmfValue::Number(3.0));
        let values = vec![
            AmfValue::Number(12.0),
            AmfValue::Boolean(true),
            AmfValue::String("hello".into()),
            AmfValue::Object(obj.clone()),
            AmfValue::EcmaArray(obj),
            AmfValue::StrictArray(vec![AmfValue::Number(1.0), AmfValue::Boolean(false)]),
            AmfValue::Date { value: 42.0 },
        ];
        for value in values {
            let encoded = encode(&value);
            let (decoded, consumed) = decode(&encoded).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(consumed, encoded.len());
        }
    }
}
