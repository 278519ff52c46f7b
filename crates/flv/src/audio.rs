use crate::error::FlvError;

/// SoundFormat nibble values this parser recognizes (spec.md §4.3, plus
/// the MP3 passthrough supplement in SPEC_FULL.md §3).
const SOUND_FORMAT_MP3: u8 = 2;
const SOUND_FORMAT_AAC: u8 = 10;

const AAC_PACKET_TYPE_SEQUENCE_HEADER: u8 = 0;
const AAC_PACKET_TYPE_RAW: u8 = 1;

/// `WAVEFORMATEX`-shaped configuration derived from an AAC
/// AudioSpecificConfig (spec.md §4.3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpecialConfig {
    pub format_tag: u16,
    pub channels: u16,
    pub sample_per_second: u32,
    pub bits_per_sample: u16,
    pub block_align: u16,
    pub size: u16,
    pub average_bytes_per_second: u32,
}

/// The outcome of parsing one audio tag body.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// An AAC sequence header: emit via `on_audio_config`.
    Config(AudioSpecialConfig),
    /// A raw AAC or MP3 frame: emit via `on_audio_sample`.
    Sample { timestamp_100ns: i64, data: Vec<u8> },
}

const SAMPLING_FREQUENCY_TABLE: [u32; 13] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 7350,
];

/// Parses one audio tag's body (the bytes following StreamID, i.e. the
/// `DataSize`-length payload). `ts_ms` is the already-combined
/// `timestamp_u24 | (extended_u8 << 24)` value from the tag header.
pub fn parse_audio_tag(data: &[u8], ts_ms: u32) -> Result<AudioEvent, FlvError> {
    if data.is_empty() {
        return Err(FlvError::UnexpectedEof);
    }
    let header = data[0];
    let sound_format = header >> 4;
    let body = &data[1..];

    match sound_format {
        SOUND_FORMAT_AAC => parse_aac(body, ts_ms),
        SOUND_FORMAT_MP3 => Ok(AudioEvent::Sample {
            timestamp_100ns: (ts_ms as i64) * 10_000,
            data: body.to_vec(),
        }),
        other => Err(FlvError::UnsupportedSoundFormat(other)),
    }
}

fn parse_aac(body: &[u8], ts_ms: u32) -> Result<AudioEvent, FlvError> {
    if body.is_empty() {
        return Err(FlvError::UnexpectedEof);
    }
    let packet_type = body[0];
    let rest = &body[1..];

    match packet_type {
        AAC_PACKET_TYPE_SEQUENCE_HEADER => Ok(AudioEvent::Config(parse_audio_specific_config(rest)?)),
        AAC_PACKET_TYPE_RAW => {
            if rest.is_empty() {
                return Err(FlvError::UnexpectedEof);
            }
            Ok(AudioEvent::Sample {
                timestamp_100ns: (ts_ms as i64) * 10_000,
                data: rest.to_vec(),
            })
        }
        other => Err(FlvError::UnsupportedAacPacketType(other)),
    }
}

/// Parses the first two bytes of an `AudioSpecificConfig`
/// (ISO/IEC 14496-3): `AudioObjectType`(5) `SamplingFrequencyIndex`(4)
/// `ChannelConfiguration`(4). Any trailing bytes (extension config) are
/// ignored, per spec.md §4.3 ("the remainder of the tag body is skipped").
fn parse_audio_specific_config(bytes: &[u8]) -> Result<AudioSpecialConfig, FlvError> {
    if bytes.len() < 2 {
        return Err(FlvError::UnexpectedEof);
    }
    let word = u16::from_be_bytes([bytes[0], bytes[1]]);
    let _audio_object_type = ((word >> 11) & 0x1f) as u8;
    let sampling_frequency_index = ((word >> 7) & 0x0f) as u8;
    let channel_configuration = ((word >> 3) & 0x0f) as u8;

    let sample_per_second = *SAMPLING_FREQUENCY_TABLE
        .get(sampling_frequency_index as usize)
        .ok_or(FlvError::InvalidSamplingFrequencyIndex(sampling_frequency_index))?;

    if channel_configuration == 0 || channel_configuration > 7 {
        return Err(FlvError::InvalidChannelConfiguration(channel_configuration));
    }
    let channels = if channel_configuration == 7 { 8 } else { channel_configuration as u16 };

    let bits_per_sample: u16 = 16;
    let block_align = channels * (bits_per_sample / 8);
    let average_bytes_per_second = sample_per_second * block_align as u32;

    Ok(AudioSpecialConfig {
        format_tag: 0x00ff,
        channels,
        sample_per_second,
        bits_per_sample,
        block_align,
        size: 0,
        average_bytes_per_second,
    })
}

/// Renders an [`AudioSpecialConfig`] as the 36-character uppercase hex
/// string spec.md §6 describes: little-endian bytes of
/// `{format_tag, channels, sample_per_second, average_bytes_per_second,
/// block_align, bits_per_sample, size}`.
pub fn audio_codec_private_data_hex(cfg: &AudioSpecialConfig) -> String {
    let mut bytes = Vec::with_capacity(18);
    bytes.extend_from_slice(&cfg.format_tag.to_le_bytes());
    bytes.extend_from_slice(&cfg.channels.to_le_bytes());
    bytes.extend_from_slice(&cfg.sample_per_second.to_le_bytes());
    bytes.extend_from_slice(&cfg.average_bytes_per_second.to_le_bytes());
    bytes.extend_from_slice(&cfg.block_align.to_le_bytes());
    bytes.extend_from_slice(&cfg.bits_per_sample.to_le_bytes());
    bytes.extend_from_slice(&cfg.size.to_le_bytes());

    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02X}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s5_aac_sequence_header() {
        let body = [0xAF, 0x00, 0x12, 0x10];
        let event = parse_audio_tag(&body, 0).unwrap();
        let cfg = match event {
            AudioEvent::Config(cfg) => cfg,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(cfg.channels, 2);
        assert_eq!(cfg.sample_per_second, 44100);
        assert_eq!(cfg.bits_per_sample, 16);
        assert_eq!(cfg.block_align, 4);
        assert_eq!(cfg.average_bytes_per_second, 176400);
        assert_eq!(cfg.format_tag, 0x00ff);
        assert_eq!(cfg.size, 0);
        assert_eq!(audio_codec_private_data_hex(&cfg), "FF00020044AC000010B102000400100000");
    }

    #[test]
    fn invalid_sampling_frequency_index_fails() {
        // AOT=2 (00010), freqIdx=13 (1101), chanCfg=1 (0001)
        // word = 00010 1101 0001 000 -> construct manually.
        let word: u16 = (2u16 << 11) | (13u16 << 7) | (1u16 << 3);
        let bytes = word.to_be_bytes();
        let body = [0xAF, 0x00, bytes[0], bytes[1]];
        assert!(matches!(
            parse_audio_tag(&body, 0),
            Err(FlvError::InvalidSamplingFrequencyIndex(13))
        ));
    }

    #[test]
    fn zero_channel_configuration_fails() {
        let word: u16 = (2u16 << 11) | (4u16 << 7) | (0u16 << 3);
        let bytes = word.to_be_bytes();
        let body = [0xAF, 0x00, bytes[0], bytes[1]];
        assert!(matches!(
            parse_audio_tag(&body, 0),
            Err(FlvError::InvalidChannelConfiguration(0))
        ));
    }

    #[test]
    fn channel_configuration_seven_maps_to_eight_channels() {
        let word: u16 = (2u16 << 11) | (4u16 << 7) | (7u16 << 3);
        let bytes = word.to_be_bytes();
        let body = [0xAF, 0x00, bytes[0], bytes[1]];
        let event = parse_audio_tag(&body, 0).unwrap();
        match event {
            AudioEvent::Config(cfg) => assert_eq!(cfg.channels, 8),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn raw_aac_frame_computes_timestamp() {
        let body = [0xAF, 0x01, 0xDE, 0xAD];
        let event = parse_audio_tag(&body, 100).unwrap();
        assert_eq!(
            event,
            AudioEvent::Sample {
                timestamp_100ns: 1_000_000,
                data: vec![0xDE, 0xAD],
            }
        );
    }

    #[test]
    fn mp3_passthrough() {
        let body = [0x2F, 0xAA, 0xBB];
        let event = parse_audio_tag(&body, 0).unwrap();
        assert_eq!(
            event,
            AudioEvent::Sample {
                timestamp_100ns: 0,
                data: vec![0xAA, 0xBB],
            }
        );
    }
}
