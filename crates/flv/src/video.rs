use crate::error::FlvError;

const CODEC_ID_AVC: u8 = 7;
const CODEC_ID_HEVC: u8 = 12;

const PACKET_TYPE_SEQUENCE_HEADER: u8 = 0;
const PACKET_TYPE_NALU: u8 = 1;
const PACKET_TYPE_END_OF_SEQUENCE: u8 = 2;

const NALU_START_CODE: [u8; 3] = [0x00, 0x00, 0x01];

/// H.264 configuration extracted from an `AVCDecoderConfigurationRecord`
/// (ISO/IEC 14496-15). Only the fields spec.md §4.3 names are kept; SPS/PPS
/// are concatenated raw NAL bytes (no per-unit boundaries are retained),
/// matching `examples/original_source/core/dawn_player/flv_parser.cpp`'s
/// behavior rather than the teacher's per-unit `Vec<Bytes>` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvcConfig {
    pub configuration_version: u8,
    pub profile_indication: u8,
    pub profile_compatibility: u8,
    pub level_indication: u8,
    pub length_size: u8,
    pub sps: Vec<u8>,
    pub pps: Vec<u8>,
}

/// HEVC configuration extracted from an `HEVCDecoderConfigurationRecord`
/// (ISO/IEC 14496-15 §8.3.2.1), grounded on
/// `examples/chipsTM-scuffle/crates/h265/src/config.rs`'s field layout,
/// narrowed to the VPS/SPS/PPS raw-byte extraction spec.md requires (the
/// profile/tier/level and frame-rate fields are not surfaced to callers
/// since nothing downstream of this parser consumes them, per spec.md's
/// non-goal of decoding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HevcConfig {
    pub configuration_version: u8,
    pub length_size: u8,
    pub vps: Vec<u8>,
    pub sps: Vec<u8>,
    pub pps: Vec<u8>,
}

/// The outcome of parsing one video tag body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoEvent {
    /// PacketType 0, CodecID 7: emit via `on_video_config`.
    AvcConfig(AvcConfig),
    /// PacketType 0, CodecID 12: emit via `on_hevc_video_config`.
    HevcConfig(HevcConfig),
    /// PacketType 1: emit via `on_video_sample`.
    Sample {
        dts_100ns: i64,
        pts_100ns: i64,
        is_key_frame: bool,
        data: Vec<u8>,
    },
    /// PacketType 2: no sample, no config; the caller should keep going.
    EndOfSequence,
}

/// Carries the NAL length-prefix width across calls, per spec.md §4.3
/// ("state carried across calls: only the length-size-minus-one from the
/// last AVC/HEVC config record").
#[derive(Debug, Default, Clone, Copy)]
pub struct VideoParserState {
    length_size: Option<u8>,
}

impl VideoParserState {
    pub fn reset(&mut self) {
        self.length_size = None;
    }
}

fn map_length_size_minus_one(raw: u8) -> Result<u8, FlvError> {
    match raw {
        0 => Ok(1),
        1 => Ok(2),
        3 => Ok(4),
        _ => Err(FlvError::InvalidLengthSize(raw)),
    }
}

fn read_i24_be(b: &[u8]) -> i32 {
    let unsigned = ((b[0] as u32) << 16) | ((b[1] as u32) << 8) | (b[2] as u32);
    // sign-extend the 24-bit value
    if unsigned & 0x0080_0000 != 0 {
        (unsigned | 0xFF00_0000) as i32
    } else {
        unsigned as i32
    }
}

/// Parses one video tag's body. `ts_ms` is the combined
/// `timestamp_u24 | (extended_u8 << 24)` millisecond value from the tag
/// header.
pub fn parse_video_tag(data: &[u8], ts_ms: u32, state: &mut VideoParserState) -> Result<VideoEvent, FlvError> {
    if data.len() < 5 {
        return Err(FlvError::UnexpectedEof);
    }
    let frame_type = data[0] >> 4;
    let codec_id = data[0] & 0x0f;
    let is_key_frame = frame_type == 1;
    let packet_type = data[1];
    let composition_time = read_i24_be(&data[2..5]);
    let rest = &data[5..];

    match packet_type {
        PACKET_TYPE_SEQUENCE_HEADER => match codec_id {
            CODEC_ID_AVC => Ok(VideoEvent::AvcConfig(parse_avc_config(rest, state)?)),
            CODEC_ID_HEVC => Ok(VideoEvent::HevcConfig(parse_hevc_config(rest, state)?)),
            other => Err(FlvError::UnsupportedVideoCodec(other)),
        },
        PACKET_TYPE_NALU => {
            if !matches!(codec_id, CODEC_ID_AVC | CODEC_ID_HEVC) {
                return Err(FlvError::UnsupportedVideoCodec(codec_id));
            }
            let length_size = state.length_size.ok_or(FlvError::MissingLengthSize)?;
            let dts_100ns = (ts_ms as i64) * 10_000;
            let pts_100ns = dts_100ns + (composition_time as i64) * 10_000;
            let sample_data = reframe_to_annex_b(rest, length_size)?;
            Ok(VideoEvent::Sample {
                dts_100ns,
                pts_100ns,
                is_key_frame,
                data: sample_data,
            })
        }
        PACKET_TYPE_END_OF_SEQUENCE => Ok(VideoEvent::EndOfSequence),
        other => Err(FlvError::UnsupportedVideoPacketType(other)),
    }
}

fn parse_avc_config(rest: &[u8], state: &mut VideoParserState) -> Result<AvcConfig, FlvError> {
    if rest.len() < 6 {
        return Err(FlvError::UnexpectedEof);
    }
    let configuration_version = rest[0];
    if configuration_version != 1 {
        return Err(FlvError::InvalidConfigurationVersion(configuration_version));
    }
    let profile_indication = rest[1];
    let profile_compatibility = rest[2];
    let level_indication = rest[3];
    let length_size = map_length_size_minus_one(rest[4] & 0x03)?;

    let mut pos = 5;
    let sps_count = rest[pos] & 0x1f;
    pos += 1;
    let sps = read_length_prefixed_concat(rest, &mut pos, sps_count as usize)?;

    if pos >= rest.len() {
        return Err(FlvError::UnexpectedEof);
    }
    let pps_count = rest[pos];
    pos += 1;
    let pps = read_length_prefixed_concat(rest, &mut pos, pps_count as usize)?;

    state.length_size = Some(length_size);

    Ok(AvcConfig {
        configuration_version,
        profile_indication,
        profile_compatibility,
        level_indication,
        length_size,
        sps,
        pps,
    })
}

/// Reads `count` U16-length-prefixed byte strings starting at `*pos` and
/// concatenates them, per spec.md §4.3 ("concatenate all SPS bytes").
fn read_length_prefixed_concat(rest: &[u8], pos: &mut usize, count: usize) -> Result<Vec<u8>, FlvError> {
    let mut out = Vec::new();
    for _ in 0..count {
        if *pos + 2 > rest.len() {
            return Err(FlvError::UnexpectedEof);
        }
        let len = u16::from_be_bytes([rest[*pos], rest[*pos + 1]]) as usize;
        *pos += 2;
        if *pos + len > rest.len() {
            return Err(FlvError::UnexpectedEof);
        }
        out.extend_from_slice(&rest[*pos..*pos + len]);
        *pos += len;
    }
    Ok(out)
}

/// NAL unit type values carrying VPS/SPS/PPS in an HEVC NAL array
/// (ISO/IEC 23008-2 Table 7-1).
const HEVC_NAL_VPS: u8 = 32;
const HEVC_NAL_SPS: u8 = 33;
const HEVC_NAL_PPS: u8 = 34;

/// Minimal MSB-first bit cursor, used only for the bit-packed prefix of an
/// `HEVCDecoderConfigurationRecord` (the rest of the record is byte
/// aligned). Mirrors the field order of
/// `examples/chipsTM-scuffle/crates/h265/src/config.rs`'s `demux`.
struct BitCursor<'a> {
    bytes: &'a [u8],
    byte_pos: usize,
    bit_pos: u8,
}

impl<'a> BitCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, byte_pos: 0, bit_pos: 0 }
    }

    fn read_bits(&mut self, mut n: u32) -> Result<u64, FlvError> {
        let mut value: u64 = 0;
        while n > 0 {
            if self.byte_pos >= self.bytes.len() {
                return Err(FlvError::UnexpectedEof);
            }
            let bits_left_in_byte = 8 - self.bit_pos;
            let take = bits_left_in_byte.min(n as u8);
            let byte = self.bytes[self.byte_pos];
            let shift = bits_left_in_byte - take;
            let mask = ((1u16 << take) - 1) as u8;
            let bits = (byte >> shift) & mask;
            value = (value << take) | bits as u64;
            self.bit_pos += take;
            if self.bit_pos == 8 {
                self.bit_pos = 0;
                self.byte_pos += 1;
            }
            n -= take as u32;
        }
        Ok(value)
    }

    fn skip_bits(&mut self, n: u32) -> Result<(), FlvError> {
        self.read_bits(n).map(|_| ())
    }

    fn byte_align_pos(&self) -> usize {
        if self.bit_pos == 0 {
            self.byte_pos
        } else {
            self.byte_pos + 1
        }
    }
}

fn parse_hevc_config(rest: &[u8], state: &mut VideoParserState) -> Result<HevcConfig, FlvError> {
    let mut cur = BitCursor::new(rest);

    let configuration_version = cur.read_bits(8)? as u8;
    if configuration_version != 1 {
        return Err(FlvError::InvalidConfigurationVersion(configuration_version));
    }
    cur.skip_bits(2)?; // general_profile_space
    cur.skip_bits(1)?; // general_tier_flag
    cur.skip_bits(5)?; // general_profile_idc
    cur.skip_bits(32)?; // general_profile_compatibility_flags
    cur.skip_bits(48)?; // general_constraint_indicator_flags
    cur.skip_bits(8)?; // general_level_idc
    cur.skip_bits(4)?; // reserved
    cur.skip_bits(12)?; // min_spatial_segmentation_idc
    cur.skip_bits(6)?; // reserved
    cur.skip_bits(2)?; // parallelism_type
    cur.skip_bits(6)?; // reserved
    cur.skip_bits(2)?; // chroma_format_idc
    cur.skip_bits(5)?; // reserved
    cur.skip_bits(3)?; // bit_depth_luma_minus8
    cur.skip_bits(5)?; // reserved
    cur.skip_bits(3)?; // bit_depth_chroma_minus8
    cur.skip_bits(16)?; // avg_frame_rate
    cur.skip_bits(2)?; // constant_frame_rate
    cur.skip_bits(3)?; // num_temporal_layers
    cur.skip_bits(1)?; // temporal_id_nested
    let length_size = map_length_size_minus_one(cur.read_bits(2)? as u8)?;

    let num_of_arrays = cur.read_bits(8)? as usize;

    let mut vps = Vec::new();
    let mut sps = Vec::new();
    let mut pps = Vec::new();

    for _ in 0..num_of_arrays {
        cur.skip_bits(1)?; // array_completeness
        cur.skip_bits(1)?; // reserved
        let nal_unit_type = cur.read_bits(6)? as u8;
        let num_nalus = cur.read_bits(16)? as usize;

        for _ in 0..num_nalus {
            let len = cur.read_bits(16)? as usize;
            let start = cur.byte_align_pos();
            if start + len > rest.len() {
                return Err(FlvError::UnexpectedEof);
            }
            let nalu = &rest[start..start + len];
            match nal_unit_type {
                HEVC_NAL_VPS => vps.extend_from_slice(nalu),
                HEVC_NAL_SPS => sps.extend_from_slice(nalu),
                HEVC_NAL_PPS => pps.extend_from_slice(nalu),
                _ => {}
            }
            cur.byte_pos = start + len;
            cur.bit_pos = 0;
        }
    }

    state.length_size = Some(length_size);

    Ok(HevcConfig {
        configuration_version,
        length_size,
        vps,
        sps,
        pps,
    })
}

/// Re-frames length-prefixed NAL units (prefix width `length_size`, one of
/// 1/2/4 bytes) into Annex-B start-code-delimited form: `{00 00 01,
/// nalu_bytes}` repeated for each unit found, per spec.md §3/§4.3.
fn reframe_to_annex_b(data: &[u8], length_size: u8) -> Result<Vec<u8>, FlvError> {
    let mut out = Vec::with_capacity(data.len() + 16);
    let mut pos = 0usize;
    while pos < data.len() {
        if pos + length_size as usize > data.len() {
            return Err(FlvError::TruncatedNalu);
        }
        let len = read_length_prefix(&data[pos..pos + length_size as usize]);
        pos += length_size as usize;
        if len == 0 || pos + len > data.len() {
            return Err(FlvError::TruncatedNalu);
        }
        out.extend_from_slice(&NALU_START_CODE);
        out.extend_from_slice(&data[pos..pos + len]);
        pos += len;
    }
    Ok(out)
}

fn read_length_prefix(bytes: &[u8]) -> usize {
    match bytes.len() {
        1 => bytes[0] as usize,
        2 => u16::from_be_bytes([bytes[0], bytes[1]]) as usize,
        4 => u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize,
        _ => unreachable!("length_size is always 1, 2 or 4"),
    }
}
