use dawn_amf0::decode as decode_amf0;

use crate::audio::{parse_audio_tag, AudioEvent};
use crate::error::FlvError;
use crate::samples::{AudioSample, VideoSample};
use crate::video::{parse_video_tag, VideoEvent, VideoParserState};
use crate::visitor::{FlvTagVisitor, VisitorFlow};

const TAG_TYPE_AUDIO: u8 = 8;
const TAG_TYPE_VIDEO: u8 = 9;
const TAG_TYPE_SCRIPT: u8 = 18;

const TAG_HEADER_LEN: usize = 11;
const PREVIOUS_TAG_SIZE_LEN: usize = 4;

/// Parser state carried across `parse_flv_tags` calls. The only thing that
/// needs to survive a call boundary is the video NAL length-prefix width
/// (spec.md §4.3); everything else about "where we are in the tag stream"
/// is implicit in how many bytes the caller has already dropped from its
/// buffer.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlvTagParserState {
    video: VideoParserState,
}

impl FlvTagParserState {
    pub fn reset(&mut self) {
        self.video.reset();
    }
}

/// Why `parse_flv_tags` stopped consuming tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagParseOutcome {
    /// The buffered input ran out mid-tag (or was empty); the caller should
    /// read more bytes and call again with the combined buffer.
    Exhausted,
    /// A visitor callback returned `VisitorFlow::Stop`; `bytes_consumed`
    /// still reflects every complete tag processed up to and including the
    /// one that triggered the stop.
    Stopped,
}

fn read_u24_be(b: &[u8]) -> u32 {
    ((b[0] as u32) << 16) | ((b[1] as u32) << 8) | (b[2] as u32)
}

/// Parses as many complete tags as `input` holds, starting at offset 0,
/// dispatching each to `visitor`. Restartable: on `Exhausted`, re-call with
/// `input` extended by newly read bytes and `bytes_consumed` dropped from
/// the front (spec.md §4.3, §8 invariant 1).
///
/// Consumes whole tags only: a tag is never partially applied. On error,
/// `bytes_consumed` reflects every tag successfully applied before the
/// failing one; the caller should treat the stream as unrecoverable past
/// that point (spec.md §7).
pub fn parse_flv_tags(
    input: &[u8],
    state: &mut FlvTagParserState,
    visitor: &mut dyn FlvTagVisitor,
) -> Result<(TagParseOutcome, usize), FlvError> {
    let mut pos = 0usize;

    loop {
        if pos + TAG_HEADER_LEN > input.len() {
            return Ok((TagParseOutcome::Exhausted, pos));
        }
        let header = &input[pos..pos + TAG_HEADER_LEN];
        let tag_type = header[0];
        let data_size = read_u24_be(&header[1..4]) as usize;
        let timestamp = read_u24_be(&header[4..7]);
        let timestamp_extended = header[7];
        let ts_ms = timestamp | ((timestamp_extended as u32) << 24);
        let stream_id = read_u24_be(&header[8..11]);
        if stream_id != 0 {
            return Err(FlvError::InvalidStreamId(stream_id));
        }

        let tag_total_len = TAG_HEADER_LEN + data_size + PREVIOUS_TAG_SIZE_LEN;
        if pos + tag_total_len > input.len() {
            return Ok((TagParseOutcome::Exhausted, pos));
        }

        let body = &input[pos + TAG_HEADER_LEN..pos + TAG_HEADER_LEN + data_size];
        let trailer_start = pos + TAG_HEADER_LEN + data_size;
        let previous_tag_size = u32::from_be_bytes(
            input[trailer_start..trailer_start + PREVIOUS_TAG_SIZE_LEN]
                .try_into()
                .expect("slice is exactly 4 bytes"),
        );
        let expected = (TAG_HEADER_LEN + data_size) as u32;
        if previous_tag_size != expected {
            return Err(FlvError::MismatchedPreviousTagSize {
                expected,
                actual: previous_tag_size,
            });
        }

        let flow = match tag_type {
            TAG_TYPE_AUDIO => match parse_audio_tag(body, ts_ms)? {
                AudioEvent::Config(config) => visitor.on_audio_config(config),
                AudioEvent::Sample { timestamp_100ns, data } => {
                    visitor.on_audio_sample(AudioSample { timestamp_100ns, data })
                }
            },
            TAG_TYPE_VIDEO => match parse_video_tag(body, ts_ms, &mut state.video)? {
                VideoEvent::AvcConfig(config) => visitor.on_video_config(config),
                VideoEvent::HevcConfig(config) => visitor.on_hevc_video_config(config),
                VideoEvent::Sample {
                    dts_100ns,
                    pts_100ns,
                    is_key_frame,
                    data,
                } => visitor.on_video_sample(VideoSample {
                    dts_100ns,
                    pts_100ns,
                    is_key_frame,
                    data,
                }),
                VideoEvent::EndOfSequence => VisitorFlow::Continue,
            },
            TAG_TYPE_SCRIPT => {
                let (name, name_len) = decode_amf0(body)?;
                let (value, _value_len) = decode_amf0(&body[name_len..])?;
                visitor.on_script_tag(name, value)
            }
            other => return Err(FlvError::UnsupportedTagType(other)),
        };

        pos += tag_total_len;

        if flow == VisitorFlow::Stop {
            return Ok((TagParseOutcome::Stopped, pos));
        }
    }
}
