//! Time-stamped access units emitted by the tag parser (spec.md §3).

/// A raw AAC or MP3 frame, stripped of the FLV `AACPacketType` byte.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSample {
    /// Presentation timestamp, in 100-ns ticks.
    pub timestamp_100ns: i64,
    /// The audio frame payload.
    pub data: Vec<u8>,
}

/// A video access unit: one or more NAL units, Annex-B framed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSample {
    /// Decode timestamp, in 100-ns ticks.
    pub dts_100ns: i64,
    /// Presentation timestamp, in 100-ns ticks (`dts_100ns` plus the tag's
    /// composition time offset).
    pub pts_100ns: i64,
    /// True when the tag's `FrameType` was 1 (key frame).
    pub is_key_frame: bool,
    /// Concatenated `{00 00 01, nalu_bytes}` Annex-B NAL units. Does not
    /// include VPS/SPS/PPS; the consumer prepends those for key frames.
    pub data: Vec<u8>,
}
