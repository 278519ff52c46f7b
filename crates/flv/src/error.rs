/// Errors produced while parsing FLV container bytes or codec configuration
/// records.
///
/// Internally rich, like the teacher's `scuffle-flv` error enum
/// (`examples/chipsTM-scuffle/crates/flv/src/error.rs`); the player engine
/// (crates/player) flattens every variant to `parse_error` at its public
/// boundary, per spec.md §7.
#[derive(Debug, thiserror::Error)]
pub enum FlvError {
    /// The 3-byte "FLV" signature did not match.
    #[error("invalid FLV signature: {0:#08x}")]
    InvalidSignature(u32),
    /// The header's `Version` byte was not 1.
    #[error("unsupported FLV version: {0}")]
    UnsupportedVersion(u8),
    /// `DataOffset` was not 9.
    #[error("invalid FLV data offset: {0}")]
    InvalidDataOffset(u32),
    /// Neither the audio- nor video-present flag was set.
    #[error("FLV header declares neither audio nor video present")]
    NoMediaPresent,
    /// `StreamID` in a tag header was non-zero.
    #[error("non-zero FLV stream id: {0}")]
    InvalidStreamId(u32),
    /// The PreviousTagSize trailer did not equal `DataSize + 11`.
    #[error("mismatched PreviousTagSize: expected {expected}, got {actual}")]
    MismatchedPreviousTagSize {
        /// `DataSize + 11`.
        expected: u32,
        /// The trailer value actually read.
        actual: u32,
    },
    /// SoundFormat was neither AAC (10) nor MP3 (2).
    #[error("unsupported audio SoundFormat: {0}")]
    UnsupportedSoundFormat(u8),
    /// An unrecognized AACPacketType.
    #[error("unsupported AAC packet type: {0}")]
    UnsupportedAacPacketType(u8),
    /// AudioSpecificConfig's SamplingFrequencyIndex was 13, 14 or 15.
    #[error("invalid AAC sampling frequency index: {0}")]
    InvalidSamplingFrequencyIndex(u8),
    /// AudioSpecificConfig's ChannelConfiguration was 0.
    #[error("invalid AAC channel configuration: {0}")]
    InvalidChannelConfiguration(u8),
    /// CodecID was neither AVC (7) nor HEVC (12).
    #[error("unsupported video CodecID: {0}")]
    UnsupportedVideoCodec(u8),
    /// An unrecognized AVCPacketType/HEVCPacketType.
    #[error("unsupported video packet type: {0}")]
    UnsupportedVideoPacketType(u8),
    /// `configurationVersion` in an AVCDecoderConfigurationRecord was not 1.
    #[error("invalid AVCDecoderConfigurationRecord configuration_version: {0}")]
    InvalidConfigurationVersion(u8),
    /// The raw `length_size_minus_one` bit pattern was 2 (reserved/invalid).
    #[error("invalid length_size_minus_one raw value: {0}")]
    InvalidLengthSize(u8),
    /// A NAL unit's length prefix was 0, or exceeded the remaining tag data.
    #[error("truncated or zero-length NAL unit")]
    TruncatedNalu,
    /// A video sample (PacketType 1) arrived before any configuration
    /// record had established the NAL length-prefix width.
    #[error("video sample before configuration record")]
    MissingLengthSize,
    /// The input ended before a declared field could be fully read. Not
    /// itself a parse failure at the tag-stream level: `parse_flv_tags`
    /// callers retry with more bytes. Only surfaces from the *header* path,
    /// or from fixed-size sub-structures (config records) which are never
    /// split across retries because they are always fully buffered before
    /// being parsed (the whole tag body is present).
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// An AMF0 value inside a script tag failed to decode.
    #[error("AMF0 decode error: {0}")]
    Amf0(#[from] dawn_amf0::Amf0Error),
    /// `TagType` was something other than 8 (audio), 9 (video) or 18
    /// (script data).
    #[error("unsupported FLV tag type: {0}")]
    UnsupportedTagType(u8),
}
