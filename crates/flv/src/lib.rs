//! A restartable, byte-level FLV (Flash Video) container parser.
//!
//! This crate does not buffer a whole file: [`parse_flv_header`] and
//! [`parse_flv_tags`] consume as much of a caller-supplied byte slice as
//! forms complete structures and report how much they used, so a caller
//! reading from a socket or a growing file can feed in whatever is
//! available and retry with more once it arrives. It does not write FLV,
//! transcode, or decode audio/video frames; see `crates/player` for the
//! pull-based sample API built on top of this parser.

pub mod audio;
mod error;
mod header;
pub mod samples;
mod tags;
pub mod video;
mod visitor;

pub use audio::{audio_codec_private_data_hex, AudioEvent, AudioSpecialConfig};
pub use error::FlvError;
pub use header::{parse_flv_header, FlvHeader, FIRST_TAG_OFFSET};
pub use samples::{AudioSample, VideoSample};
pub use tags::{parse_flv_tags, FlvTagParserState, TagParseOutcome};
pub use video::{AvcConfig, HevcConfig, VideoEvent, VideoParserState};
pub use visitor::{FlvTagVisitor, VisitorFlow};
