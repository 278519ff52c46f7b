//! A cooperative, single-consumer FLV playback engine built on top of
//! `dawn-flv`'s restartable tag parser.
//!
//! [`FlvPlayer`] exposes a pull-based sample API (`open`, `next_audio`,
//! `next_video`, `seek`, `close`) that a media-framework adapter drives;
//! this crate does not itself decode audio/video or know about any
//! particular playback framework. Every public operation runs on a single
//! dedicated worker thread (see [`task_service`]) so the engine's internal
//! state never needs cross-thread synchronization beyond a plain mutex.

mod adapter;
mod engine;
mod error;
mod keyframe_index;
mod media_info;
pub mod stream;
pub mod task_service;
mod visitors;

pub use adapter::Sample;
pub use dawn_flv::{AudioSample, VideoSample};
pub use engine::FlvPlayer;
pub use error::{ErrorKind, OpenError, SampleError, SeekError};
pub use keyframe_index::KeyframeIndex;
pub use media_info::{MediaInfo, TimestampPolicy};
pub use stream::{InputStream, RandomAccessStream, ReadStream};
pub use task_service::{hop_to_service, DefaultTaskService, TaskService};
pub use visitors::VideoCodec;
