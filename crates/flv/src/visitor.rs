use dawn_amf0::AmfValue;

use crate::audio::AudioSpecialConfig;
use crate::samples::{AudioSample, VideoSample};
use crate::video::{AvcConfig, HevcConfig};

/// Whether `parse_flv_tags` should keep consuming tags or stop after the
/// tag whose callback returned `Stop`. spec.md §4.3 names this the
/// replacement for the original callback set's boolean return convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorFlow {
    Continue,
    Stop,
}

/// The full set of FLV tag-stream callbacks, one method per event kind the
/// parser can produce. Every method defaults to a no-op `Continue`, mirroring
/// the original's "nulled callback" convention (spec.md §4.3) — a caller
/// interested in only a subset of events overrides only those methods.
///
/// Each method takes its payload by value: the parser never needs the value
/// again after dispatch, so there is no reason to clone just to hand out a
/// shared reference.
pub trait FlvTagVisitor {
    fn on_script_tag(&mut self, name: AmfValue, value: AmfValue) -> VisitorFlow {
        let _ = (name, value);
        VisitorFlow::Continue
    }

    fn on_audio_config(&mut self, config: AudioSpecialConfig) -> VisitorFlow {
        let _ = config;
        VisitorFlow::Continue
    }

    fn on_video_config(&mut self, config: AvcConfig) -> VisitorFlow {
        let _ = config;
        VisitorFlow::Continue
    }

    fn on_hevc_video_config(&mut self, config: HevcConfig) -> VisitorFlow {
        let _ = config;
        VisitorFlow::Continue
    }

    fn on_audio_sample(&mut self, sample: AudioSample) -> VisitorFlow {
        let _ = sample;
        VisitorFlow::Continue
    }

    fn on_video_sample(&mut self, sample: VideoSample) -> VisitorFlow {
        let _ = sample;
        VisitorFlow::Continue
    }
}
