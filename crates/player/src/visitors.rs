use std::collections::VecDeque;

use dawn_amf0::{AmfObject, AmfValue};
use dawn_flv::{audio_codec_private_data_hex, AudioSample, AudioSpecialConfig, AvcConfig, FlvTagVisitor, HevcConfig, VideoSample, VisitorFlow};

use crate::media_info::{adjust_timestamp, TimestampPolicy};

/// Which decoder configuration record established the active video codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodec {
    Avc,
    Hevc,
}

/// Shared sample-timestamp bookkeeping both visitors below perform
/// identically, factored out so neither duplicates the other's logic.
pub(crate) struct SampleClock<'a> {
    pub can_seek: bool,
    pub timestamp_policy: TimestampPolicy,
    pub first_sample_timestamp_100ns: &'a mut Option<i64>,
}

impl SampleClock<'_> {
    fn adjust(&mut self, raw: i64) -> i64 {
        adjust_timestamp(self.timestamp_policy, self.can_seek, self.first_sample_timestamp_100ns, raw)
    }
}

/// Registers every callback: used during `open()`'s metadata/config scan,
/// where the engine must observe `onMetaData` and both decoder
/// configuration records in addition to any samples that happen to arrive
/// first. Grounded on
/// `examples/original_source/core/dawn_player/flv_player.cpp`'s
/// `register_callback_functions(false)`.
pub(crate) struct FullVisitor<'a> {
    pub pending_metadata: &'a mut Option<AmfObject>,
    pub is_audio_cfg_read: &'a mut bool,
    pub is_video_cfg_read: &'a mut bool,
    pub audio_codec_private_data: &'a mut Option<String>,
    pub video_codec: &'a mut Option<VideoCodec>,
    pub vps: &'a mut Vec<u8>,
    pub sps: &'a mut Vec<u8>,
    pub pps: &'a mut Vec<u8>,
    pub audio_queue: &'a mut VecDeque<AudioSample>,
    pub video_queue: &'a mut VecDeque<VideoSample>,
    pub clock: SampleClock<'a>,
}

impl FlvTagVisitor for FullVisitor<'_> {
    fn on_script_tag(&mut self, name: AmfValue, value: AmfValue) -> VisitorFlow {
        if self.pending_metadata.is_some() {
            return VisitorFlow::Continue;
        }
        if name.as_str() != Some("onMetaData") {
            return VisitorFlow::Continue;
        }
        match value.as_object() {
            Some(object) => {
                *self.pending_metadata = Some(object.clone());
                VisitorFlow::Continue
            }
            None => VisitorFlow::Stop,
        }
    }

    fn on_audio_config(&mut self, config: AudioSpecialConfig) -> VisitorFlow {
        *self.audio_codec_private_data = Some(audio_codec_private_data_hex(&config));
        *self.is_audio_cfg_read = true;
        VisitorFlow::Continue
    }

    fn on_video_config(&mut self, config: AvcConfig) -> VisitorFlow {
        *self.sps = config.sps;
        *self.pps = config.pps;
        *self.video_codec = Some(VideoCodec::Avc);
        *self.is_video_cfg_read = true;
        VisitorFlow::Continue
    }

    fn on_hevc_video_config(&mut self, config: HevcConfig) -> VisitorFlow {
        *self.vps = config.vps;
        *self.sps = config.sps;
        *self.pps = config.pps;
        *self.video_codec = Some(VideoCodec::Hevc);
        *self.is_video_cfg_read = true;
        VisitorFlow::Continue
    }

    fn on_audio_sample(&mut self, mut sample: AudioSample) -> VisitorFlow {
        if !*self.is_audio_cfg_read {
            return VisitorFlow::Stop;
        }
        sample.timestamp_100ns = self.clock.adjust(sample.timestamp_100ns);
        self.audio_queue.push_back(sample);
        VisitorFlow::Continue
    }

    fn on_video_sample(&mut self, mut sample: VideoSample) -> VisitorFlow {
        if !*self.is_video_cfg_read {
            return VisitorFlow::Stop;
        }
        let delta = sample.pts_100ns - sample.dts_100ns;
        sample.dts_100ns = self.clock.adjust(sample.dts_100ns);
        sample.pts_100ns = sample.dts_100ns + delta;
        self.video_queue.push_back(sample);
        VisitorFlow::Continue
    }
}

/// Registers only the sample callbacks: used for every read/parse step
/// after `open()` has completed. Grounded on the same source's
/// `register_callback_functions(true)`, which nulls the script and
/// configuration-record callbacks once playback has started (a
/// mid-stream `onMetaData` or decoder config change is not supported,
/// matching spec.md's non-goals).
pub(crate) struct SampleOnlyVisitor<'a> {
    pub is_audio_cfg_read: bool,
    pub is_video_cfg_read: bool,
    pub audio_queue: &'a mut VecDeque<AudioSample>,
    pub video_queue: &'a mut VecDeque<VideoSample>,
    pub clock: SampleClock<'a>,
}

impl FlvTagVisitor for SampleOnlyVisitor<'_> {
    fn on_audio_sample(&mut self, mut sample: AudioSample) -> VisitorFlow {
        if !self.is_audio_cfg_read {
            return VisitorFlow::Stop;
        }
        sample.timestamp_100ns = self.clock.adjust(sample.timestamp_100ns);
        self.audio_queue.push_back(sample);
        VisitorFlow::Continue
    }

    fn on_video_sample(&mut self, mut sample: VideoSample) -> VisitorFlow {
        if !self.is_video_cfg_read {
            return VisitorFlow::Stop;
        }
        let delta = sample.pts_100ns - sample.dts_100ns;
        sample.dts_100ns = self.clock.adjust(sample.dts_100ns);
        sample.pts_100ns = sample.dts_100ns + delta;
        self.video_queue.push_back(sample);
        VisitorFlow::Continue
    }
}
