use dawn_flv::{AudioSample, VideoSample};

use crate::engine::FlvPlayer;
use crate::error::SampleError;
use crate::stream::ReadStream;

/// Either kind of access unit, for a consumer that just wants "the next
/// thing" rather than polling audio and video separately.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Audio(AudioSample),
    Video(VideoSample),
}

impl<S: ReadStream + 'static> FlvPlayer<S> {
    /// Races `next_audio()` against `next_video()` and returns whichever
    /// resolves first. A thin convenience layered on top of the two
    /// independent pull methods (spec.md §4.2); it does not change their
    /// semantics; a dropped, unresolved side simply goes unread until the
    /// caller asks again.
    pub async fn next_sample(&self) -> Result<Sample, SampleError> {
        tokio::select! {
            audio = self.next_audio() => audio.map(Sample::Audio),
            video = self.next_video() => video.map(Sample::Video),
        }
    }
}
