use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex};

use dawn_amf0::AmfObject;
use dawn_flv::{parse_flv_header, parse_flv_tags, AudioSample, FlvTagParserState, VideoSample, FIRST_TAG_OFFSET};
use tokio::sync::{oneshot, Mutex as AsyncMutex};

use crate::error::{OpenError, SampleError, SeekError};
use crate::keyframe_index::KeyframeIndex;
use crate::media_info::{MediaInfo, TimestampPolicy};
use crate::stream::ReadStream;
use crate::task_service::{hop_to_service, TaskService};
use crate::visitors::{FullVisitor, SampleClock, SampleOnlyVisitor, VideoCodec};

/// Bytes requested per `ReadStream::read` call, matching
/// `examples/original_source/core/dawn_player/flv_player.cpp`'s
/// `read_some_data` buffer size.
const READ_CHUNK_BYTES: usize = 65536;

struct EngineState {
    read_buffer: Vec<u8>,
    parser_state: FlvTagParserState,

    audio_queue: VecDeque<AudioSample>,
    video_queue: VecDeque<VideoSample>,

    pending_metadata: Option<AmfObject>,
    is_audio_cfg_read: bool,
    is_video_cfg_read: bool,
    audio_codec_private_data: Option<String>,
    video_codec: Option<VideoCodec>,
    vps: Vec<u8>,
    sps: Vec<u8>,
    pps: Vec<u8>,

    is_sample_reading: bool,
    is_end_of_stream: bool,
    is_error: bool,
    error_message: Option<String>,
    is_closed: bool,
    wait_queue: VecDeque<oneshot::Sender<()>>,

    stream_can_seek: bool,
    can_seek: bool,
    keyframe_index: KeyframeIndex,
    first_sample_timestamp_100ns: Option<i64>,
}

impl EngineState {
    fn new(stream_can_seek: bool) -> Self {
        Self {
            read_buffer: Vec::new(),
            parser_state: FlvTagParserState::default(),
            audio_queue: VecDeque::new(),
            video_queue: VecDeque::new(),
            pending_metadata: None,
            is_audio_cfg_read: false,
            is_video_cfg_read: false,
            audio_codec_private_data: None,
            video_codec: None,
            vps: Vec::new(),
            sps: Vec::new(),
            pps: Vec::new(),
            is_sample_reading: false,
            is_end_of_stream: false,
            is_error: false,
            error_message: None,
            is_closed: false,
            wait_queue: VecDeque::new(),
            stream_can_seek,
            can_seek: false,
            keyframe_index: KeyframeIndex::new(),
            first_sample_timestamp_100ns: None,
        }
    }

    /// Wakes every parked caller, in arrival order, per spec.md §4.6
    /// ("additional callers park on wait_queue (FIFO) and are resumed in
    /// arrival order").
    fn release_waiters(&mut self) {
        while let Some(waiter) = self.wait_queue.pop_front() {
            let _ = waiter.send(());
        }
    }
}

/// A cooperative, single-consumer FLV demultiplexer: pull `open()` once,
/// then `next_audio()`/`next_video()` as a downstream consumer wants
/// samples, optionally `seek()`, and `close()` when done. See spec.md §4 for
/// the full contract; this type does not decode, transcode, or write FLV.
pub struct FlvPlayer<S: ReadStream + 'static> {
    task_service: Arc<dyn TaskService>,
    stream: Arc<AsyncMutex<S>>,
    state: Arc<StdMutex<EngineState>>,
    timestamp_policy: TimestampPolicy,
}

impl<S: ReadStream + 'static> Clone for FlvPlayer<S> {
    fn clone(&self) -> Self {
        Self {
            task_service: self.task_service.clone(),
            stream: self.stream.clone(),
            state: self.state.clone(),
            timestamp_policy: self.timestamp_policy,
        }
    }
}

impl<S: ReadStream + 'static> FlvPlayer<S> {
    pub fn new(stream: S, task_service: Arc<dyn TaskService>, timestamp_policy: TimestampPolicy) -> Self {
        let stream_can_seek = stream.can_seek();
        Self {
            task_service,
            stream: Arc::new(AsyncMutex::new(stream)),
            state: Arc::new(StdMutex::new(EngineState::new(stream_can_seek))),
            timestamp_policy,
        }
    }

    /// Posts `body` to the worker thread and returns a future resolving to
    /// its result, mirroring `create_async` + `task_completion_event` in
    /// `examples/original_source/core/dawn_player/flv_player.cpp`: every
    /// public operation's entire body runs on the worker, so
    /// [`hop_to_service`] inside it always takes the already-there path.
    fn run_on_service<R>(&self, body: impl Future<Output = R> + Send + 'static) -> impl Future<Output = R> + 'static
    where
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.task_service.post(Box::pin(async move {
            let _ = tx.send(body.await);
        }));
        async move { rx.await.expect("dawn-player worker thread dropped the response channel") }
    }

    async fn read_into_buffer(&self) -> std::io::Result<u32> {
        let mut buf = vec![0u8; READ_CHUNK_BYTES];
        let n = {
            let mut stream = self.stream.lock().await;
            stream.read(&mut buf).await?
        };
        if n > 0 {
            self.state.lock().unwrap().read_buffer.extend_from_slice(&buf[..n as usize]);
        }
        Ok(n)
    }

    /// Opens the stream: reads the 9-byte header, then reads and parses
    /// tags until `onMetaData` and both decoder configuration records have
    /// been observed (spec.md §4.6).
    pub fn open(&self) -> impl Future<Output = Result<MediaInfo, OpenError>> + 'static {
        let this = self.clone();
        self.run_on_service(async move { this.do_open().await })
    }

    async fn do_open(&self) -> Result<MediaInfo, OpenError> {
        hop_to_service(&*self.task_service).await;

        loop {
            let have_enough = self.state.lock().unwrap().read_buffer.len() as u64 >= FIRST_TAG_OFFSET;
            if have_enough {
                break;
            }
            let n = self.read_into_buffer().await.map_err(|e| OpenError::io_error(e.to_string()))?;
            if n == 0 {
                return Err(OpenError::parse_error("unexpected end of stream while reading the FLV header"));
            }
        }

        {
            let mut state = self.state.lock().unwrap();
            let (_header, consumed) = parse_flv_header(&state.read_buffer)?;
            debug_assert_eq!(consumed, 9);
            state.read_buffer.drain(0..FIRST_TAG_OFFSET as usize);
        }

        loop {
            let ready = {
                let mut state = self.state.lock().unwrap();
                let EngineState {
                    read_buffer,
                    parser_state,
                    pending_metadata,
                    is_audio_cfg_read,
                    is_video_cfg_read,
                    audio_codec_private_data,
                    video_codec,
                    vps,
                    sps,
                    pps,
                    audio_queue,
                    video_queue,
                    can_seek,
                    first_sample_timestamp_100ns,
                    ..
                } = &mut *state;
                let mut visitor = FullVisitor {
                    pending_metadata,
                    is_audio_cfg_read,
                    is_video_cfg_read,
                    audio_codec_private_data,
                    video_codec,
                    vps,
                    sps,
                    pps,
                    audio_queue,
                    video_queue,
                    clock: SampleClock {
                        can_seek: *can_seek,
                        timestamp_policy: self.timestamp_policy,
                        first_sample_timestamp_100ns,
                    },
                };
                let (_outcome, consumed) = parse_flv_tags(read_buffer, parser_state, &mut visitor)?;
                read_buffer.drain(0..consumed);
                pending_metadata.is_some() && *is_audio_cfg_read && *is_video_cfg_read
            };
            if ready {
                break;
            }
            let n = self.read_into_buffer().await.map_err(|e| OpenError::io_error(e.to_string()))?;
            if n == 0 {
                return Err(OpenError::parse_error(
                    "end of stream before onMetaData and codec configuration were observed",
                ));
            }
        }

        let mut state = self.state.lock().unwrap();
        let metadata = state.pending_metadata.take().expect("ready implies metadata is present");

        let width = metadata
            .find("width")
            .and_then(dawn_amf0::AmfValue::as_f64)
            .ok_or_else(|| OpenError::parse_error("onMetaData is missing 'width'"))?;
        let height = metadata
            .find("height")
            .and_then(dawn_amf0::AmfValue::as_f64)
            .ok_or_else(|| OpenError::parse_error("onMetaData is missing 'height'"))?;
        let duration = metadata.find("duration").and_then(dawn_amf0::AmfValue::as_f64);

        let mut keyframe_index = KeyframeIndex::new();
        if let Some(keyframes) = metadata.find("keyframes").and_then(dawn_amf0::AmfValue::as_object) {
            let times = keyframes.find("times").and_then(dawn_amf0::AmfValue::as_strict_array);
            let filepositions = keyframes
                .find("filepositions")
                .and_then(dawn_amf0::AmfValue::as_strict_array);
            if let (Some(times), Some(filepositions)) = (times, filepositions) {
                for (time, position) in times.iter().zip(filepositions.iter()) {
                    if let (Some(time), Some(position)) = (time.as_f64(), position.as_f64()) {
                        keyframe_index.insert(time, position as u64);
                    }
                }
            }
        }

        state.can_seek = state.stream_can_seek && !keyframe_index.is_empty();
        state.keyframe_index = keyframe_index;

        let mut info = MediaInfo::new();
        if let Some(duration) = duration {
            info.insert("Duration".to_string(), ((duration * 1e7) as i64).to_string());
        }
        info.insert("Width".to_string(), (width as i64).to_string());
        info.insert("Height".to_string(), (height as i64).to_string());
        info.insert("CanSeek".to_string(), if state.can_seek { "True" } else { "False" }.to_string());
        if let Some(audio_codec_private_data) = &state.audio_codec_private_data {
            info.insert("AudioCodecPrivateData".to_string(), audio_codec_private_data.clone());
        }

        tracing::debug!(width, height, can_seek = state.can_seek, "flv stream opened");

        Ok(info)
    }

    /// The active video codec's VPS NAL bytes (HEVC only; empty for AVC or
    /// before `open()` completes).
    pub fn vps(&self) -> Vec<u8> {
        self.state.lock().unwrap().vps.clone()
    }

    /// The active video codec's SPS NAL bytes.
    pub fn sps(&self) -> Vec<u8> {
        self.state.lock().unwrap().sps.clone()
    }

    /// The active video codec's PPS NAL bytes.
    pub fn pps(&self) -> Vec<u8> {
        self.state.lock().unwrap().pps.clone()
    }

    /// Which decoder configuration record established the video codec, if
    /// any has been observed yet.
    pub fn video_codec(&self) -> Option<VideoCodec> {
        self.state.lock().unwrap().video_codec
    }

    pub fn next_audio(&self) -> impl Future<Output = Result<AudioSample, SampleError>> + 'static {
        let this = self.clone();
        self.run_on_service(async move { this.do_next_audio().await })
    }

    async fn do_next_audio(&self) -> Result<AudioSample, SampleError> {
        loop {
            hop_to_service(&*self.task_service).await;
            enum Step {
                Sample(AudioSample),
                Err(SampleError),
                Park(oneshot::Receiver<()>),
                StartRead,
            }
            let step = {
                let mut state = self.state.lock().unwrap();
                if state.is_closed {
                    Step::Err(SampleError::cancel("engine closed"))
                } else if let Some(sample) = state.audio_queue.pop_front() {
                    Step::Sample(sample)
                } else if state.is_error {
                    Step::Err(SampleError::parse_error(
                        state.error_message.clone().unwrap_or_else(|| "stream error".to_string()),
                    ))
                } else if state.is_end_of_stream {
                    Step::Err(SampleError::end_of_stream())
                } else if state.is_sample_reading {
                    let (tx, rx) = oneshot::channel();
                    state.wait_queue.push_back(tx);
                    Step::Park(rx)
                } else {
                    state.is_sample_reading = true;
                    Step::StartRead
                }
            };
            match step {
                Step::Sample(sample) => return Ok(sample),
                Step::Err(err) => return Err(err),
                Step::Park(rx) => {
                    let _ = rx.await;
                }
                Step::StartRead => self.read_and_parse_step().await,
            }
        }
    }

    pub fn next_video(&self) -> impl Future<Output = Result<VideoSample, SampleError>> + 'static {
        let this = self.clone();
        self.run_on_service(async move { this.do_next_video().await })
    }

    async fn do_next_video(&self) -> Result<VideoSample, SampleError> {
        loop {
            hop_to_service(&*self.task_service).await;
            enum Step {
                Sample(VideoSample),
                Err(SampleError),
                Park(oneshot::Receiver<()>),
                StartRead,
            }
            let step = {
                let mut state = self.state.lock().unwrap();
                if state.is_closed {
                    Step::Err(SampleError::cancel("engine closed"))
                } else if let Some(sample) = state.video_queue.pop_front() {
                    Step::Sample(sample)
                } else if state.is_error {
                    Step::Err(SampleError::parse_error(
                        state.error_message.clone().unwrap_or_else(|| "stream error".to_string()),
                    ))
                } else if state.is_end_of_stream {
                    Step::Err(SampleError::end_of_stream())
                } else if state.is_sample_reading {
                    let (tx, rx) = oneshot::channel();
                    state.wait_queue.push_back(tx);
                    Step::Park(rx)
                } else {
                    state.is_sample_reading = true;
                    Step::StartRead
                }
            };
            match step {
                Step::Sample(sample) => return Ok(sample),
                Step::Err(err) => return Err(err),
                Step::Park(rx) => {
                    let _ = rx.await;
                }
                Step::StartRead => self.read_and_parse_step().await,
            }
        }
    }

    /// Precondition: `is_sample_reading` is true and this is the only task
    /// performing a read. Reads up to `READ_CHUNK_BYTES`, parses whatever
    /// complete tags result, then clears the flag and releases every
    /// parked caller in FIFO order (spec.md §4.6.1).
    async fn read_and_parse_step(&self) {
        let read_result = self.read_into_buffer().await;

        let mut state = self.state.lock().unwrap();
        match read_result {
            Err(err) => {
                state.is_error = true;
                state.error_message = Some(err.to_string());
            }
            Ok(0) => {
                state.is_end_of_stream = true;
            }
            Ok(_) => {
                let EngineState {
                    read_buffer,
                    parser_state,
                    is_audio_cfg_read,
                    is_video_cfg_read,
                    audio_queue,
                    video_queue,
                    can_seek,
                    first_sample_timestamp_100ns,
                    ..
                } = &mut *state;
                let mut visitor = SampleOnlyVisitor {
                    is_audio_cfg_read: *is_audio_cfg_read,
                    is_video_cfg_read: *is_video_cfg_read,
                    audio_queue,
                    video_queue,
                    clock: SampleClock {
                        can_seek: *can_seek,
                        timestamp_policy: self.timestamp_policy,
                        first_sample_timestamp_100ns,
                    },
                };
                match parse_flv_tags(read_buffer, parser_state, &mut visitor) {
                    Ok((_outcome, consumed)) => {
                        read_buffer.drain(0..consumed);
                    }
                    Err(err) => {
                        state.is_error = true;
                        state.error_message = Some(err.to_string());
                    }
                }
            }
        }

        state.is_sample_reading = false;
        state.release_waiters();
    }

    /// Seeks to the keyframe at or before `time_100ns`, returning the
    /// actual keyframe time seeked to (in 100-ns ticks). Clears queued
    /// samples, pending errors and end-of-stream; fails if the stream
    /// cannot seek (spec.md §4.6).
    pub fn seek(&self, time_100ns: i64) -> impl Future<Output = Result<i64, SeekError>> + 'static {
        let this = self.clone();
        self.run_on_service(async move { this.do_seek(time_100ns).await })
    }

    async fn do_seek(&self, time_100ns: i64) -> Result<i64, SeekError> {
        loop {
            hop_to_service(&*self.task_service).await;
            let park = {
                let mut state = self.state.lock().unwrap();
                if state.is_closed {
                    return Err(SeekError::cancel("engine closed"));
                }
                if !state.can_seek {
                    return Err(SeekError::other("stream is not seekable"));
                }
                if state.is_sample_reading {
                    let (tx, rx) = oneshot::channel();
                    state.wait_queue.push_back(tx);
                    Some(rx)
                } else {
                    None
                }
            };
            if let Some(rx) = park {
                let _ = rx.await;
                continue;
            }
            break;
        }

        let target_seconds = time_100ns as f64 / 1e7;
        let (keyframe_seconds, file_offset) = {
            let state = self.state.lock().unwrap();
            state
                .keyframe_index
                .lower_bound(target_seconds)
                .ok_or_else(|| SeekError::other("keyframe index is empty"))?
        };

        {
            let mut state = self.state.lock().unwrap();
            state.read_buffer.clear();
            state.parser_state.reset();
            state.audio_queue.clear();
            state.video_queue.clear();
            state.is_error = false;
            state.error_message = None;
            state.is_end_of_stream = false;
            state.first_sample_timestamp_100ns = None;
        }

        // A failed stream seek does not fail this call: per spec.md §4.6 it
        // sets `is_error` so the next `next_audio`/`next_video` surfaces it
        // (`SeekError`'s taxonomy is `{cancel, other}` only — a transport
        // failure here is not one of its members).
        {
            let mut stream = self.stream.lock().await;
            if let Err(err) = stream.seek(file_offset).await {
                let mut state = self.state.lock().unwrap();
                state.is_error = true;
                state.error_message = Some(err.to_string());
            }
        }

        tracing::debug!(target_seconds, keyframe_seconds, "seeked");

        Ok((keyframe_seconds * 1e7) as i64)
    }

    /// Idempotent. Marks the engine closed so any in-flight or future
    /// `next_audio`/`next_video`/`seek` resolve with a `cancel` error once
    /// any read/parse currently underway finishes (spec.md §4.6: "gated on
    /// `!is_sample_reading`").
    pub fn close(&self) -> impl Future<Output = ()> + 'static {
        let this = self.clone();
        self.run_on_service(async move { this.do_close().await })
    }

    async fn do_close(&self) {
        loop {
            hop_to_service(&*self.task_service).await;
            let park = {
                let mut state = self.state.lock().unwrap();
                if state.is_closed {
                    return;
                }
                if state.is_sample_reading {
                    let (tx, rx) = oneshot::channel();
                    state.wait_queue.push_back(tx);
                    Some(rx)
                } else {
                    None
                }
            };
            match park {
                Some(rx) => {
                    let _ = rx.await;
                }
                None => break,
            }
        }

        let mut state = self.state.lock().unwrap();
        state.is_closed = true;
        state.release_waiters();
    }
}
