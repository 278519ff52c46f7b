use std::io;
use std::sync::Arc;

use dawn_amf0::{amf_string, AmfObject, AmfValue};
use dawn_player::{DefaultTaskService, ErrorKind, FlvPlayer, ReadStream, TimestampPolicy};

const TAG_HEADER_LEN: usize = 11;

fn wrap_tag(tag_type: u8, ts_ms: u32, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(tag_type);
    let data_size = body.len() as u32;
    out.extend_from_slice(&data_size.to_be_bytes()[1..]);
    out.extend_from_slice(&ts_ms.to_be_bytes()[1..]);
    out.push((ts_ms >> 24) as u8);
    out.extend_from_slice(&[0, 0, 0]);
    out.extend_from_slice(body);
    let previous_tag_size = (TAG_HEADER_LEN + body.len()) as u32;
    out.extend_from_slice(&previous_tag_size.to_be_bytes());
    out
}

fn script_tag(name: &str, value: AmfValue) -> Vec<u8> {
    let mut body = dawn_amf0::encode(&AmfValue::String(amf_string(name).unwrap()));
    body.extend(dawn_amf0::encode(&value));
    wrap_tag(18, 0, &body)
}

fn avc_config_tag() -> Vec<u8> {
    let mut body = vec![1, 0x42, 0x00, 0x1e, 0b1111_1111];
    body.push(0b1110_0001);
    body.extend_from_slice(&4u16.to_be_bytes());
    body.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
    body.push(1);
    body.extend_from_slice(&2u16.to_be_bytes());
    body.extend_from_slice(&[0xEE, 0xFF]);
    let mut tag_body = vec![0x17, 0x00, 0x00, 0x00, 0x00];
    tag_body.extend_from_slice(&body);
    wrap_tag(9, 0, &tag_body)
}

fn avc_sample_tag(ts_ms: u32, is_key_frame: bool) -> Vec<u8> {
    let mut nalu_data = Vec::new();
    nalu_data.extend_from_slice(&3u32.to_be_bytes());
    nalu_data.extend_from_slice(&[1, 2, 3]);
    let frame_type = if is_key_frame { 0x10 } else { 0x20 };
    let mut tag_body = vec![frame_type | 0x07, 0x01, 0x00, 0x00, 0x00];
    tag_body.extend_from_slice(&nalu_data);
    wrap_tag(9, ts_ms, &tag_body)
}

fn aac_config_tag() -> Vec<u8> {
    // AudioObjectType=2 (AAC LC), SamplingFrequencyIndex=4 (44100), ChannelConfiguration=2
    let word: u16 = (2u16 << 11) | (4u16 << 7) | (2u16 << 3);
    let mut tag_body = vec![0b1010_1111, 0x00];
    tag_body.extend_from_slice(&word.to_be_bytes());
    wrap_tag(8, 0, &tag_body)
}

fn aac_sample_tag(ts_ms: u32) -> Vec<u8> {
    let mut tag_body = vec![0b1010_1111, 0x01];
    tag_body.extend_from_slice(&[0xAB, 0xCD, 0xEF]);
    wrap_tag(8, ts_ms, &tag_body)
}

fn keyframes_object(entries: &[(f64, f64)]) -> AmfValue {
    let times = AmfValue::StrictArray(entries.iter().map(|(t, _)| AmfValue::Number(*t)).collect());
    let positions = AmfValue::StrictArray(entries.iter().map(|(_, p)| AmfValue::Number(*p)).collect());
    let mut obj = AmfObject::new();
    obj.push(amf_string("times").unwrap(), times);
    obj.push(amf_string("filepositions").unwrap(), positions);
    AmfValue::Object(obj)
}

fn build_flv(keyframe_positions: &[(f64, f64)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&[0x46, 0x4C, 0x56, 0x01, 0x05, 0x00, 0x00, 0x00, 0x09]);
    out.extend_from_slice(&[0, 0, 0, 0]); // PreviousTagSize0

    let mut metadata = AmfObject::new();
    metadata.push(amf_string("duration").unwrap(), AmfValue::Number(12.5));
    metadata.push(amf_string("width").unwrap(), AmfValue::Number(1280.0));
    metadata.push(amf_string("height").unwrap(), AmfValue::Number(720.0));
    metadata.push(amf_string("keyframes").unwrap(), keyframes_object(keyframe_positions));
    out.extend(script_tag("onMetaData", AmfValue::EcmaArray(metadata)));

    out.extend(avc_config_tag());
    out.extend(aac_config_tag());
    out.extend(avc_sample_tag(0, true));
    out.extend(aac_sample_tag(0));
    out.extend(avc_sample_tag(33, false));
    out.extend(aac_sample_tag(40));
    out
}

struct MemoryStream {
    data: Vec<u8>,
    pos: usize,
    chunk_size: usize,
}

impl MemoryStream {
    fn new(data: Vec<u8>) -> Self {
        Self {
            chunk_size: data.len().max(1),
            data,
            pos: 0,
        }
    }
}

impl ReadStream for MemoryStream {
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<u32> {
        let remaining = &self.data[self.pos..];
        let n = remaining.len().min(buf.len()).min(self.chunk_size);
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n as u32)
    }

    fn can_seek(&self) -> bool {
        true
    }

    async fn seek(&mut self, position: u64) -> io::Result<()> {
        self.pos = position as usize;
        Ok(())
    }
}

fn player_with(data: Vec<u8>) -> FlvPlayer<MemoryStream> {
    let task_service = Arc::new(DefaultTaskService::new());
    FlvPlayer::new(MemoryStream::new(data), task_service, TimestampPolicy::Raw)
}

#[tokio::test]
async fn open_reports_media_info() {
    let flv = build_flv(&[(0.0, 13.0)]);
    let player = player_with(flv);
    let info = player.open().await.expect("open should succeed");
    assert_eq!(info.get("Width").map(String::as_str), Some("1280"));
    assert_eq!(info.get("Height").map(String::as_str), Some("720"));
    assert_eq!(info.get("CanSeek").map(String::as_str), Some("True"));
    assert!(info.contains_key("AudioCodecPrivateData"));
}

#[tokio::test]
async fn samples_are_delivered_in_order() {
    let flv = build_flv(&[(0.0, 13.0)]);
    let player = player_with(flv);
    player.open().await.expect("open should succeed");

    let first_video = player.next_video().await.expect("first video sample");
    assert!(first_video.is_key_frame);
    assert_eq!(first_video.dts_100ns, 0);

    let first_audio = player.next_audio().await.expect("first audio sample");
    assert_eq!(first_audio.timestamp_100ns, 0);

    let second_video = player.next_video().await.expect("second video sample");
    assert!(!second_video.is_key_frame);
    assert_eq!(second_video.dts_100ns, 330_000);
}

#[tokio::test]
async fn end_of_stream_is_reported_once_queues_drain() {
    let flv = build_flv(&[(0.0, 13.0)]);
    let player = player_with(flv);
    player.open().await.expect("open should succeed");

    for _ in 0..2 {
        player.next_video().await.expect("video sample");
    }
    let err = player.next_video().await.expect_err("stream should be exhausted");
    assert_eq!(err.kind(), ErrorKind::EndOfStream);
}

#[tokio::test]
async fn seek_rewinds_stream_to_the_selected_keyframe() {
    // The index's only entry points at offset 13, the first tag after the
    // header — the script tag. Seeking there and re-reading replays the
    // metadata (ignored by the sample-only visitor) and the codec
    // configuration tags (which re-establish parser state) before the
    // first, key-frame video sample.
    let flv = build_flv(&[(0.0, 13.0)]);
    let player = player_with(flv);
    player.open().await.expect("open should succeed");

    player.next_video().await.expect("first video sample");
    player.next_audio().await.expect("first audio sample");

    let seeked_to = player.seek(0).await.expect("seek should succeed");
    assert_eq!(seeked_to, 0);

    let sample = player.next_video().await.expect("video sample after seek");
    assert!(sample.is_key_frame);
    assert_eq!(sample.dts_100ns, 0);
}

#[tokio::test]
async fn close_cancels_pending_operations() {
    let flv = build_flv(&[(0.0, 13.0)]);
    let player = player_with(flv);
    player.open().await.expect("open should succeed");
    player.close().await;

    let err = player.next_audio().await.expect_err("closed engine should error");
    assert_eq!(err.kind(), ErrorKind::Cancel);
}

#[tokio::test]
async fn unseekable_stream_reports_cannot_seek() {
    struct NoSeek(MemoryStream);
    impl ReadStream for NoSeek {
        async fn read(&mut self, buf: &mut [u8]) -> io::Result<u32> {
            self.0.read(buf).await
        }
        fn can_seek(&self) -> bool {
            false
        }
        async fn seek(&mut self, position: u64) -> io::Result<()> {
            self.0.seek(position).await
        }
    }

    let flv = build_flv(&[(0.0, 13.0)]);
    let task_service = Arc::new(DefaultTaskService::new());
    let player = FlvPlayer::new(NoSeek(MemoryStream::new(flv)), task_service, TimestampPolicy::Raw);
    let info = player.open().await.expect("open should succeed");
    assert_eq!(info.get("CanSeek").map(String::as_str), Some("False"));

    let err = player.seek(0).await.expect_err("seek should fail on non-seekable stream");
    assert_eq!(err.kind(), ErrorKind::Other);
}
