use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

/// The byte source a [`crate::FlvPlayer`] pulls from. Grounded on
/// `examples/original_source/core/dawn_player/flv_player.cpp`'s
/// `i_stream` abstraction (`read`, `can_seek`, `seek`), rendered as an
/// async trait over the bytes the engine needs rather than the full
/// `AsyncRead + AsyncSeek` surface, so callers can implement it directly
/// against a socket that cannot seek at all.
pub trait ReadStream: Send {
    /// Reads up to `buf.len()` bytes, returning the number read. `Ok(0)`
    /// means end of stream.
    fn read(&mut self, buf: &mut [u8]) -> impl std::future::Future<Output = io::Result<u32>> + Send;

    /// Whether [`ReadStream::seek`] is meaningful for this stream. A live
    /// network source should return `false`.
    fn can_seek(&self) -> bool;

    /// Repositions the stream to an absolute byte offset. Only called when
    /// [`ReadStream::can_seek`] returns `true`.
    fn seek(&mut self, position: u64) -> impl std::future::Future<Output = io::Result<()>> + Send;
}

/// Adapts any `AsyncRead + AsyncSeek` (e.g. a `tokio::fs::File`) into a
/// seekable [`ReadStream`].
pub struct RandomAccessStream<S> {
    inner: S,
}

impl<S> RandomAccessStream<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: AsyncRead + AsyncSeek + Unpin + Send> ReadStream for RandomAccessStream<S> {
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<u32> {
        let n = self.inner.read(buf).await?;
        Ok(n as u32)
    }

    fn can_seek(&self) -> bool {
        true
    }

    async fn seek(&mut self, position: u64) -> io::Result<()> {
        self.inner.seek(io::SeekFrom::Start(position)).await?;
        Ok(())
    }
}

/// Adapts any `AsyncRead` (e.g. a live HTTP body or a pipe) into a
/// non-seekable [`ReadStream`]. `seek` always fails: the engine never
/// calls it because [`crate::MediaInfo`]'s `CanSeek` field will read
/// `"False"` and well-behaved consumers honor that.
pub struct InputStream<S> {
    inner: S,
}

impl<S> InputStream<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: AsyncRead + Unpin + Send> ReadStream for InputStream<S> {
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<u32> {
        let n = self.inner.read(buf).await?;
        Ok(n as u32)
    }

    fn can_seek(&self) -> bool {
        false
    }

    async fn seek(&mut self, _position: u64) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "stream is not seekable"))
    }
}
