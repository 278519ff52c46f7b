use dawn_amf0::Amf0Error;
use dawn_flv::FlvError;

/// Coarse-grained error category, stable across internal refactors of
/// `dawn-flv`/`dawn-amf0`; a caller that only wants to branch on "was this
/// an I/O problem or a bitstream problem" should match on `kind()` rather
/// than the `source()` chain, per spec.md §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    IoError,
    ParseError,
    Cancel,
    EndOfStream,
    Other,
}

/// Failure of [`crate::FlvPlayer::open`].
#[derive(Debug, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct OpenError {
    kind: ErrorKind,
    message: String,
}

impl OpenError {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub(crate) fn io_error(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::IoError,
            message: message.into(),
        }
    }

    pub(crate) fn parse_error(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ParseError,
            message: message.into(),
        }
    }

    pub(crate) fn cancel(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Cancel,
            message: message.into(),
        }
    }
}

impl From<FlvError> for OpenError {
    fn from(err: FlvError) -> Self {
        Self::parse_error(err.to_string())
    }
}

impl From<Amf0Error> for OpenError {
    fn from(err: Amf0Error) -> Self {
        Self::parse_error(err.to_string())
    }
}

/// Failure of [`crate::FlvPlayer::next_audio`] / `next_video`.
#[derive(Debug, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct SampleError {
    kind: ErrorKind,
    message: String,
}

impl SampleError {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub(crate) fn io_error(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::IoError,
            message: message.into(),
        }
    }

    pub(crate) fn parse_error(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ParseError,
            message: message.into(),
        }
    }

    pub(crate) fn cancel(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Cancel,
            message: message.into(),
        }
    }

    pub(crate) fn end_of_stream() -> Self {
        Self {
            kind: ErrorKind::EndOfStream,
            message: "end of stream".to_string(),
        }
    }
}

impl From<FlvError> for SampleError {
    fn from(err: FlvError) -> Self {
        Self::parse_error(err.to_string())
    }
}

/// Failure of [`crate::FlvPlayer::seek`].
///
/// Per spec.md §7 this surface has only two kinds: `cancel` and `other`. A
/// stream-transport failure during the actual `seek()` call is not one of
/// them — spec.md §4.6 has it set `is_error` instead, surfaced by the next
/// `next_audio`/`next_video` as a `SampleError`.
#[derive(Debug, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct SeekError {
    kind: ErrorKind,
    message: String,
}

impl SeekError {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub(crate) fn other(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Other,
            message: message.into(),
        }
    }

    pub(crate) fn cancel(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Cancel,
            message: message.into(),
        }
    }
}
