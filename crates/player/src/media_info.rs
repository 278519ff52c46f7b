use std::collections::HashMap;

/// The string-keyed projection [`crate::FlvPlayer::open`] returns, per
/// spec.md §3. Recognized keys: `Duration`, `Width`, `Height`, `CanSeek`
/// (`"True"`/`"False"`), `AudioCodecPrivateData`.
pub type MediaInfo = HashMap<String, String>;

/// How sample timestamps are adjusted as they leave the parser. spec.md's
/// Open Question documents `first_sample_timestamp`/`adjust_sample_timestamp`
/// as tracked but never wired up in the original — i.e. its effective
/// default is off — so this toggle defaults to `Raw` to match that observed
/// behavior; a caller that wants the normalization can opt in. See
/// DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Pass FLV timestamps through unchanged. Matches the original's
    /// effective (if accidental) default: `adjust_sample_timestamp` is
    /// never called.
    #[default]
    Raw,
    /// For streams where [`crate::stream::ReadStream::can_seek`] is false,
    /// subtract the first observed sample's timestamp from every
    /// subsequent one, so playback always starts at zero regardless of
    /// where the live source happened to begin. Matches
    /// `examples/original_source/core/dawn_player/flv_player.cpp`'s
    /// documented (but dormant) `first_video_ts`/`first_audio_ts` handling
    /// for non-seekable sources.
    NormalizeNonSeekable,
}

/// Applies `policy` to a raw sample timestamp, tracking the stream's first
/// observed timestamp in `first_sample_timestamp_100ns` when normalization
/// is active and the stream cannot seek.
pub(crate) fn adjust_timestamp(
    policy: TimestampPolicy,
    can_seek: bool,
    first_sample_timestamp_100ns: &mut Option<i64>,
    raw_timestamp_100ns: i64,
) -> i64 {
    match policy {
        TimestampPolicy::Raw => raw_timestamp_100ns,
        TimestampPolicy::NormalizeNonSeekable => {
            if can_seek {
                return raw_timestamp_100ns;
            }
            let base = *first_sample_timestamp_100ns.get_or_insert(raw_timestamp_100ns);
            raw_timestamp_100ns - base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_policy_passes_through() {
        let mut first = None;
        assert_eq!(adjust_timestamp(TimestampPolicy::Raw, false, &mut first, 500), 500);
        assert_eq!(first, None);
    }

    #[test]
    fn normalize_non_seekable_subtracts_first_timestamp() {
        let mut first = None;
        assert_eq!(
            adjust_timestamp(TimestampPolicy::NormalizeNonSeekable, false, &mut first, 1_000),
            0
        );
        assert_eq!(
            adjust_timestamp(TimestampPolicy::NormalizeNonSeekable, false, &mut first, 1_300),
            300
        );
    }

    #[test]
    fn normalize_is_a_no_op_when_seekable() {
        let mut first = None;
        assert_eq!(
            adjust_timestamp(TimestampPolicy::NormalizeNonSeekable, true, &mut first, 1_000),
            1_000
        );
        assert_eq!(first, None);
    }
}
