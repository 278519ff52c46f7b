use std::collections::BTreeMap;

/// Wraps `f64` so a [`BTreeMap`] keyed on it iterates from largest to
/// smallest time, matching
/// `examples/original_source/core/dawn_player/flv_player.cpp`'s
/// `std::map<double, uint64_t, std::greater<double>>`. FLV keyframe times
/// are always finite, so `Ord` can be total here even though `f64` isn't in
/// general.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DescSeconds(f64);

impl Eq for DescSeconds {}

impl PartialOrd for DescSeconds {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DescSeconds {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.0.partial_cmp(&self.0).unwrap_or(std::cmp::Ordering::Equal)
    }
}

/// Maps keyframe time (seconds) to the byte offset of its tag, ordered so
/// that seeking can walk from the latest keyframe backwards. Built once, in
/// [`crate::FlvPlayer::open`], from the `onMetaData` `keyframes` object's
/// parallel `times`/`filepositions` arrays.
#[derive(Debug, Clone, Default)]
pub struct KeyframeIndex {
    by_time_desc: BTreeMap<DescSeconds, u64>,
}

impl KeyframeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, time_seconds: f64, file_offset: u64) {
        self.by_time_desc.insert(DescSeconds(time_seconds), file_offset);
    }

    pub fn is_empty(&self) -> bool {
        self.by_time_desc.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_time_desc.len()
    }

    /// The greatest indexed time that is `<= target_seconds`, or, if every
    /// indexed time is greater than `target_seconds` (seeking before the
    /// first keyframe), the smallest indexed time. Mirrors
    /// `keyframes.lower_bound(target)` falling back to `keyframes.rbegin()`
    /// in the original.
    pub fn lower_bound(&self, target_seconds: f64) -> Option<(f64, u64)> {
        for (time, offset) in self.by_time_desc.iter() {
            if time.0 <= target_seconds {
                return Some((time.0, *offset));
            }
        }
        self.by_time_desc.iter().next_back().map(|(time, offset)| (time.0, *offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> KeyframeIndex {
        let mut index = KeyframeIndex::new();
        index.insert(0.0, 13);
        index.insert(2.5, 8192);
        index.insert(7.0, 65536);
        index
    }

    #[test]
    fn s6_seek_picks_greatest_time_not_exceeding_target() {
        let index = sample_index();
        assert_eq!(index.lower_bound(3.0), Some((2.5, 8192)));
    }

    #[test]
    fn exact_match_is_used() {
        let index = sample_index();
        assert_eq!(index.lower_bound(2.5), Some((2.5, 8192)));
    }

    #[test]
    fn beyond_last_keyframe_picks_largest_time() {
        let index = sample_index();
        assert_eq!(index.lower_bound(1000.0), Some((7.0, 65536)));
    }

    #[test]
    fn before_first_keyframe_falls_back_to_smallest_time() {
        let index = sample_index();
        assert_eq!(index.lower_bound(-5.0), Some((0.0, 13)));
    }

    #[test]
    fn empty_index_has_no_bound() {
        assert_eq!(KeyframeIndex::new().lower_bound(0.0), None);
    }
}
