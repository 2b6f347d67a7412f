//! Covering byte-range computation for chunked content retrieval.

use std::ops::RangeInclusive;

/// Compute the covering set of contiguous byte ranges for `content_length`
/// bytes, sliced into chunks of `range_size`.
///
/// Ranges are inclusive, non-overlapping, sorted ascending and together
/// cover `[0, content_length - 1]` exactly; the last range may be shorter
/// than `range_size`. Degenerate inputs (`content_length == 0` or
/// `range_size == 0`) yield an empty list.
pub fn byte_ranges(content_length: u64, range_size: u64) -> Vec<RangeInclusive<u64>> {
    byte_ranges_from(content_length, range_size, 0)
}

/// Same as [`byte_ranges`], with the covered interval starting at `start`
/// instead of zero. Used when resuming mid-content.
pub fn byte_ranges_from(
    content_length: u64,
    range_size: u64,
    start: u64,
) -> Vec<RangeInclusive<u64>> {
    if content_length == 0 || range_size == 0 {
        return Vec::new();
    }
    if range_size >= content_length {
        return vec![start..=start + content_length - 1];
    }

    let count = content_length.div_ceil(range_size);
    let last = start + content_length - 1;
    (0..count)
        .map(|i| {
            let lower = start + i * range_size;
            let upper = (lower + range_size - 1).min(last);
            lower..=upper
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        assert_eq!(byte_ranges(0, 2), Vec::<RangeInclusive<u64>>::new());
        assert_eq!(byte_ranges(1, 0), Vec::<RangeInclusive<u64>>::new());
    }

    #[test]
    fn test_size_too_large() {
        assert_eq!(byte_ranges(1, 2), vec![0..=0]);
        assert_eq!(byte_ranges(5, 6), vec![0..=4]);
    }

    #[test]
    fn test_size_one() {
        assert_eq!(byte_ranges(1, 1), vec![0..=0]);
        assert_eq!(byte_ranges(2, 1), vec![0..=0, 1..=1]);
        assert_eq!(byte_ranges(3, 1), vec![0..=0, 1..=1, 2..=2]);
    }

    #[test]
    fn test_size_two() {
        assert_eq!(byte_ranges(2, 2), vec![0..=1]);
        assert_eq!(byte_ranges(3, 2), vec![0..=1, 2..=2]);
        assert_eq!(byte_ranges(4, 2), vec![0..=1, 2..=3]);
    }

    #[test]
    fn test_eight_byte_chunks() {
        assert_eq!(byte_ranges(8, 8), vec![0..=7]);
        assert_eq!(byte_ranges(10, 8), vec![0..=7, 8..=9]);
        assert_eq!(byte_ranges(16, 8), vec![0..=7, 8..=15]);
        assert_eq!(byte_ranges(24, 8), vec![0..=7, 8..=15, 16..=23]);
    }

    #[test]
    fn test_offset_start() {
        assert_eq!(byte_ranges_from(1, 1, 16), vec![16..=16]);
        assert_eq!(byte_ranges_from(1, 8, 16), vec![16..=16]);
        assert_eq!(byte_ranges_from(2, 8, 16), vec![16..=17]);
        assert_eq!(byte_ranges_from(3, 2, 16), vec![16..=17, 18..=18]);
        assert_eq!(byte_ranges_from(4, 2, 16), vec![16..=17, 18..=19]);
        assert_eq!(byte_ranges_from(7, 3, 3), vec![3..=5, 6..=8, 9..=9]);
        assert_eq!(
            byte_ranges_from(32, 8, 16),
            vec![16..=23, 24..=31, 32..=39, 40..=47]
        );
    }

    #[test]
    fn test_very_large_range_size_results_in_one_range() {
        let two_mb: u64 = 2_097_152;
        assert_eq!(byte_ranges(50_001, two_mb), vec![0..=50_000]);
        assert_eq!(byte_ranges_from(2000, two_mb, 999), vec![999..=2998]);
    }

    #[test]
    fn test_covering_no_gaps_no_overlaps() {
        for (len, size) in [(100u64, 7u64), (1024, 256), (999, 1000), (12345, 64)] {
            let ranges = byte_ranges(len, size);
            let mut expected_next = 0u64;
            for range in &ranges {
                assert_eq!(*range.start(), expected_next);
                assert!(range.end() >= range.start());
                expected_next = range.end() + 1;
            }
            assert_eq!(expected_next, len);
        }
    }
}
