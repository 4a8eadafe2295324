//! Payload segmentation.
//!
//! A tile payload is the concatenation of one byte buffer per sublayer. The
//! accompanying length table holds cumulative end offsets: sublayer 0 spans
//! `[0, lengths[0])`, sublayer `i` spans `[lengths[i-1], lengths[i])`. The
//! splitter hands out read-only sub-slices; nothing is copied.

use crate::error::DecodeError;
use log::trace;

/// Extra bytes granted to the final sublayer segment beyond its cumulative
/// boundary.
///
/// The encoder emits one byte after the last sublayer that the length table
/// does not account for; decoding the last segment without it loses the tail
/// of the final varint. The extension is clamped to the payload end, so a
/// table whose last entry equals the payload length is also accepted. Kept
/// bit-exact with the existing encoder.
pub const LAST_SEGMENT_TRAILING_BYTE: usize = 1;

/// Split a payload into per-sublayer segments using cumulative end offsets.
///
/// Returns one read-only slice per table entry. Empty segments (repeated
/// boundaries) are allowed and decode to empty streams.
///
/// # Errors
/// [`DecodeError::SegmentOutOfRange`] if the table is not monotonically
/// non-decreasing or any declared boundary lies beyond the payload.
///
/// # Example
/// ```
/// use fourwings_lib::segment::split_sublayers;
///
/// let payload = [0u8; 61];
/// let segments = split_sublayers(&payload, &[10, 25, 40, 40, 61]).unwrap();
/// let spans: Vec<usize> = segments.iter().map(|s| s.len()).collect();
/// assert_eq!(spans, vec![10, 15, 15, 0, 21]);
/// ```
pub fn split_sublayers<'a>(
    payload: &'a [u8],
    lengths: &[usize],
) -> Result<Vec<&'a [u8]>, DecodeError> {
    let mut segments = Vec::with_capacity(lengths.len());

    for (i, &boundary) in lengths.iter().enumerate() {
        let start = if i == 0 { 0 } else { lengths[i - 1] };

        if boundary < start || boundary > payload.len() {
            return Err(DecodeError::SegmentOutOfRange {
                segment: i,
                start,
                end: boundary,
                payload_len: payload.len(),
            });
        }

        let end = if i == lengths.len() - 1 {
            (boundary + LAST_SEGMENT_TRAILING_BYTE).min(payload.len())
        } else {
            boundary
        };

        trace!("sublayer segment {i}: bytes {start}..{end}");
        segments.push(&payload[start..end]);
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_cumulative_boundaries() {
        let payload: Vec<u8> = (0u8..61).collect();
        let segments = split_sublayers(&payload, &[10, 25, 40, 40, 61]).unwrap();

        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0], &payload[0..10]);
        assert_eq!(segments[1], &payload[10..25]);
        assert_eq!(segments[2], &payload[25..40]);
        assert!(segments[3].is_empty(), "repeated boundary is an empty segment");
        assert_eq!(segments[4], &payload[40..61]);
    }

    #[test]
    fn last_segment_claims_the_trailing_byte() {
        // Table stops one byte short of the payload; the final segment
        // absorbs the leftover byte.
        let payload: Vec<u8> = (0u8..21).collect();
        let segments = split_sublayers(&payload, &[10, 20]).unwrap();

        assert_eq!(segments[0], &payload[0..10]);
        assert_eq!(segments[1], &payload[10..21]);
    }

    #[test]
    fn last_segment_extension_clamps_to_payload_end() {
        let payload = [7u8; 20];
        let segments = split_sublayers(&payload, &[10, 20]).unwrap();
        assert_eq!(segments[1].len(), 10);
    }

    #[test]
    fn single_sublayer_spans_whole_payload() {
        let payload = [1u8; 8];
        let segments = split_sublayers(&payload, &[8]).unwrap();
        assert_eq!(segments, vec![&payload[..]]);
    }

    #[test]
    fn boundary_past_payload_fails() {
        let payload = [0u8; 10];
        let err = split_sublayers(&payload, &[4, 12]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::SegmentOutOfRange {
                segment: 1,
                start: 4,
                end: 12,
                payload_len: 10,
            }
        );
    }

    #[test]
    fn non_monotonic_table_fails() {
        let payload = [0u8; 10];
        let err = split_sublayers(&payload, &[6, 3]).unwrap_err();
        assert!(matches!(err, DecodeError::SegmentOutOfRange { segment: 1, .. }));
    }

    #[test]
    fn empty_table_yields_no_segments() {
        let payload = [0u8; 4];
        assert!(split_sublayers(&payload, &[]).unwrap().is_empty());
    }
}
