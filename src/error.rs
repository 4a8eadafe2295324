//! Decode error taxonomy.
//!
//! Every variant is fatal for the tile being decoded: the format guarantees
//! self-consistent framing, so a violation means corruption and the decoder
//! returns no cells rather than a partial result. Retrying a corrupt tile is
//! the transport layer's concern, not the decoder's.

use thiserror::Error;

/// Errors that can occur while decoding a tile payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A varint's continuation bit was still set at the end of its buffer
    #[error("truncated varint starting at byte {offset}: buffer ended mid-sequence")]
    TruncatedVarint {
        /// Byte offset of the first byte of the unfinished varint
        offset: usize,
    },

    /// A varint encoding does not fit in 64 bits
    #[error("varint starting at byte {offset} overflows 64 bits")]
    VarintOverflow {
        /// Byte offset of the first byte of the over-long varint
        offset: usize,
    },

    /// The buffer length table declares a segment outside the payload
    #[error(
        "sublayer segment {segment} spans bytes {start}..{end} but the payload is {payload_len} bytes"
    )]
    SegmentOutOfRange {
        /// Zero-based sublayer segment index
        segment: usize,
        /// Computed segment start offset
        start: usize,
        /// Computed segment end offset (exclusive)
        end: usize,
        /// Total payload length in bytes
        payload_len: usize,
    },

    /// A record declares more values than remain in its stream
    #[error(
        "record at stream position {offset} in sublayer {sublayer} declares {needed} values but only {available} remain"
    )]
    ShortRecord {
        /// Zero-based sublayer stream index
        sublayer: usize,
        /// Integer-stream position where the record starts
        offset: usize,
        /// Declared value-block length (header included when the header itself
        /// is truncated)
        needed: u64,
        /// Integers actually remaining in the stream
        available: u64,
    },

    /// A record's end frame precedes its start frame
    #[error(
        "cell {cell} in sublayer {sublayer} has end frame {end_frame} before start frame {start_frame}"
    )]
    NegativeFrameSpan {
        /// Zero-based sublayer stream index
        sublayer: usize,
        /// Cell index of the offending record
        cell: u64,
        /// Declared start frame
        start_frame: u64,
        /// Declared end frame
        end_frame: u64,
    },
}
