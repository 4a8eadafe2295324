//! Tile decode entry point.
//!
//! Wires the pipeline together: split the payload into sublayer segments,
//! decode each segment's varint stream, and fold every stream through a
//! [`TileBuilder`](crate::timeseries::TileBuilder). The decode is synchronous
//! and runs to completion; the payload and length table are borrowed
//! read-only throughout.

use crate::config::FormatConfig;
use crate::error::DecodeError;
use crate::interval::Interval;
use crate::segment::split_sublayers;
use crate::timeseries::TileBuilder;
use crate::varint::read_packed;
use crate::TileData;
use log::debug;
use serde::{Deserialize, Serialize};

/// Framing metadata accompanying a tile payload.
///
/// Everything here is supplied by the caller alongside the raw bytes: the
/// decoder derives nothing from geography and passes `cols`/`rows` through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileOptions {
    /// Grid width in cells, passed through to the result
    pub cols: u32,
    /// Grid height in cells, passed through to the result
    pub rows: u32,
    /// Start of the requested time window, epoch milliseconds
    pub min_frame: i64,
    /// End of the requested time window, epoch milliseconds
    pub max_frame: i64,
    /// Temporal resolution of the tile's frame axis
    pub interval: Interval,
    /// Data channels encoded per cell
    pub sublayers: usize,
    /// Cumulative end-byte offsets of each sublayer's segment
    pub buffer_lengths: Vec<usize>,
    /// Sentinel and scale/offset constants
    pub format: FormatConfig,
}

/// Decode one tile payload into its sparse cell time series.
///
/// An empty `buffer_lengths` table is the no-data case and short-circuits to
/// an empty result: it is not an error.
///
/// # Errors
/// Any [`DecodeError`] aborts the whole tile; no partial result is returned.
///
/// # Example
/// ```
/// use fourwings_lib::config::FormatConfig;
/// use fourwings_lib::interval::Interval;
/// use fourwings_lib::tile::{decode_tile, TileOptions};
///
/// // One sublayer, one cell (index 3) covering frames 0..=1 with values 5, 7
/// let payload = [0x03, 0x00, 0x01, 0x05, 0x07];
/// let options = TileOptions {
///     cols: 4,
///     rows: 4,
///     min_frame: 0,
///     max_frame: 2 * 86_400_000,
///     interval: Interval::Day,
///     sublayers: 1,
///     buffer_lengths: vec![payload.len()],
///     format: FormatConfig::default(),
/// };
///
/// let tile = decode_tile(&payload, &options).unwrap();
/// assert_eq!(tile.indexes, vec![3]);
/// assert_eq!(tile.cells[0].sublayers[0], Some(vec![Some(5.0), Some(7.0)]));
/// ```
pub fn decode_tile(payload: &[u8], options: &TileOptions) -> Result<TileData, DecodeError> {
    if options.buffer_lengths.is_empty() {
        return Ok(TileData::empty(options.cols, options.rows));
    }

    // The frame window is fixed once per decode and sizes every cell's series.
    let tile_min_frame = options.interval.interval_frame(options.min_frame).ceil() as i64;
    let tile_max_frame = options.interval.interval_frame(options.max_frame).ceil() as i64;
    let frame_len = (tile_max_frame - tile_min_frame).max(0) as usize;

    debug!(
        "decoding tile: {} sublayer segments, frame window {tile_min_frame}..{tile_max_frame} ({})",
        options.buffer_lengths.len(),
        options.interval
    );

    let segments = split_sublayers(payload, &options.buffer_lengths)?;

    let mut builder = TileBuilder::new(
        segments.len(),
        options.sublayers,
        frame_len,
        tile_min_frame,
        &options.format,
    );
    for (sublayer, segment) in segments.iter().enumerate() {
        let stream = read_packed(segment)?;
        builder.ingest_stream(sublayer, &stream)?;
    }

    let (indexes, cells) = builder.finish();
    Ok(TileData {
        cols: options.cols,
        rows: options.rows,
        indexes,
        cells,
    })
}
