//! # Fourwings Tile Decoder Library
//!
//! This library decodes packed "fourwings" activity tiles: binary payloads in
//! which a spatial grid's time-series values are run-length/sparse encoded, one
//! independent byte segment per data channel ("sublayer"). The decoder turns a
//! payload plus a small amount of framing metadata into an in-memory sparse
//! structure indexed by grid cell and time frame.
//!
//! ## Wire Format
//!
//! A tile payload is the concatenation of `sublayers` byte buffers. Each buffer
//! is a flat sequence of base-128 varints (7 payload bits per byte, high bit =
//! continuation, least-significant group first) encoding repeated cell records:
//!
//! ```text
//! [cell_index, start_frame, end_frame, v0, v1, ..., v(k-1)]
//! k = (end_frame - start_frame + 1) * sublayers
//! ```
//!
//! Each covered frame contributes `sublayers` consecutive raw values to the
//! record, but a given stream only ever supplies its own channel's scalar per
//! frame; the multiplier describes how far the frame offset advances, not
//! which slot a value lands in. The raw value `4294967295` is a reserved
//! sentinel meaning "no sample" and is never materialized.
//!
//! ## Decode Pipeline
//!
//! 1. **Segment**: split the payload into per-sublayer slices using the
//!    cumulative length table ([`segment`]).
//! 2. **Read**: decode each slice into its integer stream ([`varint`]).
//! 3. **Reconstruct**: walk each stream's records and accumulate sparse
//!    per-cell frame series ([`timeseries`]).
//!
//! The entry point is [`tile::decode_tile`]. Frame indices are quantized
//! timestamps; the requested window is converted to interval-frame space once
//! per decode via [`interval::Interval`].
//!
//! ## Sparsity Guarantees
//!
//! - A cell appears in the result only if some stream mentions it; result
//!   order is first-seen order across streams.
//! - A cell's sublayer slot is `None` unless that sublayer's stream carried at
//!   least one real (non-sentinel) value for it, never a zero-filled array.
//! - Within an allocated frame series, frames without a sample stay `None`.
//!
//! A corrupt payload (truncated varint, bad segment table, short record,
//! inverted frame span) fails the whole decode: partially-populated output
//! would be indistinguishable from legitimately sparse data.

use serde::{Deserialize, Serialize};

// Module declarations
pub mod config;
pub mod error;
pub mod interval;
pub mod segment;
pub mod tile;
pub mod timeseries;
pub mod varint;

/// One scalar time series over the tile's frame window.
///
/// Index = frame offset from the tile's minimum interval frame; `None` marks
/// frames with no sample.
pub type FrameSeries = Vec<Option<f64>>;

/// A decoded grid cell: one optional time series per sublayer.
///
/// The `sublayers` vector always has one slot per sublayer stream in the tile.
/// A slot is `None` until the first real value for that sublayer arrives, at
/// which point a full-window [`FrameSeries`] is allocated and filled sparsely.
///
/// # Example
/// ```
/// use fourwings_lib::Cell;
///
/// let cell = Cell {
///     sublayers: vec![Some(vec![Some(5.0), None, Some(7.0)]), None],
/// };
/// assert!(cell.sublayers[1].is_none()); // second sublayer never saw data
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Per-sublayer frame series; `None` = sublayer never mentioned this cell
    pub sublayers: Vec<Option<FrameSeries>>,
}

/// Complete decode result for one tile.
///
/// `indexes` and `cells` are parallel: `indexes[i]` is the grid cell index of
/// `cells[i]`, in the order cells were first encountered across all sublayer
/// streams. `cols` and `rows` are the caller-supplied grid dimensions, passed
/// through verbatim for downstream consumers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileData {
    /// Grid width in cells
    pub cols: u32,
    /// Grid height in cells
    pub rows: u32,
    /// Populated cell indices, first-seen order
    pub indexes: Vec<u64>,
    /// Decoded cells, parallel to `indexes`
    pub cells: Vec<Cell>,
}

impl TileData {
    /// An empty tile result carrying only the grid dimensions.
    pub fn empty(cols: u32, rows: u32) -> Self {
        TileData {
            cols,
            rows,
            indexes: Vec::new(),
            cells: Vec::new(),
        }
    }
}
