//! Cell time-series reconstruction.
//!
//! Each sublayer's integer stream is a flat sequence of variable-length cell
//! records:
//!
//! ```text
//! [cell_index, start_frame, end_frame, v0, v1, ..., v(k-1)]
//! k = (end_frame - start_frame + 1) * frame_stride
//! ```
//!
//! Record length depends on the frame span, so the cursor recomputes the jump
//! after every record instead of using a fixed stride. The `frame_stride`
//! multiplier is the number of raw values one frame contributes to a stream
//! (a full frame-row across all sublayers), but every value decoded from
//! stream `s` belongs to sublayer `s`: the stride only controls how fast the
//! frame offset advances, never which slot a value lands in.
//!
//! [`TileBuilder`] owns the growing cell collection for one decode and is
//! threaded through each sublayer's ingestion in turn. Cells are keyed by an
//! explicit index map, so streams that revisit a cell (the normal case: every
//! sublayer lists the same cells) merge into the one decoded cell regardless
//! of listing order.

use crate::config::FormatConfig;
use crate::error::DecodeError;
use crate::{Cell, FrameSeries};
use log::{debug, trace};
use std::collections::HashMap;

/// Integers in a record before its value block: cell index, start frame,
/// end frame.
const RECORD_HEADER_LEN: usize = 3;

/// Accumulates decoded cells for one tile.
///
/// Create one per decode, feed it every sublayer stream in order, then take
/// the result with [`TileBuilder::finish`]. Encounter order is preserved:
/// `indexes` lists cell indices in the order any stream first mentioned them.
pub struct TileBuilder {
    /// Per-cell sublayer slot count (= number of sublayer streams)
    slot_count: usize,
    /// Raw values contributed per covered frame (= declared sublayer count)
    frame_stride: usize,
    /// Length of every allocated frame series
    frame_len: usize,
    /// Interval frame corresponding to series offset 0
    tile_min_frame: i64,
    /// Raw value meaning "no sample"
    no_data: u64,
    scale: f64,
    offset: f64,
    /// Cell index -> position in `cells`/`indexes`
    slots: HashMap<u64, usize>,
    indexes: Vec<u64>,
    cells: Vec<Cell>,
}

impl TileBuilder {
    /// Set up a builder for one tile decode.
    ///
    /// `slot_count` is the number of sublayer streams that will be ingested;
    /// `frame_stride` the declared per-cell sublayer count (equal for
    /// well-formed tiles); `frame_len` the frame-window length shared by all
    /// allocated series; `tile_min_frame` the interval frame of offset 0.
    pub fn new(
        slot_count: usize,
        frame_stride: usize,
        frame_len: usize,
        tile_min_frame: i64,
        format: &FormatConfig,
    ) -> Self {
        TileBuilder {
            slot_count,
            frame_stride,
            frame_len,
            tile_min_frame,
            no_data: format.no_data_value,
            scale: format.scale,
            offset: format.offset,
            slots: HashMap::new(),
            indexes: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Walk one sublayer's integer stream and fold its records into the
    /// builder.
    ///
    /// `sublayer` is the stream's position, which is also the cell slot every
    /// value from this stream is written into.
    ///
    /// # Errors
    /// - [`DecodeError::ShortRecord`] when a record header or its declared
    ///   value block runs past the end of the stream.
    /// - [`DecodeError::NegativeFrameSpan`] when a record's end frame
    ///   precedes its start frame.
    pub fn ingest_stream(&mut self, sublayer: usize, stream: &[u64]) -> Result<(), DecodeError> {
        let mut pos = 0;
        let mut records = 0usize;

        while pos < stream.len() {
            // 1. Record header: cell index, start frame, end frame
            let remaining = stream.len() - pos;
            if remaining < RECORD_HEADER_LEN {
                return Err(DecodeError::ShortRecord {
                    sublayer,
                    offset: pos,
                    needed: RECORD_HEADER_LEN as u64,
                    available: remaining as u64,
                });
            }
            let cell_index = stream[pos];
            let start_frame = stream[pos + 1];
            let end_frame = stream[pos + 2];

            if end_frame < start_frame {
                return Err(DecodeError::NegativeFrameSpan {
                    sublayer,
                    cell: cell_index,
                    start_frame,
                    end_frame,
                });
            }

            // 2. Value block size is now known; check it fits the stream
            let values_start = pos + RECORD_HEADER_LEN;
            let available = (stream.len() - values_start) as u64;
            let value_count = (end_frame - start_frame)
                .checked_add(1)
                .and_then(|frames| frames.checked_mul(self.frame_stride as u64))
                .unwrap_or(u64::MAX);
            if value_count > available {
                return Err(DecodeError::ShortRecord {
                    sublayer,
                    offset: pos,
                    needed: value_count,
                    available,
                });
            }
            let value_count = value_count as usize;

            // 3. Materialize the record's samples
            let slot = self.slot_for(cell_index);
            self.write_values(
                slot,
                sublayer,
                start_frame,
                &stream[values_start..values_start + value_count],
            );

            // 4. Snap the cursor to the next record
            pos = values_start + value_count;
            records += 1;
        }

        debug!(
            "sublayer {sublayer}: {records} records, {} cells total",
            self.cells.len()
        );
        Ok(())
    }

    /// Consume the builder, yielding cell indices and cells in first-seen
    /// order.
    pub fn finish(self) -> (Vec<u64>, Vec<Cell>) {
        (self.indexes, self.cells)
    }

    /// Find or append the decoded cell for `cell_index`.
    fn slot_for(&mut self, cell_index: u64) -> usize {
        if let Some(&slot) = self.slots.get(&cell_index) {
            return slot;
        }
        let slot = self.cells.len();
        self.slots.insert(cell_index, slot);
        self.indexes.push(cell_index);
        self.cells.push(Cell {
            sublayers: vec![None; self.slot_count],
        });
        slot
    }

    /// Write one record's value block into the cell's sublayer series.
    ///
    /// Sentinel values are skipped outright: the frame stays `None` and no
    /// series is allocated for their sake. The series itself is allocated on
    /// the first real value.
    fn write_values(&mut self, slot: usize, sublayer: usize, start_frame: u64, values: &[u64]) {
        let frame_len = self.frame_len;

        for (j, &raw) in values.iter().enumerate() {
            if raw == self.no_data {
                continue;
            }

            let offset = start_frame as i64 - self.tile_min_frame + (j / self.frame_stride) as i64;
            if offset < 0 || offset as usize >= frame_len {
                trace!(
                    "dropping sample outside frame window: cell slot {slot}, sublayer {sublayer}, offset {offset}"
                );
                continue;
            }

            let series: &mut FrameSeries = self.cells[slot].sublayers[sublayer]
                .get_or_insert_with(|| vec![None; frame_len]);
            series[offset as usize] = Some(raw as f64 * self.scale + self.offset);
        }
    }
}
