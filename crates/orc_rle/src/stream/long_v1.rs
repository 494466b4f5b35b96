//! Decoder for version 1 run length encoded integer streams.
//!
//! A stream is a sequence of runs, each starting with a control byte:
//!
//! - `0x00..=0x7F`: repeat run of `control + 3` values. Followed by a signed
//!   delta byte and a varint base. Value `i` is `base + i * delta`.
//! - `0x80..=0xFF`: literal run of `256 - control` values, each a varint.
use tracing::{debug, trace};

use super::{LongInputStream, ResultsConsumer};
use crate::checkpoint::{CheckpointType, LongStreamCheckpoint, LongStreamV1Checkpoint};
use crate::errors::{OrcError, Result};
use crate::input::{InputStreamCheckpoint, OrcDataSourceId, OrcInputStream};
use crate::varint::read_vint;

/// Shortest repeat run. Repeat run lengths are encoded relative to this.
pub const MIN_REPEAT_SIZE: usize = 3;
/// Longest repeat run.
pub const MAX_REPEAT_SIZE: usize = 127 + MIN_REPEAT_SIZE;
/// Longest literal run.
pub const MAX_LITERAL_SIZE: usize = 128;

pub const MIN_DELTA: i64 = i8::MIN as i64;
pub const MAX_DELTA: i64 = i8::MAX as i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    /// Only the base value is materialized at index 0.
    Repeat { delta: i64 },
    /// All values are materialized.
    Literals,
}

/// Where the stream is relative to the currently buffered run.
///
/// `origin + consumed` is always the logical offset of the next value to be
/// read, relative to the last checkpoint seeked to (or the start of the
/// stream).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RunPosition {
    /// Logical offset of the first value in the run.
    origin: isize,
    /// Number of values in the run.
    length: usize,
    /// Number of values in the run already read.
    consumed: usize,
}

impl RunPosition {
    #[inline]
    const fn is_exhausted(&self) -> bool {
        self.consumed == self.length
    }

    #[inline]
    const fn remaining(&self) -> usize {
        self.length - self.consumed
    }

    /// Logical offset of the next value.
    #[inline]
    const fn logical(&self) -> isize {
        self.origin + self.consumed as isize
    }

    /// Logical offset one past the last value in the run.
    #[inline]
    const fn end(&self) -> isize {
        self.origin + self.length as isize
    }

    /// Move to a run that immediately follows the current one.
    fn advance_run(&mut self, length: usize) {
        self.origin += self.length as isize;
        self.length = length;
        self.consumed = 0;
    }

    /// Drop the current run. The next run read starts at `logical`.
    fn reset(&mut self, logical: isize) {
        self.origin = logical;
        self.length = 0;
        self.consumed = 0;
    }
}

#[derive(Debug)]
pub struct LongInputStreamV1<S> {
    input: S,
    signed: bool,
    /// Values for the current run. Repeat runs only use the first slot.
    literals: [i64; MAX_LITERAL_SIZE],
    kind: RunKind,
    position: RunPosition,
    /// Input position of the current run's control byte.
    ///
    /// None after a run failed to decode. Reads error until a checkpoint is
    /// seeked to.
    last_read_input_checkpoint: Option<InputStreamCheckpoint>,
}

impl<S> LongInputStreamV1<S>
where
    S: OrcInputStream,
{
    pub fn new(input: S, signed: bool) -> Self {
        let last_read_input_checkpoint = Some(input.checkpoint());
        LongInputStreamV1 {
            input,
            signed,
            literals: [0; MAX_LITERAL_SIZE],
            kind: RunKind::Literals,
            position: RunPosition::default(),
            last_read_input_checkpoint,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn input(&self) -> &S {
        &self.input
    }

    pub fn into_inner(self) -> S {
        self.input
    }

    /// Checkpoint pointing at the next value to be read.
    ///
    /// Returns None if the last run failed to decode.
    pub fn current_checkpoint(&self) -> Option<LongStreamV1Checkpoint> {
        self.last_read_input_checkpoint
            .map(|input| LongStreamV1Checkpoint::new(input, self.position.consumed))
    }

    /// Offset of the next value relative to the last checkpoint seeked to.
    pub fn offset_from_checkpoint(&self) -> isize {
        self.position.logical()
    }

    /// Decode the next run into the buffer, replacing the current run.
    ///
    /// On error the buffered run is dropped, and the stream stays unreadable
    /// until the next seek.
    fn read_values(&mut self) -> Result<()> {
        if self.last_read_input_checkpoint.is_none() {
            return Err(self.corruption("Read from RLE integer stream after a failed read"));
        }

        let input_checkpoint = self.input.checkpoint();
        let (kind, length) = match self.decode_run() {
            Ok(run) => run,
            Err(e) => {
                debug!(
                    input = input_checkpoint.position(),
                    error = %e,
                    "failed to read rle v1 run"
                );
                self.invalidate();
                return Err(e);
            }
        };

        self.kind = kind;
        self.last_read_input_checkpoint = Some(input_checkpoint);
        self.position.advance_run(length);
        self.debug_assert_position();

        trace!(
            kind = ?self.kind,
            length,
            origin = self.position.origin,
            input = input_checkpoint.position(),
            "read rle v1 run"
        );

        Ok(())
    }

    /// Reads a run header and its values into the literals buffer.
    fn decode_run(&mut self) -> Result<(RunKind, usize)> {
        let control = match self.input.read_byte()? {
            Some(b) => b,
            None => return Err(self.corruption("Read past end of RLE integer")),
        };

        let run = if control < 0x80 {
            let delta = match self.input.read_byte()? {
                Some(b) => b as i8,
                None => return Err(self.corruption("End of stream in RLE Integer")),
            };
            self.literals[0] = read_vint(self.signed, &mut self.input)?;
            let kind = RunKind::Repeat {
                delta: delta as i64,
            };
            (kind, control as usize + MIN_REPEAT_SIZE)
        } else {
            let length = 0x100 - control as usize;
            for literal in &mut self.literals[..length] {
                *literal = read_vint(self.signed, &mut self.input)?;
            }
            (RunKind::Literals, length)
        };

        Ok(run)
    }

    /// Drop the buffered run and refuse reads until the next seek.
    fn invalidate(&mut self) {
        self.last_read_input_checkpoint = None;
        let logical = self.position.logical();
        self.position.reset(logical);
    }

    /// Value at `idx` in the current run.
    #[inline]
    fn value_at(&self, idx: usize) -> i64 {
        match self.kind {
            RunKind::Repeat { delta } => self.literals[0].wrapping_add((idx as i64) * delta),
            RunKind::Literals => self.literals[idx],
        }
    }

    fn corruption(&self, msg: &str) -> OrcError {
        OrcError::corruption(self.input.data_source_id(), msg)
    }

    #[inline]
    fn debug_assert_position(&self) {
        debug_assert!(self.position.consumed <= self.position.length);
        debug_assert!(match self.kind {
            RunKind::Repeat { .. } => self.position.length <= MAX_REPEAT_SIZE,
            RunKind::Literals => self.position.length <= MAX_LITERAL_SIZE,
        });
    }
}

impl<S> LongInputStream for LongInputStreamV1<S>
where
    S: OrcInputStream,
{
    fn next(&mut self) -> Result<i64> {
        if self.position.is_exhausted() {
            self.read_values()?;
        }
        let value = self.value_at(self.position.consumed);
        self.position.consumed += 1;
        Ok(value)
    }

    fn skip(&mut self, mut items: usize) -> Result<()> {
        while items > 0 {
            if self.position.is_exhausted() {
                self.read_values()?;
            }
            let consume = usize::min(items, self.position.remaining());
            self.position.consumed += consume;
            items -= consume;
        }
        self.debug_assert_position();
        Ok(())
    }

    fn checkpoint_type(&self) -> CheckpointType {
        CheckpointType::LongV1
    }

    fn seek_to_checkpoint(&mut self, checkpoint: &LongStreamCheckpoint) -> Result<()> {
        let checkpoint = match checkpoint {
            LongStreamCheckpoint::V1(checkpoint) => checkpoint,
            other => {
                return Err(OrcError::InvalidCheckpoint {
                    expected: CheckpointType::LongV1,
                    actual: other.checkpoint_type(),
                });
            }
        };

        if Some(checkpoint.input_checkpoint) == self.last_read_input_checkpoint
            && checkpoint.offset <= self.position.length
        {
            // Checkpoint is within the current run, just move the cursor.
            trace!(offset = checkpoint.offset, "seek within buffered run");
            self.position.consumed = checkpoint.offset;
            self.position.origin = -(checkpoint.offset as isize);
            return Ok(());
        }

        debug!(
            input = checkpoint.input_checkpoint.position(),
            offset = checkpoint.offset,
            "seek to checkpoint outside buffered run"
        );

        if let Err(e) = self.input.seek_to_checkpoint(checkpoint.input_checkpoint) {
            // Input position is unknown now.
            self.invalidate();
            return Err(e);
        }
        // Input now sits at a run boundary with nothing buffered.
        self.last_read_input_checkpoint = Some(checkpoint.input_checkpoint);
        self.position.reset(-(checkpoint.offset as isize));
        self.skip(checkpoint.offset)
    }

    fn scan(
        &mut self,
        offsets: &[usize],
        begin_index: usize,
        count: usize,
        end_offset_exclusive: usize,
        consumer: &mut dyn ResultsConsumer,
    ) -> Result<usize> {
        let targets = begin_index
            .checked_add(count)
            .and_then(|end| offsets.get(begin_index..end))
            .ok_or_else(|| {
                OrcError::InvalidArgument(format!(
                    "Scan of {count} offsets starting at {begin_index} out of bounds for {} offsets",
                    offsets.len()
                ))
            })?;

        let mut accepted = 0;
        let mut idx = 0;
        while idx < targets.len() {
            let target = targets[idx] as isize;
            if target < self.position.logical() {
                return Err(OrcError::InvalidArgument(format!(
                    "Scan offset {target} is behind stream position {}",
                    self.position.logical()
                )));
            }
            if target >= self.position.end() {
                // Nothing left in this run that we care about.
                self.read_values()?;
                continue;
            }

            let run_idx = (target - self.position.origin) as usize;
            if consumer.consume(begin_index + idx, self.value_at(run_idx)) {
                accepted += 1;
            }
            self.position.consumed = run_idx + 1;
            idx += 1;
        }

        let end = end_offset_exclusive as isize;
        let pos = self.position.logical();
        if end < pos {
            return Err(OrcError::InvalidArgument(format!(
                "Scan end offset {end} is behind stream position {pos}"
            )));
        }
        self.skip((end - pos) as usize)?;

        trace!(count, accepted, end, "scanned rle v1 stream");

        Ok(accepted)
    }

    fn data_source_id(&self) -> &OrcDataSourceId {
        self.input.data_source_id()
    }
}
