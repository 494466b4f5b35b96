pub mod long_v1;
pub mod long_v1_writer;

use crate::checkpoint::{CheckpointType, LongStreamCheckpoint};
use crate::errors::{OrcError, Result};
use crate::input::OrcDataSourceId;

/// Receives values produced by a filtered scan.
pub trait ResultsConsumer {
    /// Called once per visited offset with the index of that offset in the
    /// offsets slice passed to `scan`, and the value at that offset.
    ///
    /// Returns true if the value is accepted.
    fn consume(&mut self, offset_index: usize, value: i64) -> bool;
}

impl<F> ResultsConsumer for F
where
    F: FnMut(usize, i64) -> bool,
{
    fn consume(&mut self, offset_index: usize, value: i64) -> bool {
        self(offset_index, value)
    }
}

/// A decoded stream of 64-bit integers.
///
/// Offsets used by `scan` are logical positions relative to the last
/// checkpoint that was seeked to, or the start of the stream if none was.
pub trait LongInputStream {
    /// Decode the next value.
    ///
    /// The caller is expected to know the number of values in the stream.
    /// Reading past the end errors as corruption.
    fn next(&mut self) -> Result<i64>;

    /// Advance past `items` values without returning them.
    fn skip(&mut self, items: usize) -> Result<()>;

    /// The checkpoint shape accepted by `seek_to_checkpoint`.
    fn checkpoint_type(&self) -> CheckpointType;

    /// Reposition so the next value read is the one the checkpoint points to.
    ///
    /// The position of the checkpoint becomes the new reference point for
    /// `scan` offsets.
    fn seek_to_checkpoint(&mut self, checkpoint: &LongStreamCheckpoint) -> Result<()>;

    /// Visit the values at `offsets[begin_index..begin_index + count]`,
    /// passing each to `consumer`. Offsets must be strictly increasing and not
    /// behind the current position.
    ///
    /// On return the stream is positioned at `end_offset_exclusive`.
    ///
    /// Returns the number of values the consumer accepted.
    fn scan(
        &mut self,
        offsets: &[usize],
        begin_index: usize,
        count: usize,
        end_offset_exclusive: usize,
        consumer: &mut dyn ResultsConsumer,
    ) -> Result<usize>;

    /// Fill `values` with the next `values.len()` values.
    fn next_batch(&mut self, values: &mut [i64]) -> Result<()> {
        for value in values {
            *value = self.next()?;
        }
        Ok(())
    }

    /// Fill `values` with the next `values.len()` values, erroring if any
    /// doesn't fit in an i32.
    fn next_i32_batch(&mut self, values: &mut [i32]) -> Result<()> {
        for value in values {
            let v = self.next()?;
            *value = i32::try_from(v).map_err(|_| {
                OrcError::corruption(
                    self.data_source_id(),
                    format!("Value {v} is too large for an integer column"),
                )
            })?;
        }
        Ok(())
    }

    /// Wrapping sum of the next `items` values.
    fn sum(&mut self, items: usize) -> Result<i64> {
        let mut sum = 0i64;
        for _ in 0..items {
            sum = sum.wrapping_add(self.next()?);
        }
        Ok(sum)
    }

    /// Source the stream is decoding from.
    fn data_source_id(&self) -> &OrcDataSourceId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_consumer() {
        let mut seen = Vec::new();
        let mut consumer = |idx: usize, v: i64| {
            seen.push((idx, v));
            v % 2 == 0
        };
        let consumer: &mut dyn ResultsConsumer = &mut consumer;

        assert!(consumer.consume(0, 4));
        assert!(!consumer.consume(3, 5));
        assert_eq!(vec![(0, 4), (3, 5)], seen);
    }
}
