//! Encoder producing version 1 run length encoded integer streams.
use bytes::{BufMut, Bytes, BytesMut};

use super::long_v1::{MAX_DELTA, MAX_LITERAL_SIZE, MAX_REPEAT_SIZE, MIN_DELTA, MIN_REPEAT_SIZE};
use crate::checkpoint::LongStreamV1Checkpoint;
use crate::input::InputStreamCheckpoint;
use crate::varint::write_vint;

/// Buffers values until a run is complete, then writes the run.
///
/// A repeat run is started once three consecutive values share a delta that
/// fits in a byte. Everything else is written as literals.
#[derive(Debug)]
pub struct LongOutputStreamV1 {
    signed: bool,
    buffer: BytesMut,
    literals: [i64; MAX_LITERAL_SIZE],
    num_literals: usize,
    /// Delta of the repeat run, or of the tail of the literals.
    delta: i64,
    repeat: bool,
    /// Number of trailing literals sharing `delta`.
    tail_run_length: usize,
}

impl LongOutputStreamV1 {
    pub fn new(signed: bool) -> Self {
        LongOutputStreamV1 {
            signed,
            buffer: BytesMut::new(),
            literals: [0; MAX_LITERAL_SIZE],
            num_literals: 0,
            delta: 0,
            repeat: false,
            tail_run_length: 0,
        }
    }

    /// Checkpoint that a reader can seek to in order to read the next value
    /// written.
    pub fn checkpoint(&self) -> LongStreamV1Checkpoint {
        LongStreamV1Checkpoint::new(
            InputStreamCheckpoint::new(self.buffer.len() as u64),
            self.num_literals,
        )
    }

    pub fn write(&mut self, value: i64) {
        if self.num_literals == 0 {
            self.init_literals(value);
            return;
        }

        if self.repeat {
            let expected = self.literals[0]
                .wrapping_add(self.delta.wrapping_mul(self.num_literals as i64));
            if value == expected {
                self.num_literals += 1;
                if self.num_literals == MAX_REPEAT_SIZE {
                    self.write_values();
                }
            } else {
                self.write_values();
                self.init_literals(value);
            }
            return;
        }

        let last = self.literals[self.num_literals - 1];
        if self.tail_run_length > 1 && value == last.wrapping_add(self.delta) {
            self.tail_run_length += 1;
        } else {
            match value.checked_sub(last) {
                Some(delta) if (MIN_DELTA..=MAX_DELTA).contains(&delta) => {
                    self.delta = delta;
                    self.tail_run_length = 2;
                }
                _ => self.tail_run_length = 1,
            }
        }

        if self.tail_run_length == MIN_REPEAT_SIZE {
            if self.num_literals + 1 == MIN_REPEAT_SIZE {
                // All pending values are part of the repeat.
                self.repeat = true;
                self.num_literals += 1;
            } else {
                // Flush the literals preceding the tail, then start the repeat
                // from the first value of the tail.
                self.num_literals -= MIN_REPEAT_SIZE - 1;
                let base = self.literals[self.num_literals];
                self.write_values();
                self.literals[0] = base;
                self.repeat = true;
                self.num_literals = MIN_REPEAT_SIZE;
            }
        } else {
            self.literals[self.num_literals] = value;
            self.num_literals += 1;
            if self.num_literals == MAX_LITERAL_SIZE {
                self.write_values();
            }
        }
    }

    /// Bytes written so far, not including buffered values.
    pub fn flushed_len(&self) -> usize {
        self.buffer.len()
    }

    /// Write any buffered values and return the encoded stream.
    pub fn finish(mut self) -> Bytes {
        self.write_values();
        self.buffer.freeze()
    }

    fn init_literals(&mut self, value: i64) {
        self.literals[0] = value;
        self.num_literals = 1;
        self.tail_run_length = 1;
    }

    fn write_values(&mut self) {
        if self.num_literals == 0 {
            return;
        }

        if self.repeat {
            self.buffer.put_u8((self.num_literals - MIN_REPEAT_SIZE) as u8);
            self.buffer.put_i8(self.delta as i8);
            write_vint(self.signed, self.literals[0], &mut self.buffer);
        } else {
            self.buffer.put_u8((0x100 - self.num_literals) as u8);
            for &literal in &self.literals[..self.num_literals] {
                write_vint(self.signed, literal, &mut self.buffer);
            }
        }

        self.repeat = false;
        self.num_literals = 0;
        self.tail_run_length = 0;
    }
}
