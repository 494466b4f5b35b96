//! Positions that integer streams can be rewound or advanced to.
use std::fmt;

use crate::input::InputStreamCheckpoint;

/// Marks which checkpoint shape a stream understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckpointType {
    LongV1,
    LongV2,
}

impl fmt::Display for CheckpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LongV1 => write!(f, "long v1"),
            Self::LongV2 => write!(f, "long v2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongStreamCheckpoint {
    V1(LongStreamV1Checkpoint),
    V2(LongStreamV2Checkpoint),
}

impl LongStreamCheckpoint {
    pub const fn checkpoint_type(&self) -> CheckpointType {
        match self {
            Self::V1(_) => CheckpointType::LongV1,
            Self::V2(_) => CheckpointType::LongV2,
        }
    }
}

impl From<LongStreamV1Checkpoint> for LongStreamCheckpoint {
    fn from(value: LongStreamV1Checkpoint) -> Self {
        LongStreamCheckpoint::V1(value)
    }
}

impl From<LongStreamV2Checkpoint> for LongStreamCheckpoint {
    fn from(value: LongStreamV2Checkpoint) -> Self {
        LongStreamCheckpoint::V2(value)
    }
}

/// Checkpoint into a v1 run length encoded stream.
///
/// `input_checkpoint` points at the header of a run and `offset` is the
/// number of values to skip from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LongStreamV1Checkpoint {
    pub input_checkpoint: InputStreamCheckpoint,
    pub offset: usize,
}

impl LongStreamV1Checkpoint {
    pub const fn new(input_checkpoint: InputStreamCheckpoint, offset: usize) -> Self {
        LongStreamV1Checkpoint {
            input_checkpoint,
            offset,
        }
    }
}

/// Checkpoint into a v2 run length encoded stream. Same shape as v1, but not
/// interchangeable since run boundaries differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LongStreamV2Checkpoint {
    pub input_checkpoint: InputStreamCheckpoint,
    pub offset: usize,
}

impl LongStreamV2Checkpoint {
    pub const fn new(input_checkpoint: InputStreamCheckpoint, offset: usize) -> Self {
        LongStreamV2Checkpoint {
            input_checkpoint,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_type_from_variant() {
        let v1: LongStreamCheckpoint =
            LongStreamV1Checkpoint::new(InputStreamCheckpoint::new(4), 2).into();
        let v2: LongStreamCheckpoint =
            LongStreamV2Checkpoint::new(InputStreamCheckpoint::new(4), 2).into();

        assert_eq!(CheckpointType::LongV1, v1.checkpoint_type());
        assert_eq!(CheckpointType::LongV2, v2.checkpoint_type());
        assert_ne!(v1, v2);
    }
}
