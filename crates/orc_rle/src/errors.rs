use crate::checkpoint::CheckpointType;
use crate::input::OrcDataSourceId;

#[derive(Debug, thiserror::Error)]
pub enum OrcError {
    /// The stream bytes don't decode. Never recoverable.
    #[error("Malformed ORC file. {message} [{data_source}]")]
    Corruption {
        data_source: OrcDataSourceId,
        message: String,
    },

    /// A checkpoint for a different stream encoding was handed to a stream.
    #[error("Invalid checkpoint: expected a {expected} checkpoint, got {actual}")]
    InvalidCheckpoint {
        expected: CheckpointType,
        actual: CheckpointType,
    },

    /// Arguments passed to a stream operation were inconsistent with the
    /// stream's position.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl OrcError {
    pub fn corruption(data_source: &OrcDataSourceId, message: impl Into<String>) -> Self {
        OrcError::Corruption {
            data_source: data_source.clone(),
            message: message.into(),
        }
    }

    /// Returns true if this error indicates corrupt stream data.
    pub fn is_corruption(&self) -> bool {
        matches!(self, OrcError::Corruption { .. })
    }
}

pub type Result<T, E = OrcError> = std::result::Result<T, E>;
