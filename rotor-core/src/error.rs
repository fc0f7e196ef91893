use rotor_model::ModelError;
use thiserror::Error;

/// Contract violations raised by the engine.
///
/// Every variant signals a defect in how the host configured or drove the
/// wheel; none of them is transient and the engine never retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WheelError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid data set: {0}")]
    InvalidDataSet(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Join data missing: {0}")]
    JoinDataMissing(String),
}

impl From<ModelError> for WheelError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::EmptyDataSet => {
                WheelError::InvalidDataSet(err.to_string())
            }
            ModelError::EvenWindowSize(_)
            | ModelError::InvalidExtent(_)
            | ModelError::InvalidColor(_) => {
                WheelError::InvalidConfig(err.to_string())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, WheelError>;
