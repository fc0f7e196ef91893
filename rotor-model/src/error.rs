use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A window size that has no single center slot.
    EvenWindowSize(usize),
    /// A row extent that is zero, negative, or not finite.
    InvalidExtent(f32),
    /// A data set with no items.
    EmptyDataSet,
    /// A color literal that is not `#RRGGBB` or `#AARRGGBB`.
    InvalidColor(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::EvenWindowSize(size) => {
                write!(f, "wheel size must be an odd number, got {size}")
            }
            ModelError::InvalidExtent(px) => {
                write!(f, "item extent must be a positive length, got {px}")
            }
            ModelError::EmptyDataSet => write!(f, "wheel data set is empty"),
            ModelError::InvalidColor(raw) => {
                write!(f, "invalid color literal: {raw}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
