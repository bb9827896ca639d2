use thiserror::Error;

use crate::arena::NodeId;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("index {index} out of range for {len} slots")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("illegal tree state: {0}")]
    IllegalTreeState(String),

    #[error("operation `{operation}` is not supported by {layout} nodes")]
    UnsupportedOperation {
        operation: &'static str,
        layout: String,
    },

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),
}

impl TreeError {
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    pub(crate) fn unsupported(operation: &'static str, layout: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation,
            layout: layout.into(),
        }
    }

    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        Self::IllegalTreeState(reason.into())
    }
}

pub type TreeResult<T> = Result<T, TreeError>;
