//! Common Tool Descriptor model: typed parameters keyed by dot-separated
//! namespaces, the command-line mapping and output relocation rules.

use std::path::PathBuf;

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod parameter;
pub mod relocator;
pub mod tree;

pub use cli::{CliElement, CliMapping, CliReference};
pub use config::{Citation, NodeConfiguration};
pub use parameter::{
    format_double, BoolParameter, Bounds, DoubleListParameter, DoubleParameter, FileDirection,
    FileListParameter, FileParameter, IntListParameter, IntParameter, NumberListParameter,
    NumberParameter, Numeric, Parameter, ParameterInfo, StringChoiceParameter,
    StringListParameter, StringParameter, LIST_SEPARATOR,
};
pub use relocator::{RelocationContext, Relocator};
pub use tree::{ParameterTree, Section, KEY_SEPARATOR};

/// Error type produced by model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A value violates the type, bounds or membership rules of a parameter.
    #[error("invalid value for parameter {key}: {reason}")]
    InvalidValue { key: String, reason: String },
    /// A CLI mapping or relocator names a key absent from the parameter tree.
    #[error("unresolved parameter reference: {0}")]
    UnresolvedReference(String),
    /// The pattern-resolved output file does not exist.
    #[error("relocation failed: {} not found", path.display())]
    RelocationFailed { path: PathBuf },
    /// Underlying file-system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ModelError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
