//! Read and write Common Tool Descriptor (CTD) XML using quick-xml.

use ctd_model::ModelError;
use thiserror::Error;

mod reader;
mod writer;

pub use reader::{
    read_config, read_config_file, read_config_file_with_options, read_config_str,
    read_config_with_options,
};
pub use writer::{
    plan_sections, write_config, write_config_file, write_config_string,
    write_config_with_options, SectionStep,
};

/// Schema location advertised on the `PARAMETERS` element.
pub const DEFAULT_SCHEMA_LOCATION: &str = "http://open-ms.sourceforge.net/schemas/Param_1_3.xsd";
/// Version attribute of the `PARAMETERS` element.
pub const PARAMETERS_VERSION: &str = "1.3";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

#[derive(Debug, Error)]
pub enum XmlError {
    /// The input is not well-formed XML or lacks required structure.
    #[error("malformed document: {0}")]
    Malformed(String),
    /// A parameter value or reference is invalid.
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for XmlError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(io) => {
                XmlError::Io(std::io::Error::new(io.kind(), io.to_string()))
            }
            other => XmlError::Malformed(other.to_string()),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for XmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        XmlError::Malformed(err.to_string())
    }
}

/// Knobs for [`read_config_with_options`].
#[derive(Debug, Clone, Default)]
pub struct ReaderOptions {
    /// Check CLI and relocator references right after parsing instead of at
    /// the point of use.
    pub validate_references: bool,
}

/// Knobs for [`write_config_with_options`].
#[derive(Debug, Clone)]
pub struct WriterOptions {
    pub schema_location: String,
    pub parameters_version: String,
    pub indent_char: u8,
    /// Indent characters per nesting level.
    pub indent_size: usize,
    /// Emit the `<?xml ...?>` declaration.
    pub declaration: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            schema_location: DEFAULT_SCHEMA_LOCATION.to_string(),
            parameters_version: PARAMETERS_VERSION.to_string(),
            indent_char: b'\t',
            indent_size: 1,
            declaration: true,
        }
    }
}
