#![cfg_attr(docsrs, feature(doc_cfg))]
//! Common Tool Descriptor facade re-exporting the model and XML codec crates.
//!
//! ```rust
//! use ctd_rs::{model::Parameter, xml};
//!
//! let text = r#"<tool name="FileFilter" version="1.0">
//!     <PARAMETERS version="1.3">
//!         <NODE name="FileFilter" descriptions="">
//!             <ITEM name="threads" value="2" type="int" restrictions="1:"/>
//!         </NODE>
//!     </PARAMETERS>
//! </tool>"#;
//! let mut config = xml::read_config_str(text)?;
//! if let Some(Parameter::Int(threads)) = config.parameter_mut("FileFilter.threads") {
//!     threads.set_value(Some(8))?;
//! }
//! let written = xml::write_config_string(&config)?;
//! assert!(written.contains(r#"<ITEM name="threads" value="8" type="int""#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use ctd_model as model;
pub use ctd_xml as xml;

pub use ctd_model::{ModelError, NodeConfiguration, Parameter};
pub use ctd_xml::XmlError;
