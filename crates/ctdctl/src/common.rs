use std::path::Path;

use anyhow::{Context, Result};
use ctd_model::{NodeConfiguration, Parameter};
use serde::Serialize;

pub fn load(path: &Path) -> Result<NodeConfiguration> {
    ctd_xml::read_config_file(path).with_context(|| format!("read descriptor {}", path.display()))
}

pub fn save(config: &NodeConfiguration, path: &Path) -> Result<()> {
    ctd_xml::write_config_file(config, path)
        .with_context(|| format!("write descriptor {}", path.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialise JSON output")?;
    println!("{text}");
    Ok(())
}

pub fn lookup<'a>(config: &'a NodeConfiguration, key: &str) -> Result<&'a Parameter> {
    config
        .parameters()
        .resolve(key)
        .with_context(|| format!("look up parameter {key}"))
}

/// Flat view of a parameter for table and JSON output.
#[derive(Debug, Serialize)]
pub struct ParameterRow {
    pub key: String,
    pub kind: String,
    pub value: Option<String>,
    pub advanced: bool,
    pub required: bool,
    pub description: String,
}

impl From<&Parameter> for ParameterRow {
    fn from(param: &Parameter) -> Self {
        ParameterRow {
            key: param.key().to_string(),
            kind: param.mnemonic(),
            value: param.has_value().then(|| param.string_representation()),
            advanced: param.is_advanced(),
            required: !param.is_optional(),
            description: param.description().to_string(),
        }
    }
}
