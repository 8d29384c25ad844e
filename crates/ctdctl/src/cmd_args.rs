use std::path::Path;

use anyhow::{Context, Result};

use crate::common;

pub fn run(path: &Path, json: bool) -> Result<()> {
    let config = common::load(path)?;
    let mut command = Vec::new();
    if let Some(executable) = &config.executable_name {
        command.push(executable.clone());
    }
    command.extend(config.build_arguments().context("build command line")?);

    if json {
        common::print_json(&command)?;
    } else {
        println!("{}", command.join(" "));
    }
    Ok(())
}
