use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::common;

#[derive(Serialize)]
struct ParameterValue<'a> {
    key: &'a str,
    value: String,
}

pub fn run(path: &Path, key: &str, json: bool) -> Result<()> {
    let config = common::load(path)?;
    let value = common::lookup(&config, key)?.string_representation();

    if json {
        let payload = ParameterValue { key, value };
        common::print_json(&payload)?;
    } else {
        println!("{}", value);
    }

    Ok(())
}
