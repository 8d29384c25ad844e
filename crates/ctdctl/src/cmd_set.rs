use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::common;

#[derive(Serialize)]
struct SetResponse<'a> {
    key: &'a str,
    value: String,
}

pub fn run(path: &Path, key: &str, value: &str, output: Option<&Path>, json: bool) -> Result<()> {
    let mut config = common::load(path)?;
    config
        .parameters_mut()
        .fill_from_str(key, value)
        .with_context(|| format!("assign parameter {key}"))?;
    let read_back = common::lookup(&config, key)?.string_representation();

    let destination = output.unwrap_or(path);
    common::save(&config, destination)?;
    info!(key = %key, path = %destination.display(), "updated descriptor");

    if json {
        let payload = SetResponse {
            key,
            value: read_back,
        };
        common::print_json(&payload)?;
    } else {
        println!("{}", read_back);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"<tool name="Tool" version="1"><PARAMETERS>
        <NODE name="Tool"><ITEM name="threads" value="1" type="int" restrictions="1:8"/></NODE>
    </PARAMETERS></tool>"#;

    #[test]
    fn set_writes_new_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("in.ctd");
        let output = dir.path().join("out.ctd");
        std::fs::write(&input, DESCRIPTOR).expect("write input");

        run(&input, "Tool.threads", "4", Some(&output), false).expect("set");
        let updated = common::load(&output).expect("load output");
        assert_eq!(
            updated
                .parameter("Tool.threads")
                .map(|p| p.string_representation()),
            Some("4".to_string())
        );

        let err = run(&input, "Tool.threads", "9", None, false).unwrap_err();
        assert!(format!("{err:#}").contains("Tool.threads"));
        let unchanged = common::load(&input).expect("load input");
        assert_eq!(
            unchanged
                .parameter("Tool.threads")
                .map(|p| p.string_representation()),
            Some("1".to_string())
        );
    }
}
