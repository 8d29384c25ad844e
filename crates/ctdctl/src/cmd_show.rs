use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::common::{self, ParameterRow};

#[derive(Serialize)]
struct ToolSummary<'a> {
    name: &'a str,
    version: &'a str,
    category: &'a str,
    description: &'a str,
    executable: Option<&'a str>,
    parameters: Vec<ParameterRow>,
}

pub fn run(path: &Path, advanced: bool, json: bool) -> Result<()> {
    let config = common::load(path)?;
    let rows: Vec<ParameterRow> = config
        .parameters()
        .iter()
        .filter(|p| advanced || !p.is_advanced())
        .map(ParameterRow::from)
        .collect();
    info!(tool = %config.name, shown = rows.len(), total = config.parameters().len(), "loaded descriptor");

    if json {
        let summary = ToolSummary {
            name: &config.name,
            version: &config.version,
            category: &config.category,
            description: &config.description,
            executable: config.executable_name.as_deref(),
            parameters: rows,
        };
        return common::print_json(&summary);
    }

    println!("{} {} ({})", config.name, config.version, config.category);
    if !config.description.is_empty() {
        println!("{}", config.description);
    }
    println!();
    println!("{:<40} {:<28} {:<20} {}", "KEY", "TYPE", "VALUE", "FLAGS");
    for row in rows {
        let mut flags = Vec::new();
        if row.required {
            flags.push("required");
        }
        if row.advanced {
            flags.push("advanced");
        }
        println!(
            "{:<40} {:<28} {:<20} {}",
            row.key,
            row.kind,
            row.value.as_deref().unwrap_or("-"),
            flags.join(","),
        );
    }
    Ok(())
}
