use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::common;

#[derive(Serialize)]
struct CheckReport {
    parameters: usize,
    problems: Vec<String>,
}

pub fn run(path: &Path, json: bool) -> Result<()> {
    let config = common::load(path)?;
    let mut problems = Vec::new();
    if let Err(err) = config.validate() {
        problems.push(err.to_string());
    }
    for param in config.parameters() {
        if let Err(err) = param.validate() {
            problems.push(err.to_string());
        }
    }
    for problem in &problems {
        warn!(problem = %problem, "descriptor check");
    }
    info!(problems = problems.len(), "checked descriptor");

    let report = CheckReport {
        parameters: config.parameters().len(),
        problems,
    };
    if json {
        common::print_json(&report)?;
    } else if report.problems.is_empty() {
        println!("ok ({} parameters)", report.parameters);
    } else {
        for problem in &report.problems {
            println!("{problem}");
        }
    }
    if !report.problems.is_empty() {
        anyhow::bail!("{} problem(s) found in {}", report.problems.len(), path.display());
    }
    Ok(())
}
