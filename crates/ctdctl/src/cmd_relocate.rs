use std::path::PathBuf;

use anyhow::{Context, Result};
use ctd_model::RelocationContext;
use serde::Serialize;
use tracing::info;

use crate::common;

pub struct RelocateArgs {
    pub path: PathBuf,
    pub work_dir: PathBuf,
    pub temp_dir: Option<PathBuf>,
}

#[derive(Serialize)]
struct Moved {
    reference: String,
    target: String,
}

pub fn run(args: RelocateArgs, json: bool) -> Result<()> {
    let config = common::load(&args.path)?;
    let mut ctx = RelocationContext::new(&args.work_dir);
    if let Some(temp_dir) = args.temp_dir {
        ctx = ctx.with_temp_dir(temp_dir);
    }

    let mut moved = Vec::with_capacity(config.relocators().len());
    for relocator in config.relocators() {
        let target = relocator
            .relocate(config.parameters(), &ctx)
            .with_context(|| format!("relocate output for {}", relocator.reference))?;
        info!(reference = %relocator.reference, target = %target.display(), "output in place");
        moved.push(Moved {
            reference: relocator.reference.clone(),
            target: target.display().to_string(),
        });
    }

    if json {
        common::print_json(&moved)?;
    } else if moved.is_empty() {
        println!("No relocators defined.");
    } else {
        for entry in &moved {
            println!("{:<40} {}", entry.reference, entry.target);
        }
    }
    Ok(())
}
