use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::common;

pub fn run(path: &Path, output: Option<&Path>) -> Result<()> {
    let config = common::load(path)?;
    match output {
        Some(destination) => {
            common::save(&config, destination)?;
            info!(path = %destination.display(), "wrote canonical descriptor");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            ctd_xml::write_config(&config, &mut lock).context("write descriptor to stdout")?;
            lock.flush().context("flush stdout")?;
        }
    }
    Ok(())
}
