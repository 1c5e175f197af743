//! config 子命令

use std::process::ExitCode;

use crate::error::Result;
use crate::storage::config::{self, Config};

pub fn execute(effective: &Config, init: bool) -> Result<ExitCode> {
    let path = config::config_path();

    if init {
        if path.exists() {
            eprintln!("{} already exists, leaving it alone", path.display());
        } else {
            config::save_config(&Config::default())?;
            eprintln!("Wrote {}", path.display());
        }
    }

    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(effective)?);
    Ok(ExitCode::SUCCESS)
}
