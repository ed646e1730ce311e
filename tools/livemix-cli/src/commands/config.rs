//! Show or initialize the configuration file.

use livemix_common::config::{config_file_path, AppConfig};

pub fn run(init: bool) -> anyhow::Result<()> {
    if init {
        let path = config_file_path();
        if path.exists() {
            anyhow::bail!("Config already exists at {}", path.display());
        }
        let path = AppConfig::default().save()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = AppConfig::load();
    println!("# {}", config_file_path().display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
