//! `stockscan config`: print the configuration every other command would use.

use anyhow::Result;
use stockscan_scanner::ScannerConfig;

pub fn run(config: &ScannerConfig) -> Result<()> {
    match ScannerConfig::default_config_path() {
        Some(path) => println!("# default config file: {}", path.display()),
        None => println!("# no platform config directory"),
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
