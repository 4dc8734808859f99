use anyhow::{Context, Result};
use polymarket_installer::download::HttpClient;
use polymarket_installer::pipeline::{run, Installed};
use polymarket_installer::platform::Host;
use polymarket_installer::signal::install_signal_handlers;
use crate::cli::CLI;

pub fn execute(cli: CLI) -> Result<Installed> {
    install_signal_handlers()?;
    let config = cli.to_config();
    let client = HttpClient::new().context("Failed to create HTTP client")?;
    let installed = run(&config, &Host::current(), &client)?;
    println!(
        "Installed {} {} to {}",
        config.binary,
        installed.tag,
        installed.path.display()
    );
    Ok(installed)
}
