//! Effective configuration display.

use anyhow::Result;
use console::style;

use medidesk_infra::config::CONFIG_FILE;

use crate::state::load_effective_config;

/// Print the configuration commands would run with, after `--server`.
pub async fn show_config(server: Option<&str>, json: bool) -> Result<()> {
    let (config_dir, config) = load_effective_config(server).await;
    let config_path = config_dir.join(CONFIG_FILE);

    if json {
        let report = serde_json::json!({
            "config_path": config_path.display().to_string(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style("Config file:").bold(),
        style(config_path.display()).dim()
    );
    println!();
    for line in toml::to_string_pretty(&config)?.lines() {
        println!("  {line}");
    }
    println!();
    Ok(())
}
