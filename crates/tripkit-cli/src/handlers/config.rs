//! Configuration command handlers

use crate::cli::ConfigCommand;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use serde_json::json;
use std::path::Path;
use tripkit_core::Config;

/// Handle the config command
pub async fn handle_config(command: ConfigCommand, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match command {
        ConfigCommand::Show => handle_config_show(config, output),
        ConfigCommand::Paths => handle_config_paths(config, output),
        ConfigCommand::Init { path, force } => handle_config_init(&path, force, output),
    }
}

fn handle_config_show(config: &Config, output: &mut OutputWriter) -> Result<()> {
    if !output.is_human() {
        return output.data(config);
    }

    let credentials = config
        .credentials_file()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|e| e.to_string());

    output.section("Configuration")?;
    output.table(
        &["SETTING", "VALUE"],
        vec![
            vec!["environment".to_string(), config.environment.to_string()],
            vec!["api url".to_string(), config.api_base_url()],
            vec!["credentials".to_string(), credentials],
            vec![
                "timeouts".to_string(),
                format!(
                    "connect {}s, request {}s, upload {}s",
                    config.timeouts.connect_secs, config.timeouts.request_secs, config.timeouts.upload_secs
                ),
            ],
            vec![
                "weather retry".to_string(),
                format!(
                    "{} attempts, {}ms..{}ms",
                    config.retry.max_attempts, config.retry.base_delay_ms, config.retry.max_delay_ms
                ),
            ],
        ],
    )
}

fn handle_config_paths(config: &Config, output: &mut OutputWriter) -> Result<()> {
    let search: Vec<_> = Config::default_config_paths()
        .into_iter()
        .map(|path| (path.exists(), path.display().to_string()))
        .collect();

    if !output.is_human() {
        let files: Vec<_> = search
            .iter()
            .map(|(exists, path)| json!({ "path": path, "exists": exists }))
            .collect();
        let credentials = config.credentials_file().ok().map(|path| path.display().to_string());
        return output.data(&json!({ "configFiles": files, "credentials": credentials }));
    }

    output.section("Configuration search order")?;
    for (exists, path) in &search {
        let marker = if *exists { "✓" } else { " " };
        output.writeln(&format!("  {} {}", marker, path))?;
    }
    if let Ok(path) = config.credentials_file() {
        output.section("Credentials")?;
        output.writeln(&format!("  {}", path.display()))?;
    }
    Ok(())
}

fn handle_config_init(path: &Path, force: bool, output: &mut OutputWriter) -> Result<()> {
    if path.exists() && !force {
        output.warning(&format!("{} already exists; pass --force to overwrite", path.display()))?;
        return Ok(());
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") | Some("json") => {}
        _ => {
            return Err(Error::invalid_args(format!(
                "{} must end in .yaml, .yml or .json",
                path.display()
            )))
        }
    }

    Config::default().save(path)?;
    output.success(&format!("Created {}", path.display()))
}
