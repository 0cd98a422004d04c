//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use todo_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "api_url": config.api_url,
                    "request_timeout_secs": config.request_timeout_secs,
                    "banner_secs": config.banner_secs,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:             {}", config.data_dir.display());
            println!("  api_url:              {}", config.api_url);
            println!("  request_timeout_secs: {}", config.request_timeout_secs);
            println!("  banner_secs:          {}", config.banner_secs);
            println!(
                "  log_file:             {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "api_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                bail!("Invalid value for api_url. Use an http:// or https:// URL.");
            }
            config.api_url = value.trim_end_matches('/').to_string();
        }
        "request_timeout_secs" => {
            config.request_timeout_secs = parse_secs(key, value)?;
        }
        "banner_secs" => {
            config.banner_secs = parse_secs(key, value)?;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, api_url, request_timeout_secs, banner_secs, log_file",
                key
            );
        }
    }
    Ok(())
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    let secs: u64 = value
        .parse()
        .with_context(|| format!("Invalid value for {}. Use a whole number of seconds.", key))?;
    if secs == 0 {
        bail!("Invalid value for {}. Must be at least 1 second.", key);
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();

        apply(&mut config, "api_url", "https://todo.example.com/").unwrap();
        assert_eq!(config.api_url, "https://todo.example.com");

        apply(&mut config, "banner_secs", "5").unwrap();
        assert_eq!(config.banner_secs, 5);

        apply(&mut config, "log_file", "/tmp/todo.log").unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/todo.log")));
        apply(&mut config, "log_file", "none").unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut config = Config::default();
        assert!(apply(&mut config, "api_url", "localhost:8000").is_err());
        assert!(apply(&mut config, "request_timeout_secs", "soon").is_err());
        assert!(apply(&mut config, "request_timeout_secs", "0").is_err());
        assert!(apply(&mut config, "colour", "blue").is_err());
    }

    #[test]
    fn test_set_writes_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            format!("data_dir = {:?}\n", temp_dir.path().join("data")),
        )
        .unwrap();

        let output = Output::new(OutputFormat::Quiet);
        set("banner_secs".into(), "7".into(), Some(&path), &output).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("banner_secs = 7"));
    }
}
