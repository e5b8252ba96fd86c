//! Init command - writes a default `jscg.toml`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use jscg_core::config::{CONFIG_FILENAME, DEFAULT_CONFIG};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to create the configuration in
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(&self) -> Result<()> {
        let config_path = self.dir.join(CONFIG_FILENAME);

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Config file '{}' already exists. Use --force to overwrite.",
                config_path.display()
            );
        }

        fs::write(&config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write '{}'", config_path.display()))?;
        println!(
            "{} Created {} configuration file",
            "✓".green().bold(),
            config_path.display().to_string().cyan()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jscg_core::config::load_config;
    use tempfile::tempdir;

    #[test]
    fn init_creates_config_file() {
        let dir = tempdir().unwrap();
        let args = InitArgs {
            dir: dir.path().to_path_buf(),
            force: false,
        };

        assert!(args.run().is_ok());
        let config = load_config(&dir.path().join(CONFIG_FILENAME)).unwrap();
        assert!(config.analysis.natives);
    }

    #[test]
    fn init_fails_if_config_exists_without_force() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "existing").unwrap();
        let args = InitArgs {
            dir: dir.path().to_path_buf(),
            force: false,
        };

        assert!(args.run().is_err());
        let content = fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(content, "existing");
    }

    #[test]
    fn init_with_force_overwrites_existing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "existing").unwrap();
        let args = InitArgs {
            dir: dir.path().to_path_buf(),
            force: true,
        };

        assert!(args.run().is_ok());
        let content = fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap();
        assert!(content.contains("[analysis]"));
    }

    #[test]
    fn default_config_is_valid_toml() {
        let config: Result<toml::Table, _> = DEFAULT_CONFIG.parse();
        assert!(config.is_ok());
    }
}
