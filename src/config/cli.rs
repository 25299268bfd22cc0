use crate::config::loader_config::LoaderConfig;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "yamodool")]
#[command(about = "YAML model definitions for Odoo")]
pub struct CliConfig {
    /// Model file, or a directory of model files when --module is given
    pub path: PathBuf,

    /// Generate models for this addon module instead of printing the raw document
    #[arg(long)]
    pub module: Option<String>,

    /// Path to a TOML loader configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn loader_config(&self) -> Result<LoaderConfig> {
        let config = match &self.config {
            Some(path) => LoaderConfig::from_file(path)?,
            None => LoaderConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("path", &self.path.to_string_lossy())?;
        if let Some(module) = &self.module {
            validation::validate_non_empty_string("module", module)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let config = CliConfig::parse_from(["yamodool", "yamodools/sale_order_tag.yml"]);
        assert_eq!(config.path, PathBuf::from("yamodools/sale_order_tag.yml"));
        assert!(config.module.is_none());
        assert_eq!(config.format, OutputFormat::Yaml);
        assert!(!config.verbose);
        assert!(config.validate().is_ok());
        assert_eq!(config.loader_config().unwrap(), LoaderConfig::default());

        let config = CliConfig::parse_from([
            "yamodool",
            "yamodools",
            "--module",
            "odoo.addons.sale_tags",
            "--format",
            "json",
            "-v",
        ]);
        assert_eq!(config.module.as_deref(), Some("odoo.addons.sale_tags"));
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.verbose);
    }

    #[test]
    fn test_blank_module_is_invalid() {
        let config = CliConfig::parse_from(["yamodool", "tag.yml", "--module", " "]);
        assert!(config.validate().is_err());
    }
}
