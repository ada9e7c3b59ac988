pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::validate_required_field;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "hero-grouping")]
#[command(about = "Partition a profile population into attribute-balanced groups of four")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log CPU and memory after each stage")]
    pub monitor: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Group a population file into teams of four
    Group(GroupArgs),
    /// Split a population file into major and minor cohorts
    Split(SplitArgs),
    /// Write a seeded synthetic population file
    Generate(GenerateArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct GroupArgs {
    /// Path to the population JSON file
    #[arg(short, long)]
    pub input: Option<String>,

    /// Path to a TOML configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub output_dir: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,

    /// Abort the search after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Also write the profiles left out of every group
    #[arg(long)]
    pub write_unmatched: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct SplitArgs {
    #[arg(short, long)]
    pub input: String,

    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = ".")]
    pub output_dir: String,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    #[arg(long, default_value = "1500")]
    pub count: usize,

    #[arg(long, default_value = "42")]
    pub seed: u64,

    #[arg(short, long, default_value = "superheroes.json")]
    pub output: String,
}

#[cfg(feature = "cli")]
impl GroupArgs {
    /// 合併 TOML 配置與命令列參數，命令列優先
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::for_input(validate_required_field("input", &self.input)?.clone()),
        };

        if let Some(input) = &self.input {
            config.run.input_path = input.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.load.output_path = output_dir.clone();
        }
        if !self.formats.is_empty() {
            config.load.output_formats = self.formats.clone();
        }
        if self.timeout_secs.is_some() {
            config.run.timeout_seconds = self.timeout_secs;
        }
        if self.write_unmatched {
            config.load.write_unmatched = Some(true);
        }

        Ok(config)
    }
}
