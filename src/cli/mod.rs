//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{self, ConfigOverrides, SheetConfig, DEFAULT_CATALOG_FILE};
use crate::error::Result;

pub mod commands;

/// sheetsync - keep a JSON translation catalog and a Google Sheet in step
#[derive(Parser, Debug)]
#[command(name = "sheetsync", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ./sheetsync.json, then ~/.sheetsync/config.json)
    #[arg(long, global = true, env = "SHEETSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Local catalog file
    #[arg(short, long, global = true, alias = "out", default_value = DEFAULT_CATALOG_FILE)]
    pub file: PathBuf,

    /// Output as JSON (for scripts)
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Flags overriding the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct SheetArgs {
    /// Spreadsheet ID
    #[arg(long, global = true)]
    pub sheet_id: Option<String>,

    /// Service-account key file
    #[arg(long, global = true)]
    pub auth: Option<PathBuf>,

    /// Languages, comma-separated, in column order (e.g. zh-TW,en-US)
    #[arg(long, global = true)]
    pub langs: Option<String>,

    /// Sheet (tab) name
    #[arg(long, global = true)]
    pub sheet_name: Option<String>,

    /// Language every added record must fill
    #[arg(long, global = true)]
    pub base_lang: Option<String>,

    /// Directory for per-language files
    #[arg(long, global = true)]
    pub locales_dir: Option<PathBuf>,
}

impl SheetArgs {
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            sheet_id: self.sheet_id.clone(),
            auth: self.auth.clone(),
            langs: self.langs.as_deref().map(config::parse_lang_list),
            sheet_name: self.sheet_name.clone(),
            base_lang: self.base_lang.clone(),
            locales_dir: self.locales_dir.clone(),
        }
    }
}

impl Cli {
    /// Load the effective configuration for this invocation.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the config is missing or incomplete.
    pub fn load_config(&self) -> Result<SheetConfig> {
        config::load_config(self.config.as_deref(), &self.sheet.overrides())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Push the local catalog to the sheet
    Upload {
        /// Show the changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Pull the sheet into the local catalog and locale files
    Download,

    /// Show what an upload would change
    Status,

    /// Print the local catalog
    List,

    /// Add a record, upload it and refresh the local files
    Add {
        /// Category of the record
        category: String,

        /// Key within the category
        key: String,

        /// Translation as LANG=TEXT (repeatable)
        #[arg(long = "value", value_name = "LANG=TEXT")]
        values: Vec<String>,
    },

    /// Delete a record from the sheet and refresh the local files
    Delete {
        /// Category of the record
        category: String,

        /// Key within the category
        key: String,
    },

    /// Empty the local catalog file
    Reset,

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sheetsync",
            "upload",
            "--dry-run",
            "--langs",
            "zh-TW, en-US",
            "--sheet-name",
            "Strings",
            "-f",
            "i18n.json",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Upload { dry_run: true }));
        assert_eq!(cli.file, PathBuf::from("i18n.json"));
        let overrides = cli.sheet.overrides();
        assert_eq!(overrides.langs, Some(vec!["zh-TW".to_string(), "en-US".to_string()]));
        assert_eq!(overrides.sheet_name.as_deref(), Some("Strings"));
    }

    #[test]
    fn test_add_collects_values() {
        let cli = Cli::try_parse_from([
            "sheetsync", "add", "ui", "ok", "--value", "en=OK", "--value", "fr=D'accord",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { category, key, values } => {
                assert_eq!((category.as_str(), key.as_str()), ("ui", "ok"));
                assert_eq!(values, vec!["en=OK", "fr=D'accord"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_out_alias() {
        let cli = Cli::try_parse_from(["sheetsync", "download", "--out", "all.json"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("all.json"));
    }
}
