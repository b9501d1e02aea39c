use crate::config::{CliOverrides, Config};
use crate::error::{ConvertError, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bw2mooltipass")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bitwarden to Mooltipass converter")]
#[command(
    long_about = "Converts an unencrypted Bitwarden JSON export into a CSV file \
                  (uri,username,password) that the Mooltipass app can import. \
                  The CSV is written next to the export as <file>.csv."
)]
#[command(after_help = "EXAMPLES:\n  \
    bw2mooltipass --file bitwarden_export.json\n  \
    bw2mooltipass --file bitwarden_export.json --filter Work\n  \
    bw2mooltipass --file bitwarden_export.json --exclude Archive --quote\n  \
    bw2mooltipass --file bitwarden_export.json --list-folders")]
pub struct Cli {
    /// Bitwarden exported json file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Only convert items in this folder (exact name)
    #[arg(long)]
    pub filter: Option<String>,

    /// Skip items in this folder (exact name)
    #[arg(short, long)]
    pub exclude: Option<String>,

    /// Quote fields containing commas, quotes or newlines
    #[arg(long, help = "Quote fields that contain commas, quotes or newlines")]
    pub quote: bool,

    /// Do not echo converted lines to stdout
    #[arg(long)]
    pub no_echo: bool,

    /// Suffix appended to the export path to name the output file
    #[arg(long, help = "Output file suffix (default: .csv)")]
    pub suffix: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for status messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress status messages)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// List the folders in the export and exit
    #[arg(long, help = "Print folder names and ids, then exit")]
    pub list_folders: bool,

    /// Dry run (count what would be converted without writing)
    #[arg(long, help = "Show what would be converted without writing the CSV file")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_filter(self.filter.clone())
            .with_exclude(self.exclude.clone())
            .with_suffix(self.suffix.clone())
            .with_no_echo(self.no_echo)
            .with_quote_fields(self.quote)
    }

    /// The export path, or a usage error when `--file` was not given.
    pub fn require_file(&self) -> Result<&PathBuf> {
        self.file.as_ref().ok_or_else(|| ConvertError::Usage {
            message: "Error: Need a json file from Bitwarden".to_string(),
        })
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["bw2mooltipass"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_long_and_short_flags() {
        let cli = parse(&["-f", "export.json", "--filter", "Work", "-e", "Archive"]);
        assert_eq!(cli.file, Some(PathBuf::from("export.json")));
        assert_eq!(cli.filter.as_deref(), Some("Work"));
        assert_eq!(cli.exclude.as_deref(), Some("Archive"));
        assert!(!cli.quote);
    }

    #[test]
    fn test_missing_file_is_usage_error() {
        let cli = parse(&["--filter", "Work"]);
        assert!(matches!(cli.require_file(), Err(ConvertError::Usage { .. })));
    }

    #[test]
    fn test_overrides_flow_into_config() {
        let cli = parse(&[
            "--file",
            "export.json",
            "--exclude",
            "Archive",
            "--no-echo",
            "--quote",
            "--suffix",
            ".mooltipass.csv",
        ]);
        let config = cli.load_config().unwrap();

        assert_eq!(config.folders.exclude.as_deref(), Some("Archive"));
        assert!(config.folders.filter.is_none());
        assert!(!config.output.echo);
        assert!(config.output.quote_fields);
        assert_eq!(config.output.suffix, ".mooltipass.csv");
    }

    #[test]
    fn test_invalid_suffix_rejected() {
        let cli = parse(&["--file", "export.json", "--suffix", ""]);
        assert!(matches!(cli.load_config(), Err(ConvertError::Config { .. })));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["bw2mooltipass", "-q", "-v"]).is_err());

        let cli = parse(&["-q"]);
        assert_eq!(cli.verbosity_level(), 0);
    }
}
