use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_OUTPUT_SUFFIX: &str = ".csv";
pub const DEFAULT_CONFIG_FILE: &str = "bw2mooltipass.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub folders: FolderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FolderConfig {
    /// Only convert items stored in this folder
    pub filter: Option<String>,
    /// Skip items stored in this folder
    pub exclude: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub suffix: String,
    pub echo: bool,
    pub quote_fields: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            echo: true,
            quote_fields: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConvertError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConvertError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConvertError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    /// Only an explicitly named file is read; there is no lookup in default
    /// locations.
    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref filter) = cli_args.filter {
            self.folders.filter = Some(filter.clone());
        }

        if let Some(ref exclude) = cli_args.exclude {
            self.folders.exclude = Some(exclude.clone());
        }

        if let Some(ref suffix) = cli_args.suffix {
            self.output.suffix = suffix.clone();
        }

        if cli_args.no_echo {
            self.output.echo = false;
        }

        if cli_args.quote_fields {
            self.output.quote_fields = true;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ConvertError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ConvertError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.output.suffix.is_empty() {
            return Err(ConvertError::Config {
                message: "Output suffix must not be empty (it would overwrite the export file)"
                    .to_string(),
            });
        }

        if self.output.suffix.contains('/') || self.output.suffix.contains('\\') {
            return Err(ConvertError::Config {
                message: format!(
                    "Output suffix must not contain path separators: {}",
                    self.output.suffix
                ),
            });
        }

        for name in [&self.folders.filter, &self.folders.exclude]
            .into_iter()
            .flatten()
        {
            if name.is_empty() {
                return Err(ConvertError::Config {
                    message: "Folder names must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub filter: Option<String>,
    pub exclude: Option<String>,
    pub suffix: Option<String>,
    pub no_echo: bool,
    pub quote_fields: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_exclude(mut self, exclude: Option<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_suffix(mut self, suffix: Option<String>) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn with_no_echo(mut self, no_echo: bool) -> Self {
        self.no_echo = no_echo;
        self
    }

    pub fn with_quote_fields(mut self, quote: bool) -> Self {
        self.quote_fields = quote;
        self
    }
}
