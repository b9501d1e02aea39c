use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Usage error: {message}")]
    Usage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Export file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to parse export file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write output file {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to echo records to the console: {source}")]
    Echo {
        #[source]
        source: std::io::Error,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Process exit status reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::Usage { .. } => 1,
            ConvertError::Config { .. } => 1,
            ConvertError::NotFound { .. } => 3,
            ConvertError::Parse { .. } => 4,
            ConvertError::Output { .. } => 5,
            ConvertError::Echo { .. } => 6,
            ConvertError::Io(_) => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ConvertError {
    fn user_message(&self) -> String {
        match self {
            ConvertError::Usage { message } => message.clone(),
            ConvertError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ConvertError::NotFound { path } => {
                format!("Export file not found: {}", path)
            }
            ConvertError::Parse { path, source } => {
                format!(
                    "Failed to load JSON: {} (line {}, column {}: {})",
                    path,
                    source.line(),
                    source.column(),
                    source
                )
            }
            ConvertError::Output { path, source } => {
                format!("Failed to write CSV file: {} ({})", path, source)
            }
            ConvertError::Echo { source } => {
                format!(
                    "Stopped echoing records to the console ({}); the CSV file is complete",
                    source
                )
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ConvertError::Usage { .. } => Some(
                "Pass the unencrypted Bitwarden JSON export with --file (e.g., bw2mooltipass --file bitwarden_export.json)".to_string()
            ),
            ConvertError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            ConvertError::NotFound { .. } => Some(
                "Check the path passed to --file. Export your vault from Bitwarden as unencrypted JSON.".to_string()
            ),
            ConvertError::Parse { .. } => Some(
                "The file must be an unencrypted Bitwarden JSON export. Encrypted and CSV exports are not supported.".to_string()
            ),
            ConvertError::Output { .. } => Some(
                "Ensure you have write permission for the directory containing the export file.".to_string()
            ),
            ConvertError::Echo { .. } => Some(
                "Use --no-echo when piping into a command that closes its input early.".to_string()
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
