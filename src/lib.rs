pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod export;
pub mod ui;
pub mod writer;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, FolderConfig, OutputConfig};
pub use error::{ConvertError, Result, UserFriendlyError};

// Core functionality re-exports
pub use converter::{
    extract_records, ConversionReport, FilterDecision, IncludeRule, ItemFilter, OutputRecord,
};
pub use export::{load_document, ExportDocument, Folder, FolderResolution, Item, LoginData};
pub use ui::{OutputFormatter, OutputMode};
pub use writer::{output_path_for, RecordWriter, WriteSummary, WriterOptions};

use std::path::{Path, PathBuf};

pub const BANNER: &str = "Bitwarden to Mooltipass";

/// Main library interface: one configured conversion of a Bitwarden export.
pub struct Converter {
    config: Config,
    output_formatter: OutputFormatter,
}

impl Converter {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
        }
    }

    /// Create Converter instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Load, filter and write `<input><suffix>`.
    pub fn convert_file<P: AsRef<Path>>(&self, input: P) -> Result<ConversionReport> {
        let input = input.as_ref();
        let document = self.load(input)?;

        let mut report = ConversionReport::new(input);
        let filter = self.build_filter(&document, &mut report);

        let output_path = self.output_path(input);
        self.output_formatter
            .debug(&format!("Writing {}", output_path.display()));

        let mut writer =
            RecordWriter::create(&output_path, WriterOptions::from(&self.config.output))?;
        self.process_items(&document, &filter, &mut report, |record| {
            writer.write_record(record)
        })?;
        let summary = writer.finish()?;
        if let Some(echo_error) = summary.echo_error {
            let warning = echo_error.user_message();
            self.output_formatter.warning(&warning);
            report.add_warning(warning);
        }

        self.output_formatter.success(&format!(
            "Wrote {} records to {}",
            report.records_written,
            output_path.display()
        ));
        report.output_path = Some(output_path);

        Ok(report)
    }

    /// Same pass as [`Converter::convert_file`] but nothing is written.
    pub fn dry_run<P: AsRef<Path>>(&self, input: P) -> Result<ConversionReport> {
        let input = input.as_ref();
        let document = self.load(input)?;

        let mut report = ConversionReport::new(input);
        let filter = self.build_filter(&document, &mut report);

        self.output_formatter
            .info("DRY RUN MODE - no CSV file will be written");
        self.process_items(&document, &filter, &mut report, |_| Ok(()))?;

        self.output_formatter.notice(&format!(
            "Dry run: {} records would be written to {}",
            report.records_written,
            self.output_path(input).display()
        ));

        Ok(report)
    }

    pub fn list_folders<P: AsRef<Path>>(&self, input: P) -> Result<Vec<Folder>> {
        let document = self.load(input.as_ref())?;
        self.output_formatter.print_folders(&document.folders);
        Ok(document.folders)
    }

    /// Resolves the configured folder names against `document`.
    pub fn build_filter(&self, document: &ExportDocument, report: &mut ConversionReport) -> ItemFilter {
        let filter = self
            .config
            .folders
            .filter
            .as_deref()
            .map(|name| self.resolve(document, name, "filter", report));
        let exclude = self
            .config
            .folders
            .exclude
            .as_deref()
            .map(|name| self.resolve(document, name, "exclude", report));

        ItemFilter::from_resolutions(filter.as_ref(), exclude.as_ref())
    }

    pub fn output_path(&self, input: &Path) -> PathBuf {
        output_path_for(input, &self.config.output.suffix)
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ConvertError) {
        self.output_formatter.print_user_friendly_error(error);
    }

    fn load(&self, input: &Path) -> Result<ExportDocument> {
        self.output_formatter
            .debug(&format!("Loading {}", input.display()));
        let document = load_document(input)?;
        self.output_formatter.info(&format!(
            "Loaded {} items ({} logins) in {} folders",
            document.items.len(),
            document.login_count(),
            document.folders.len()
        ));
        Ok(document)
    }

    fn resolve(
        &self,
        document: &ExportDocument,
        name: &str,
        option: &str,
        report: &mut ConversionReport,
    ) -> FolderResolution {
        let resolution = document.resolve_folder(name);

        let warning = match resolution {
            FolderResolution::Unique(ref id) => {
                self.output_formatter
                    .debug(&format!("--{} '{}' resolved to folder {}", option, name, id));
                None
            }
            FolderResolution::Ambiguous { ref id, matches } => Some(format!(
                "{} folders are named '{}'; --{} uses the first one ({})",
                matches, name, option, id
            )),
            FolderResolution::NotFound if option == "filter" => Some(format!(
                "No folder named '{}'; --filter matches no items",
                name
            )),
            FolderResolution::NotFound => Some(format!(
                "No folder named '{}'; --{} excludes nothing",
                name, option
            )),
        };

        if let Some(warning) = warning {
            self.output_formatter.warning(&warning);
            report.add_warning(warning);
        }

        resolution
    }

    fn process_items<S>(
        &self,
        document: &ExportDocument,
        filter: &ItemFilter,
        report: &mut ConversionReport,
        mut sink: S,
    ) -> Result<()>
    where
        S: FnMut(&OutputRecord) -> Result<()>,
    {
        for item in &document.items {
            let decision = filter.evaluate(item);
            report.record_decision(decision);

            if !decision.is_included() {
                continue;
            }

            for record in extract_records(item) {
                sink(&record)?;
                report.records_written += 1;
            }
        }

        Ok(())
    }
}

/// Converts an in-memory document and returns the CSV text that would be
/// written, without touching the filesystem.
pub fn convert_to_string(document: &ExportDocument, config: &Config) -> Result<String> {
    let converter = Converter::new(config.clone(), OutputMode::Plain, 0, true);
    let mut report = ConversionReport::default();
    let filter = converter.build_filter(document, &mut report);

    let options = WriterOptions {
        echo: false,
        quote_fields: config.output.quote_fields,
    };
    let mut writer: RecordWriter<Vec<u8>, Vec<u8>> =
        RecordWriter::from_parts("<memory>", Vec::new(), None, options);
    converter.process_items(document, &filter, &mut report, |record| {
        writer.write_record(record)
    })?;

    let (bytes, _) = writer.into_inner();
    String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}
