use crate::converter::ConversionReport;
use crate::error::{ConvertError, UserFriendlyError};
use crate::export::Folder;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static KEY: Emoji = Emoji("🔑 ", "> ");
static FOLDER: Emoji = Emoji("📁 ", "- ");

/// Status messages for the console. Records themselves are echoed by the
/// writer and never pass through here.
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message, Stream::Stdout),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message, Stream::Stderr),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message, Stream::Stderr),
                OutputMode::Plain => eprintln!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message, Stream::Stdout),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message, Stream::Stdout),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", KEY, style(operation).bold());
                    } else {
                        println!("{}", operation);
                    }
                }
                OutputMode::Json => {
                    self.print_json_message("operation_start", operation, Stream::Stdout)
                }
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    /// Outcome line shown at the default verbosity, e.g. the dry-run count.
    pub fn notice(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => println!("{}", message),
                OutputMode::Json => self.print_json_message("notice", message, Stream::Stdout),
                OutputMode::Plain => println!("NOTICE: {}", message),
            }
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &ConvertError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(
                        &serde_json::json!({
                            "type": "suggestion",
                            "message": suggestion
                        }),
                        Stream::Stderr,
                    );
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    pub fn print_conversion_report(&self, report: &ConversionReport) {
        match self.mode {
            OutputMode::Json => {
                if self.quiet {
                    return;
                }
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Human if self.should_show_message(1) => self.print_human_report(report),
            OutputMode::Plain if self.should_show_message(1) => self.print_plain_report(report),
            _ => {}
        }
    }

    /// Folder listing is the requested output, so it ignores verbosity.
    pub fn print_folders(&self, folders: &[Folder]) {
        match self.mode {
            OutputMode::Json => {
                let listing: Vec<_> = folders
                    .iter()
                    .map(|f| serde_json::json!({ "id": f.id, "name": f.name }))
                    .collect();
                self.print_json_object(
                    &serde_json::json!({
                        "type": "folders",
                        "folders": listing
                    }),
                    Stream::Stdout,
                );
            }
            OutputMode::Human => {
                for folder in folders {
                    if self.use_colors {
                        println!(
                            "{}{}  {}",
                            FOLDER,
                            style(&folder.name).bold(),
                            style(&folder.id).dim()
                        );
                    } else {
                        println!("{}  {}", folder.name, folder.id);
                    }
                }
            }
            OutputMode::Plain => {
                for folder in folders {
                    println!("{}\t{}", folder.id, folder.name);
                }
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        // Warnings and errors go to stderr so they never mix with echoed records.
        let to_stderr = matches!(msg_type, MessageType::Error | MessageType::Warning);

        if self.use_colors {
            if to_stderr {
                eprintln!("{}{}", emoji, color_fn(message));
            } else {
                println!("{}{}", emoji, color_fn(message));
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            if to_stderr {
                eprintln!("{} {}", prefix, message);
            } else {
                println!("{} {}", prefix, message);
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str, stream: Stream) {
        self.print_json_object(&json_message(level, message), stream);
    }

    fn print_json_object(&self, obj: &serde_json::Value, stream: Stream) {
        let line = serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string());
        match stream {
            Stream::Stdout => println!("{}", line),
            Stream::Stderr => eprintln!("{}", line),
        }
    }

    fn print_human_report(&self, report: &ConversionReport) {
        self.print_separator();

        let headline = if report.is_dry_run() {
            "Dry run completed, nothing written"
        } else {
            "Conversion completed!"
        };
        if self.use_colors {
            println!("{} {}", style(headline).green().bold(), CHECKMARK);
        } else {
            println!("✓ {}", headline);
        }

        println!();
        println!("  Input:            {}", report.input_path.display());
        if let Some(ref output) = report.output_path {
            println!("  Output:           {}", output.display());
        }
        println!("  Items:            {}", report.items_total);
        println!("  Converted:        {}", self.highlight(report.items_included));
        println!("  Without login:    {}", report.items_skipped_no_login);
        println!("  Excluded:         {}", report.items_excluded);
        println!("  Outside filter:   {}", report.items_outside_filter);
        println!("  Records:          {}", self.highlight(report.records_written));

        if !report.warnings.is_empty() {
            println!();
            println!("Warnings:");
            for warning in &report.warnings {
                println!("  - {}", warning);
            }
        }

        self.print_separator();
    }

    fn print_plain_report(&self, report: &ConversionReport) {
        println!("REPORT: Conversion completed");
        println!("Input: {}", report.input_path.display());
        if let Some(ref output) = report.output_path {
            println!("Output: {}", output.display());
        }
        println!("Items: {}", report.items_total);
        println!("Converted: {}", report.items_included);
        println!("Records: {}", report.records_written);

        if !report.warnings.is_empty() {
            println!("Warnings: {}", report.warnings.len());
        }
    }

    fn highlight(&self, count: usize) -> String {
        if self.use_colors {
            style(count).cyan().bold().to_string()
        } else {
            count.to_string()
        }
    }
}

fn json_message(level: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "message",
        "level": level,
        "message": message,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

/// Errors, warnings and suggestions use stderr in every mode; stdout carries
/// records and requested output only.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Stream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}
