use anyhow::Context;
use bw2mooltipass::config::DEFAULT_CONFIG_FILE;
use bw2mooltipass::{
    Cli, Config, ConvertError, Converter, OutputFormatter, OutputMode, BANNER,
};
use clap::{CommandFactory, Parser};
use std::path::Path;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // No arguments at all: help text and status 1.
    if std::env::args_os().len() < 2 {
        let _ = Cli::command().print_help();
        println!();
        return 1;
    }

    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let converter = match Converter::from_cli(&cli) {
        Ok(converter) => converter,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    converter.output_formatter().start_operation(BANNER);

    let input = match cli.require_file() {
        Ok(path) => path,
        Err(e) => {
            converter.handle_error(&e);
            return e.exit_code();
        }
    };

    if cli.list_folders {
        return match converter.list_folders(input) {
            Ok(_) => 0,
            Err(e) => {
                converter.handle_error(&e);
                e.exit_code()
            }
        };
    }

    let result = if cli.dry_run {
        converter.dry_run(input)
    } else {
        converter.convert_file(input)
    };

    match result {
        Ok(report) => {
            converter.output_formatter().print_conversion_report(&report);
            0
        }
        Err(e) => {
            converter.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    match write_sample_config(Path::new(&config_path)) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  bw2mooltipass --file <export.json> --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {:#}", e);
            1
        }
    }
}

fn write_sample_config(path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, Config::create_sample_config())
        .with_context(|| format!("could not write {}", path.display()))
}

fn print_startup_error(error: &ConvertError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
