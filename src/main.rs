use clap::{Parser, ValueEnum};
use gitcontext::{Config, ContextProcessor, ContextWriter, GitContextError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LONG_HELP: &str = r#"
Template placeholders:
  #file_name               - File name, e.g. main.rs
  #file_path               - Absolute path of the file
  #file_size               - Size in bytes
  #file_extension          - Text after the last dot (empty for .gitignore, Makefile)
  #file_creation_date      - Creation time, local ISO date-time
  #file_modification_date  - Last modification time, local ISO date-time
  #file_content            - Full file content

Exclude patterns:
  **   - any characters, including path separators
  *    - any characters except path separators
  ?    - exactly one character
  Patterns must match a whole path: either the absolute path or the path
  relative to ROOT, of the file or of any directory above it.

Examples:
  # Print the context of the current directory
  gitcontext .
  # Save to a file, skipping lock files and a vendored directory
  gitcontext . -x '*.lock' -x '**/vendor' -o context.txt
  # Use a custom template
  gitcontext src --template-file template.txt
  # Show which files would be included
  gitcontext . --list
  # Same, as JSON for scripting
  gitcontext . --list=json

Configuration file (gitcontext.toml):
  template = "=== #file_path ===\n#file_content\n"
  exclude-patterns = ["**/.git", "**/target", "*.log"]

  [output]
  path = "context.txt"
"#;

/// Flatten a source tree into a single templated text context.
#[derive(Parser, Debug)]
#[command(
    name = "gitcontext",
    version,
    about = "Flatten a source tree into a single templated text context.",
    after_long_help = LONG_HELP
)]
struct Cli {
    /// Root directory to walk
    #[arg(value_name = "ROOT", default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to ./gitcontext.toml when present)
    #[arg(short, long, value_name = "FILE", env = "GITCONTEXT_CONFIG")]
    config: Option<PathBuf>,

    /// Read the template from a file instead of the configuration
    #[arg(short, long, value_name = "FILE")]
    template_file: Option<PathBuf>,

    /// Exclude wildcard patterns (repeatable), added to the configured ones
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Drop the configured exclude patterns, keeping only those given with --exclude
    #[arg(long)]
    no_default_excludes: bool,

    /// Output file, overwritten on each run
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print to the console even if the configuration names an output file
    #[arg(long)]
    stdout: bool,

    /// List eligible files instead of rendering them (optionally with format: plain, json)
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, default_missing_value = "plain")]
    list: Option<ListFormat>,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq)]
enum ListFormat {
    /// One path per line
    Plain,
    /// JSON array for scripting
    Json,
}

#[derive(Serialize)]
struct ListedFile {
    path: String,
    size: Option<u64>,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(exit_code(&e));
    }
}

/// Invalid exclude patterns are a usage error (2); every other fatal error is 1.
fn exit_code(error: &GitContextError) -> i32 {
    match error {
        GitContextError::InvalidPattern { .. } => 2,
        _ => 1,
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match (quiet, verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            (false, _) => "trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;

    // Checked before the output file is truncated
    if !cli.root.exists() {
        return Err(GitContextError::RootNotFound {
            path: cli.root.clone(),
        });
    }

    let processor = ContextProcessor::new(&config)?;
    info!(
        "Walking {} with {} exclude patterns",
        cli.root.display(),
        config.exclude_patterns.len()
    );

    if let Some(format) = cli.list {
        return list_files(&processor, &cli.root, format);
    }

    match &config.output.path {
        Some(path) => write_to_file(processor, &cli.root, path, cli.quiet),
        None => print_to_console(&processor, &cli.root, cli.quiet),
    }
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(template_path) = &cli.template_file {
        info!("Reading template from {}", template_path.display());
        config.set_template_file(template_path)?;
    }
    if cli.no_default_excludes {
        config.exclude_patterns.clear();
    }
    config.exclude_patterns.extend(cli.exclude.iter().cloned());
    if let Some(output) = &cli.output {
        config.output.path = Some(output.clone());
    }
    if cli.stdout {
        config.output.path = None;
    }

    config.validate()?;
    Ok(config)
}

fn write_to_file(processor: ContextProcessor, root: &Path, path: &Path, quiet: bool) -> Result<()> {
    info!("Writing output to {}", path.display());
    let mut writer = ContextWriter::create(path)?;
    // Keep the output file out of its own context when it lives under ROOT
    let processor = processor.ignoring(path.canonicalize()?);

    let summary = processor.process_each(root, |unit| writer.write_unit(unit))?;
    writer.flush()?;

    info!(
        "{} files written, {} skipped, {} failed",
        summary.processed, summary.skipped, summary.failed
    );
    if !quiet {
        println!("Context saved to {}", path.display());
    }
    Ok(())
}

fn print_to_console(processor: &ContextProcessor, root: &Path, quiet: bool) -> Result<()> {
    let mut writer = ContextWriter::stdout();
    let summary = processor.process_each(root, |unit| writer.write_unit(unit))?;
    writer.flush()?;

    if !quiet {
        eprintln!(
            "Processed {} files ({} skipped, {} failed)",
            summary.processed, summary.skipped, summary.failed
        );
    }
    Ok(())
}

fn list_files(processor: &ContextProcessor, root: &Path, format: ListFormat) -> Result<()> {
    let files = processor.eligible_files(root)?;

    match format {
        ListFormat::Plain => {
            for file in &files {
                println!("{}", file.display());
            }
        }
        ListFormat::Json => {
            let listed: Vec<ListedFile> = files
                .iter()
                .map(|file| ListedFile {
                    path: file.display().to_string(),
                    size: std::fs::metadata(file).ok().map(|m| m.len()),
                })
                .collect();
            let json = serde_json::to_string_pretty(&listed)?;
            println!("{json}");
        }
    }

    Ok(())
}
