//! SnapMerge CLI tool
//!
//! A command-line tool for merging the PDFs, images, Word documents, and
//! emails in a folder into a single PDF.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};

use snapmerge::pdf::extract_metadata;
use snapmerge::{run_manual_merge, run_merge, MergeProgress, MergeReport, Settings, SortBy};

/// SnapMerge - Merge a folder of PDFs, images, and documents into one PDF
#[derive(Parser)]
#[command(name = "snapmerge")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Merge everything in a folder, subfolders included
    snapmerge merge scans/ -o merged.pdf

    # Newest first, top folder only
    snapmerge merge scans/ -o merged.pdf --sort-by modified --desc --no-subfolders

    # Merge an explicit list (globs allowed), in the given order
    snapmerge files cover.pdf \"chapter-*.pdf\" notes.png -o book.pdf

    # Inspect a PDF
    snapmerge info merged.pdf")]
struct Cli {
    /// Write the log to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the eligible files in a folder into one PDF
    Merge {
        /// Folder to merge
        input_dir: PathBuf,

        /// Output PDF file path
        #[arg(short, long)]
        output: PathBuf,

        /// Settings file (defaults bundled next to the executable)
        #[arg(long, default_value = "config.yaml")]
        config: PathBuf,

        /// Do not recurse into subfolders
        #[arg(long)]
        no_subfolders: bool,

        /// Sort key for enumeration order
        #[arg(long, value_enum)]
        sort_by: Option<SortBy>,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Merge an explicit file list, in the given order
    Files {
        /// Input files (in order). Supports glob patterns like "*.pdf"
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output PDF file path
        #[arg(short, long)]
        output: PathBuf,

        /// Settings file (defaults bundled next to the executable)
        #[arg(long, default_value = "config.yaml")]
        config: PathBuf,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_file.as_deref()) {
        eprintln!("Error: failed to set up logging: {}", e);
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Merge {
            input_dir,
            output,
            config,
            no_subfolders,
            sort_by,
            desc,
            open,
        } => cmd_merge(input_dir, output, config, no_subfolders, sort_by, desc, open),
        Commands::Files {
            inputs,
            output,
            config,
            open,
        } => cmd_files(inputs, output, config, open),
        Commands::Info { input } => cmd_info(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Console + optional file logging with timestamped lines
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.args()
        )
    });

    if let Some(path) = log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

/// Progress bar fed by the pipeline's callbacks
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl MergeProgress for CliProgress {
    fn on_discovery_complete(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar
            .println(format!("Discovered {} file(s) to process.", total));
    }

    fn on_file_start(&self, index: usize, _total: usize, name: &str) {
        self.bar.set_position((index - 1) as u64);
        self.bar.set_message(name.to_string());
    }

    fn on_file_skipped(&self, path: &Path, reason: &str) {
        self.bar
            .println(format!("Skipping {}: {}", path.display(), reason));
    }

    fn on_merge_start(&self, total: usize) {
        self.bar.set_position(0);
        self.bar.set_length(total as u64);
        self.bar.set_message("writing PDF".to_string());
    }

    fn on_merge_progress(&self, done: usize, _total: usize) {
        self.bar.set_position(done as u64);
    }

    fn on_complete(&self, merged: usize, skipped: usize) {
        self.bar.finish_with_message(format!(
            "merged {} file(s), skipped {}",
            merged, skipped
        ));
    }
}

/// Expand glob patterns in input paths.
///
/// Matches within one pattern are sorted; the order of the patterns
/// themselves is preserved, since manual mode means the caller owns the
/// order.
fn expand_globs(patterns: Vec<String>) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let mut matched = Vec::new();
            for entry in glob(&pattern)? {
                match entry {
                    Ok(path) => matched.push(path),
                    Err(e) => eprintln!("Warning: glob error for {}: {}", pattern, e),
                }
            }
            if matched.is_empty() {
                anyhow::bail!("No files matched pattern: {}", pattern);
            }
            matched.sort();
            paths.extend(matched);
        } else {
            // No glob characters, treat as literal path
            paths.push(PathBuf::from(pattern));
        }
    }

    Ok(paths)
}

/// Open a file with the system default application
fn open_file(path: &Path) -> anyhow::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

fn print_report(report: &MergeReport) {
    eprintln!("Output: {}", report.output.display());
    eprintln!(
        "  merged {} / converted {} / skipped {}",
        report.merged_count, report.converted_count, report.skipped_count
    );
    for path in &report.skipped {
        eprintln!("  skipped: {}", path.display());
    }
}

/// Merge a folder into one PDF
fn cmd_merge(
    input_dir: PathBuf,
    output: PathBuf,
    config: PathBuf,
    no_subfolders: bool,
    sort_by: Option<SortBy>,
    desc: bool,
    open: bool,
) -> anyhow::Result<()> {
    let mut settings = Settings::load(&config)
        .with_context(|| format!("cannot load settings from {}", config.display()))?;

    // CLI flags override the settings file
    if no_subfolders {
        settings.include_subfolders = false;
    }
    if let Some(sort_by) = sort_by {
        settings.sort_by = sort_by;
    }
    if desc {
        settings.sort_desc = true;
    }

    let progress = CliProgress::new();
    let report = run_merge(&input_dir, &output, &settings, &progress)
        .with_context(|| format!("merging {}", input_dir.display()))?;

    print_report(&report);

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Merge an explicit file list into one PDF
fn cmd_files(
    inputs: Vec<String>,
    output: PathBuf,
    config: PathBuf,
    open: bool,
) -> anyhow::Result<()> {
    let inputs = expand_globs(inputs)?;

    for path in &inputs {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
    }

    let settings = Settings::load(&config)
        .with_context(|| format!("cannot load settings from {}", config.display()))?;

    let progress = CliProgress::new();
    let report = run_manual_merge(&inputs, &output, &settings, &progress)?;

    print_report(&report);

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let metadata = extract_metadata(&input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);
    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }
    if metadata.encrypted {
        println!("Encrypted: yes");
    }

    Ok(())
}
