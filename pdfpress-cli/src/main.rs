//! pdfpress - Merge, split and compress PDF documents.
//!
//! Loads the inputs, runs one engine operation off the async runtime and
//! writes the result atomically.

mod cli;
mod output;

use clap::Parser;
use std::process;
use tokio::task;

use crate::cli::Cli;
use crate::output::{OutputFormatter, ProgressBar, ProgressStyle, Report, display_load_statistics};
use pdfpress::compress::{CompressionPlan, Compressor, compress_with_config};
use pdfpress::config::{CompressionLevel, Config, Operation, OverwriteMode};
use pdfpress::error::{PdfPressError, Result};
use pdfpress::io::{LoadedFile, PdfReader, PdfWriter};
use pdfpress::merge::Merger;
use pdfpress::raster::RasterizerConfig;
use pdfpress::split::Splitter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(log_level(cli.quiet, cli.verbose))
        .parse_default_env()
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

fn log_level(quiet: bool, verbose: u8) -> log::LevelFilter {
    if quiet {
        return log::LevelFilter::Error;
    }
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<()> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfpress::NAME, pdfpress::VERSION));
        formatter.blank_line();
    }

    let writer = PdfWriter::new();
    writer.can_write(&config.output).await?;
    handle_output_overwrite(&config, &formatter).await?;

    formatter.info("Loading input files...");
    let reader = PdfReader::new();
    let (results, stats) = reader
        .load_all(config.inputs(), config.effective_jobs())
        .await;
    display_load_statistics(&formatter, &stats);
    let files = results.into_iter().collect::<Result<Vec<_>>>()?;

    let bytes = match &config.operation {
        Operation::Merge { .. } => merge(files, &formatter).await?,
        Operation::Split { pages, .. } => split(single(files)?, pages, &formatter).await?,
        Operation::Compress { level, .. } => {
            compress(single(files)?, *level, &config, &formatter).await?
        }
    };

    formatter.info(&format!("Writing to: {}", config.output.display()));
    let write_stats = writer.save_with_stats(bytes, &config.output).await?;

    if config.json {
        let report = Report::new(&config.output, stats.total_size, write_stats.file_size);
        let line = report
            .to_json()
            .map_err(|e| PdfPressError::other(format!("Failed to encode report: {e}")))?;
        println!("{line}");
    } else if formatter.should_print() {
        formatter.blank_line();
        formatter.success(&format!(
            "Successfully created {} ({})",
            config.output.display(),
            write_stats.format_file_size()
        ));
        formatter.detail(
            "Write time",
            &format!("{:.2}s", write_stats.write_time.as_secs_f64()),
        );
    }

    Ok(())
}

/// Run an engine call on the blocking pool.
async fn run_blocking<T, F>(job: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(job)
        .await
        .map_err(|e| PdfPressError::other(format!("Worker task failed: {e}")))?
}

fn single(files: Vec<LoadedFile>) -> Result<LoadedFile> {
    files.into_iter().next().ok_or(PdfPressError::NoInput)
}

async fn merge(files: Vec<LoadedFile>, formatter: &OutputFormatter) -> Result<Vec<u8>> {
    formatter.info("Merging documents...");

    let sources: Vec<Vec<u8>> = files.into_iter().map(|file| file.bytes).collect();
    let result = run_blocking(move || Merger::new().merge(&sources)).await?;
    let statistics = &result.statistics;

    formatter.info(&format!(
        "Merged {} file(s) into {} pages in {:.2}s",
        statistics.files_merged,
        statistics.total_pages,
        statistics.merge_time.as_secs_f64()
    ));

    if formatter.is_verbose() {
        formatter.section("Statistics");
        formatter.detail("Input files", &statistics.files_merged.to_string());
        formatter.detail("Total pages", &statistics.total_pages.to_string());
        formatter.detail("Input size", &statistics.format_input_size());
        formatter.detail("Output size", &statistics.format_output_size());
    }

    Ok(result.bytes)
}

async fn split(file: LoadedFile, pages: &str, formatter: &OutputFormatter) -> Result<Vec<u8>> {
    formatter.info(&format!("Extracting pages {pages}..."));

    let range = pages.to_string();
    let source = file.bytes;
    let result = run_blocking(move || Splitter::new().split(&source, &range)).await?;

    formatter.info(&format!(
        "Extracted {} of {} page(s)",
        result.pages.len(),
        result.source_pages
    ));

    if formatter.is_verbose() {
        let numbers: Vec<String> = result
            .pages
            .page_numbers()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        formatter.detail("Pages", &numbers.join(", "));
    }

    Ok(result.bytes)
}

async fn compress(
    file: LoadedFile,
    level: CompressionLevel,
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<Vec<u8>> {
    formatter.info(&format!("Compressing at level {level}..."));

    let rasterizer_config = RasterizerConfig {
        library_dir: config.pdfium_dir.clone(),
    };
    let mut progress = if formatter.should_print() {
        let mut bar = ProgressBar::new(0, ProgressStyle::Bar);
        bar.set_message("Rendering");
        bar
    } else {
        ProgressBar::disabled()
    };

    let source = file.bytes;
    let result = run_blocking(move || {
        if !CompressionPlan::for_level(level).rasterizes() {
            return compress_with_config(&source, level, &rasterizer_config);
        }

        let result = Compressor::with_pdfium(&rasterizer_config)?
            .compress_with_progress(&source, level, |p| progress.update(p.page, p.total_pages));
        progress.finish();
        result
    })
    .await?;

    formatter.info(&format!(
        "Compressed {} -> {} bytes ({:.1}% saved)",
        result.original_size,
        result.new_size,
        result.savings_percent()
    ));

    if formatter.is_verbose() {
        formatter.detail("Level", result.level.as_str());
        formatter.detail("Outcome", &format!("{:?}", result.outcome));
    }

    Ok(result.bytes)
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(config: &Config, formatter: &OutputFormatter) -> Result<()> {
    if !PdfWriter::new().exists(&config.output).await {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfPressError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // Nobody to ask when output is suppressed
            if formatter.is_quiet() {
                return Err(PdfPressError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| PdfPressError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfPressError::Cancelled)
            }
        }
    }
}
