//! folio - HTML book to LaTeX converter

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, error, info};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use folio::config::resolve_source_dir;
use folio::{Config, convert_book};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Convert an HTML book into a LaTeX document tree", long_about = None)]
#[command(after_help = "EXAMPLES:
    folio ./book                    Write body.tex and out/*.tex here
    folio ./book/index.html -o tex  Write into ./tex")]
struct Cli {
    /// Book directory, or any file inside it (e.g. index.html)
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Directory receiving body.tex
    #[arg(short, long, value_name = "OUTPUT_DIR", default_value = ".")]
    output: PathBuf,

    /// Prefix for chapter files and images, relative to OUTPUT_DIR
    #[arg(long, value_name = "PREFIX", default_value = folio::config::DEFAULT_CHAPTER_DIR)]
    chapter_dir: String,

    /// Only report warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Also report debug messages
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage problems are not conversion failures.
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    init_logger(&cli);

    let config = Config::new(resolve_source_dir(&cli.source))
        .with_output_dir(&cli.output)
        .with_chapter_dir(cli.chapter_dir.as_str());

    match convert_book(&config) {
        Ok(report) => {
            info!(
                "wrote {} chapters ({} sections skipped, {} warnings)",
                report.chapters.len(),
                report.skipped.len(),
                report.diagnostics.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::Warn
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let config = ConfigBuilder::new()
        .add_filter_ignore_str("html5ever")
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    // A logger can only fail to install if one is already set.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
