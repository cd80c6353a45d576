use clap::Parser;
use fufs::{Config, Container, ErrorPolicy, Extractor, Validation};
use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::{Format, Severity};
use sloggers::Build;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fufs-extract", version, about = "FUFS container extractor")]
struct Cli {
    /// Input container
    #[arg(short, long)]
    file: PathBuf,
    /// Output directory, created if missing
    #[arg(short, long, required_unless_present = "list")]
    output: Option<PathBuf>,
    /// Print the file table instead of extracting
    #[arg(long, default_value_t = false)]
    list: bool,
    /// Skip entries which fail to decompress instead of stopping
    #[arg(long, default_value_t = false)]
    keep_going: bool,
    /// Reject containers with a bad magic or inconsistent entry offsets
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Decoder threads (0 = one per CPU)
    #[arg(short = 'j', long, default_value_t = 1)]
    threads: usize,
    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

fn main() {
    std::process::exit(real_main());
}

fn real_main() -> i32 {
    let cli = Cli::parse();

    let severity = match (cli.quiet, cli.verbose) {
        (true, _) => Severity::Error,
        (false, 0) => Severity::Info,
        (false, 1) => Severity::Debug,
        (false, _) => Severity::Trace,
    };
    let mut builder = TerminalLoggerBuilder::new();
    builder.level(severity);
    builder.destination(Destination::Stderr);
    builder.format(Format::Compact);
    let logger = match builder.build() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("error: unable to set up logging: {}", e);
            return 1;
        }
    };

    if cli.list {
        let container = match Container::open_with_logger(&cli.file, logger.clone()) {
            Ok(container) => container,
            Err(e) => {
                slog::crit!(logger, "{}: {}", cli.file.display(), e);
                return 1;
            }
        };
        println!("{:>6}  {:>10}  {:>10}  {:>10}", "index", "offset", "reserved", "size");
        for (i, entry) in container.entries().iter().enumerate() {
            println!(
                "{:>6}  {:>10}  {:#010x}  {:>10}",
                i, entry.offset, entry.reserved, entry.size
            );
        }
        return 0;
    }

    let output = match cli.output {
        Some(output) => output,
        None => {
            slog::crit!(logger, "an output directory is required");
            return 2;
        }
    };

    let mut config = Config::new();
    config.set_threads(cli.threads);
    if cli.keep_going {
        config.set_error_policy(ErrorPolicy::Skip);
    }
    if cli.strict {
        config.set_validation(Validation::Strict);
    }

    let extractor = Extractor::with_logger(config, logger.clone());
    match extractor.extract_file(&cli.file, &output) {
        Ok(report) => {
            if report.skipped.is_empty() {
                0
            } else {
                for skipped in &report.skipped {
                    slog::error!(logger, "entry {} was not extracted: {}", skipped.index, skipped.error);
                }
                1
            }
        }
        Err(e) => {
            slog::crit!(logger, "{}: {}", cli.file.display(), e);
            1
        }
    }
}
