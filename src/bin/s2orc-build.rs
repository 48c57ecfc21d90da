//! `s2orc-build` -- a thin demonstration driver for [`s2orc_structure`].
//!
//! Reads one JSON-Lines file of raw paper records (or stdin), calls
//! [`s2orc_structure::build_paper`] per line, and writes one JSON `Paper`
//! per line to stdout (or `--output`). This binary is explicitly outside
//! the core's own contract (§1, §6, §12): it owns ingestion, emission, and
//! its own exit-code policy, none of which the core performs itself.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

use s2orc_structure::{build_paper, RawPaper};

#[derive(Parser, Debug)]
#[command(name = "s2orc-build", version, about = "Reconstruct section/paragraph/bibliography trees from S2ORC-style annotation records")]
struct Cli {
    /// Input JSON-Lines file of raw paper records. Reads stdin if omitted.
    input: Option<PathBuf>,

    /// Write output here instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print each output record instead of one compact line per paper.
    #[arg(long)]
    pretty: bool,

    /// Raise the log filter from `warn` to `debug`.
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    install_subscriber(cli.verbose);

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to open input file");
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => match File::create(path) {
            Ok(f) => Box::new(f),
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to create output file");
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(io::stdout()),
    };

    let mut any_failed = false;

    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!(line = line_no + 1, error = %e, "failed to read input line");
                any_failed = true;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let raw: RawPaper = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                error!(line = line_no + 1, error = %e, "record is not a well-formed paper");
                any_failed = true;
                continue;
            }
        };

        let paper = match build_paper(raw) {
            Ok(p) => p,
            Err(e) => {
                error!(line = line_no + 1, error = %e, "corrupt record skipped");
                any_failed = true;
                continue;
            }
        };

        let encoded = if cli.pretty {
            serde_json::to_string_pretty(&paper)
        } else {
            serde_json::to_string(&paper)
        };
        match encoded {
            Ok(json) => {
                if writeln!(writer, "{json}").is_err() {
                    error!(line = line_no + 1, "failed to write output line");
                    return ExitCode::FAILURE;
                }
            }
            Err(e) => {
                error!(line = line_no + 1, error = %e, "failed to serialize reconstructed paper");
                any_failed = true;
            }
        }
    }

    if any_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn install_subscriber(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
