//! gconv - convert graphs between adjacency-list file formats.
//!
//! ```bash
//! # Edge list to sorted vertex list
//! gconv -i edge-list -o vertex-list graph.tsv graph.vl --sort
//!
//! # Make a graph undirected, drop self-loops, write the binary layout
//! gconv -i v -o bv graph.vl graph.bin -l -u
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use gconv_core::{prepare, ConvertOptions, Format, Summary};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;

use error::{CliError, CliResult};

/// Convert a graph between vertex-list, edge-list, DIMACS10 and binary formats
#[derive(Parser)]
#[command(name = "gconv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input format (vertex-list|v, edge-list|e, edge-list-ext|ee, dimacs10|d, binary-vertex|bv)
    #[arg(short = 'i', long = "from")]
    from: Format,

    /// Output format (same names as --from)
    #[arg(short = 'o', long = "to")]
    to: Format,

    /// Input graph file
    input: PathBuf,

    /// Output graph file
    output: PathBuf,

    /// Delete self-looping edges
    #[arg(short = 'l', long)]
    remove_self_loops: bool,

    /// Force the output graph to be undirected
    #[arg(short = 'u', long)]
    undirected: bool,

    /// Sort output ascending
    #[arg(short = 's', long)]
    sort: bool,

    /// Print a JSON summary of the conversion to stdout
    #[arg(long)]
    summary: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        ConvertOptions::new()
            .remove_self_loops(self.remove_self_loops)
            .enforce_undirected(self.undirected)
            .sort(self.sort)
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> CliResult<Summary> {
    let start = Instant::now();
    let options = cli.options();

    info!(path = %cli.input.display(), format = %cli.from, "loading");
    let input = std::fs::read(&cli.input).map_err(|e| CliError::io(&cli.input, e))?;
    let prepared = prepare(&input, cli.from, &options).map_err(|e| CliError::convert(&cli.input, e))?;
    drop(input);

    let encoded = prepared
        .encoded(cli.to, options.sort)
        .map_err(|e| CliError::convert(&cli.output, e))?;

    // Only create the output once decoding and encoding have succeeded.
    info!(path = %cli.output.display(), format = %cli.to, "writing");
    let file = File::create(&cli.output).map_err(|e| CliError::io(&cli.output, e))?;
    let mut writer = BufWriter::new(file);
    let summary = prepared
        .write_encoded(cli.to, encoded, &mut writer)
        .map_err(|e| CliError::convert(&cli.output, e))?;

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "conversion complete"
    );
    Ok(summary)
}

fn summary_json(cli: &Cli, summary: &Summary) -> serde_json::Value {
    serde_json::json!({
        "input": cli.input.display().to_string(),
        "output": cli.output.display().to_string(),
        "from": cli.from.name(),
        "to": cli.to.name(),
        "vertex_count": summary.vertex_count,
        "edge_count": summary.edge_count,
        "self_loops_removed": summary.self_loops_removed,
        "reciprocal_edges_added": summary.reciprocal_edges_added,
        "bytes_written": summary.bytes_written,
        "memory_bytes": summary.memory_bytes,
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if same_file(&cli.input, &cli.output) {
        eprintln!("Error: {}", CliError::SameFile(cli.input.clone()));
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(summary) => {
            if cli.summary {
                println!("{}", summary_json(&cli, &summary));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
