use clap::Parser;
use std::fs::{self, File};
use std::io::{self, prelude::*};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Rewrite an element-set document as uniform three-line records.
///
/// Blank lines and surrounding whitespace are dropped and unnamed sets
/// are given the placeholder name.
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Fail on a truncated trailing record instead of dropping it
    #[arg(short = 's', long)]
    strict: bool,

    /// Keep at most this many element sets
    #[arg(short = 'n', long)]
    max_records: Option<usize>,

    /// Output file path to write, stdout when not provided
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Element-set text file to read
    input: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let opts = Opts::parse();

    let text = fs::read_to_string(&opts.input)?;
    let mut sets = if opts.strict {
        tleproto::parse_element_sets_checked(&text)?
    } else {
        tleproto::parse_element_sets(&text)
    };
    if let Some(n) = opts.max_records {
        sets.truncate(n);
    }

    let normalized = tleproto::format_element_sets(&sets);
    match opts.output {
        Some(p) => File::create(p)?.write_all(normalized.as_bytes())?,
        None => io::stdout().lock().write_all(normalized.as_bytes())?,
    }

    Ok(())
}
