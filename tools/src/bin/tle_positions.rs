use chrono::{DateTime, Utc};
use clap::Parser;
use std::fs::{self, File};
use std::io::{self, prelude::*, BufWriter};
use std::path::PathBuf;
use tracker_lib::{propagator::Sgp4Propagator, scheduler::compute_positions};
use tracing_subscriber::EnvFilter;

/// Print the sub-satellite point of every element set at one instant
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// RFC 3339 instant to propagate to, defaults to now
    #[arg(short = 't', long, value_parser = parse_instant)]
    at: Option<DateTime<Utc>>,

    /// Emit JSON instead of whitespace separated columns
    #[arg(short = 'j', long)]
    json: bool,

    /// Output file path to write, stdout when not provided
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Element-set text file to read
    input: PathBuf,
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|t| t.with_timezone(&Utc))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let opts = Opts::parse();

    let text = fs::read_to_string(&opts.input)?;
    let sets = tleproto::parse_element_sets(&text);
    let at = opts.at.unwrap_or_else(Utc::now);
    let positions = compute_positions(&Sgp4Propagator, &sets, at);

    let mut output: Box<dyn Write> = match opts.output {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if opts.json {
        serde_json::to_writer_pretty(&mut output, &positions)?;
        writeln!(&mut output)?;
    } else {
        for p in positions.iter() {
            writeln!(
                &mut output,
                "{:.4} {:.4} {:.3} {}",
                p.lat, p.lon, p.height_km, p.name
            )?;
        }
    }
    output.flush()?;

    if positions.len() != sets.len() {
        eprintln!(
            "{} of {} element sets could not be propagated to {}",
            sets.len() - positions.len(),
            sets.len(),
            at.to_rfc3339()
        );
    }

    Ok(())
}
