//! A command line driver for building indexes over BED-style files and
//! querying them.
//!
//! ```shell
//! cargo run --release --bin=bedindex --features=binaries -- index genes.bed
//! cargo run --release --bin=bedindex --features=binaries -- query genes.bed chr1 2321 10000
//! cargo run --release --bin=bedindex --features=binaries -- query genes.bed chr1:2321-10000
//! ```

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use bedindex::index::store::RecoveryPolicy;
use bedindex::indexed;
use bedindex::IndexedReader;
use clap::Parser;
use clap::Subcommand;
use clap_verbosity_flag::Verbosity;
use regex::Regex;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

////////////////////////////////////////////////////////////////////////////////////////
// Regions
////////////////////////////////////////////////////////////////////////////////////////

/// A query region provided on the command line.
#[derive(Debug, Eq, PartialEq)]
pub struct Region {
    /// The chromosome name.
    chromosome: String,

    /// The start position (inclusive).
    start: i64,

    /// The end position (exclusive).
    end: i64,
}

static REGION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:\s]+):(-?\d+)-(-?\d+)$").unwrap());

impl Region {
    /// Parses a region from either a single `CHROM:START-END` argument or the
    /// three arguments `CHROM START END`.
    pub fn try_from_args(args: &[String]) -> Result<Self> {
        match args {
            [region] => {
                let groups = REGION_REGEX.captures(region).with_context(|| {
                    format!("region `{region}` is not of the form `CHROM:START-END`")
                })?;

                Self::try_new(&groups[1], &groups[2], &groups[3])
            }
            [chromosome, start, end] => Self::try_new(chromosome, start, end),
            _ => bail!("expected `CHROM:START-END` or `CHROM START END`"),
        }
    }

    /// Attempts to create a region from its textual parts.
    fn try_new(chromosome: &str, start: &str, end: &str) -> Result<Self> {
        let start = start
            .parse::<i64>()
            .with_context(|| format!("start `{start}` is not a number"))?;
        let end = end
            .parse::<i64>()
            .with_context(|| format!("end `{end}` is not a number"))?;

        Ok(Self {
            chromosome: chromosome.to_string(),
            start,
            end,
        })
    }
}


////////////////////////////////////////////////////////////////////////////////////////
// Commands
////////////////////////////////////////////////////////////////////////////////////////

#[derive(Subcommand)]
enum Command {
    /// Builds the index for a source file and writes it to disk.
    Index {
        /// The source file.
        source: PathBuf,

        /// Where to write the index (defaults to `<SOURCE>.bedidx`).
        #[arg(short, long)]
        index: Option<PathBuf>,
    },

    /// Queries a source file, building its index first if it is missing or
    /// empty.
    Query {
        /// The source file.
        source: PathBuf,

        /// The region, as `CHROM:START-END` or `CHROM START END`.
        #[arg(required = true, num_args = 1..=3)]
        region: Vec<String>,

        /// The index to use (defaults to `<SOURCE>.bedidx`).
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Fail if the index is unreadable instead of treating it as empty.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
}

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The command to run.
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity,
}

fn index(source: PathBuf, index: Option<PathBuf>) -> Result<()> {
    let index_path = index.unwrap_or_else(|| indexed::default_index_path(&source));

    let index = indexed::build_index(&source, &index_path)
        .with_context(|| format!("indexing `{}`", source.display()))?;

    info!(
        index = %index_path.display(),
        chromosomes = index.len(),
        positions = index.num_positions(),
        "indexing complete"
    );

    Ok(())
}

fn query(
    source: PathBuf,
    region: Vec<String>,
    index: Option<PathBuf>,
    strict: bool,
) -> Result<()> {
    let region = Region::try_from_args(&region)?;
    let index_path = index.unwrap_or_else(|| indexed::default_index_path(&source));

    let policy = match strict {
        true => RecoveryPolicy::Strict,
        false => RecoveryPolicy::Empty,
    };

    let reader = IndexedReader::open_or_build_with(&source, &index_path, policy)
        .with_context(|| format!("opening index `{}`", index_path.display()))?;

    let entries = reader
        .query(&region.chromosome, region.start, region.end)
        .with_context(|| format!("querying `{}`", source.display()))?;

    let mut stdout = std::io::stdout().lock();

    for entry in &entries {
        writeln!(stdout, "{entry}")?;
    }

    info!(matches = entries.len(), "query complete");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .with_writer(std::io::stderr)
            .init(),
    };

    match args.command {
        Command::Index { source, index: path } => index(source, path),
        Command::Query {
            source,
            region,
            index: path,
            strict,
        } => query(source, region, path, strict),
    }
}
