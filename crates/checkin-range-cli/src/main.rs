use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use checkin_range::{
    CheckInQuery, CheckInRecord, Config, DashboardStats, FormattedTimestamp, NamedRange,
    Pagination, Sort, Zone,
};

#[derive(Parser)]
#[command(
    name = "checkin-range",
    about = "Resolve check-in date range filters into listing query parameters",
    version
)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// IANA timezone (or "local") the wire timestamps are expressed in
    #[arg(long, global = true, env = "CHECKIN_TZ")]
    tz: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the startDate/endDate pair for a range
    Resolve {
        /// today, last7days, last30days or all (defaults to the configured range)
        range: Option<NamedRange>,

        /// Reference time as YYYY-MM-DDTHH:mm:ss in the selected zone
        #[arg(long)]
        now: Option<FormattedTimestamp>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the full records listing query string
    Query {
        range: Option<NamedRange>,

        #[arg(long)]
        now: Option<FormattedTimestamp>,

        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Page size (defaults to the configured size)
        #[arg(long)]
        size: Option<usize>,

        /// Sort as FIELD or FIELD,asc|desc
        #[arg(long)]
        sort: Option<Sort>,

        #[arg(long)]
        guard: Option<i64>,

        #[arg(long)]
        site: Option<i64>,
    },
    /// Report whether a record timestamp falls inside a range
    Check {
        range: NamedRange,

        /// Record timestamp as YYYY-MM-DDTHH:mm:ss
        timestamp: FormattedTimestamp,

        #[arg(long)]
        now: Option<FormattedTimestamp>,
    },
    /// Compute dashboard statistics from a JSON array of check-in records
    Stats {
        /// Records file (reads stdin if omitted or "-")
        input: Option<PathBuf>,

        #[arg(long)]
        range: Option<NamedRange>,

        #[arg(long)]
        now: Option<FormattedTimestamp>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// {"startDate": ..., "endDate": ...}
    Json,
    /// startDate=...&endDate=...
    Query,
    /// RFC 3339 bounds carrying the zone's UTC offset
    Offset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    config.logging.init();

    let zone = match &cli.tz {
        Some(name) => Zone::parse(name)?,
        None => config.zone()?,
    };
    tracing::debug!(%zone, "using timezone");

    match cli.command {
        Commands::Resolve { range, now, format } => {
            let range = range.unwrap_or(config.default_range);
            let query = zone.resolve_at(range, now)?;
            let output = match format {
                OutputFormat::Json => serde_json::to_string(&query)?,
                OutputFormat::Offset => serde_json::to_string(&zone.with_offset(&query))?,
                OutputFormat::Query => query.to_query_string(&config.params),
            };
            println!("{output}");
        }
        Commands::Query {
            range,
            now,
            page,
            size,
            sort,
            guard,
            site,
        } => {
            let range = range.unwrap_or(config.default_range);
            let mut pagination = Pagination::new(size.unwrap_or(config.page_size));
            pagination.set_page(page);
            pagination.sort = sort;

            let mut query = CheckInQuery::new(zone.resolve_at(range, now)?, pagination);
            query.guard_id = guard;
            query.site_id = site;
            println!("{}", query.to_query_string(&config.params));
        }
        Commands::Check {
            range,
            timestamp,
            now,
        } => {
            // A wall-clock reading inside a DST gap was never a real check-in time.
            let instant = zone.instant(&timestamp)?;
            tracing::debug!(%timestamp, %instant, "checking record");

            let query = zone.resolve_at(range, now)?;
            if query.admits(&timestamp) {
                println!("included");
            } else {
                println!("excluded");
            }
        }
        Commands::Stats { input, range, now } => {
            let records = read_records(input)?;
            let range = range.unwrap_or(config.default_range);
            let query = zone.resolve_at(range, now)?;
            let stats = DashboardStats::from_records(&records, &query);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

fn read_records(input: Option<PathBuf>) -> Result<Vec<CheckInRecord>> {
    let content = match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Failed to parse check-in records")
}
