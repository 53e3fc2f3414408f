//! Availability digest CLI
//!
//! `fetch` queries availability for every airport in the airport store and prints
//! one merged document reduced to the allowlisted keys. `clean` applies the same
//! filters to a document already saved on disk.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use availability_digest::{
    project_by_allowlist, remove_by_key_substring, run_detailed, AirportSource,
    AvailabilityService, Config, HttpAvailabilityClient, JsonFileAirportSource,
};

#[derive(Parser, Debug)]
#[command(name = "availability-digest")]
#[command(about = "Fetch hotel availability per airport and reduce it to the keys that matter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Query every airport concurrently and print the filtered digest
    Fetch(FetchArgs),
    /// Filter a saved JSON document
    Clean(CleanArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// JSON file holding the airport documents
    #[arg(long)]
    airports: Option<PathBuf>,

    /// Base URL of the availability service
    #[arg(long)]
    base_url: Option<String>,

    /// Keys to keep (repeatable); replaces the configured allowlist
    #[arg(long = "allow")]
    allow: Vec<String>,

    /// Case-insensitive key substrings to remove after projection (repeatable)
    #[arg(long = "deny")]
    deny: Vec<String>,

    /// Maximum number of requests in flight; unbounded when omitted
    #[arg(long)]
    max_concurrency: Option<usize>,

    #[arg(long)]
    days_ahead: Option<u64>,

    #[arg(long)]
    nights: Option<u64>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// Document to filter
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Keys to keep (repeatable); no projection when omitted
    #[arg(long = "allow")]
    allow: Vec<String>,

    /// Case-insensitive key substrings to remove (repeatable)
    #[arg(long = "deny")]
    deny: Vec<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write the document here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries the document
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Fetch(args) => fetch(args).await,
        Command::Clean(args) => clean(args).await,
    }
}

async fn fetch(args: FetchArgs) -> Result<()> {
    let mut config = Config::from_env().context("Failed to read configuration")?;
    if let Some(airports) = args.airports {
        config.airports_file = airports;
    }
    if let Some(base_url) = args.base_url {
        config.client.base_url = base_url;
    }
    if !args.allow.is_empty() {
        config.allowlist = args.allow;
    }
    if !args.deny.is_empty() {
        config.denylist = args.deny;
    }
    if args.max_concurrency.is_some() {
        config.max_concurrency = args.max_concurrency;
    }
    if let Some(days_ahead) = args.days_ahead {
        config.days_ahead = days_ahead;
    }
    if let Some(nights) = args.nights {
        config.nights = nights;
    }

    let source = JsonFileAirportSource::new(&config.airports_file);
    let airport_codes = source
        .airport_codes()
        .await
        .context("Failed to load airport codes")?;
    if airport_codes.is_empty() {
        warn!("no airport codes found, the digest will be empty");
    }

    let client = HttpAvailabilityClient::new(config.client.clone())
        .context("Failed to create availability client")?;
    let template = config.request_template();
    info!(
        check_in = %template.stay.check_in_str(),
        check_out = %template.stay.check_out_str(),
        airports = airport_codes.len(),
        "requesting availability"
    );

    let digest = run_detailed(
        &airport_codes,
        |code| client.fetch_availability(template.for_airport(code)),
        &config.allowlist_set(),
        &config.pipeline_options(),
    )
    .await;

    if !digest.failures.is_empty() {
        let failed: Vec<&str> = digest
            .failures
            .iter()
            .map(|failure| failure.identifier.as_str())
            .collect();
        warn!(
            count = failed.len(),
            airports = ?failed,
            "some airports are missing from the digest"
        );
    }

    let document = remove_by_key_substring(&digest.document, config.denylist.as_slice());
    write_document(&document, args.output.output)
}

async fn clean(args: CleanArgs) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let document: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {} as JSON", args.input.display()))?;

    let projected = if args.allow.is_empty() {
        document
    } else {
        let allowlist: HashSet<String> = args.allow.into_iter().collect();
        project_by_allowlist(&document, &allowlist)
            .unwrap_or_else(|| Value::Object(Default::default()))
    };
    let cleaned = remove_by_key_substring(&projected, args.deny.as_slice());

    info!(input = %args.input.display(), "cleaned document");
    write_document(&cleaned, args.output.output)
}

fn write_document(document: &Value, output: Option<PathBuf>) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(document).context("Failed to render document")?;
    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "digest written");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
