use ledgerline::{consolidate_fills, Framing, Ledger, LedgerConfig, TableWriter, Transaction};

use anyhow::{Context, Result};
use clap::Parser;
use std::io::stdout;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::info;

/// Extract transaction records from monthly brokerage ledger exports and
/// print them as a CSV table.
#[derive(Debug, Parser)]
#[command(name = "ledgerline", version)]
struct Args {
    /// Directory of monthly ledgers, named so that sorting gives date order (e.g. 202101.txt)
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Extension of the ledger files to read
    #[arg(long, default_value = "txt")]
    extension: String,

    /// Border characters to strip from the start of each line
    #[arg(long, default_value_t = 1)]
    lead: usize,

    /// Border characters to strip from the end of each line
    #[arg(long, default_value_t = 2)]
    trail: usize,

    /// Merge partial fills of one order into a single trade row
    #[arg(short, long)]
    consolidate: bool,

    /// Log state transitions and file handling to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = LedgerConfig::new(&args.dir)
        .with_extension(args.extension)
        .with_framing(Framing::new(args.lead, args.trail));

    process_ledgers(config, args.consolidate).await
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ledgerline={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

async fn process_ledgers(config: LedgerConfig, consolidate: bool) -> Result<()> {
    info!("Reading ledgers from: {}", config.dir().display());
    let dir = config.dir().to_path_buf();

    // Records flow from the blocking parser to the table writer
    let (tx_channel, mut rx) = mpsc::channel::<Transaction>(100);

    let parser = tokio::task::spawn_blocking(move || -> ledgerline::Result<usize> {
        let mut sent = 0;
        for record in Ledger::open(&config)? {
            if tx_channel.blocking_send(record?).is_err() {
                break;
            }
            sent += 1;
        }
        Ok(sent)
    });

    let writer = tokio::spawn(async move {
        let mut table = TableWriter::new(stdout())?;
        let mut pending = Vec::new();

        while let Some(record) = rx.recv().await {
            if consolidate {
                pending.push(record);
            } else {
                table.write(&record)?;
            }
        }

        for record in &consolidate_fills(pending) {
            table.write(record)?;
        }

        let written = table.finish()?;
        Ok::<usize, anyhow::Error>(written)
    });

    let parsed = parser
        .await
        .context("Parser task failed")?
        .with_context(|| format!("Failed to parse ledgers in {}", dir.display()))?;
    let written = writer.await.context("Writer task failed")??;

    if consolidate {
        info!("Parsed {} records, {} after merging fills", parsed, written);
    } else {
        info!("Parsed {} records, wrote {}", parsed, written);
    }

    Ok(())
}
