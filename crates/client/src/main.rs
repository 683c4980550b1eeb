use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidgen_client::display::{record_line, snapshot_line, summary_line};
use vidgen_client::{watch_until_settled, ApiClient, ClientError, WatchOutcome};

/// Submit images for video generation and follow the jobs to completion.
#[derive(Debug, Parser)]
#[command(name = "vidgen")]
#[command(version, about)]
struct Cli {
    /// Base URL of the vidgen server.
    #[arg(long, default_value = "http://localhost:3000", env = "VIDGEN_API_URL")]
    api_url: String,

    /// Delay between two list requests while watching (ms).
    #[arg(long = "interval-ms", default_value = "2000", env = "VIDGEN_INTERVAL_MS")]
    interval_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit one image (public URL or data: URI).
    Submit {
        url: String,
        /// Keep watching until every job has settled.
        #[arg(long)]
        watch: bool,
    },
    /// Print every tracked job, oldest first.
    List,
    /// Print a job's live status from the generation service.
    Get { id: String },
    /// Re-list until every job has settled.
    Watch,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidgen_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let client = ApiClient::new(&cli.api_url)?;
    let interval = Duration::from_millis(cli.interval_ms);

    match cli.command {
        Command::Submit { url, watch: follow } => {
            let record = client.submit(&url).await?;
            println!("{}", record_line(&record));
            if follow {
                watch(&client, interval).await?;
            }
        }
        Command::List => {
            for record in client.list().await? {
                println!("{}", record_line(&record));
            }
        }
        Command::Get { id } => {
            let snapshot = client.get(&id).await?;
            println!("{}", snapshot_line(&snapshot));
        }
        Command::Watch => watch(&client, interval).await?,
    }

    Ok(())
}

/// Print the listing on every refresh until it settles or Ctrl-C is pressed.
async fn watch(client: &ApiClient, interval: Duration) -> Result<(), ClientError> {
    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.cancel();
        }
    });

    tracing::info!(
        api_url = %client.base_url(),
        interval_ms = interval.as_millis() as u64,
        "Watching jobs",
    );

    let outcome = watch_until_settled(client, interval, &cancel, |records| {
        println!();
        for record in records {
            println!("{}", record_line(record));
        }
        println!("{}", summary_line(records));
    })
    .await?;

    match outcome {
        WatchOutcome::Settled(records) => {
            tracing::info!(jobs = records.len(), "All jobs settled");
        }
        WatchOutcome::Cancelled => tracing::info!("Watch interrupted"),
    }
    Ok(())
}
