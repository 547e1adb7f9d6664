// # adsync - Ad Rollout CLI
//
// Thin integration layer over adsync-core. This binary only:
// 1. Parses arguments
// 2. Initializes tracing
// 3. Wires the Google Ads provider and the file record store into the core
// 4. Prints one single-line JSON result object and maps it to an exit code
//
// All rollout and monitoring logic lives in adsync-core; adding behavior
// here is a layering mistake.
//
// ## Commands
//
// ```bash
// adsync create \
//   --customer-id 1234567890 --campaign-id 111 \
//   --ad-group-name "Spring launch" \
//   --final-url https://shop.example.com/landing \
//   --headline "Fast shipping" --headline "Great prices" --headline "Shop today" \
//   --description "Everything in stock" --description "Free returns"
//
// adsync monitor \
//   --customer-id 1234567890 \
//   --new-url https://shop.example.com/sale
// ```
//
// Logging level comes from `ADSYNC_LOG_LEVEL` (trace/debug/info/warn/error,
// default info). Structured results go to stdout; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

use adsync_core::{
    ApprovalMonitor, CreationRequest, Error, FileRecordStore, MonitorConfig, MonitorReport,
    RecordStore, ResourceCreator,
};
use adsync_provider_googleads::GoogleAdsProvider;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Success
/// - 1: Configuration or validation error (nothing was changed remotely)
/// - 2: Runtime error (a remote operation failed)
/// - 3: Monitor timeout (bounded wait expired; progress preserved)
#[derive(Debug, Clone, Copy)]
enum AdsyncExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
    MonitorTimeout = 3,
}

impl From<AdsyncExitCode> for ExitCode {
    fn from(code: AdsyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Create, monitor, and retarget responsive search ads
#[derive(Parser)]
#[command(name = "adsync", version, about = "Ad rollout and approval monitoring tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an ad group and a responsive search ad, then link them (paused)
    Create {
        /// Account identifier (no dashes)
        #[arg(long)]
        customer_id: String,

        /// Campaign to attach the new ad group to
        #[arg(long)]
        campaign_id: String,

        /// Name for the new ad group
        #[arg(long)]
        ad_group_name: String,

        /// Initial Final URL for the ad (must be policy-compliant)
        #[arg(long)]
        final_url: String,

        /// Headline text; repeat the flag at least 3 times
        #[arg(long = "headline")]
        headlines: Vec<String>,

        /// Description text; repeat the flag at least 2 times
        #[arg(long = "description")]
        descriptions: Vec<String>,

        /// Path to the Google Ads credentials file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Record file the created resources are appended to
        #[arg(long, default_value = "data/created_ads.json")]
        output: PathBuf,
    },

    /// Poll tracked ads until approved, then swap their Final URL (same domain only)
    Monitor {
        /// Account identifier (no dashes)
        #[arg(long)]
        customer_id: String,

        /// Replacement Final URL for approved ads
        #[arg(long)]
        new_url: String,

        /// Record file produced by the create command
        #[arg(long, default_value = "data/created_ads.json")]
        records: PathBuf,

        /// Path to the Google Ads credentials file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Sleep between poll cycles, in seconds
        #[arg(long, default_value_t = 30)]
        poll_interval_secs: u64,

        /// Overall wall-clock budget, in seconds
        #[arg(long, default_value_t = 1800)]
        timeout_secs: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("Failed to set tracing subscriber: {e}");
        return AdsyncExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return AdsyncExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match cli.command {
            Commands::Create {
                customer_id,
                campaign_id,
                ad_group_name,
                final_url,
                headlines,
                descriptions,
                config,
                output,
            } => {
                run_create(
                    CreationRequest {
                        customer_id,
                        campaign_id,
                        ad_group_name,
                        final_url,
                        headlines,
                        descriptions,
                    },
                    config,
                    output,
                )
                .await
            }
            Commands::Monitor {
                customer_id,
                new_url,
                records,
                config,
                poll_interval_secs,
                timeout_secs,
            } => {
                run_monitor(
                    customer_id,
                    new_url,
                    records,
                    config,
                    Duration::from_secs(poll_interval_secs),
                    Duration::from_secs(timeout_secs),
                )
                .await
            }
        }
    });

    code.into()
}

fn init_tracing() -> anyhow::Result<()> {
    let level = match std::env::var("ADSYNC_LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Print one structured error object and pick the exit code for `err`
fn report_error(err: &Error) -> AdsyncExitCode {
    println!(
        "{}",
        serde_json::json!({ "ok": false, "error": err.to_string() })
    );
    match err {
        Error::Validation(_) | Error::Config(_) | Error::InvalidInput(_) => {
            AdsyncExitCode::ConfigError
        }
        _ => AdsyncExitCode::RuntimeError,
    }
}

async fn run_create(
    request: CreationRequest,
    config: Option<PathBuf>,
    output: PathBuf,
) -> AdsyncExitCode {
    let provider = match GoogleAdsProvider::from_config_file(config.as_deref()) {
        Ok(provider) => provider,
        Err(e) => return report_error(&e),
    };

    let creator = ResourceCreator::new(Box::new(provider));
    let resources = match creator.create(&request).await {
        Ok(resources) => resources,
        Err(e) => return report_error(&e),
    };

    // Persist before reporting success; losing the record would strand the
    // created resources outside any later monitor run.
    let record = resources.clone().into_record(&request);
    let store = match FileRecordStore::new(&output).await {
        Ok(store) => store,
        Err(e) => return report_error(&e),
    };
    if let Err(e) = store.append(&record).await {
        return report_error(&e);
    }

    println!(
        "{}",
        serde_json::json!({
            "ok": true,
            "ad_group": resources.ad_group,
            "ad": resources.ad,
            "ad_group_ad": resources.ad_group_ad,
        })
    );
    AdsyncExitCode::Success
}

async fn run_monitor(
    customer_id: String,
    new_url: String,
    records: PathBuf,
    config: Option<PathBuf>,
    poll_interval: Duration,
    timeout: Duration,
) -> AdsyncExitCode {
    let provider = match GoogleAdsProvider::from_config_file(config.as_deref()) {
        Ok(provider) => provider,
        Err(e) => return report_error(&e),
    };

    let store = match FileRecordStore::new(&records).await {
        Ok(store) => store,
        Err(e) => return report_error(&e),
    };
    let entries = match store.read_all().await {
        Ok(entries) => entries,
        Err(e) => return report_error(&e),
    };
    let targets: Vec<String> = entries
        .into_iter()
        .map(|entry| entry.ad_group_ad_resource_name)
        .collect();

    let monitor_config = MonitorConfig::new(poll_interval, timeout);
    let (monitor, mut events) = match ApprovalMonitor::new(
        Box::new(provider),
        customer_id,
        new_url,
        targets,
        monitor_config,
    ) {
        Ok(pair) => pair,
        Err(e) => return report_error(&e),
    };

    // The engine logs its own decisions; the event stream is drained at
    // debug level so nothing backs up the channel.
    let events_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!(?event, "monitor event");
        }
    });

    let result = monitor.run().await;
    drop(monitor);
    let _ = events_task.await;

    match result {
        Ok(report) => {
            print_report(&report);
            if report.timed_out {
                AdsyncExitCode::MonitorTimeout
            } else {
                AdsyncExitCode::Success
            }
        }
        Err(e) => report_error(&e),
    }
}

fn print_report(report: &MonitorReport) {
    println!(
        "{}",
        serde_json::json!({
            "ok": !report.timed_out,
            "updated": report.updated(),
            "skipped": report.skipped(),
            "pending": report.pending(),
            "timed_out": report.timed_out,
            "cycles": report.cycles,
        })
    );
}
