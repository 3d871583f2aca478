use anyhow::Context;
use app_host::host::{build_application, HostConfig, DEFAULT_DAPR_CLI};
use app_host::launcher::{launch, shutdown_signal};
use app_host::telemetry::TelemetryExport;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use worker_framework::tracing::setup_tracing;

/// Runs the order API and the web frontend, each with its own sidecar.
#[derive(Debug, Parser)]
#[command(name = "app-host", version)]
struct Args {
    /// Print the application model as JSON and exit.
    #[arg(long)]
    manifest: bool,

    /// Sidecar CLI used to launch every project.
    #[arg(long, env = "DAPR_CLI_PATH", default_value = DEFAULT_DAPR_CLI)]
    dapr_cli_path: PathBuf,

    /// Directory with the service binaries. Defaults to this executable's directory.
    #[arg(long)]
    bin_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 5000)]
    api_port: u16,

    #[arg(long, default_value_t = 3500)]
    api_dapr_http_port: u16,

    #[arg(long, default_value_t = 5001)]
    web_port: u16,

    #[arg(long, default_value_t = 3501)]
    web_dapr_http_port: u16,
}

fn default_bin_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("locate app-host executable")?;
    exe.parent()
        .map(PathBuf::from)
        .context("app-host executable has no parent directory")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let bin_dir = match args.bin_dir {
        Some(dir) => dir,
        None => default_bin_dir()?,
    };
    let config = HostConfig {
        dapr_cli_path: args.dapr_cli_path,
        bin_dir,
        api_port: args.api_port,
        api_dapr_http_port: args.api_dapr_http_port,
        web_port: args.web_port,
        web_dapr_http_port: args.web_dapr_http_port,
        telemetry: TelemetryExport::from_env(),
    };
    let model = build_application(&config);

    if args.manifest {
        let json = serde_json::to_string_pretty(&model).context("serialize application model")?;
        println!("{json}");
        return Ok(());
    }

    setup_tracing();
    info!(projects = model.projects.len(), otlp = %config.telemetry.endpoint, "Starting app host");
    launch(&model, shutdown_signal()).await?;
    info!("App host stopped");
    Ok(())
}
