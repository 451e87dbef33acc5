use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use voice_authenticity::error::ErrorCode;
use voice_authenticity::http::{run_http_server, AppState};
use voice_authenticity::{AppConfig, DetectionError, DetectionPipeline};

#[derive(Parser, Debug)]
#[command(
    name = "voice_auth",
    version,
    about = "Classify speech clips as AI-generated or human-authentic"
)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted or unreadable)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP detection API
    Serve {
        /// Bind address, overrides configuration and VOICE_AUTH_ADDR
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// Classify one clip and print the detection report as JSON
    Classify {
        /// Audio file on disk (any container the decoder understands)
        #[arg(long, conflicts_with = "base64", required_unless_present = "base64")]
        file: Option<PathBuf>,
        /// Base64 transport string, repaired the same way the API does
        #[arg(long)]
        base64: Option<String>,
        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },
    /// Print the effective configuration
    Config,
}

/// Error payload printed when a clip cannot be classified
#[derive(Debug, Serialize)]
struct ErrorReport {
    status: &'static str,
    code: i32,
    message: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .map(AppConfig::load_from_file)
        .unwrap_or_default()
        .with_env_overrides();

    match cli.command {
        Commands::Serve { addr } => run_serve(config, addr),
        Commands::Classify {
            file,
            base64,
            pretty,
        } => run_classify(config, file, base64, pretty),
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::from(0))
        }
    }
}

fn run_serve(config: AppConfig, addr_override: Option<SocketAddr>) -> Result<ExitCode> {
    let addr = match addr_override {
        Some(addr) => addr,
        None => config
            .server
            .bind_addr
            .parse()
            .with_context(|| format!("parsing bind address {}", config.server.bind_addr))?,
    };

    let pipeline =
        DetectionPipeline::new(config.detector.clone()).context("building detection pipeline")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    info!(
        "Serving languages: {} (analysis at {} Hz)",
        config.server.supported_languages.join(", "),
        pipeline.config().sample_rate
    );
    let state = AppState::new(pipeline, &config.server);
    runtime.block_on(run_http_server(state, addr))?;
    Ok(ExitCode::from(0))
}

fn run_classify(
    config: AppConfig,
    file: Option<PathBuf>,
    base64: Option<String>,
    pretty: bool,
) -> Result<ExitCode> {
    let pipeline =
        DetectionPipeline::new(config.detector).context("building detection pipeline")?;

    let outcome = match (file, base64) {
        (Some(path), _) => {
            let blob = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            pipeline.analyze_bytes(&blob)
        }
        (None, Some(transport)) => pipeline.analyze(&transport),
        (None, None) => anyhow::bail!("either --file or --base64 is required"),
    };

    match outcome {
        Ok(report) => {
            emit_json(&report, pretty)?;
            Ok(ExitCode::from(0))
        }
        Err(err) => {
            emit_error(&err, pretty)?;
            Ok(ExitCode::from(2))
        }
    }
}

fn emit_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

fn emit_error(err: &DetectionError, pretty: bool) -> Result<()> {
    emit_json(
        &ErrorReport {
            status: "error",
            code: err.code(),
            message: err.message(),
        },
        pretty,
    )
}
