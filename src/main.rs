//! Load-balancer proxy configuration compiler (CLI).
//!
//! # Architecture Overview
//!
//! ```text
//!   description file ──▶ config::loader ──▶ config::validation
//!   (service + nodes)                              │
//!                                                  ▼
//!                                          routing::build
//!                                                  │  RoutingModel
//!                                                  ▼
//!                                          render::render
//!                                                  │  document text
//!                                                  ▼
//!                                       output::write_atomic ──▶ proxy
//!
//!   watch mode: config::watcher ──▶ debounce ──▶ recompile ──▶ write
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use lb_proxy_config::config::loader::{load_config, load_description};
use lb_proxy_config::config::validation::validate_service;
use lb_proxy_config::lifecycle::{signals, Shutdown};
use lb_proxy_config::observability::{logging, metrics};
use lb_proxy_config::output::writer::write_atomic;
use lb_proxy_config::watch::WatchLoop;
use lb_proxy_config::{Compiler, CompilerConfig};

#[derive(Parser)]
#[command(name = "lb-proxy-config")]
#[command(about = "Compile load-balanced services into proxy configuration", long_about = None)]
struct Cli {
    /// Compiler settings file (TOML).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a description once
    Compile {
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output path, `-` for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Fail on validation errors instead of warning
        #[arg(long)]
        strict: bool,
    },
    /// Validate a description without compiling
    Check {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Recompile whenever the description changes
    Watch {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CompilerConfig::default(),
    };

    logging::init_logging(&config.observability);

    match cli.command {
        Commands::Compile { input, output, strict } => {
            apply_overrides(&mut config, input, output, strict);

            let description = load_description(&config.input.path)?;
            let document = Compiler::new(config.validation.strict).compile(&description)?;
            write_atomic(&config.output.path, &document).map_err(|e| {
                metrics::record_write_failure();
                e
            })?;

            tracing::info!(
                input = %config.input.path.display(),
                output = %config.output.path.display(),
                "Compilation complete"
            );
        }
        Commands::Check { input } => {
            apply_overrides(&mut config, input, None, false);

            let description = load_description(&config.input.path)?;
            if let Some(service) = &description.service {
                if let Err(errors) = validate_service(service) {
                    for error in &errors {
                        eprintln!("error: {}", error);
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
            println!("{}: ok", config.input.path.display());
        }
        Commands::Watch { input, output, strict } => {
            apply_overrides(&mut config, input, output, strict);

            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr),
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let shutdown = Shutdown::new();
            signals::spawn_signal_handler(shutdown.clone());

            tracing::info!(
                input = %config.input.path.display(),
                output = %config.output.path.display(),
                "Watching description"
            );
            WatchLoop::new(&config).run(shutdown).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn apply_overrides(
    config: &mut CompilerConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    strict: bool,
) {
    if let Some(input) = input {
        config.input.path = input;
    }
    if let Some(output) = output {
        config.output.path = output;
    }
    if strict {
        config.validation.strict = true;
    }
}
