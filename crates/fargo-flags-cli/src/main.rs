// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fargo_flags_cli::{load_config, CliOverrides, FlagsCommands, LogFormat};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fargo-flags", version, about, long_about = None)]
struct Args {
	/// Path to a config file (default: <root>/fargo-flags.toml)
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Project root (default: current directory)
	#[arg(short, long)]
	root: Option<PathBuf>,

	/// Directory holding flag definition files
	#[arg(long)]
	defs_dir: Option<PathBuf>,

	/// Registry module with the marker regions
	#[arg(long)]
	registry_file: Option<PathBuf>,

	/// Log level (overrides config)
	#[arg(short, long)]
	log_level: Option<String>,

	/// Output logs as JSON (overrides config)
	#[arg(long)]
	json_logs: bool,

	#[command(subcommand)]
	command: FlagsCommands,
}

impl From<&Args> for CliOverrides {
	fn from(args: &Args) -> Self {
		Self {
			config_file: args.config.clone(),
			root: args.root.clone(),
			defs_dir: args.defs_dir.clone(),
			registry_file: args.registry_file.clone(),
			log_level: args.log_level.clone(),
			log_format: args.json_logs.then_some(LogFormat::Json),
		}
	}
}

fn init_tracing(logging: &fargo_flags_cli::config::LoggingConfig) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let config = load_config(CliOverrides::from(&args)).context("failed to load configuration")?;
	init_tracing(&config.logging);
	debug!(
		root = %config.paths.root.display(),
		defs_dir = %config.paths.defs_dir.display(),
		registry_file = %config.paths.registry_file.display(),
		"configuration loaded"
	);

	fargo_flags_cli::run(&args.command, &config).await
}
