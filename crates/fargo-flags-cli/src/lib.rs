// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Developer tooling for fargo-flags registries.
//!
//! Flags live as one module per flag next to a registry module whose
//! module declarations, registrations and public keys sit between
//! `// @fargo-flags:<region>` markers. The commands here scaffold new flags
//! into that layout and check that the registry agrees with the definition
//! files on disk.

pub mod commands;
pub mod config;
pub mod error;
pub mod registry_file;
pub mod scan;
pub mod templates;

pub use commands::{check::CheckArgs, init::InitArgs, list::ListArgs, new::NewArgs};
pub use config::{load_config, CliOverrides, FlagsConfig, LogFormat};
pub use error::{CliError, ConfigError};

#[derive(Debug, clap::Subcommand)]
pub enum FlagsCommands {
	/// Create the flags directory and an empty registry module
	Init(InitArgs),
	/// Scaffold a flag definition and register it
	New(NewArgs),
	/// Verify the registry agrees with the definition files
	Check(CheckArgs),
	/// List defined flags
	List(ListArgs),
}

pub async fn run(cmd: &FlagsCommands, config: &FlagsConfig) -> anyhow::Result<()> {
	match cmd {
		FlagsCommands::Init(args) => commands::init::run(args.clone(), config).await,
		FlagsCommands::New(args) => commands::new::run(args.clone(), config).await,
		FlagsCommands::Check(args) => commands::check::run(args.clone(), config).await,
		FlagsCommands::List(args) => commands::list::run(args.clone(), config).await,
	}
}
