// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};

use colored::Colorize;
use tracing::info;

use crate::config::sections::PathsConfigLayer;
use crate::config::{FlagsConfigLayer, PathsConfig, CONFIG_FILE_NAME};
use crate::error::CliError;
use crate::templates::render_registry;
use crate::FlagsConfig;

#[derive(Debug, Clone, clap::Args)]
pub struct InitArgs {
	/// Overwrite an existing registry module
	#[arg(long)]
	pub force: bool,

	/// Also write `fargo-flags.toml` with the resolved paths
	#[arg(long)]
	pub write_config: bool,
}

/// Creates the definitions directory and an empty registry module.
pub async fn init(paths: &PathsConfig, force: bool) -> Result<(), CliError> {
	tokio::fs::create_dir_all(&paths.defs_dir)
		.await
		.map_err(|e| CliError::io(&paths.defs_dir, e))?;

	let exists = tokio::fs::try_exists(&paths.registry_file)
		.await
		.map_err(|e| CliError::io(&paths.registry_file, e))?;
	if exists && !force {
		return Err(CliError::RegistryExists(paths.registry_file.clone()));
	}

	if let Some(parent) = paths.registry_file.parent() {
		tokio::fs::create_dir_all(parent)
			.await
			.map_err(|e| CliError::io(parent, e))?;
	}
	tokio::fs::write(&paths.registry_file, render_registry())
		.await
		.map_err(|e| CliError::io(&paths.registry_file, e))?;

	info!(registry = %paths.registry_file.display(), "registry initialized");
	Ok(())
}

/// Writes the project config file, with paths relative to the root.
/// An existing file is kept.
pub async fn write_config(paths: &PathsConfig) -> Result<Option<PathBuf>, CliError> {
	let path = paths.root.join(CONFIG_FILE_NAME);
	if tokio::fs::try_exists(&path)
		.await
		.map_err(|e| CliError::io(&path, e))?
	{
		return Ok(None);
	}

	let layer = FlagsConfigLayer {
		paths: Some(PathsConfigLayer {
			root: None,
			defs_dir: Some(relative_to(&paths.root, &paths.defs_dir)),
			registry_file: Some(relative_to(&paths.root, &paths.registry_file)),
		}),
		logging: None,
	};
	let content = toml::to_string(&layer)
		.map_err(|e| CliError::InvalidDefinition(format!("cannot render config: {e}")))?;
	tokio::fs::write(&path, content)
		.await
		.map_err(|e| CliError::io(&path, e))?;
	Ok(Some(path))
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
	path.strip_prefix(root)
		.map(Path::to_path_buf)
		.unwrap_or_else(|_| path.to_path_buf())
}

pub async fn run(args: InitArgs, config: &FlagsConfig) -> anyhow::Result<()> {
	init(&config.paths, args.force).await?;
	println!(
		"{} Wrote {}",
		"✓".green(),
		config.paths.registry_file.display().to_string().yellow()
	);

	if args.write_config {
		match write_config(&config.paths).await? {
			Some(path) => println!("{} Wrote {}", "✓".green(), path.display()),
			None => println!("{} {CONFIG_FILE_NAME} already exists", "•".dimmed()),
		}
	}

	println!("  Add `mod flags;` to your crate and run `fargo-flags new --key <key>`");
	Ok(())
}
