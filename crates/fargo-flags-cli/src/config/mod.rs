// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the flags CLI.
//!
//! Precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables (`FARGO_FLAGS_*`)
//! 3. `fargo-flags.toml` in the project root
//! 4. Built-in defaults

pub mod layer;
pub mod sections;
pub mod sources;

pub use layer::FlagsConfigLayer;
pub use sections::{LogFormat, LoggingConfig, PathsConfig};
pub use sources::{
	CliOverrides, CliSource, ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource,
	CONFIG_FILE_NAME,
};

use tracing::debug;

use crate::error::ConfigError;

/// Fully resolved CLI configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlagsConfig {
	pub paths: PathsConfig,
	pub logging: LoggingConfig,
}

/// Loads configuration from every source, reading the process environment.
pub fn load_config(overrides: CliOverrides) -> Result<FlagsConfig, ConfigError> {
	load_config_with_env(overrides, EnvSource::process())
}

/// Loads configuration with an explicit environment source.
///
/// The project root used to locate `fargo-flags.toml` is the CLI root
/// override, or the working directory.
pub fn load_config_with_env(
	overrides: CliOverrides,
	env: EnvSource,
) -> Result<FlagsConfig, ConfigError> {
	let root = match &overrides.root {
		Some(root) => root.clone(),
		None => std::env::current_dir().map_err(ConfigError::WorkingDir)?,
	};
	let file = match &overrides.config_file {
		Some(path) => TomlSource::new(path.clone()),
		None => TomlSource::project(root.clone()),
	};

	let mut sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource::new(root)),
		Box::new(file),
		Box::new(env),
		Box::new(CliSource::new(overrides)),
	];
	sources.sort_by_key(|s| s.precedence());

	let mut merged = FlagsConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	Ok(finalize(merged))
}

fn finalize(layer: FlagsConfigLayer) -> FlagsConfig {
	FlagsConfig {
		paths: layer.paths.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	fn no_env() -> EnvSource {
		EnvSource::with_lookup(|_| None)
	}

	#[test]
	fn test_defaults_without_file() {
		let dir = tempfile::tempdir().unwrap();
		let config = load_config_with_env(
			CliOverrides {
				root: Some(dir.path().to_path_buf()),
				..Default::default()
			},
			no_env(),
		)
		.unwrap();

		assert_eq!(config.paths.root, dir.path());
		assert_eq!(config.paths.defs_dir, dir.path().join("src/flags"));
		assert_eq!(config.paths.registry_file, dir.path().join("src/flags/mod.rs"));
		assert_eq!(config.logging, LoggingConfig::default());
	}

	#[test]
	fn test_precedence_file_env_cli() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(
			dir.path().join(CONFIG_FILE_NAME),
			r#"
[paths]
defs_dir = "from-file"
registry_file = "from-file/mod.rs"

[logging]
level = "info"
format = "compact"
"#,
		)
		.unwrap();

		let env = EnvSource::with_lookup(|name| match name {
			"FARGO_FLAGS_DEFS_DIR" => Some("from-env".to_string()),
			"FARGO_FLAGS_LOG_LEVEL" => Some("debug".to_string()),
			_ => None,
		});
		let config = load_config_with_env(
			CliOverrides {
				root: Some(dir.path().to_path_buf()),
				log_level: Some("trace".to_string()),
				..Default::default()
			},
			env,
		)
		.unwrap();

		assert_eq!(config.paths.defs_dir, dir.path().join("from-env"));
		assert_eq!(config.paths.registry_file, dir.path().join("from-file/mod.rs"));
		assert_eq!(config.logging.level, "trace");
		assert_eq!(config.logging.format, LogFormat::Compact);
	}

	#[test]
	fn test_explicit_config_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("custom.toml");
		std::fs::write(&path, "[paths]\nregistry_file = \"lib/flags.rs\"\n").unwrap();

		let config = load_config_with_env(
			CliOverrides {
				root: Some(PathBuf::from("/project")),
				config_file: Some(path),
				..Default::default()
			},
			no_env(),
		)
		.unwrap();
		assert_eq!(config.paths.registry_file, PathBuf::from("/project/lib/flags.rs"));
	}
}
