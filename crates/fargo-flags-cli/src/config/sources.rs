// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, `fargo-flags.toml`, environment and CLI.

use std::path::PathBuf;

use tracing::{debug, trace};

use super::layer::FlagsConfigLayer;
use super::sections::{LogFormat, LoggingConfigLayer, PathsConfigLayer};
use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "fargo-flags.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
	Cli = 60,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<FlagsConfigLayer, ConfigError>;
}

/// Built-in defaults, anchored at the directory the CLI was started for.
pub struct DefaultsSource {
	root: PathBuf,
}

impl DefaultsSource {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}
}

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<FlagsConfigLayer, ConfigError> {
		debug!(root = %self.root.display(), "loading defaults");
		Ok(FlagsConfigLayer {
			paths: Some(PathsConfigLayer {
				root: Some(self.root.clone()),
				..Default::default()
			}),
			logging: None,
		})
	}
}

/// Project config file. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn project(root: impl Into<PathBuf>) -> Self {
		Self::new(root.into().join(CONFIG_FILE_NAME))
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<FlagsConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(FlagsConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: FlagsConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Environment variable source.
///
/// Convention: FARGO_FLAGS_<FIELD>
pub struct EnvSource {
	lookup: EnvLookup,
}

impl EnvSource {
	/// Reads the process environment.
	pub fn process() -> Self {
		Self::with_lookup(|name| std::env::var(name).ok())
	}

	pub fn with_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String> + Send + Sync + 'static,
	{
		Self {
			lookup: Box::new(lookup),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		(self.lookup)(name).filter(|s| !s.is_empty())
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<FlagsConfigLayer, ConfigError> {
		debug!("loading environment variables");
		let format = match self.var("FARGO_FLAGS_LOG_FORMAT") {
			Some(v) => Some(v.parse::<LogFormat>().map_err(|_| {
				ConfigError::invalid_value(
					"FARGO_FLAGS_LOG_FORMAT",
					format!("unknown format '{v}'"),
				)
			})?),
			None => None,
		};

		Ok(FlagsConfigLayer {
			paths: Some(PathsConfigLayer {
				root: self.var("FARGO_FLAGS_ROOT").map(PathBuf::from),
				defs_dir: self.var("FARGO_FLAGS_DEFS_DIR").map(PathBuf::from),
				registry_file: self.var("FARGO_FLAGS_REGISTRY_FILE").map(PathBuf::from),
			}),
			logging: Some(LoggingConfigLayer {
				level: self.var("FARGO_FLAGS_LOG_LEVEL"),
				format,
			}),
		})
	}
}

/// Overrides taken from command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub config_file: Option<PathBuf>,
	pub root: Option<PathBuf>,
	pub defs_dir: Option<PathBuf>,
	pub registry_file: Option<PathBuf>,
	pub log_level: Option<String>,
	pub log_format: Option<LogFormat>,
}

pub struct CliSource {
	overrides: CliOverrides,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<FlagsConfigLayer, ConfigError> {
		debug!("loading CLI overrides");
		let o = &self.overrides;
		Ok(FlagsConfigLayer {
			paths: Some(PathsConfigLayer {
				root: o.root.clone(),
				defs_dir: o.defs_dir.clone(),
				registry_file: o.registry_file.clone(),
			}),
			logging: Some(LoggingConfigLayer {
				level: o.log_level.clone(),
				format: o.log_format,
			}),
		})
	}
}
