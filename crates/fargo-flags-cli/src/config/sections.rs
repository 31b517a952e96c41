// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections: project paths and logging.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_DEFS_DIR: &str = "src/flags";
pub const DEFAULT_REGISTRY_FILE: &str = "src/flags/mod.rs";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathsConfigLayer {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub root: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub defs_dir: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub registry_file: Option<PathBuf>,
}

impl PathsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.root.is_some() {
			self.root = other.root;
		}
		if other.defs_dir.is_some() {
			self.defs_dir = other.defs_dir;
		}
		if other.registry_file.is_some() {
			self.registry_file = other.registry_file;
		}
	}

	/// Relative directories are anchored at the project root.
	pub fn finalize(self) -> PathsConfig {
		let root = self.root.unwrap_or_else(|| PathBuf::from("."));
		let defs_dir = anchor(
			&root,
			self.defs_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DEFS_DIR)),
		);
		let registry_file = anchor(
			&root,
			self.registry_file
				.unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRY_FILE)),
		);
		PathsConfig {
			root,
			defs_dir,
			registry_file,
		}
	}
}

fn anchor(root: &Path, path: PathBuf) -> PathBuf {
	if path.is_absolute() {
		path
	} else {
		root.join(path)
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
	pub root: PathBuf,
	pub defs_dir: PathBuf,
	pub registry_file: PathBuf,
}

impl Default for PathsConfig {
	fn default() -> Self {
		PathsConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Compact,
	Json,
}

impl FromStr for LogFormat {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"pretty" => Ok(Self::Pretty),
			"compact" => Ok(Self::Compact),
			"json" => Ok(Self::Json),
			other => Err(ConfigError::invalid_value(
				"logging.format",
				format!("unknown format '{other}', expected pretty, compact or json"),
			)),
		}
	}
}

impl fmt::Display for LogFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Pretty => "pretty",
			Self::Compact => "compact",
			Self::Json => "json",
		})
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfigLayer {
	pub level: Option<String>,
	pub format: Option<LogFormat>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
			format: self.format.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
	/// An `EnvFilter` directive such as `debug` or `fargo_flags_cli=trace`.
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		LoggingConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_paths_defaults_anchor_at_root() {
		let config = PathsConfigLayer {
			root: Some(PathBuf::from("/work/app")),
			..Default::default()
		}
		.finalize();
		assert_eq!(config.defs_dir, PathBuf::from("/work/app/src/flags"));
		assert_eq!(config.registry_file, PathBuf::from("/work/app/src/flags/mod.rs"));
	}

	#[test]
	fn test_absolute_paths_are_kept() {
		let config = PathsConfigLayer {
			root: Some(PathBuf::from("/work/app")),
			defs_dir: Some(PathBuf::from("/elsewhere/defs")),
			registry_file: Some(PathBuf::from("lib/flags.rs")),
		}
		.finalize();
		assert_eq!(config.defs_dir, PathBuf::from("/elsewhere/defs"));
		assert_eq!(config.registry_file, PathBuf::from("/work/app/lib/flags.rs"));
	}

	#[test]
	fn test_paths_merge_overwrites() {
		let mut base = PathsConfigLayer {
			defs_dir: Some(PathBuf::from("a")),
			registry_file: Some(PathBuf::from("a/mod.rs")),
			..Default::default()
		};
		base.merge(PathsConfigLayer {
			defs_dir: Some(PathBuf::from("b")),
			..Default::default()
		});
		assert_eq!(base.defs_dir, Some(PathBuf::from("b")));
		assert_eq!(base.registry_file, Some(PathBuf::from("a/mod.rs")));
	}

	#[test]
	fn test_logging_defaults() {
		let config = LoggingConfig::default();
		assert_eq!(config.level, "warn");
		assert_eq!(config.format, LogFormat::Pretty);
	}

	#[test]
	fn test_log_format_parse() {
		assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
		assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
		assert!("xml".parse::<LogFormat>().is_err());
	}

	#[test]
	fn test_deserialize_logging_layer() {
		let layer: LoggingConfigLayer = toml::from_str("level = \"debug\"\nformat = \"json\"").unwrap();
		assert_eq!(layer.level.as_deref(), Some("debug"));
		assert_eq!(layer.format, Some(LogFormat::Json));
	}
}
