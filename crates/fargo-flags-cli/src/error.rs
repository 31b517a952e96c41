// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the flags CLI.

use std::path::PathBuf;

/// Errors that can occur while loading CLI configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("could not determine working directory: {0}")]
	WorkingDir(#[source] std::io::Error),
}

impl ConfigError {
	pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			key: key.into(),
			message: message.into(),
		}
	}
}

/// Errors raised by the scaffolding and checking commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
	#[error("I/O error on {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid flag key '{0}': use lowercase kebab-case starting with a letter, e.g. theme-mode")]
	InvalidKey(String),

	#[error("flag key '{key}' would need a module named `{module}`, which is a Rust keyword")]
	ReservedModule { key: String, module: String },

	#[error("{path} already defines flag '{existing}', not '{key}'")]
	ModuleTaken {
		path: PathBuf,
		key: String,
		existing: String,
	},

	#[error("invalid flag definition: {0}")]
	InvalidDefinition(String),

	#[error("registry file {path} has no `{marker}` marker")]
	MissingAnchor { path: PathBuf, marker: String },

	#[error("registry file {0} already exists")]
	RegistryExists(PathBuf),

	#[error("registry check found {0} issue(s)")]
	CheckFailed(usize),
}

impl CliError {
	pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}
}
