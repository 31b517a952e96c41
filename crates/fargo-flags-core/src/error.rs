// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::schema::SchemaViolation;

/// Boxed error returned by decision functions and context accessors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in the feature flags system.
#[derive(Debug, Error)]
pub enum FlagsError {
	#[error("flag not found: {key}")]
	FlagNotFound { key: String },

	#[error("duplicate flag key: {0}")]
	DuplicateFlagKey(String),

	#[error("invalid flag key: {0}")]
	InvalidFlagKey(String),

	#[error("flag {key} has an unusable schema: {reason}")]
	InvalidSchema { key: String, reason: String },

	#[error("registry is inconsistent: {0}")]
	Inconsistent(String),

	#[error("decision for flag {key} failed: {source}")]
	Decision {
		key: String,
		#[source]
		source: BoxError,
	},

	#[error("flag {key} resolved to an invalid value: {violation}")]
	Validation {
		key: String,
		violation: SchemaViolation,
	},

	#[error("public flag {key} is missing from the resolved flag set")]
	MissingResolvedValue { key: String },

	#[error("invalid value type for flag {key}: expected {expected}, got {actual}")]
	InvalidValueType {
		key: String,
		expected: String,
		actual: String,
	},

	#[error("serialization error: {0}")]
	Serialization(String),
}

impl FlagsError {
	pub fn not_found(key: impl Into<String>) -> Self {
		FlagsError::FlagNotFound { key: key.into() }
	}

	/// Returns true for errors caused by how the registry was assembled or
	/// queried, as opposed to failures of a single resolution pass.
	pub fn is_configuration_error(&self) -> bool {
		matches!(
			self,
			FlagsError::FlagNotFound { .. }
				| FlagsError::DuplicateFlagKey(_)
				| FlagsError::InvalidFlagKey(_)
				| FlagsError::InvalidSchema { .. }
				| FlagsError::Inconsistent(_)
				| FlagsError::MissingResolvedValue { .. }
		)
	}

	/// The flag key this error is about, if any.
	pub fn flag_key(&self) -> Option<&str> {
		match self {
			FlagsError::FlagNotFound { key }
			| FlagsError::Decision { key, .. }
			| FlagsError::Validation { key, .. }
			| FlagsError::MissingResolvedValue { key }
			| FlagsError::InvalidSchema { key, .. }
			| FlagsError::InvalidValueType { key, .. } => Some(key),
			FlagsError::DuplicateFlagKey(key) | FlagsError::InvalidFlagKey(key) => Some(key),
			FlagsError::Inconsistent(_) | FlagsError::Serialization(_) => None,
		}
	}
}

impl From<serde_json::Error> for FlagsError {
	fn from(err: serde_json::Error) -> Self {
		FlagsError::Serialization(err.to_string())
	}
}

pub type Result<T> = std::result::Result<T, FlagsError>;
