// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Static flag definitions.
//!
//! A [`FlagDefinition`] is declared once at startup and never mutated. It
//! carries the flag's key, value schema, default, optional decision function
//! and the policy deciding whether its value may leave the server.
//!
//! ```
//! use fargo_flags_core::{FlagDefinition, FlagSchema};
//! use serde_json::json;
//!
//! let theme = FlagDefinition::new(
//! 	"theme-mode",
//! 	FlagSchema::enumeration(["light", "dark", "auto"]),
//! 	json!("light"),
//! )
//! .with_description("Application theme mode")
//! .with_option(json!("light"), Some("Light Mode"))
//! .public();
//!
//! assert!(theme.is_public());
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::FlagContext;
use crate::error::BoxError;
use crate::schema::FlagSchema;

/// Outcome of a decision function. `Ok(None)` means "no opinion": the flag
/// falls back to its default value.
pub type DecideResult = Result<Option<Value>, BoxError>;

type DecideFn = Arc<dyn Fn(FlagContext) -> BoxFuture<'static, DecideResult> + Send + Sync>;

/// Transform applied to a public flag's value before it reaches clients.
pub type Serializer = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Whether a flag's resolved value may be handed to untrusted consumers.
#[derive(Clone, Default)]
pub enum ClientExposure {
	/// Never leaves the server.
	#[default]
	ServerOnly,
	/// Exposed to clients, optionally transformed first.
	Public { serialize: Option<Serializer> },
}

impl ClientExposure {
	pub fn is_public(&self) -> bool {
		matches!(self, ClientExposure::Public { .. })
	}
}

impl fmt::Debug for ClientExposure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ClientExposure::ServerOnly => f.write_str("ServerOnly"),
			ClientExposure::Public { serialize } => f
				.debug_struct("Public")
				.field("serialize", &serialize.is_some())
				.finish(),
		}
	}
}

/// An allowed value with a human-readable label. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagOption {
	pub value: Value,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

/// Declaration of one feature flag.
#[derive(Clone)]
pub struct FlagDefinition {
	pub key: String,
	pub schema: FlagSchema,
	pub default_value: Value,
	pub description: Option<String>,
	pub options: Vec<FlagOption>,
	pub client: ClientExposure,
	decide: Option<DecideFn>,
}

impl FlagDefinition {
	/// Starts a server-only definition without a decision function.
	///
	/// The default is not checked against the schema here; a malformed default
	/// surfaces as a validation error the first time the flag is resolved.
	pub fn new(key: impl Into<String>, schema: FlagSchema, default_value: Value) -> Self {
		let key = key.into();
		tracing::trace!(flag_key = %key, schema = %schema, "defining flag");
		Self {
			key,
			schema,
			default_value,
			description: None,
			options: Vec::new(),
			client: ClientExposure::ServerOnly,
			decide: None,
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn with_option(mut self, value: Value, label: Option<&str>) -> Self {
		self.options.push(FlagOption {
			value,
			label: label.map(str::to_string),
		});
		self
	}

	/// Exposes the raw resolved value to clients.
	pub fn public(mut self) -> Self {
		self.client = ClientExposure::Public { serialize: None };
		self
	}

	/// Exposes the value to clients after passing it through `serialize`.
	pub fn public_with<F>(mut self, serialize: F) -> Self
	where
		F: Fn(&Value) -> Value + Send + Sync + 'static,
	{
		self.client = ClientExposure::Public {
			serialize: Some(Arc::new(serialize)),
		};
		self
	}

	pub fn server_only(mut self) -> Self {
		self.client = ClientExposure::ServerOnly;
		self
	}

	/// Attaches a decision function computing the value from request context.
	pub fn with_decide<F, Fut>(mut self, decide: F) -> Self
	where
		F: Fn(FlagContext) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = DecideResult> + Send + 'static,
	{
		self.decide = Some(Arc::new(move |ctx| decide(ctx).boxed()));
		self
	}

	pub fn has_decide(&self) -> bool {
		self.decide.is_some()
	}

	pub fn is_public(&self) -> bool {
		self.client.is_public()
	}

	/// Runs the decision function, if any, and falls back to the default for
	/// an absent function or a "no opinion" answer. The result is not yet
	/// validated against the schema.
	pub async fn decide_raw(&self, ctx: FlagContext) -> Result<Value, BoxError> {
		let decided = match &self.decide {
			Some(decide) => decide(ctx).await?,
			None => None,
		};
		Ok(decided.unwrap_or_else(|| self.default_value.clone()))
	}

	/// Applies the client serializer to a resolved value. Returns `None` for
	/// server-only flags.
	pub fn client_value(&self, value: &Value) -> Option<Value> {
		match &self.client {
			ClientExposure::ServerOnly => None,
			ClientExposure::Public { serialize: None } => Some(value.clone()),
			ClientExposure::Public {
				serialize: Some(serialize),
			} => Some(serialize(value)),
		}
	}

	/// Validates the key format produced by the scaffolding tool: lowercase
	/// alphanumerics and dashes, starting with a letter or digit.
	pub fn validate_key(key: &str) -> bool {
		let mut chars = key.chars();
		match chars.next() {
			Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
			_ => return false,
		}
		chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
	}

	/// Rust module name for a flag key: `theme-mode` becomes `theme_mode`.
	pub fn module_name(key: &str) -> String {
		let mut out = String::with_capacity(key.len());
		for c in key.chars() {
			if c.is_ascii_alphanumeric() {
				out.push(c.to_ascii_lowercase());
			} else if !out.ends_with('_') {
				out.push('_');
			}
		}
		out.trim_matches('_').to_string()
	}
}

impl fmt::Debug for FlagDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FlagDefinition")
			.field("key", &self.key)
			.field("schema", &self.schema)
			.field("default_value", &self.default_value)
			.field("description", &self.description)
			.field("options", &self.options)
			.field("client", &self.client)
			.field("decide", &self.decide.is_some())
			.finish()
	}
}
