// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpers for code consuming [`ClientFlags`]: conditional rendering and
//! test overrides.

use fargo_flags_core::{ClientFlags, Result};
use serde_json::Value;
use tracing::warn;

use crate::project::pick_client_flags;
use crate::registry::FlagRegistry;

#[derive(Debug, Clone, PartialEq)]
enum Matcher {
	Truthy,
	Is(Value),
	Not(Value),
}

/// Predicate deciding whether flag-gated content should render.
///
/// With neither [`is`](Self::is) nor [`not`](Self::not) it passes when the
/// value is truthy. `false`, `null`, `0`, `""` and a missing key are falsy.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagCondition {
	key: String,
	matcher: Matcher,
}

impl FlagCondition {
	pub fn when(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			matcher: Matcher::Truthy,
		}
	}

	/// Passes when the value equals `value`.
	pub fn is(mut self, value: impl Into<Value>) -> Self {
		self.matcher = Matcher::Is(value.into());
		self
	}

	/// Passes when the value differs from `value`.
	pub fn not(mut self, value: impl Into<Value>) -> Self {
		self.matcher = Matcher::Not(value.into());
		self
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn evaluate(&self, flags: &ClientFlags) -> bool {
		let value = flags.get(&self.key);
		match &self.matcher {
			Matcher::Is(expected) => value == Some(expected),
			Matcher::Not(expected) => value != Some(expected),
			Matcher::Truthy => value.is_some_and(is_truthy),
		}
	}

	/// Picks `content` or `fallback` depending on [`evaluate`](Self::evaluate).
	pub fn select<T>(&self, flags: &ClientFlags, content: T, fallback: T) -> T {
		if self.evaluate(flags) {
			content
		} else {
			fallback
		}
	}
}

fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
		Value::String(s) => !s.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Client flag set for tests: every public flag at its default value, with
/// selected keys overridden.
#[derive(Debug, Clone)]
pub struct TestFlags {
	base: ClientFlags,
	overrides: Vec<(String, Value)>,
}

impl TestFlags {
	pub fn from_registry(registry: &FlagRegistry) -> Result<Self> {
		Ok(Self {
			base: pick_client_flags(registry, &registry.default_flags())?,
			overrides: Vec::new(),
		})
	}

	/// Overrides a public flag. Keys the registry would never send to a
	/// client are ignored with a warning.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		let key = key.into();
		if self.base.get(&key).is_none() {
			warn!(flag = %key, "ignoring override for a flag that is not client-visible");
			return self;
		}
		self.overrides.push((key, value.into()));
		self
	}

	pub fn build(self) -> ClientFlags {
		self.base.with_overrides(self.overrides)
	}
}
