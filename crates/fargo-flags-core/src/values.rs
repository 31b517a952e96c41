// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolved flag value sets.
//!
//! [`Flags`] holds every registered flag's validated value for one resolution
//! pass. [`ClientFlags`] is the subset that may be handed to untrusted
//! consumers. Both are built fresh on each pass and not mutated afterwards.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FlagsError, Result};
use crate::schema::json_type_name;

macro_rules! value_set {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name {
			values: BTreeMap<String, Value>,
		}

		impl $name {
			pub fn get(&self, key: &str) -> Option<&Value> {
				self.values.get(key)
			}

			/// Returns the value for `key`, failing if it is absent.
			pub fn require(&self, key: &str) -> Result<&Value> {
				self.values.get(key).ok_or_else(|| FlagsError::not_found(key))
			}

			pub fn get_bool(&self, key: &str) -> Result<bool> {
				let value = self.require(key)?;
				value
					.as_bool()
					.ok_or_else(|| invalid_type(key, "boolean", value))
			}

			pub fn get_str(&self, key: &str) -> Result<&str> {
				let value = self.require(key)?;
				value
					.as_str()
					.ok_or_else(|| invalid_type(key, "string", value))
			}

			/// Deserializes the value for `key` into a typed representation,
			/// such as an enum mirroring the flag's schema.
			pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
				let value = self.require(key)?;
				serde_json::from_value(value.clone()).map_err(|e| FlagsError::InvalidValueType {
					key: key.to_string(),
					expected: std::any::type_name::<T>().to_string(),
					actual: e.to_string(),
				})
			}

			pub fn contains(&self, key: &str) -> bool {
				self.values.contains_key(key)
			}

			pub fn keys(&self) -> impl Iterator<Item = &str> {
				self.values.keys().map(String::as_str)
			}

			pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
				self.values.iter().map(|(k, v)| (k.as_str(), v))
			}

			pub fn len(&self) -> usize {
				self.values.len()
			}

			pub fn is_empty(&self) -> bool {
				self.values.is_empty()
			}

			pub fn to_json(&self) -> Value {
				Value::Object(
					self.values
						.iter()
						.map(|(k, v)| (k.clone(), v.clone()))
						.collect(),
				)
			}
		}

		impl FromIterator<(String, Value)> for $name {
			fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
				Self {
					values: iter.into_iter().collect(),
				}
			}
		}

		impl IntoIterator for $name {
			type Item = (String, Value);
			type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

			fn into_iter(self) -> Self::IntoIter {
				self.values.into_iter()
			}
		}
	};
}

value_set! {
	/// Every registered flag mapped to its validated value.
	Flags
}

value_set! {
	/// The client-safe projection of a [`Flags`] set.
	ClientFlags
}

impl ClientFlags {
	/// Returns a copy with `overrides` replacing or adding entries.
	pub fn with_overrides<I, K>(&self, overrides: I) -> Self
	where
		I: IntoIterator<Item = (K, Value)>,
		K: Into<String>,
	{
		let mut values = self.values.clone();
		for (key, value) in overrides {
			let key = key.into();
			tracing::debug!(flag_key = %key, "overriding client flag");
			values.insert(key, value);
		}
		Self { values }
	}
}

fn invalid_type(key: &str, expected: &str, actual: &Value) -> FlagsError {
	FlagsError::InvalidValueType {
		key: key.to_string(),
		expected: expected.to_string(),
		actual: json_type_name(actual).to_string(),
	}
}
