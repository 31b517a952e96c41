// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The static flag registry.
//!
//! A [`FlagRegistry`] is assembled once at startup and is read-only afterwards.
//! It exposes three views: key to definition, key to schema, and the ordered
//! list of keys that may be sent to clients.

use std::collections::{HashMap, HashSet};
use std::fmt;

use fargo_flags_core::{FlagDefinition, FlagSchema, Flags, FlagsError, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Authoritative set of registered flags.
#[derive(Debug, Clone, Default)]
pub struct FlagRegistry {
	definitions: Vec<FlagDefinition>,
	index: HashMap<String, usize>,
	schemas: HashMap<String, FlagSchema>,
	public_keys: Vec<String>,
}

impl FlagRegistry {
	pub fn builder() -> FlagRegistryBuilder {
		FlagRegistryBuilder::new()
	}

	pub fn empty() -> Self {
		Self::default()
	}

	/// Builds a registry whose public-key list follows each definition's own
	/// client policy, in registration order.
	pub fn from_definitions(definitions: impl IntoIterator<Item = FlagDefinition>) -> Result<Self> {
		let mut builder = FlagRegistryBuilder::new();
		for def in definitions {
			if def.is_public() {
				builder = builder.expose(def.key.clone());
			}
			builder = builder.register(def);
		}
		builder.build()
	}

	pub fn definition_of(&self, key: &str) -> Result<&FlagDefinition> {
		self
			.index
			.get(key)
			.map(|&i| &self.definitions[i])
			.ok_or_else(|| FlagsError::not_found(key))
	}

	pub fn schema_of(&self, key: &str) -> Result<&FlagSchema> {
		self.schemas.get(key).ok_or_else(|| FlagsError::not_found(key))
	}

	/// All registered keys, in registration order.
	pub fn all_keys(&self) -> impl Iterator<Item = &str> {
		self.definitions.iter().map(|d| d.key.as_str())
	}

	/// Keys that may be exposed to clients, in declaration order.
	pub fn public_keys(&self) -> &[String] {
		&self.public_keys
	}

	pub fn definitions(&self) -> impl Iterator<Item = &FlagDefinition> {
		self.definitions.iter()
	}

	pub fn schemas(&self) -> &HashMap<String, FlagSchema> {
		&self.schemas
	}

	pub fn contains(&self, key: &str) -> bool {
		self.index.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}

	/// Every flag at its default value, unvalidated.
	pub fn default_flags(&self) -> Flags {
		self
			.definitions
			.iter()
			.map(|d| (d.key.clone(), d.default_value.clone()))
			.collect()
	}

	/// Cross-checks the public-key list against the definitions' policies.
	pub fn check_consistency(&self) -> ConsistencyReport {
		let mut report = ConsistencyReport::default();
		let mut seen = HashSet::new();

		for key in &self.public_keys {
			if !seen.insert(key.as_str()) {
				report.duplicate_public_keys.push(key.clone());
				continue;
			}
			match self.definition_of(key) {
				Err(_) => report.public_keys_not_registered.push(key.clone()),
				Ok(def) if !def.is_public() => report.listed_but_not_public.push(key.clone()),
				Ok(_) => {}
			}
		}

		for def in &self.definitions {
			if def.is_public() && !seen.contains(def.key.as_str()) {
				report.public_not_listed.push(def.key.clone());
			}
		}

		report
	}
}

/// Result of [`FlagRegistry::check_consistency`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
	pub public_keys_not_registered: Vec<String>,
	pub listed_but_not_public: Vec<String>,
	pub public_not_listed: Vec<String>,
	pub duplicate_public_keys: Vec<String>,
}

impl ConsistencyReport {
	pub fn is_consistent(&self) -> bool {
		self.public_keys_not_registered.is_empty()
			&& self.listed_but_not_public.is_empty()
			&& self.public_not_listed.is_empty()
			&& self.duplicate_public_keys.is_empty()
	}

	fn sections(&self) -> [(&'static str, &[String]); 4] {
		[
			("public keys not registered", self.public_keys_not_registered.as_slice()),
			("public keys whose flag is server-only", self.listed_but_not_public.as_slice()),
			("public flags missing from the public key list", self.public_not_listed.as_slice()),
			("duplicate public keys", self.duplicate_public_keys.as_slice()),
		]
	}
}

impl fmt::Display for ConsistencyReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_consistent() {
			return f.write_str("consistent");
		}
		let mut first = true;
		for (title, keys) in self.sections() {
			if keys.is_empty() {
				continue;
			}
			if !first {
				f.write_str("; ")?;
			}
			first = false;
			write!(f, "{title}: {}", keys.join(", "))?;
		}
		Ok(())
	}
}

/// Builder for [`FlagRegistry`].
#[derive(Debug, Default)]
pub struct FlagRegistryBuilder {
	definitions: Vec<FlagDefinition>,
	public_keys: Vec<String>,
}

impl FlagRegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(mut self, definition: FlagDefinition) -> Self {
		self.definitions.push(definition);
		self
	}

	/// Appends a key to the client-visible list.
	pub fn expose(mut self, key: impl Into<String>) -> Self {
		self.public_keys.push(key.into());
		self
	}

	pub fn expose_all<I, K>(mut self, keys: I) -> Self
	where
		I: IntoIterator<Item = K>,
		K: Into<String>,
	{
		self.public_keys.extend(keys.into_iter().map(Into::into));
		self
	}

	/// Freezes the registry. Duplicate keys and schemas with an empty enum are
	/// rejected here; use [`build_checked`](Self::build_checked) to also
	/// verify the public list.
	pub fn build(self) -> Result<FlagRegistry> {
		let mut index = HashMap::with_capacity(self.definitions.len());
		let mut schemas = HashMap::with_capacity(self.definitions.len());

		for (i, def) in self.definitions.iter().enumerate() {
			if index.insert(def.key.clone(), i).is_some() {
				return Err(FlagsError::DuplicateFlagKey(def.key.clone()));
			}
			if let Some(path) = def.schema.empty_enum_path() {
				let at = if path.is_empty() { "root".to_string() } else { path };
				return Err(FlagsError::InvalidSchema {
					key: def.key.clone(),
					reason: format!("enum at {at} has no members"),
				});
			}
			schemas.insert(def.key.clone(), def.schema.clone());
		}

		debug!(
			flags = self.definitions.len(),
			public = self.public_keys.len(),
			"flag registry built"
		);

		Ok(FlagRegistry {
			definitions: self.definitions,
			index,
			schemas,
			public_keys: self.public_keys,
		})
	}

	/// Like [`build`](Self::build), but fails fast when the public-key list
	/// disagrees with the definitions' client policies.
	pub fn build_checked(self) -> Result<FlagRegistry> {
		let registry = self.build()?;
		let report = registry.check_consistency();
		if !report.is_consistent() {
			warn!(%report, "flag registry is inconsistent");
			return Err(FlagsError::Inconsistent(report.to_string()));
		}
		Ok(registry)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use serde_json::json;

	fn theme_mode() -> FlagDefinition {
		FlagDefinition::new(
			"theme-mode",
			FlagSchema::enumeration(["light", "dark", "auto"]),
			json!("light"),
		)
		.public()
	}

	fn ai_claims_model() -> FlagDefinition {
		FlagDefinition::new(
			"ai-claims-model",
			FlagSchema::enumeration(["gemini-2.5-pro", "openai-gpt-4o-mini"]),
			json!("openai-gpt-4o-mini"),
		)
	}

	#[test]
	fn test_views() {
		let registry = FlagRegistry::builder()
			.register(theme_mode())
			.register(ai_claims_model())
			.expose("theme-mode")
			.build()
			.unwrap();

		assert_eq!(registry.len(), 2);
		assert_eq!(
			registry.all_keys().collect::<Vec<_>>(),
			vec!["theme-mode", "ai-claims-model"]
		);
		assert_eq!(registry.public_keys(), ["theme-mode".to_string()]);
		assert_eq!(registry.definition_of("theme-mode").unwrap().key, "theme-mode");
		assert_eq!(
			registry.schema_of("ai-claims-model").unwrap().kind(),
			"enum"
		);
	}

	#[test]
	fn test_unknown_key_is_not_found() {
		let registry = FlagRegistry::empty();
		assert!(matches!(
			registry.definition_of("nope"),
			Err(FlagsError::FlagNotFound { .. })
		));
		assert!(registry.schema_of("nope").is_err());
	}

	#[test]
	fn test_duplicate_keys_rejected() {
		let err = FlagRegistry::builder()
			.register(theme_mode())
			.register(theme_mode())
			.build()
			.unwrap_err();
		assert!(matches!(err, FlagsError::DuplicateFlagKey(ref k) if k == "theme-mode"));
	}

	#[test]
	fn test_empty_enum_rejected_at_build() {
		let err = FlagRegistry::builder()
			.register(theme_mode())
			.register(FlagDefinition::new(
				"layout",
				FlagSchema::enumeration(Vec::<String>::new()),
				json!("grid"),
			))
			.build()
			.unwrap_err();
		assert!(matches!(err, FlagsError::InvalidSchema { ref key, .. } if key == "layout"));
		assert!(err.is_configuration_error());
		assert_eq!(
			err.to_string(),
			"flag layout has an unusable schema: enum at root has no members"
		);
	}

	#[test]
	fn test_from_definitions_derives_public_list() {
		let registry = FlagRegistry::from_definitions([ai_claims_model(), theme_mode()]).unwrap();
		assert_eq!(registry.public_keys(), ["theme-mode".to_string()]);
		assert!(registry.check_consistency().is_consistent());
	}

	#[test]
	fn test_consistency_report() {
		let registry = FlagRegistry::builder()
			.register(theme_mode())
			.register(ai_claims_model())
			.expose_all(["ai-claims-model", "ghost", "ai-claims-model"])
			.build()
			.unwrap();

		let report = registry.check_consistency();
		assert_eq!(report.public_keys_not_registered, vec!["ghost"]);
		assert_eq!(report.listed_but_not_public, vec!["ai-claims-model"]);
		assert_eq!(report.public_not_listed, vec!["theme-mode"]);
		assert_eq!(report.duplicate_public_keys, vec!["ai-claims-model"]);
		assert!(report.to_string().contains("public keys not registered: ghost"));
		assert_eq!(
			serde_json::to_value(&report).unwrap()["duplicate_public_keys"],
			json!(["ai-claims-model"])
		);
	}

	#[test]
	fn test_build_checked_fails_fast() {
		let err = FlagRegistry::builder()
			.register(theme_mode())
			.build_checked()
			.unwrap_err();
		assert!(matches!(err, FlagsError::Inconsistent(_)));
		assert!(err.is_configuration_error());
	}

	#[test]
	fn test_default_flags() {
		let registry = FlagRegistry::from_definitions([theme_mode(), ai_claims_model()]).unwrap();
		let defaults = registry.default_flags();
		assert_eq!(defaults.get_str("theme-mode").unwrap(), "light");
		assert_eq!(defaults.get_str("ai-claims-model").unwrap(), "openai-gpt-4o-mini");
	}

	proptest! {
		#[test]
		fn schema_view_matches_definitions(keys in prop::collection::hash_set("[a-z][a-z0-9-]{1,20}", 0..12)) {
			let registry = FlagRegistry::from_definitions(
				keys.iter().map(|k| FlagDefinition::new(k.clone(), FlagSchema::Boolean, json!(false))),
			).unwrap();

			let schema_keys: HashSet<&str> = registry.schemas().keys().map(String::as_str).collect();
			let def_keys: HashSet<&str> = registry.all_keys().collect();
			prop_assert_eq!(schema_keys, def_keys);
			prop_assert_eq!(registry.len(), keys.len());
		}
	}
}
