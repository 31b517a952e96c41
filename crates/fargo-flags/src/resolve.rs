// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolution of every registered flag for one request.

use fargo_flags_core::{FlagContext, FlagDefinition, Flags, FlagsError, Result};
use futures::future::try_join_all;
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use crate::registry::FlagRegistry;

/// Computes the validated value of every registered flag.
///
/// Decision functions run concurrently, each with its own clone of `ctx`
/// (an empty context when none is given). A decision error or a value that
/// fails its schema fails the whole call; no partial set is returned and the
/// default is never substituted for an invalid value.
#[instrument(skip_all, fields(flags = registry.len()))]
pub async fn resolve_all(registry: &FlagRegistry, ctx: Option<&FlagContext>) -> Result<Flags> {
	if registry.is_empty() {
		return Ok(Flags::default());
	}

	let ctx = ctx.cloned().unwrap_or_default();
	let entries = try_join_all(
		registry
			.definitions()
			.map(|def| resolve_one(def, ctx.clone())),
	)
	.await
	.inspect_err(|e| warn!(error = %e, flag_key = ?e.flag_key(), "flag resolution failed"))?;

	debug!(resolved = entries.len(), "flags resolved");
	Ok(entries.into_iter().collect())
}

async fn resolve_one(def: &FlagDefinition, ctx: FlagContext) -> Result<(String, Value)> {
	let raw = def
		.decide_raw(ctx)
		.await
		.map_err(|source| FlagsError::Decision {
			key: def.key.clone(),
			source,
		})?;

	let value = def
		.schema
		.parse(&raw)
		.map_err(|violation| FlagsError::Validation {
			key: def.key.clone(),
			violation,
		})?;

	trace!(flag_key = %def.key, %value, "flag resolved");
	Ok((def.key.clone(), value))
}
