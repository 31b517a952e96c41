// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Projection of a resolved flag set onto its client-safe subset.
//!
//! This is the only place values cross the server boundary. Output is built
//! from the registry's public-key list, never from the input set, so a key
//! that is not listed cannot leak. A listed key whose definition is
//! server-only is skipped as well.

use fargo_flags_core::{ClientFlags, Flags, FlagsError, Result};
use tracing::{trace, warn};

use crate::registry::FlagRegistry;

/// Builds the client-visible subset of `flags`, applying each public flag's
/// serializer.
///
/// Fails with [`FlagsError::MissingResolvedValue`] when a public key is
/// absent from `flags`, and with [`FlagsError::FlagNotFound`] when the public
/// list names an unregistered key. Values are not re-validated.
pub fn pick_client_flags(registry: &FlagRegistry, flags: &Flags) -> Result<ClientFlags> {
	let mut out = Vec::with_capacity(registry.public_keys().len());

	for key in registry.public_keys() {
		let def = registry.definition_of(key)?;
		let value = flags
			.get(key)
			.ok_or_else(|| FlagsError::MissingResolvedValue { key: key.clone() })?;

		match def.client_value(value) {
			Some(client_value) => {
				trace!(flag_key = %key, "exposing flag to client");
				out.push((key.clone(), client_value));
			}
			None => {
				warn!(flag_key = %key, "public key list names a server-only flag, skipping");
			}
		}
	}

	Ok(out.into_iter().collect())
}
