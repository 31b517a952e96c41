// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared entry point for request handlers.

use std::sync::Arc;

use fargo_flags_core::{ClientFlags, FlagContext, Flags, Result};
use tracing::warn;

use crate::project::pick_client_flags;
use crate::registry::FlagRegistry;
use crate::resolve::resolve_all;

/// Cheaply cloneable handle over a frozen [`FlagRegistry`].
///
/// Construct one at startup and hand clones to whatever serves requests.
/// Concurrent resolutions only read the registry.
#[derive(Debug, Clone)]
pub struct FlagResolver {
	registry: Arc<FlagRegistry>,
}

impl FlagResolver {
	pub fn new(registry: FlagRegistry) -> Self {
		Self {
			registry: Arc::new(registry),
		}
	}

	pub fn registry(&self) -> &FlagRegistry {
		&self.registry
	}

	pub async fn resolve_all(&self, ctx: Option<&FlagContext>) -> Result<Flags> {
		resolve_all(&self.registry, ctx).await
	}

	pub fn pick_client_flags(&self, flags: &Flags) -> Result<ClientFlags> {
		pick_client_flags(&self.registry, flags)
	}

	/// Resolves every flag and returns the client-safe subset.
	pub async fn resolve_client_flags(&self, ctx: Option<&FlagContext>) -> Result<ClientFlags> {
		let flags = self.resolve_all(ctx).await?;
		self.pick_client_flags(&flags)
	}

	/// Like [`resolve_client_flags`](Self::resolve_client_flags), but any
	/// failure yields an empty set: clients then render every flag as
	/// disabled instead of failing the request.
	pub async fn client_flags_or_empty(&self, ctx: Option<&FlagContext>) -> ClientFlags {
		match self.resolve_client_flags(ctx).await {
			Ok(flags) => flags,
			Err(e) => {
				warn!(error = %e, "flag resolution failed, serving empty client flags");
				ClientFlags::default()
			}
		}
	}

	/// The client projection of every flag's default value.
	pub fn default_client_flags(&self) -> Result<ClientFlags> {
		self.pick_client_flags(&self.registry.default_flags())
	}
}

impl From<FlagRegistry> for FlagResolver {
	fn from(registry: FlagRegistry) -> Self {
		Self::new(registry)
	}
}
