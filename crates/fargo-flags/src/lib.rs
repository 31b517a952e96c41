// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Statically registered feature flags for Rust services.
//!
//! Flags are declared in code as [`FlagDefinition`]s, collected once into a
//! [`FlagRegistry`], resolved per request against an optional
//! [`FlagContext`], and projected down to the subset that is safe to send to
//! clients.
//!
//! # Features
//!
//! - **Typed schemas**: every resolved value is validated; a bad value fails
//!   the whole resolution instead of being replaced silently
//! - **Concurrent decisions**: all decision functions of a pass run together
//! - **Visibility boundary**: only keys on the public list, with a public
//!   policy, ever reach [`ClientFlags`]
//! - **Client serializers**: per-flag transforms strip server-side detail
//!
//! # Example
//!
//! ```
//! use fargo_flags::{FlagContext, FlagDefinition, FlagRegistry, FlagResolver, FlagSchema, Subject};
//! use serde_json::{json, Value};
//!
//! # tokio_test::block_on(async {
//! let registry = FlagRegistry::from_definitions([
//! 	FlagDefinition::new("dark-mode", FlagSchema::Boolean, json!(false)).public(),
//! 	FlagDefinition::new(
//! 		"plan-tier",
//! 		FlagSchema::enumeration(["free", "pro"]),
//! 		json!("free"),
//! 	)
//! 	.with_decide(|ctx: FlagContext| async move {
//! 		let user = ctx.user().await?;
//! 		Ok(user.and_then(|u| u.plan).map(Value::String))
//! 	}),
//! ])?;
//! let resolver = FlagResolver::new(registry);
//!
//! let ctx = FlagContext::new()
//! 	.with_user(|| async { Ok(Some(Subject::new("u1").with_plan("pro"))) });
//! let flags = resolver.resolve_all(Some(&ctx)).await?;
//! assert_eq!(flags.get_str("plan-tier")?, "pro");
//!
//! let client = resolver.pick_client_flags(&flags)?;
//! assert!(!client.contains("plan-tier"));
//! # Ok::<(), fargo_flags::FlagsError>(())
//! # }).unwrap();
//! ```

mod client;
mod project;
mod registry;
mod resolve;
mod resolver;

pub use client::{FlagCondition, TestFlags};
pub use project::pick_client_flags;
pub use registry::{ConsistencyReport, FlagRegistry, FlagRegistryBuilder};
pub use resolve::resolve_all;
pub use resolver::FlagResolver;

// Re-export core types for convenience
pub use fargo_flags_core::{
	BoxError, ClientExposure, ClientFlags, DecideResult, FlagContext, FlagDefinition, FlagOption,
	FlagSchema, Flags, FlagsError, ObjectField, Result, SchemaViolation, Subject,
};
