// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the fargo-flags feature flags toolkit.
//!
//! This crate provides the shared vocabulary used by the runtime
//! (`fargo-flags`) and the developer tooling (`fargo-flags-cli`).
//!
//! # Overview
//!
//! - [`FlagSchema`]: the legal shape of a flag value, with validation
//! - [`FlagDefinition`]: one statically declared flag
//! - [`FlagContext`]: request-scoped accessors available to decision functions
//! - [`Flags`] / [`ClientFlags`]: resolved value sets, full and client-safe
//!
//! # Example
//!
//! ```
//! use fargo_flags_core::{FlagContext, FlagDefinition, FlagSchema, Subject};
//! use serde_json::{json, Value};
//!
//! let plan_tier = FlagDefinition::new(
//! 	"plan-tier",
//! 	FlagSchema::enumeration(["free", "pro"]),
//! 	json!("free"),
//! )
//! .with_decide(|ctx: FlagContext| async move {
//! 	let user = ctx.user().await?;
//! 	Ok(user.and_then(|u| u.plan).map(Value::String))
//! });
//!
//! let ctx = FlagContext::new()
//! 	.with_user(|| async { Ok(Some(Subject::new("u1").with_plan("pro"))) });
//! # let _ = (plan_tier, ctx);
//! ```

pub mod context;
pub mod definition;
pub mod error;
pub mod schema;
pub mod values;

pub use context::{FlagContext, Subject};
pub use definition::{ClientExposure, DecideResult, FlagDefinition, FlagOption, Serializer};
pub use error::{BoxError, FlagsError, Result};
pub use schema::{FlagSchema, ObjectField, SchemaViolation};
pub use values::{ClientFlags, Flags};
