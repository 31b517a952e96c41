// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-scoped context handed to decision functions.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

use crate::error::BoxError;

/// A user or workspace as seen by decision functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub plan: Option<String>,
	#[serde(default, skip_serializing_if = "HashMap::is_empty")]
	pub attributes: HashMap<String, serde_json::Value>,
}

impl Subject {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Default::default()
		}
	}

	pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
		self.plan = Some(plan.into());
		self
	}

	pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
		self.attributes.insert(key.into(), value);
		self
	}
}

type Accessor = Arc<dyn Fn() -> BoxFuture<'static, Result<Option<Subject>, BoxError>> + Send + Sync>;

/// Context passed to every decision function of one resolution pass.
///
/// Accessors are optional and asynchronous; an absent accessor behaves as if it
/// returned `None`. Cloning is cheap and clones share the same accessors, so a
/// memoizing accessor supplied by the caller stays memoized across flags.
#[derive(Clone, Default)]
pub struct FlagContext {
	user: Option<Accessor>,
	workspace: Option<Accessor>,
	attributes: Arc<HashMap<String, serde_json::Value>>,
}

impl FlagContext {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_user<F, Fut>(mut self, accessor: F) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Option<Subject>, BoxError>> + Send + 'static,
	{
		self.user = Some(Arc::new(move || accessor().boxed()));
		self
	}

	pub fn with_workspace<F, Fut>(mut self, accessor: F) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Option<Subject>, BoxError>> + Send + 'static,
	{
		self.workspace = Some(Arc::new(move || accessor().boxed()));
		self
	}

	pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
		Arc::make_mut(&mut self.attributes).insert(key.into(), value);
		self
	}

	/// The current user, if an accessor was supplied and it found one.
	pub async fn user(&self) -> Result<Option<Subject>, BoxError> {
		match &self.user {
			Some(accessor) => accessor().await,
			None => Ok(None),
		}
	}

	/// The current workspace, if an accessor was supplied and it found one.
	pub async fn workspace(&self) -> Result<Option<Subject>, BoxError> {
		match &self.workspace {
			Some(accessor) => accessor().await,
			None => Ok(None),
		}
	}

	pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
		self.attributes.get(key)
	}
}

impl fmt::Debug for FlagContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FlagContext")
			.field("user", &self.user.is_some())
			.field("workspace", &self.workspace.is_some())
			.field("attributes", &self.attributes)
			.finish()
	}
}
