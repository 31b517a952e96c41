// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::{Deserialize, Serialize};

use super::sections::{LoggingConfigLayer, PathsConfigLayer};

/// One source's view of the configuration; every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlagsConfigLayer {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub paths: Option<PathsConfigLayer>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub logging: Option<LoggingConfigLayer>,
}

impl FlagsConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: FlagsConfigLayer) {
		merge_option(&mut self.paths, other.paths, PathsConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}
