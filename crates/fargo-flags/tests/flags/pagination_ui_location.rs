// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use fargo_flags::{FlagDefinition, FlagSchema};
use serde_json::json;

pub const KEY: &str = "pagination-ui-location";

pub fn schema() -> FlagSchema {
	FlagSchema::enumeration(["top", "bottom", "both"])
}

pub fn definition() -> FlagDefinition {
	FlagDefinition::new(KEY, schema(), json!("bottom"))
		.with_description("Where to show pagination controls in lists")
		.with_option(json!("top"), Some("Top only"))
		.with_option(json!("bottom"), Some("Bottom only"))
		.with_option(json!("both"), Some("Top and bottom"))
		.public()
}
