// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use fargo_flags::{FlagDefinition, FlagSchema};
use serde_json::json;

pub const KEY: &str = "theme-mode";

pub fn schema() -> FlagSchema {
	FlagSchema::enumeration(["light", "dark", "auto"])
}

pub fn definition() -> FlagDefinition {
	FlagDefinition::new(KEY, schema(), json!("light"))
		.with_description("Application theme mode")
		.with_option(json!("light"), Some("Light Mode"))
		.with_option(json!("dark"), Some("Dark Mode"))
		.with_option(json!("auto"), Some("Auto (System)"))
		.public()
}
