// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use fargo_flags::{FlagDefinition, FlagSchema};
use serde_json::json;

pub const KEY: &str = "ai-claims-model";

pub fn schema() -> FlagSchema {
	FlagSchema::enumeration([
		"gemini-2.5-pro",
		"gemini-2.5-flash",
		"openai-gpt-4o-mini",
		"openai-gpt-4.5",
		"openai-gpt-5",
	])
}

pub fn definition() -> FlagDefinition {
	FlagDefinition::new(KEY, schema(), json!("openai-gpt-4o-mini"))
		.with_description("Which AI model powers claims analysis")
		.server_only()
}
