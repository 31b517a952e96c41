// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use fargo_flags::{FlagContext, FlagDefinition, FlagSchema};
use serde_json::json;

pub const KEY: &str = "enable-ai-assistant-in-pdf-toolbar";

pub fn schema() -> FlagSchema {
	FlagSchema::Boolean
}

pub fn definition() -> FlagDefinition {
	FlagDefinition::new(KEY, schema(), json!(false))
		.with_description("Enable AI Assistant in the PDF toolbar")
		.public()
		.with_decide(|ctx: FlagContext| async move {
			let user = ctx.user().await?;
			Ok(Some(json!(user.is_some())))
		})
}
