// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Flag registry.
//!
//! `fargo-flags new` inserts module declarations, registrations and public
//! keys between the marker comments below. Manual edits are fine too.

use fargo_flags::{FlagRegistry, Result};

// @fargo-flags:mods
pub mod ai_claims_model;
pub mod enable_ai_assistant_in_pdf_toolbar;
pub mod pagination_ui_location;
pub mod theme_mode;
// @fargo-flags:mods:end

pub fn registry() -> Result<FlagRegistry> {
	FlagRegistry::builder()
		// @fargo-flags:registry
		.register(enable_ai_assistant_in_pdf_toolbar::definition())
		.register(pagination_ui_location::definition())
		.register(ai_claims_model::definition())
		.register(theme_mode::definition())
		// @fargo-flags:registry:end
		// @fargo-flags:public
		.expose(enable_ai_assistant_in_pdf_toolbar::KEY)
		.expose(pagination_ui_location::KEY)
		.expose(theme_mode::KEY)
		// @fargo-flags:public:end
		.build_checked()
}
