// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use colored::Colorize;
use serde::Serialize;

use crate::scan::{discover, DefinitionFile};
use crate::FlagsConfig;

#[derive(Debug, Clone, clap::Args)]
pub struct ListArgs {
	/// Only show flags sent to clients
	#[arg(long)]
	pub public: bool,

	/// Print as JSON
	#[arg(long)]
	pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagRow {
	pub key: String,
	pub kind: String,
	pub visibility: &'static str,
	pub description: String,
}

impl From<&DefinitionFile> for FlagRow {
	fn from(def: &DefinitionFile) -> Self {
		Self {
			key: def.label().to_string(),
			kind: def.kind.clone().unwrap_or_else(|| "?".to_string()),
			visibility: if def.public { "public" } else { "server" },
			description: def.description.clone().unwrap_or_default(),
		}
	}
}

pub fn rows(defs: &[DefinitionFile], public_only: bool) -> Vec<FlagRow> {
	defs.iter()
		.filter(|d| !public_only || d.public)
		.map(FlagRow::from)
		.collect()
}

pub async fn run(args: ListArgs, config: &FlagsConfig) -> anyhow::Result<()> {
	let defs = discover(&config.paths.defs_dir, &config.paths.registry_file).await?;
	let rows = rows(&defs, args.public);

	if args.json {
		println!("{}", serde_json::to_string_pretty(&rows)?);
		return Ok(());
	}

	if rows.is_empty() {
		println!("No flags defined in {}", config.paths.defs_dir.display());
		return Ok(());
	}

	let key_width = rows.iter().map(|r| r.key.len()).max().unwrap_or(3).max(3);
	let kind_width = rows.iter().map(|r| r.kind.len()).max().unwrap_or(4).max(4);
	println!(
		"{}",
		format!(
			"{:<key_width$}  {:<kind_width$}  {:<10}  DESCRIPTION",
			"KEY", "KIND", "VISIBILITY"
		)
		.bold()
	);
	for row in &rows {
		let visibility = format!("{:<10}", row.visibility);
		let visibility = if row.visibility == "public" {
			visibility.green()
		} else {
			visibility.dimmed()
		};
		println!(
			"{:<key_width$}  {:<kind_width$}  {}  {}",
			row.key, row.kind, visibility, row.description
		);
	}
	println!("\n{} flag(s)", rows.len());
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn def(module: &str, public: bool) -> DefinitionFile {
		DefinitionFile {
			path: format!("{module}.rs").into(),
			module: module.to_string(),
			key: Some(module.replace('_', "-")),
			public,
			kind: Some("enum".to_string()),
			description: Some(format!("{module} flag")),
		}
	}

	#[test]
	fn test_rows_filter_public() {
		let defs = [def("theme_mode", true), def("ai_claims_model", false)];
		assert_eq!(rows(&defs, false).len(), 2);

		let public = rows(&defs, true);
		assert_eq!(public.len(), 1);
		assert_eq!(public[0].key, "theme-mode");
		assert_eq!(public[0].visibility, "public");
	}

	#[test]
	fn test_row_without_key_uses_module() {
		let mut keyless = def("draft", false);
		keyless.key = None;
		keyless.kind = None;
		let row = FlagRow::from(&keyless);
		assert_eq!(row.key, "draft");
		assert_eq!(row.kind, "?");
		assert_eq!(row.visibility, "server");
	}
}
