// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;

use colored::Colorize;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::PathsConfig;
use crate::error::CliError;
use crate::registry_file::{RegistryEntries, RegistryFile};
use crate::scan::{discover, DefinitionFile};
use crate::templates::is_rust_keyword;
use crate::FlagsConfig;

#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
	/// Print the report as JSON
	#[arg(long)]
	pub json: bool,
}

/// Disagreements between the definition files and the registry module.
///
/// Entries are module names, or flag keys where the definition file
/// declares one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
	pub definitions_checked: usize,
	pub missing_key: Vec<String>,
	pub reserved_modules: Vec<String>,
	pub defs_not_registered: Vec<String>,
	pub registered_without_def: Vec<String>,
	pub mods_not_registered: Vec<String>,
	pub registered_not_declared: Vec<String>,
	pub public_not_listed: Vec<String>,
	pub listed_not_public: Vec<String>,
}

impl CheckReport {
	pub fn compare(defs: &[DefinitionFile], entries: &RegistryEntries) -> Self {
		let modules: BTreeSet<&str> = defs.iter().map(|d| d.module.as_str()).collect();
		let public: BTreeSet<&str> = defs
			.iter()
			.filter(|d| d.public)
			.map(|d| d.module.as_str())
			.collect();
		let label = |module: &str| {
			defs.iter()
				.find(|d| d.module == module)
				.map_or_else(|| module.to_string(), |d| d.label().to_string())
		};

		Self {
			definitions_checked: defs.len(),
			missing_key: defs
				.iter()
				.filter(|d| d.key.is_none())
				.map(|d| d.path.display().to_string())
				.collect(),
			reserved_modules: modules
				.iter()
				.copied()
				.chain(entries.mods.iter().map(String::as_str))
				.filter(|m| is_rust_keyword(m))
				.collect::<BTreeSet<_>>()
				.into_iter()
				.map(str::to_string)
				.collect(),
			defs_not_registered: modules
				.iter()
				.filter(|m| !entries.registered.contains(**m))
				.map(|m| label(*m))
				.collect(),
			registered_without_def: entries
				.registered
				.iter()
				.filter(|m| !modules.contains(m.as_str()))
				.cloned()
				.collect(),
			mods_not_registered: entries
				.mods
				.difference(&entries.registered)
				.cloned()
				.collect(),
			registered_not_declared: entries
				.registered
				.difference(&entries.mods)
				.cloned()
				.collect(),
			public_not_listed: public
				.iter()
				.filter(|m| !entries.exposed.contains(**m))
				.map(|m| label(*m))
				.collect(),
			listed_not_public: entries
				.exposed
				.iter()
				.filter(|m| !public.contains(m.as_str()))
				.map(|m| label(m.as_str()))
				.collect(),
		}
	}

	fn sections(&self) -> [(&'static str, &[String]); 8] {
		[
			("Definition files without a KEY constant", self.missing_key.as_slice()),
			("Module names that are Rust keywords", self.reserved_modules.as_slice()),
			("Definitions not registered", self.defs_not_registered.as_slice()),
			("Registered modules without a definition file", self.registered_without_def.as_slice()),
			("Module declarations without registration", self.mods_not_registered.as_slice()),
			("Registrations without a module declaration", self.registered_not_declared.as_slice()),
			("Public definitions not on the public list", self.public_not_listed.as_slice()),
			("Public list entries that are not public", self.listed_not_public.as_slice()),
		]
	}

	pub fn issue_count(&self) -> usize {
		self.sections().iter().map(|(_, items)| items.len()).sum()
	}

	pub fn is_clean(&self) -> bool {
		self.issue_count() == 0
	}
}

/// Compares the definition files under `paths` with the registry module.
pub async fn check(paths: &PathsConfig) -> Result<CheckReport, CliError> {
	let registry = RegistryFile::load(&paths.registry_file).await?;
	let entries = registry.entries()?;
	let defs = discover(&paths.defs_dir, &paths.registry_file).await?;
	debug!(
		definitions = defs.len(),
		registered = entries.registered.len(),
		"comparing definitions with registry"
	);
	Ok(CheckReport::compare(&defs, &entries))
}

pub async fn run(args: CheckArgs, config: &FlagsConfig) -> anyhow::Result<()> {
	let report = check(&config.paths).await?;

	if args.json {
		println!("{}", serde_json::to_string_pretty(&report)?);
	} else {
		print_report(&report);
	}

	if !report.is_clean() {
		return Err(CliError::CheckFailed(report.issue_count()).into());
	}
	info!(definitions = report.definitions_checked, "registry consistent");
	Ok(())
}

fn print_report(report: &CheckReport) {
	for (title, items) in report.sections() {
		if items.is_empty() {
			continue;
		}
		println!("{} {}", "✗".red(), title.bold());
		for item in items {
			println!("  - {}", item.yellow());
		}
	}

	if report.is_clean() {
		println!(
			"{} Registry consistent ({} definitions)",
			"✓".green(),
			report.definitions_checked
		);
	}
}
