// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use colored::Colorize;
use tracing::{debug, info};

use crate::config::PathsConfig;
use crate::error::CliError;
use crate::registry_file::{Region, RegistryFile};
use crate::scan::DefinitionFile;
use crate::templates::{render_definition, DefinitionSpec, FlagKind, Visibility};
use crate::FlagsConfig;

#[derive(Debug, Clone, clap::Args)]
pub struct NewArgs {
	/// Flag key in kebab-case, e.g. `theme-mode`
	#[arg(short, long)]
	pub key: String,

	#[arg(long, value_enum, default_value_t = FlagKind::Boolean)]
	pub kind: FlagKind,

	/// Comma-separated options for enum flags
	#[arg(long, value_delimiter = ',')]
	pub options: Vec<String>,

	/// Default value; `false` for booleans, the first option for enums
	#[arg(long)]
	pub default: Option<String>,

	#[arg(short, long)]
	pub description: Option<String>,

	/// Send the flag to clients
	#[arg(long, conflicts_with = "server_only")]
	pub public: bool,

	/// Keep the flag on the server (default)
	#[arg(long)]
	pub server_only: bool,

	/// Closure of type `Fn(&Value) -> Value` applied before the value is sent
	/// to clients; implies --public
	#[arg(long, conflicts_with = "server_only")]
	pub serializer: Option<String>,
}

impl NewArgs {
	pub fn to_spec(&self) -> Result<DefinitionSpec, CliError> {
		let visibility = match (&self.serializer, self.public) {
			(Some(expr), _) => Visibility::PublicWith(expr.clone()),
			(None, true) => Visibility::Public,
			(None, false) => Visibility::ServerOnly,
		};
		let options = self
			.options
			.iter()
			.map(|o| o.trim().to_string())
			.filter(|o| !o.is_empty())
			.collect();

		DefinitionSpec::new(
			self.key.trim(),
			self.kind,
			options,
			self.default.clone(),
			self.description.clone(),
			visibility,
		)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffolded {
	pub definition_file: PathBuf,
	/// False when the definition file already existed and was left alone.
	pub wrote_definition: bool,
	/// Registry regions that gained an entry.
	pub updated_regions: Vec<Region>,
}

/// Writes the definition file for `spec` and wires it into the registry.
///
/// The registry is edited in memory first, so a missing marker aborts
/// before anything is written. An existing definition file is kept only when
/// it declares the same key.
pub async fn scaffold(spec: &DefinitionSpec, paths: &PathsConfig) -> Result<Scaffolded, CliError> {
	let module = spec.module_name();

	let definition_file = paths.defs_dir.join(format!("{module}.rs"));
	let exists = tokio::fs::try_exists(&definition_file)
		.await
		.map_err(|e| CliError::io(&definition_file, e))?;
	if exists {
		let source = tokio::fs::read_to_string(&definition_file)
			.await
			.map_err(|e| CliError::io(&definition_file, e))?;
		if let Some(existing) = DefinitionFile::inspect(&definition_file, &source).key {
			if existing != spec.key {
				return Err(CliError::ModuleTaken {
					path: definition_file,
					key: spec.key.clone(),
					existing,
				});
			}
		}
	}

	let mut registry = RegistryFile::load(&paths.registry_file).await?;
	let mut regions = vec![Region::Mods, Region::Registry];
	if spec.is_public() {
		regions.push(Region::Public);
	}
	let mut updated_regions = Vec::new();
	for region in regions {
		if registry.insert(region, &region.entry_for(&module))? {
			updated_regions.push(region);
		}
	}

	let wrote_definition = if exists {
		debug!(path = %definition_file.display(), "definition file exists, leaving it");
		false
	} else {
		tokio::fs::create_dir_all(&paths.defs_dir)
			.await
			.map_err(|e| CliError::io(&paths.defs_dir, e))?;
		tokio::fs::write(&definition_file, render_definition(spec))
			.await
			.map_err(|e| CliError::io(&definition_file, e))?;
		true
	};

	if !updated_regions.is_empty() {
		registry.save().await?;
	}

	info!(
		key = %spec.key,
		module = %module,
		wrote_definition,
		regions = updated_regions.len(),
		"scaffolded flag"
	);
	Ok(Scaffolded {
		definition_file,
		wrote_definition,
		updated_regions,
	})
}

pub async fn run(args: NewArgs, config: &FlagsConfig) -> anyhow::Result<()> {
	let spec = args.to_spec()?;
	let outcome = scaffold(&spec, &config.paths).await?;

	if outcome.wrote_definition {
		println!(
			"{} Created {}",
			"✓".green(),
			outcome.definition_file.display().to_string().yellow()
		);
	} else {
		println!(
			"{} {} already exists, left unchanged",
			"•".dimmed(),
			outcome.definition_file.display()
		);
	}

	if outcome.updated_regions.is_empty() {
		println!("{} Registry already lists {}", "•".dimmed(), spec.key);
	} else {
		let regions: Vec<_> = outcome.updated_regions.iter().map(|r| r.name()).collect();
		println!(
			"{} Updated {} ({})",
			"✓".green(),
			config.paths.registry_file.display(),
			regions.join(", ")
		);
	}

	Ok(())
}
