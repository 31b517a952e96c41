// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source templates for the registry module and flag definition files.

use std::fmt::Write as _;
use std::sync::LazyLock;

use fargo_flags_core::FlagDefinition;
use regex::Regex;

use crate::error::CliError;

/// Lowercase kebab-case with single dashes between segments, so that
/// distinct keys always map to distinct module names.
static KEY_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").unwrap());

/// Words that cannot name a module, including reserved ones.
const RUST_KEYWORDS: &[&str] = &[
	"abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
	"do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
	"in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
	"return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
	"unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

pub fn is_rust_keyword(module: &str) -> bool {
	RUST_KEYWORDS.contains(&module)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FlagKind {
	Boolean,
	Enum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
	Public,
	/// Public, sending the output of a `Fn(&Value) -> Value` expression.
	PublicWith(String),
	ServerOnly,
}

/// Everything needed to render one definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionSpec {
	pub key: String,
	pub kind: FlagKind,
	pub options: Vec<String>,
	pub default: String,
	pub description: Option<String>,
	pub visibility: Visibility,
}

impl DefinitionSpec {
	/// Checks the key, options and default.
	///
	/// Boolean defaults must be `true` or `false`. Enum flags need at least
	/// one distinct option and a default among them; an empty default picks
	/// the first option.
	pub fn new(
		key: impl Into<String>,
		kind: FlagKind,
		options: Vec<String>,
		default: Option<String>,
		description: Option<String>,
		visibility: Visibility,
	) -> Result<Self, CliError> {
		let key = key.into();
		if !KEY_RE.is_match(&key) || !FlagDefinition::validate_key(&key) {
			return Err(CliError::InvalidKey(key));
		}
		let module = FlagDefinition::module_name(&key);
		if is_rust_keyword(&module) {
			return Err(CliError::ReservedModule { key, module });
		}

		let default = match kind {
			FlagKind::Boolean => {
				if !options.is_empty() {
					return Err(CliError::InvalidDefinition(
						"boolean flags take no options".to_string(),
					));
				}
				let default = default.unwrap_or_else(|| "false".to_string());
				if default != "true" && default != "false" {
					return Err(CliError::InvalidDefinition(format!(
						"boolean default must be true or false, got '{default}'"
					)));
				}
				default
			}
			FlagKind::Enum => {
				let Some(first) = options.first() else {
					return Err(CliError::InvalidDefinition(
						"enum flags need at least one option".to_string(),
					));
				};
				if let Some(dup) = options
					.iter()
					.enumerate()
					.find(|(i, o)| options[..*i].contains(o))
					.map(|(_, o)| o)
				{
					return Err(CliError::InvalidDefinition(format!("duplicate option '{dup}'")));
				}
				let default = default.unwrap_or_else(|| first.clone());
				if !options.contains(&default) {
					return Err(CliError::InvalidDefinition(format!(
						"default '{default}' is not one of: {}",
						options.join(", ")
					)));
				}
				default
			}
		};

		Ok(Self {
			key,
			kind,
			options,
			default,
			description: description.filter(|d| !d.trim().is_empty()),
			visibility,
		})
	}

	pub fn module_name(&self) -> String {
		FlagDefinition::module_name(&self.key)
	}

	pub fn is_public(&self) -> bool {
		!matches!(self.visibility, Visibility::ServerOnly)
	}
}

const HEADER: &str = "// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.\n\
// SPDX-License-Identifier: Proprietary\n";

/// The empty registry module written by `init`.
pub fn render_registry() -> String {
	format!(
		r#"{HEADER}
//! Flag registry.
//!
//! `fargo-flags new` inserts module declarations, registrations and public
//! keys between the marker comments below. Manual edits are fine too.

use fargo_flags::{{FlagRegistry, Result}};

// @fargo-flags:mods
// @fargo-flags:mods:end

pub fn registry() -> Result<FlagRegistry> {{
	FlagRegistry::builder()
		// @fargo-flags:registry
		// @fargo-flags:registry:end
		// @fargo-flags:public
		// @fargo-flags:public:end
		.build_checked()
}}
"#
	)
}

/// Source of `<defs_dir>/<module>.rs` for `spec`.
pub fn render_definition(spec: &DefinitionSpec) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "{HEADER}");
	let _ = writeln!(out, "use fargo_flags::{{FlagDefinition, FlagSchema}};");
	let _ = writeln!(out, "use serde_json::json;");
	let _ = writeln!(out);
	let _ = writeln!(out, "pub const KEY: &str = {:?};", spec.key);
	let _ = writeln!(out);
	let _ = writeln!(out, "pub fn schema() -> FlagSchema {{");
	match spec.kind {
		FlagKind::Boolean => {
			let _ = writeln!(out, "\tFlagSchema::Boolean");
		}
		FlagKind::Enum => {
			let options: Vec<String> = spec.options.iter().map(|o| format!("{o:?}")).collect();
			let _ = writeln!(out, "\tFlagSchema::enumeration([{}])", options.join(", "));
		}
	}
	let _ = writeln!(out, "}}");
	let _ = writeln!(out);
	let _ = writeln!(out, "pub fn definition() -> FlagDefinition {{");

	let default = match spec.kind {
		FlagKind::Boolean => spec.default.clone(),
		FlagKind::Enum => format!("{:?}", spec.default),
	};
	let _ = writeln!(out, "\tFlagDefinition::new(KEY, schema(), json!({default}))");
	if let Some(description) = &spec.description {
		let _ = writeln!(out, "\t\t.with_description({description:?})");
	}
	if spec.kind == FlagKind::Enum {
		for option in &spec.options {
			let _ = writeln!(out, "\t\t.with_option(json!({option:?}), None)");
		}
	}
	match &spec.visibility {
		Visibility::Public => {
			let _ = writeln!(out, "\t\t.public()");
		}
		Visibility::PublicWith(expr) => {
			let _ = writeln!(out, "\t\t.public_with({})", expr.trim());
		}
		Visibility::ServerOnly => {
			let _ = writeln!(out, "\t\t.server_only()");
		}
	}
	let _ = writeln!(out, "}}");
	out
}
