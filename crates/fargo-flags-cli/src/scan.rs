// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Discovery of flag definition files.
//!
//! Definition files are read as text, not compiled: the key comes from the
//! `KEY` constant and visibility from the last `.public(`, `.public_with(` or
//! `.server_only(` call in `definition()`, ignoring comments and string
//! literals.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::error::CliError;

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"pub\s+const\s+KEY\s*:\s*&\s*(?:'static\s+)?str\s*=\s*"([^"]*)""#).unwrap()
});
static VISIBILITY_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\.(public_with|public|server_only)\s*\(").unwrap());
static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?s)"(?:[^"\\]|\\.)*"|//[^\n]*|/\*.*?\*/"#).unwrap()
});
static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"\.with_description\(\s*"((?:[^"\\]|\\.)*)"\s*\)"#).unwrap()
});
static KIND_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"FlagSchema::(Boolean|String|Number|enumeration|object|array|nullable)\b").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionFile {
	pub path: PathBuf,
	/// File stem, which is also the module name in the registry.
	pub module: String,
	pub key: Option<String>,
	pub public: bool,
	pub kind: Option<String>,
	pub description: Option<String>,
}

impl DefinitionFile {
	pub fn inspect(path: impl Into<PathBuf>, source: &str) -> Self {
		let path = path.into();
		let module = path
			.file_stem()
			.map(|s| s.to_string_lossy().into_owned())
			.unwrap_or_default();

		let key = KEY_RE.captures(source).map(|c| c[1].to_string());
		let description = DESCRIPTION_RE
			.captures(source)
			.map(|c| c[1].replace("\\\"", "\"").replace("\\\\", "\\"));
		let kind = KIND_RE.captures(source).map(|c| match &c[1] {
			"enumeration" => "enum".to_string(),
			other => other.to_ascii_lowercase(),
		});

		trace!(module = %module, key = ?key, "inspected definition file");
		Self {
			path,
			module,
			key,
			public: is_public(source),
			kind,
			description,
		}
	}

	/// The key when known, otherwise the module name.
	pub fn label(&self) -> &str {
		self.key.as_deref().unwrap_or(&self.module)
	}
}

/// The builder keeps the last visibility call, so only that one counts.
/// Without any call a definition stays server-only.
fn is_public(source: &str) -> bool {
	let code = NOISE_RE.replace_all(source, |c: &regex::Captures<'_>| {
		if c[0].starts_with('"') {
			"\"\"".to_string()
		} else {
			String::new()
		}
	});
	let body = code.find("fn definition").map_or(&code[..], |i| &code[i..]);
	VISIBILITY_RE
		.captures_iter(body)
		.last()
		.is_some_and(|c| &c[1] != "server_only")
}

/// Reads every `*.rs` file directly inside `defs_dir`, skipping the
/// registry module itself and any `mod.rs`. Results are sorted by module.
pub async fn discover(defs_dir: &Path, registry_file: &Path) -> Result<Vec<DefinitionFile>, CliError> {
	let mut entries = tokio::fs::read_dir(defs_dir)
		.await
		.map_err(|e| CliError::io(defs_dir, e))?;

	let mut found = Vec::new();
	while let Some(entry) = entries
		.next_entry()
		.await
		.map_err(|e| CliError::io(defs_dir, e))?
	{
		let path = entry.path();
		if !path.extension().is_some_and(|ext| ext == "rs")
			|| path.file_name().is_some_and(|n| n == "mod.rs")
			|| same_file(&path, registry_file)
		{
			continue;
		}

		let source = tokio::fs::read_to_string(&path)
			.await
			.map_err(|e| CliError::io(&path, e))?;
		found.push(DefinitionFile::inspect(path, &source));
	}

	found.sort_by(|a, b| a.module.cmp(&b.module));
	debug!(dir = %defs_dir.display(), count = found.len(), "discovered definition files");
	Ok(found)
}

fn same_file(a: &Path, b: &Path) -> bool {
	match (a.canonicalize(), b.canonicalize()) {
		(Ok(a), Ok(b)) => a == b,
		_ => a == b,
	}
}
