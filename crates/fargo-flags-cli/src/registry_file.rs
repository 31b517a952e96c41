// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reading and editing the marked regions of a registry module.
//!
//! A region is delimited by `// @fargo-flags:<name>` and
//! `// @fargo-flags:<name>:end` comment lines. Everything outside the markers
//! is left untouched.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CliError;

pub const MARKER_PREFIX: &str = "// @fargo-flags:";

static MOD_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^pub\s+mod\s+([A-Za-z_][A-Za-z0-9_]*)\s*;").unwrap());
static REGISTER_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\.register\(\s*([A-Za-z_][A-Za-z0-9_]*)::definition\(\)\s*\)").unwrap()
});
static EXPOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\.expose\(\s*([A-Za-z_][A-Za-z0-9_]*)::KEY\s*\)").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
	/// `pub mod <module>;` declarations.
	Mods,
	/// `.register(<module>::definition())` calls.
	Registry,
	/// `.expose(<module>::KEY)` calls.
	Public,
}

impl Region {
	pub const ALL: [Region; 3] = [Region::Mods, Region::Registry, Region::Public];

	pub fn name(self) -> &'static str {
		match self {
			Region::Mods => "mods",
			Region::Registry => "registry",
			Region::Public => "public",
		}
	}

	pub fn start_marker(self) -> String {
		format!("{MARKER_PREFIX}{}", self.name())
	}

	pub fn end_marker(self) -> String {
		format!("{MARKER_PREFIX}{}:end", self.name())
	}

	/// The line `new` inserts into this region for `module`.
	pub fn entry_for(self, module: &str) -> String {
		match self {
			Region::Mods => format!("pub mod {module};"),
			Region::Registry => format!(".register({module}::definition())"),
			Region::Public => format!(".expose({module}::KEY)"),
		}
	}

	fn pattern(self) -> &'static Regex {
		match self {
			Region::Mods => &MOD_RE,
			Region::Registry => &REGISTER_RE,
			Region::Public => &EXPOSE_RE,
		}
	}
}

/// Module names referenced by each region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryEntries {
	pub mods: BTreeSet<String>,
	pub registered: BTreeSet<String>,
	pub exposed: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct RegistryFile {
	path: PathBuf,
	lines: Vec<String>,
	trailing_newline: bool,
}

impl RegistryFile {
	pub fn parse(path: impl Into<PathBuf>, source: &str) -> Self {
		Self {
			path: path.into(),
			lines: source.lines().map(str::to_string).collect(),
			trailing_newline: source.ends_with('\n'),
		}
	}

	pub async fn load(path: &Path) -> Result<Self, CliError> {
		let source = tokio::fs::read_to_string(path)
			.await
			.map_err(|e| CliError::io(path, e))?;
		Ok(Self::parse(path, &source))
	}

	pub async fn save(&self) -> Result<(), CliError> {
		tokio::fs::write(&self.path, self.contents())
			.await
			.map_err(|e| CliError::io(&self.path, e))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn contents(&self) -> String {
		let mut out = self.lines.join("\n");
		if self.trailing_newline {
			out.push('\n');
		}
		out
	}

	/// Line indices of the start and end markers of `region`.
	fn bounds(&self, region: Region) -> Result<(usize, usize), CliError> {
		let start = region.start_marker();
		let end = region.end_marker();

		let open = self
			.lines
			.iter()
			.position(|l| l.trim() == start)
			.ok_or_else(|| self.missing(start))?;
		let close = self.lines[open + 1..]
			.iter()
			.position(|l| l.trim() == end)
			.map(|i| open + 1 + i)
			.ok_or_else(|| self.missing(end))?;

		Ok((open, close))
	}

	fn missing(&self, marker: String) -> CliError {
		CliError::MissingAnchor {
			path: self.path.clone(),
			marker,
		}
	}

	/// Non-blank lines inside `region`, trimmed.
	pub fn region_lines(&self, region: Region) -> Result<Vec<&str>, CliError> {
		let (open, close) = self.bounds(region)?;
		Ok(self.lines[open + 1..close]
			.iter()
			.map(|l| l.trim())
			.filter(|l| !l.is_empty())
			.collect())
	}

	/// Appends `entry` at the end of `region` unless an identical line is
	/// already there. Returns whether the file changed.
	pub fn insert(&mut self, region: Region, entry: &str) -> Result<bool, CliError> {
		let entry = entry.trim();
		if self.region_lines(region)?.contains(&entry) {
			return Ok(false);
		}

		let (_, close) = self.bounds(region)?;
		let indent: String = self.lines[close]
			.chars()
			.take_while(|c| c.is_whitespace())
			.collect();
		self.lines.insert(close, format!("{indent}{entry}"));
		Ok(true)
	}

	/// Module names referenced in each region. Lines that are not entries,
	/// such as comments, are ignored.
	pub fn entries(&self) -> Result<RegistryEntries, CliError> {
		Ok(RegistryEntries {
			mods: self.modules_in(Region::Mods)?,
			registered: self.modules_in(Region::Registry)?,
			exposed: self.modules_in(Region::Public)?,
		})
	}

	fn modules_in(&self, region: Region) -> Result<BTreeSet<String>, CliError> {
		let pattern = region.pattern();
		Ok(self
			.region_lines(region)?
			.into_iter()
			.filter(|l| !l.starts_with("//"))
			.filter_map(|l| pattern.captures(l))
			.filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
			.collect())
	}
}
