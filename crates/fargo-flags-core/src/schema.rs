// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Value shapes a flag may take, and validation against them.
//!
//! A [`FlagSchema`] both describes the legal values of a flag and parses raw
//! JSON values into that shape. Parsing never coerces: the string `"true"` is
//! not a boolean and enum members match case-sensitively. Object schemas drop
//! keys they do not declare, so a parsed object only ever carries declared
//! fields.

use std::fmt;

use serde_json::{Map, Value};

/// The legal shape of a flag value.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagSchema {
	Boolean,
	String,
	Number,
	/// Fixed set of string literals.
	Enum(Vec<String>),
	/// Named fields; undeclared keys are stripped when parsing.
	Object(Vec<ObjectField>),
	Array(Box<FlagSchema>),
	/// Accepts `null` or the inner shape.
	Nullable(Box<FlagSchema>),
}

/// A single field of an [`FlagSchema::Object`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
	pub name: String,
	pub schema: FlagSchema,
	pub optional: bool,
}

impl ObjectField {
	pub fn required(name: impl Into<String>, schema: FlagSchema) -> Self {
		Self {
			name: name.into(),
			schema,
			optional: false,
		}
	}

	pub fn optional(name: impl Into<String>, schema: FlagSchema) -> Self {
		Self {
			name: name.into(),
			schema,
			optional: true,
		}
	}
}

/// Why a value failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
	/// Location of the offending value, `""` for the root, `/field/0` below it.
	pub path: String,
	pub expected: String,
	pub actual: String,
}

impl fmt::Display for SchemaViolation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.path.is_empty() {
			write!(f, "expected {}, got {}", self.expected, self.actual)
		} else {
			write!(
				f,
				"at {}: expected {}, got {}",
				self.path, self.expected, self.actual
			)
		}
	}
}

impl std::error::Error for SchemaViolation {}

impl FlagSchema {
	/// Builds an enum schema from string literals.
	pub fn enumeration<I, S>(values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		FlagSchema::Enum(values.into_iter().map(Into::into).collect())
	}

	pub fn object(fields: impl IntoIterator<Item = ObjectField>) -> Self {
		FlagSchema::Object(fields.into_iter().collect())
	}

	pub fn array(items: FlagSchema) -> Self {
		FlagSchema::Array(Box::new(items))
	}

	pub fn nullable(inner: FlagSchema) -> Self {
		FlagSchema::Nullable(Box::new(inner))
	}

	/// Parses `value` against this schema, returning the normalized value.
	pub fn parse(&self, value: &Value) -> Result<Value, SchemaViolation> {
		self.parse_at(value, "")
	}

	pub fn accepts(&self, value: &Value) -> bool {
		self.parse(value).is_ok()
	}

	/// Finds the first enum with no members, which no value can satisfy.
	/// Returns its location in the same form as [`SchemaViolation::path`].
	pub fn empty_enum_path(&self) -> Option<String> {
		self.empty_enum_at("")
	}

	fn empty_enum_at(&self, path: &str) -> Option<String> {
		match self {
			FlagSchema::Enum(members) if members.is_empty() => Some(path.to_string()),
			FlagSchema::Boolean | FlagSchema::String | FlagSchema::Number | FlagSchema::Enum(_) => None,
			FlagSchema::Array(items) => items.empty_enum_at(&format!("{path}/*")),
			FlagSchema::Nullable(inner) => inner.empty_enum_at(path),
			FlagSchema::Object(fields) => fields
				.iter()
				.find_map(|f| f.schema.empty_enum_at(&format!("{path}/{}", f.name))),
		}
	}

	/// Short kind name used by tooling (`boolean`, `enum`, ...).
	pub fn kind(&self) -> &'static str {
		match self {
			FlagSchema::Boolean => "boolean",
			FlagSchema::String => "string",
			FlagSchema::Number => "number",
			FlagSchema::Enum(_) => "enum",
			FlagSchema::Object(_) => "object",
			FlagSchema::Array(_) => "array",
			FlagSchema::Nullable(_) => "nullable",
		}
	}

	fn parse_at(&self, value: &Value, path: &str) -> Result<Value, SchemaViolation> {
		match (self, value) {
			(FlagSchema::Nullable(_), Value::Null) => Ok(Value::Null),
			(FlagSchema::Nullable(inner), _) => inner.parse_at(value, path),
			(FlagSchema::Boolean, Value::Bool(_))
			| (FlagSchema::String, Value::String(_))
			| (FlagSchema::Number, Value::Number(_)) => Ok(value.clone()),
			(FlagSchema::Enum(members), Value::String(s)) if members.iter().any(|m| m == s) => {
				Ok(value.clone())
			}
			(FlagSchema::Enum(_), Value::String(s)) => Err(self.violation(path, format!("{s:?}"))),
			(FlagSchema::Array(items), Value::Array(elements)) => elements
				.iter()
				.enumerate()
				.map(|(i, element)| items.parse_at(element, &format!("{path}/{i}")))
				.collect::<Result<Vec<_>, _>>()
				.map(Value::Array),
			(FlagSchema::Object(fields), Value::Object(map)) => {
				let mut out = Map::new();
				for field in fields {
					let field_path = format!("{path}/{}", field.name);
					match map.get(&field.name) {
						None | Some(Value::Null) if field.optional => {}
						None => {
							return Err(SchemaViolation {
								path: field_path,
								expected: field.schema.to_string(),
								actual: "missing".to_string(),
							});
						}
						Some(v) => {
							out.insert(field.name.clone(), field.schema.parse_at(v, &field_path)?);
						}
					}
				}
				Ok(Value::Object(out))
			}
			_ => Err(self.violation(path, json_type_name(value).to_string())),
		}
	}

	fn violation(&self, path: &str, actual: String) -> SchemaViolation {
		SchemaViolation {
			path: path.to_string(),
			expected: self.to_string(),
			actual,
		}
	}
}

impl fmt::Display for FlagSchema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FlagSchema::Boolean | FlagSchema::String | FlagSchema::Number => {
				f.write_str(self.kind())
			}
			FlagSchema::Enum(members) => write!(f, "enum({})", members.join("|")),
			FlagSchema::Object(fields) => {
				f.write_str("{ ")?;
				for (i, field) in fields.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					let marker = if field.optional { "?" } else { "" };
					write!(f, "{}{}: {}", field.name, marker, field.schema)?;
				}
				f.write_str(" }")
			}
			FlagSchema::Array(items) => write!(f, "array<{items}>"),
			FlagSchema::Nullable(inner) => write!(f, "{inner} | null"),
		}
	}
}

/// JSON type name of a value, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
