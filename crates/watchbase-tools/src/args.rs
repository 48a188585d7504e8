//! Decoding raw tool arguments into typed, per-tool shapes.
//!
//! A [`ToolArgs`] value only exists if decoding succeeded, so nothing downstream ever sees
//! unvalidated arguments.

use crate::catalog::ToolName;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

// ASCII digits only: `\d` would also match other Unicode decimal digits.
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern"));

/// A WatchBase ID, accepted either as a string or a JSON number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Text(String),
    Number(Number),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A `YYYY-MM-DD` string.
///
/// Only the shape is checked; `9999-99-99` is accepted and left for the upstream API to judge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedSince(String);

impl UpdatedSince {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        DATE_PATTERN.is_match(s).then(|| Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated arguments, one variant per tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolArgs {
    Search {
        q: String,
    },
    SearchRefnr {
        q: String,
    },
    ListBrands,
    ListFamilies {
        brand_id: Identifier,
    },
    ListWatches {
        brand_id: Identifier,
        family_id: Option<Identifier>,
        updated_since: Option<UpdatedSince>,
    },
    GetWatchDetails {
        id: Identifier,
    },
}

/// Why an argument bag was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsProblem {
    NotAnObject,
    Missing(&'static str),
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    BadDate(&'static str),
}

impl fmt::Display for ArgsProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => f.write_str("arguments must be an object"),
            Self::Missing(field) => write!(f, "missing required field '{field}'"),
            Self::WrongType { field, expected } => write!(f, "'{field}' must be {expected}"),
            Self::BadDate(field) => write!(f, "'{field}' must be a date in YYYY-MM-DD format"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid arguments for {tool}: {problem}")]
pub struct ArgsError {
    pub tool: ToolName,
    pub problem: ArgsProblem,
}

impl ToolArgs {
    /// Decode `arguments` for `tool`.
    ///
    /// `list_brands` accepts anything. Every other tool needs a JSON object; unknown keys are
    /// ignored, and an optional field set to `null` counts as present (and wrong), not absent.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgsError`] naming the tool and the first offending field.
    pub fn decode(tool: ToolName, arguments: &Value) -> Result<Self, ArgsError> {
        if tool == ToolName::ListBrands {
            return Ok(Self::ListBrands);
        }

        let Some(map) = arguments.as_object() else {
            return Err(ArgsError {
                tool,
                problem: ArgsProblem::NotAnObject,
            });
        };

        decode_object(tool, map).map_err(|problem| ArgsError { tool, problem })
    }

    #[must_use]
    pub fn tool(&self) -> ToolName {
        match self {
            Self::Search { .. } => ToolName::Search,
            Self::SearchRefnr { .. } => ToolName::SearchRefnr,
            Self::ListBrands => ToolName::ListBrands,
            Self::ListFamilies { .. } => ToolName::ListFamilies,
            Self::ListWatches { .. } => ToolName::ListWatches,
            Self::GetWatchDetails { .. } => ToolName::GetWatchDetails,
        }
    }
}

fn decode_object(tool: ToolName, map: &Map<String, Value>) -> Result<ToolArgs, ArgsProblem> {
    Ok(match tool {
        ToolName::Search => ToolArgs::Search {
            q: required_string(map, "q")?,
        },
        ToolName::SearchRefnr => ToolArgs::SearchRefnr {
            q: required_string(map, "q")?,
        },
        ToolName::ListBrands => ToolArgs::ListBrands,
        ToolName::ListFamilies => ToolArgs::ListFamilies {
            brand_id: required_identifier(map, "brand_id")?,
        },
        ToolName::ListWatches => ToolArgs::ListWatches {
            brand_id: required_identifier(map, "brand_id")?,
            family_id: optional_identifier(map, "family_id")?,
            updated_since: optional_date(map, "updated_since")?,
        },
        ToolName::GetWatchDetails => ToolArgs::GetWatchDetails {
            id: required_identifier(map, "id")?,
        },
    })
}

fn required_string(map: &Map<String, Value>, field: &'static str) -> Result<String, ArgsProblem> {
    match map.get(field) {
        None => Err(ArgsProblem::Missing(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ArgsProblem::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn identifier(value: &Value, field: &'static str) -> Result<Identifier, ArgsProblem> {
    match value {
        Value::String(s) => Ok(Identifier::Text(s.clone())),
        Value::Number(n) => Ok(Identifier::Number(n.clone())),
        _ => Err(ArgsProblem::WrongType {
            field,
            expected: "a string or a number",
        }),
    }
}

fn required_identifier(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Identifier, ArgsProblem> {
    let value = map.get(field).ok_or(ArgsProblem::Missing(field))?;
    identifier(value, field)
}

fn optional_identifier(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Identifier>, ArgsProblem> {
    map.get(field).map(|v| identifier(v, field)).transpose()
}

fn optional_date(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<UpdatedSince>, ArgsProblem> {
    match map.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => UpdatedSince::parse(s)
            .map(Some)
            .ok_or(ArgsProblem::BadDate(field)),
        Some(_) => Err(ArgsProblem::WrongType {
            field,
            expected: "a string",
        }),
    }
}
