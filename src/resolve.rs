//! Core resolution pipeline: pick each field's value by source precedence and
//! materialize it into a typed value.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Check the schema and, if a config section was loaded, its unknown keys
//! 2. Collect raw candidates from the command line, environment and config section
//! 3. Per field, take the first source that has a value, else the default
//! 4. Convert the raw string to the field's type, splitting list fields
//! 5. Collect every failing field into one [`ValidationError`]
//!
//! Fields are resolved independently: no field's value depends on another's.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use toml::Table;
use tracing::debug;

use crate::env;
use crate::error::{CaepError, FieldIssue, ValidationError};
use crate::ini::IniSection;
use crate::schema::{Field, FieldType, Schema};
use crate::split::split_escaped;
use crate::types::{Source, UnknownKeyPolicy};
use crate::validate::{self, normalize_key};
use crate::value::Value;

/// The config section found for this load, with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSection {
    pub path: PathBuf,
    pub section: IniSection,
}

/// All pre-loaded data needed to resolve a config. No I/O happens here.
pub struct ResolveInput {
    /// Raw command-line values keyed by field key. Absent flags are absent.
    pub command_line: HashMap<String, String>,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Whether the environment source is consulted at all.
    pub env_enabled: bool,
    /// The config file section, if a file was found and has the section.
    pub config: Option<ConfigSection>,
    /// What to do with section keys that match no field.
    pub unknown_key_policy: UnknownKeyPolicy,
}

/// A value chosen for one field, and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue {
    pub key: String,
    pub value: Value,
    pub source: Source,
}

/// Fully resolved values for one load, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValues {
    entries: Vec<ResolvedValue>,
}

impl ResolvedValues {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entry(key).map(|e| &e.value)
    }

    pub fn source_of(&self, key: &str) -> Option<Source> {
        self.entry(key).map(|e| e.source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedValue> {
        self.entries.iter()
    }

    fn entry(&self, key: &str) -> Option<&ResolvedValue> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// The values as a flat `toml::Table` keyed by field key.
    pub fn to_table(&self) -> Table {
        self.entries
            .iter()
            .map(|e| (e.key.clone(), e.value.to_toml()))
            .collect()
    }

    /// Deserialize the values into the caller's config struct.
    ///
    /// A value the struct rejects (e.g. `1000` into a `u8`) is a
    /// [`ValidationError`] naming that field.
    pub fn into_config<T: DeserializeOwned>(&self) -> Result<T, CaepError> {
        toml::Value::Table(self.to_table())
            .try_into()
            .map_err(|e: toml::de::Error| {
                let rendered = e.to_string();
                match failing_key(&rendered) {
                    Some(key) if self.get(key).is_some() => ValidationError {
                        issues: vec![FieldIssue::new(key, e.message().trim())],
                    }
                    .into(),
                    _ => CaepError::InvalidValue {
                        key: "<resolved>".into(),
                        reason: rendered.trim().to_string(),
                    },
                }
            })
    }
}

/// Top-level key named by a rendered deserialization error (``in `number` ``).
fn failing_key(rendered: &str) -> Option<&str> {
    let path = rendered
        .lines()
        .find_map(|line| line.trim().strip_prefix("in `")?.strip_suffix('`'))?;
    path.split(['.', '[']).next()
}

/// The value a field would take before type conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate<'a> {
    Raw { raw: &'a str, source: Source },
    Default(&'a Value),
    Absent,
}

/// Pick the candidate for `field` from `layers`, given highest priority first.
///
/// The first layer holding the key wins, even if its value is an empty string.
/// With no layer holding it the declared default applies.
pub fn select<'a>(
    field: &'a Field,
    key: &str,
    layers: &[(Source, &'a HashMap<String, String>)],
) -> Candidate<'a> {
    for &(source, values) in layers {
        if let Some(raw) = values.get(key) {
            return Candidate::Raw { raw, source };
        }
    }
    match &field.default {
        Some(default) => Candidate::Default(default),
        None => Candidate::Absent,
    }
}

/// Turn a candidate into a typed value.
///
/// Returns `Ok(None)` for an absent scalar field. Absent or empty list fields
/// become an empty list.
pub fn materialize(field: &Field, candidate: Candidate<'_>) -> Result<Option<(Value, Source)>, String> {
    match candidate {
        Candidate::Default(value) => Ok(Some((value.clone(), Source::Default))),
        Candidate::Absent if field.is_list() => Ok(Some((Value::List(Vec::new()), Source::Default))),
        Candidate::Absent => Ok(None),
        Candidate::Raw { raw, source } => {
            let value = match &field.ty {
                FieldType::Scalar(scalar) => scalar.parse(raw)?,
                FieldType::List { items, delimiter } => {
                    if raw.is_empty() {
                        Value::List(Vec::new())
                    } else {
                        let tokens = split_escaped(raw, delimiter);
                        let parsed = tokens
                            .iter()
                            .enumerate()
                            .map(|(i, token)| {
                                items.parse(token).map_err(|msg| format!("item {}: {msg}", i + 1))
                            })
                            .collect::<Result<Vec<_>, _>>()?;
                        Value::List(parsed)
                    }
                }
            };
            Ok(Some((value, source)))
        }
    }
}

/// Resolve every field in `schema` from pre-loaded inputs.
pub fn resolve(
    schema: &Schema,
    use_alias: bool,
    input: ResolveInput,
) -> Result<ResolvedValues, CaepError> {
    schema.check(use_alias)?;

    let mut file_values: HashMap<String, String> = HashMap::new();
    if let Some(config) = &input.config {
        validate::check_unknown_keys(
            &config.section,
            schema,
            use_alias,
            &config.path,
            input.unknown_key_policy,
        )?;
        // Entries are in file order, so later ones overwrite earlier.
        let by_normalized: HashMap<String, &str> = config
            .section
            .entries
            .iter()
            .map(|e| (normalize_key(&e.key), e.value.as_str()))
            .collect();
        for field in schema.fields() {
            let key = field.key(use_alias);
            if let Some(value) = by_normalized.get(&normalize_key(key)) {
                file_values.insert(key.to_string(), value.to_string());
            }
        }
    }

    let env_values = if input.env_enabled {
        env::env_values(schema, use_alias, input.env_vars)
    } else {
        HashMap::new()
    };

    let layers = [
        (Source::CommandLine, &input.command_line),
        (Source::Environment, &env_values),
        (Source::ConfigFile, &file_values),
    ];

    let mut entries = Vec::new();
    let mut issues = Vec::new();

    for field in schema.fields() {
        let key = field.key(use_alias);
        let candidate = select(field, key, &layers);
        match materialize(field, candidate) {
            Ok(Some((value, source))) => {
                debug!(field = key, %source, "resolved");
                entries.push(ResolvedValue {
                    key: key.to_string(),
                    value,
                    source,
                });
            }
            Ok(None) => issues.push(FieldIssue::new(key, "field required")),
            Err(message) => issues.push(FieldIssue::new(key, message)),
        }
    }

    if issues.is_empty() {
        Ok(ResolvedValues { entries })
    } else {
        Err(ValidationError { issues }.into())
    }
}
