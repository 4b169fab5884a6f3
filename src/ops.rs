//! Config operations: template generation, key lookup, listing, and result types.
//!
//! Provides the logic behind `config list`, `config gen`, `config get`, and the
//! `ConfigResult` enum that callers use to display results.

use std::fmt;
use std::path::PathBuf;

use crate::cli::render_raw;
use crate::error::CaepError;
use crate::resolve::ResolvedValues;
use crate::schema::{Field, FieldType, Schema};
use crate::types::Source;

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// A generated INI template string.
    Template(String),
    /// Confirmation that a template was written to a file.
    TemplateWritten { path: PathBuf },
    /// A key's resolved value, its source and its help text.
    KeyValue {
        key: String,
        value: String,
        source: Source,
        doc: Option<String>,
    },
    /// All resolved values with their sources.
    Listing { entries: Vec<(String, String, Source)> },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Template(t) => write!(f, "{t}"),
            ConfigResult::TemplateWritten { path } => {
                write!(f, "Config template written to {}", path.display())
            }
            ConfigResult::KeyValue {
                key,
                value,
                source,
                doc,
            } => {
                if let Some(doc) = doc {
                    writeln!(f, "# {doc}")?;
                }
                write!(f, "{key} = {value}  ({source})")
            }
            ConfigResult::Listing { entries } => {
                for (i, (key, value, source)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}  ({source})")?;
                }
                Ok(())
            }
        }
    }
}

/// Generate a commented INI template for `section` from the schema's help
/// texts and defaults. Every assignment is commented out.
pub fn generate_template(schema: &Schema, section: &str, use_alias: bool) -> String {
    let mut out = format!("[{section}]\n");
    for (i, field) in schema.fields().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let key = field.key(use_alias);
        if let Some(help) = &field.help {
            out.push_str(&format!("# {help}\n#\n"));
        }
        if let FieldType::List { delimiter, .. } = &field.ty {
            out.push_str(&format!("# Items are separated by {delimiter:?}.\n"));
        }
        match &field.default {
            Some(default) => {
                let raw = render_raw(field, default);
                out.push_str(&format!("# Default value: {raw}\n#{key} = {raw}\n"));
            }
            None if field.is_list() => out.push_str(&format!("#{key} =\n")),
            None => out.push_str(&format!(
                "# Required! This value must be specified.\n#{key} =\n"
            )),
        }
    }
    out
}

/// Get one resolved value by field key, with its help text.
pub fn get_value(
    schema: &Schema,
    use_alias: bool,
    values: &ResolvedValues,
    key: &str,
) -> Result<ConfigResult, CaepError> {
    let field = lookup(schema, use_alias, key)?;
    let value = values
        .get(key)
        .ok_or_else(|| CaepError::KeyNotFound(key.into()))?;
    let source = values.source_of(key).unwrap_or(Source::Default);

    Ok(ConfigResult::KeyValue {
        key: key.into(),
        value: render_raw(field, value),
        source,
        doc: field.help.clone(),
    })
}

/// List every resolved value with its source, in schema order.
pub fn list_values(schema: &Schema, use_alias: bool, values: &ResolvedValues) -> ConfigResult {
    let entries = values
        .iter()
        .map(|entry| {
            let shown = match schema.get(&entry.key, use_alias) {
                Some(field) => render_raw(field, &entry.value),
                None => entry.value.to_string(),
            };
            (entry.key.clone(), shown, entry.source)
        })
        .collect();
    ConfigResult::Listing { entries }
}

fn lookup<'a>(schema: &'a Schema, use_alias: bool, key: &str) -> Result<&'a Field, CaepError> {
    schema
        .get(key, use_alias)
        .ok_or_else(|| CaepError::KeyNotFound(key.into()))
}
