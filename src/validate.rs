//! Unknown-key detection for the config file section.
//!
//! A key in the section is known if it names a declared field. `-` and `_`
//! are interchangeable, so `str-arg` and `str_arg` both match field `str_arg`.
//! Under [`UnknownKeyPolicy::Fail`] every unknown key is reported with its
//! file path and line number.

use std::path::Path;

use tracing::debug;

use crate::error::CaepError;
use crate::ini::IniSection;
use crate::schema::Schema;
use crate::types::UnknownKeyPolicy;

/// Normalized form used to match INI keys against field keys.
pub fn normalize_key(key: &str) -> String {
    key.replace('-', "_")
}

/// Check `section` for keys that don't match any field in `schema`.
pub fn check_unknown_keys(
    section: &IniSection,
    schema: &Schema,
    use_alias: bool,
    path: &Path,
    policy: UnknownKeyPolicy,
) -> Result<(), CaepError> {
    let known: Vec<String> = schema
        .fields()
        .iter()
        .map(|f| normalize_key(f.key(use_alias)))
        .collect();

    let mut errors: Vec<CaepError> = Vec::new();
    for entry in &section.entries {
        if known.contains(&normalize_key(&entry.key)) {
            continue;
        }
        match policy {
            UnknownKeyPolicy::Ignore => {
                debug!(key = %entry.key, line = entry.line, "ignoring unknown config key");
            }
            UnknownKeyPolicy::Fail => errors.push(CaepError::UnknownKey {
                key: entry.key.clone(),
                path: path.to_path_buf(),
                line: entry.line,
            }),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CaepError::UnknownKeys(errors))
    }
}
