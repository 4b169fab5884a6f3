use std::collections::HashMap;

use tracing::warn;

use crate::schema::Schema;

/// Environment variable name for a field key: uppercased, `-` replaced by `_`.
///
/// `str_arg` and `str-arg` both read `STR_ARG`.
pub fn env_var_name(key: &str) -> String {
    key.replace('-', "_").to_uppercase()
}

/// Truthy tokens for boolean values read as text: `true` and `yes`,
/// case-insensitive. Everything else is `false`.
pub fn parse_bool(raw: &str) -> bool {
    let raw = raw.trim();
    raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("yes")
}

const FALSY: &[&str] = &["false", "no", ""];

/// Collect the raw environment value for every field in `schema`.
///
/// Returns a map keyed by field key. Fields without a matching variable are
/// absent from the map.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_values(
    schema: &Schema,
    use_alias: bool,
    vars: impl IntoIterator<Item = (String, String)>,
) -> HashMap<String, String> {
    let vars: HashMap<String, String> = vars.into_iter().collect();
    let mut out = HashMap::new();

    for field in schema.fields() {
        let key = field.key(use_alias);
        let var = env_var_name(key);
        let Some(value) = vars.get(&var) else {
            continue;
        };
        if field.is_boolean()
            && !parse_bool(value)
            && !FALSY.iter().any(|f| value.trim().eq_ignore_ascii_case(f))
        {
            warn!(var = %var, value = %value, "unrecognized boolean value, treating as false");
        }
        out.insert(key.to_string(), value.clone());
    }

    out
}
