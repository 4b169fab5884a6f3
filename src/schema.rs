//! Field descriptors: the contract between a config type and the resolver.
//!
//! A [`Schema`] is an ordered list of [`Field`]s. Types describe themselves by
//! implementing [`ConfigSchema`]; schemas produced by other tools can be read
//! from a JSON `properties` mapping with [`Schema::from_properties`].

use std::collections::HashSet;

use serde_json::Value as Json;

use crate::error::CaepError;
use crate::split::DEFAULT_DELIMITER;
use crate::value::{ScalarType, Value};

/// Keys the command-line surface reserves for itself.
pub const RESERVED_KEYS: &[&str] = &["config", "help"];

/// Implemented by config structs to declare their fields.
///
/// ```ignore
/// impl ConfigSchema for Arguments {
///     fn schema() -> Schema {
///         Schema::new()
///             .field(Field::string("str_arg").help("Required String Argument"))
///             .field(Field::integer("number").default(1))
///     }
/// }
/// ```
pub trait ConfigSchema {
    fn schema() -> Schema;
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Scalar(ScalarType),
    /// A one-dimensional list given as a single delimited string.
    List { items: ScalarType, delimiter: String },
}

/// Metadata for one configuration parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
    pub default: Option<Value>,
    pub help: Option<String>,
    pub alias: Option<String>,
}

impl Field {
    pub fn new(name: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            default: None,
            help: None,
            alias: None,
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, FieldType::Scalar(ScalarType::String))
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, FieldType::Scalar(ScalarType::Integer))
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, FieldType::Scalar(ScalarType::Number))
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, FieldType::Scalar(ScalarType::Boolean))
    }

    /// A list of `items`, split on a single space unless [`delimiter`](Self::delimiter) is set.
    pub fn list(name: &str, items: ScalarType) -> Self {
        Self::new(
            name,
            FieldType::List {
                items,
                delimiter: DEFAULT_DELIMITER.to_string(),
            },
        )
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help = Some(text.to_string());
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Set the list delimiter. No effect on scalar fields.
    pub fn delimiter(mut self, delim: &str) -> Self {
        if let FieldType::List { delimiter, .. } = &mut self.ty {
            *delimiter = delim.to_string();
        }
        self
    }

    /// A field is required iff it has no default.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    pub fn is_boolean(&self) -> bool {
        self.ty == FieldType::Scalar(ScalarType::Boolean)
    }

    pub fn is_list(&self) -> bool {
        matches!(self.ty, FieldType::List { .. })
    }

    /// The key this field is looked up by: its alias when `use_alias` is set
    /// and one exists, otherwise its name.
    pub fn key(&self, use_alias: bool) -> &str {
        match (&self.alias, use_alias) {
            (Some(alias), true) => alias,
            _ => &self.name,
        }
    }

    /// Long flag name without dashes prefix, e.g. `str-arg`.
    pub fn flag_name(&self, use_alias: bool) -> String {
        self.key(use_alias).replace('_', "-")
    }

    /// Short type label for usage output.
    pub fn type_label(&self) -> String {
        match &self.ty {
            FieldType::Scalar(s) => s.name().to_uppercase(),
            FieldType::List { items, .. } => format!("{}S", items.name().to_uppercase()),
        }
    }
}

/// Ordered collection of field descriptors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Find a field by its key under the given alias mode.
    pub fn get(&self, key: &str, use_alias: bool) -> Option<&Field> {
        self.fields.iter().find(|f| f.key(use_alias) == key)
    }

    /// Reject schemas the resolver cannot work with.
    ///
    /// Fails on an empty field list, duplicate or reserved keys, and defaults
    /// whose type does not match the field.
    pub fn check(&self, use_alias: bool) -> Result<(), CaepError> {
        if self.fields.is_empty() {
            return Err(CaepError::Schema("schema declares no fields".into()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            let flag = field.flag_name(use_alias);
            if RESERVED_KEYS.contains(&flag.as_str()) {
                return Err(CaepError::Schema(format!(
                    "field '{}' uses the reserved name --{flag}",
                    field.name
                )));
            }
            if !seen.insert(flag.clone()) {
                return Err(CaepError::Schema(format!(
                    "more than one field maps to --{flag}"
                )));
            }
            if let Some(default) = &field.default {
                check_default(field, default)?;
            }
        }
        Ok(())
    }

    /// Build a schema from a JSON-schema style `properties` mapping:
    ///
    /// ```json
    /// {
    ///   "number": {"type": "integer", "default": 1, "description": "..."},
    ///   "strlist": {"type": "array", "items": {"type": "string"}, "split": ","}
    /// }
    /// ```
    ///
    /// Accepts either the bare mapping or an object with a `properties` key.
    /// A `properties` entry that carries its own `type` is a field, not the
    /// wrapper.
    pub fn from_properties(schema: &Json) -> Result<Self, CaepError> {
        let properties = match schema.get("properties") {
            Some(inner) if inner.is_object() && inner.get("type").is_none() => inner,
            _ => schema,
        };
        let Some(properties) = properties.as_object() else {
            return Err(CaepError::Schema(
                "properties must be a JSON object".into(),
            ));
        };
        if properties.is_empty() {
            return Err(CaepError::Schema("unable to get properties from schema".into()));
        }

        let mut out = Schema::new();
        for (name, prop) in properties {
            out = out.field(field_from_property(name, prop)?);
        }
        Ok(out)
    }
}

fn field_from_property(name: &str, prop: &Json) -> Result<Field, CaepError> {
    let field_err = |reason: String| CaepError::Field {
        field: name.to_string(),
        reason,
    };

    let type_name = prop
        .get("type")
        .and_then(Json::as_str)
        .ok_or_else(|| field_err("missing \"type\"".into()))?;

    let ty = if type_name == "array" {
        let item_name = prop
            .get("items")
            .and_then(|items| items.get("type"))
            .and_then(Json::as_str)
            .ok_or_else(|| field_err("array field without \"items.type\"".into()))?;
        let items = ScalarType::from_name(item_name)
            .ok_or_else(|| field_err(format!("unsupported array item type '{item_name}'")))?;
        let delimiter = prop
            .get("split")
            .and_then(Json::as_str)
            .unwrap_or(DEFAULT_DELIMITER);
        FieldType::List {
            items,
            delimiter: delimiter.to_string(),
        }
    } else {
        let scalar = ScalarType::from_name(type_name)
            .ok_or_else(|| field_err(format!("unsupported type '{type_name}'")))?;
        FieldType::Scalar(scalar)
    };

    let mut field = Field::new(name, ty);
    if let Some(text) = prop.get("description").and_then(Json::as_str) {
        field = field.help(text);
    }
    if let Some(alias) = prop.get("alias").and_then(Json::as_str) {
        field = field.alias(alias);
    }
    if let Some(default) = prop.get("default") {
        let value = json_to_value(default)
            .ok_or_else(|| field_err(format!("unsupported default {default}")))?;
        check_default(&field, &value)?;
        field.default = Some(value);
    }
    Ok(field)
}

fn json_to_value(json: &Json) -> Option<Value> {
    match json {
        Json::String(s) => Some(Value::String(s.clone())),
        Json::Bool(b) => Some(Value::Boolean(*b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Some(Value::Integer(i)),
            None => n.as_f64().map(Value::Number),
        },
        Json::Array(items) => items
            .iter()
            .map(json_to_value)
            .collect::<Option<Vec<_>>>()
            .map(Value::List),
        Json::Null | Json::Object(_) => None,
    }
}

fn check_default(field: &Field, default: &Value) -> Result<(), CaepError> {
    let ok = match (&field.ty, default) {
        (FieldType::Scalar(s), v) => s.accepts(v),
        (FieldType::List { items, .. }, Value::List(values)) => {
            values.iter().all(|v| items.accepts(v))
        }
        (FieldType::List { .. }, _) => false,
    };
    if ok {
        Ok(())
    } else {
        Err(CaepError::Field {
            field: field.name.clone(),
            reason: format!("default {default} does not match declared type"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_iff_no_default() {
        assert!(Field::string("str_arg").is_required());
        assert!(!Field::integer("number").default(1).is_required());
    }

    #[test]
    fn list_defaults_to_space_delimiter() {
        let field = Field::list("intlist", ScalarType::Integer);
        assert_eq!(
            field.ty,
            FieldType::List {
                items: ScalarType::Integer,
                delimiter: " ".into()
            }
        );
    }

    #[test]
    fn delimiter_ignored_on_scalar() {
        let field = Field::string("name").delimiter(",");
        assert_eq!(field.ty, FieldType::Scalar(ScalarType::String));
    }

    #[test]
    fn key_uses_alias_only_when_enabled() {
        let field = Field::string("str_arg").alias("string_argument");
        assert_eq!(field.key(false), "str_arg");
        assert_eq!(field.key(true), "string_argument");
        assert_eq!(field.flag_name(true), "string-argument");
        assert_eq!(Field::string("plain").key(true), "plain");
    }

    #[test]
    fn check_rejects_empty_schema() {
        let err = Schema::new().check(false).unwrap_err();
        assert!(matches!(err, CaepError::Schema(_)));
    }

    #[test]
    fn check_rejects_reserved_key() {
        let schema = Schema::new().field(Field::string("config"));
        assert!(matches!(schema.check(false), Err(CaepError::Schema(_))));
    }

    #[test]
    fn check_rejects_dash_underscore_collision() {
        let schema = Schema::new()
            .field(Field::string("str_arg"))
            .field(Field::string("str-arg"));
        assert!(matches!(schema.check(false), Err(CaepError::Schema(_))));
    }

    #[test]
    fn check_rejects_mistyped_default() {
        let schema = Schema::new().field(Field::integer("number").default("one"));
        assert!(matches!(schema.check(false), Err(CaepError::Field { .. })));
    }

    #[test]
    fn from_properties_reads_types_defaults_and_split() {
        let schema = Schema::from_properties(&json!({
            "properties": {
                "str_arg": {"type": "string", "description": "Required String Argument"},
                "number": {"type": "integer", "default": 1},
                "ratio": {"type": "number", "default": 0.5},
                "enabled": {"type": "boolean", "default": false},
                "strlist": {"type": "array", "items": {"type": "string"}, "split": ","}
            }
        }))
        .unwrap();

        let str_arg = schema.get("str_arg", false).unwrap();
        assert!(str_arg.is_required());
        assert_eq!(str_arg.help.as_deref(), Some("Required String Argument"));

        assert_eq!(
            schema.get("number", false).unwrap().default,
            Some(Value::Integer(1))
        );
        assert_eq!(
            schema.get("ratio", false).unwrap().default,
            Some(Value::Number(0.5))
        );
        assert_eq!(
            schema.get("strlist", false).unwrap().ty,
            FieldType::List {
                items: ScalarType::String,
                delimiter: ",".into()
            }
        );
    }

    #[test]
    fn from_properties_empty_is_schema_error() {
        let err = Schema::from_properties(&json!({"properties": {}})).unwrap_err();
        assert!(matches!(err, CaepError::Schema(_)));
    }

    #[test]
    fn from_properties_field_named_properties() {
        let schema = Schema::from_properties(&json!({
            "properties": {"type": "string", "default": "all"},
            "number": {"type": "integer", "default": 1}
        }))
        .unwrap();
        assert_eq!(schema.fields().len(), 2);
        let field = schema.get("properties", false).unwrap();
        assert_eq!(field.default, Some(Value::from("all")));
    }

    #[test]
    fn from_properties_unsupported_type_is_field_error() {
        let err = Schema::from_properties(&json!({"nested": {"type": "object"}})).unwrap_err();
        match err {
            CaepError::Field { field, .. } => assert_eq!(field, "nested"),
            other => panic!("Expected Field, got {other:?}"),
        }
    }

    #[test]
    fn from_properties_unsupported_item_type_is_field_error() {
        let err = Schema::from_properties(&json!({
            "matrix": {"type": "array", "items": {"type": "array"}}
        }))
        .unwrap_err();
        assert!(matches!(err, CaepError::Field { .. }));
    }
}
