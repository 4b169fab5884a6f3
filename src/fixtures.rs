#[cfg(test)]
pub mod test {
    use std::fs;
    use std::path::PathBuf;

    use serde::Deserialize;
    use tempfile::TempDir;

    use crate::schema::{ConfigSchema, Field, Schema};
    use crate::value::ScalarType;

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct Arguments {
        pub str_arg: String,
        pub number: i64,
        pub enabled: bool,
        pub intlist: Vec<i64>,
        pub strlist: Vec<String>,
    }

    impl ConfigSchema for Arguments {
        fn schema() -> Schema {
            arguments_schema()
        }
    }

    pub fn arguments_schema() -> Schema {
        Schema::new()
            .field(Field::string("str_arg").help("Required String Argument"))
            .field(
                Field::integer("number")
                    .default(1)
                    .help("Integer with default value"),
            )
            .field(
                Field::boolean("enabled")
                    .default(false)
                    .help("Boolean with default value"),
            )
            .field(Field::list("intlist", ScalarType::Integer).help("Space separated list of ints"))
            .field(
                Field::list("strlist", ScalarType::String)
                    .delimiter(",")
                    .help("Comma separated list of strings"),
            )
    }

    /// Sample INI file with a `test` section and keys the schema doesn't know.
    pub const TEST_INI: &str = "\
[test]
number = 3
str_arg = from ini
enabled = true
str_underscore = also from ini
intlist = 1 2 3
strlist = a\\,b,c

[other]
number = 99
";

    /// Write `content` to `name` inside a fresh temp dir.
    pub fn write_ini(content: &str, name: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn arguments_schema_is_valid() {
        let schema = Arguments::schema();
        assert!(schema.check(false).is_ok());
        assert_eq!(schema.fields().len(), 5);
    }
}
