//! Configuration struct for the caep demo application.
//!
//! The fields mirror a typical worker process: one required string, a few
//! scalars with defaults and two lists with different delimiters.
//!
//! # Env var mapping
//!
//! | Env var      | Field      |
//! |--------------|------------|
//! | `STR_ARG`    | `str_arg`  |
//! | `NUMBER`     | `number`   |
//! | `ENABLED`    | `enabled`  |
//! | `INTLIST`    | `intlist`  |
//! | `STRLIST`    | `strlist`  |

use caep::{ConfigSchema, Field, ScalarType, Schema};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct DemoConfig {
    pub str_arg: String,
    pub number: i64,
    pub enabled: bool,
    pub ratio: f64,
    pub intlist: Vec<i64>,
    pub strlist: Vec<String>,
}

impl ConfigSchema for DemoConfig {
    fn schema() -> Schema {
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
            .field(Field::number("ratio").default(0.5).help("Float with default value"))
            .field(Field::list("intlist", ScalarType::Integer).help("Space separated list of ints"))
            .field(
                Field::list("strlist", ScalarType::String)
                    .delimiter(",")
                    .help("Comma separated list of strings"),
            )
    }
}
