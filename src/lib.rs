//! Layered configuration for command-line programs. Declare your fields once,
//! and read them from the command line, the environment, and an INI file.
//!
//! ```ignore
//! let config: Arguments = Caep::builder()
//!     .config_id("myapp")
//!     .description("Program description")
//!     .load()?;
//! ```
//!
//! That call builds a parser with one `--<flag>` per field, looks for
//! `myapp.ini` in `/etc` and the platform config directory, reads the
//! `[myapp]` section, consults the environment, fills in declared defaults,
//! and hands you a typed struct.
//!
//! # Declaring fields
//!
//! A [`Schema`] is an ordered list of [`Field`]s. Each field has a name, a
//! type ([`ScalarType`] or a list of one), an optional default, help text and
//! an optional alias. Fields without a default are required.
//!
//! ```ignore
//! impl ConfigSchema for Arguments {
//!     fn schema() -> Schema {
//!         Schema::new()
//!             .field(Field::string("str_arg").help("Required String Argument"))
//!             .field(Field::integer("number").default(1))
//!             .field(Field::boolean("enabled").default(false))
//!             .field(Field::list("strlist", ScalarType::String).delimiter(","))
//!     }
//! }
//! ```
//!
//! A schema can also be read from a JSON properties mapping with
//! [`Schema::from_properties`]. The typed result is built by serde, so the
//! struct only needs `#[derive(Deserialize)]`.
//!
//! # Source precedence
//!
//! ```text
//! Declared default      Field::default(...)
//!        ↑ overridden by
//! Config file section   [section] in the located INI file
//!        ↑ overridden by
//! Environment           STR_ARG, NUMBER, ...
//!        ↑ overridden by
//! Command line          --str-arg, --number, ...
//! ```
//!
//! Each field is resolved on its own: the highest-priority source that has a
//! value for it wins, and that value alone is converted to the field's type.
//! A value that fails conversion is reported, it does not fall through to a
//! lower source.
//!
//! # Names
//!
//! A field named `str_arg` is `--str-arg` on the command line, `STR_ARG` in
//! the environment and `str_arg` (or `str-arg`) in the INI section. With
//! [`alias(true)`](CaepBuilder::alias) the alias replaces the name in every
//! source, and in the resolved result.
//!
//! # Values
//!
//! - Booleans are flags on the command line; passing one flips the declared
//!   default. In the environment and the INI file only `true` and `yes`
//!   (any case) mean true.
//! - Lists are split on their delimiter (a space unless configured). A
//!   backslash before the delimiter keeps it as data: `a\,b,c` is
//!   `["a,b", "c"]` with delimiter `,`. See [`split_escaped`].
//! - An absent or empty list resolves to `[]`.
//!
//! # Finding the config file
//!
//! 1. `--config <PATH>` on the command line.
//! 2. The env var named by [`config_env()`](CaepBuilder::config_env)
//!    (default `{CONFIG_ID}_CONFIG`).
//! 3. [`search_paths()`](CaepBuilder::search_paths), in priority-ascending
//!    order: the last directory containing the file wins.
//!
//! An explicitly named file that does not exist is an error. Nothing found
//! on the search paths simply means the file contributes no values.
//!
//! # Validation failures
//!
//! Every missing or malformed field is collected. [`CaepBuilder::load`] prints
//! one line per field, `<message> for --<flag>`, then the help text, and
//! exits with status 1. [`CaepBuilder::parse`] returns the same failures as
//! [`CaepError::Validation`] instead.
//!
//! # Config subcommands
//!
//! [`ConfigArgs`] gives an application `config gen|list|get` subcommands.
//! `gen` writes a commented INI template from the field help and defaults,
//! `list` shows every resolved value with its [`Source`], and `get` shows one.
//!
//! # Logging
//!
//! Discovery and resolution decisions are emitted as `tracing` debug events.
//! Ignored unknown keys and unrecognized boolean tokens are debug and warn
//! events respectively. The library never installs a subscriber.

pub mod error;
pub mod ini;
pub mod schema;
pub mod split;
pub mod types;
pub mod value;

mod builder;
mod cli;
mod env;
mod file;
mod ops;
mod report;
mod resolve;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::{Caep, CaepBuilder};
pub use cli::{ConfigArgs, ConfigSubcommand};
pub use error::{CaepError, FieldIssue, ValidationError};
pub use ops::ConfigResult;
pub use report::EXIT_VALIDATION;
pub use resolve::{ResolvedValue, ResolvedValues};
pub use schema::{ConfigSchema, Field, FieldType, Schema};
pub use split::split_escaped;
pub use types::{ConfigAction, SearchPath, Source, UnknownKeyPolicy};
pub use value::{ScalarType, Value};
