//! Command-line surface built with [clap](https://docs.rs/clap).
//!
//! Two parts live here:
//!
//! - [`build_command`] turns a [`Schema`] into a runtime `clap::Command` with
//!   one `--<dash-key>` option per field plus `--config <PATH>`, and
//!   [`command_line_values`] reads the parsed matches back as raw strings for
//!   the resolver.
//! - [`ConfigArgs`] / [`ConfigSubcommand`] are derive types an application can
//!   embed to get `config gen|list|get` subcommands. The only bridge to the
//!   core is [`ConfigArgs::into_action()`].
//!
//! Declared defaults are shown in the help text but never registered with
//! clap, so a flag the user did not pass stays absent and lower-priority
//! sources get their turn.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Args, Command, Subcommand};

use crate::schema::{Field, FieldType, Schema};
use crate::split::join_escaped;
use crate::types::ConfigAction;
use crate::value::Value;

/// Id and long name of the config file option.
pub const CONFIG_ARG: &str = "config";

/// Build the parser for `schema`.
pub fn build_command(
    name: &str,
    description: Option<&str>,
    schema: &Schema,
    use_alias: bool,
) -> Command {
    let mut cmd = Command::new(name.to_string()).arg(
        Arg::new(CONFIG_ARG)
            .long(CONFIG_ARG)
            .value_name("PATH")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Path to the configuration file"),
    );
    if let Some(about) = description {
        cmd = cmd.about(about.to_string());
    }

    for field in schema.fields() {
        let arg = Arg::new(field.key(use_alias).to_string())
            .long(field.flag_name(use_alias))
            .help(help_text(field));
        let arg = if field.is_boolean() {
            arg.action(ArgAction::SetTrue)
        } else {
            arg.action(ArgAction::Set)
                .value_name(field.type_label())
                .value_parser(clap::value_parser!(String))
                .allow_negative_numbers(true)
        };
        cmd = cmd.arg(arg);
    }
    cmd
}

fn help_text(field: &Field) -> String {
    let mut text = field
        .help
        .clone()
        .unwrap_or_else(|| "No help provided".to_string());
    if let FieldType::List { delimiter, .. } = &field.ty
        && delimiter != " "
    {
        text.push_str(&format!(" (separated by {delimiter:?})"));
    }
    if let Some(default) = &field.default {
        text.push_str(&format!(" [default: {}]", render_raw(field, default)));
    }
    text
}

/// Render a value the way a user would type it for `field`.
pub fn render_raw(field: &Field, value: &Value) -> String {
    match (&field.ty, value) {
        (FieldType::List { delimiter, .. }, Value::List(items)) => {
            let items: Vec<String> = items.iter().map(Value::to_string).collect();
            join_escaped(&items, delimiter)
        }
        _ => value.to_string(),
    }
}

/// Raw command-line values keyed by field key.
///
/// Flags the user didn't pass are absent. A boolean flag that is present
/// yields the negation of the field's declared default.
pub fn command_line_values(
    schema: &Schema,
    use_alias: bool,
    matches: &ArgMatches,
) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for field in schema.fields() {
        let key = field.key(use_alias);
        if field.is_boolean() {
            if matches.get_flag(key) {
                let declared = field
                    .default
                    .as_ref()
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                out.insert(key.to_string(), (!declared).to_string());
            }
        } else if let Some(raw) = matches.get_one::<String>(key) {
            out.insert(key.to_string(), raw.clone());
        }
    }
    out
}

/// The `--config` path, if given.
pub fn config_path(matches: &ArgMatches) -> Option<PathBuf> {
    matches.get_one::<PathBuf>(CONFIG_ARG).cloned()
}

/// Clap-derived args for the `config` subcommand group.
///
/// Embed this into your app's clap derive:
/// ```ignore
/// #[derive(Subcommand)]
/// enum Commands {
///     Config(ConfigArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show all resolved values and where each came from.
    List,
    /// Generate a commented sample configuration file.
    Gen {
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the resolved value and help text for a field.
    Get {
        /// Field key (e.g. "str_arg").
        key: String,
    },
}

impl ConfigArgs {
    /// Convert clap-parsed args into a framework-agnostic `ConfigAction`.
    ///
    /// Bare `config` (no subcommand) and explicit `config list` both map to
    /// `ConfigAction::List`.
    pub fn into_action(self) -> ConfigAction {
        match self.action {
            None | Some(ConfigSubcommand::List) => ConfigAction::List,
            Some(ConfigSubcommand::Gen { output }) => ConfigAction::Gen { output },
            Some(ConfigSubcommand::Get { key }) => ConfigAction::Get { key },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::arguments_schema;
    use crate::schema::Field;
    use clap::Parser;

    fn matches(args: &[&str]) -> ArgMatches {
        build_command("test", None, &arguments_schema(), false)
            .try_get_matches_from(args)
            .unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        build_command("test", Some("Program description"), &arguments_schema(), false)
            .debug_assert();
    }

    #[test]
    fn dash_cased_flags() {
        let m = matches(&["test", "--str-arg", "test"]);
        let values = command_line_values(&arguments_schema(), false, &m);
        assert_eq!(values["str_arg"], "test");
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn absent_flags_stay_absent() {
        let m = matches(&["test"]);
        assert!(command_line_values(&arguments_schema(), false, &m).is_empty());
    }

    #[test]
    fn bool_flag_flips_false_default() {
        let m = matches(&["test", "--enabled"]);
        let values = command_line_values(&arguments_schema(), false, &m);
        assert_eq!(values["enabled"], "true");
    }

    #[test]
    fn bool_flag_flips_true_default() {
        let schema = Schema::new().field(Field::boolean("color").default(true));
        let m = build_command("test", None, &schema, false)
            .try_get_matches_from(["test", "--color"])
            .unwrap();
        let values = command_line_values(&schema, false, &m);
        assert_eq!(values["color"], "false");
    }

    #[test]
    fn bool_flag_takes_no_value() {
        let result = build_command("test", None, &arguments_schema(), false)
            .try_get_matches_from(["test", "--enabled", "yes"]);
        assert!(result.is_err());
    }

    #[test]
    fn negative_number_value() {
        let m = matches(&["test", "--number", "-5"]);
        let values = command_line_values(&arguments_schema(), false, &m);
        assert_eq!(values["number"], "-5");
    }

    #[test]
    fn negative_number_list_value() {
        let m = matches(&["test", "--intlist", "-1"]);
        let values = command_line_values(&arguments_schema(), false, &m);
        assert_eq!(values["intlist"], "-1");
    }

    #[test]
    fn value_option_does_not_swallow_next_flag() {
        let result = build_command("test", None, &arguments_schema(), false)
            .try_get_matches_from(["test", "--str-arg", "--enabled"]);
        assert!(result.is_err());
    }

    #[test]
    fn value_option_takes_negative_number() {
        let m = matches(&["test", "--str-arg", "-5"]);
        let values = command_line_values(&arguments_schema(), false, &m);
        assert_eq!(values["str_arg"], "-5");
    }

    #[test]
    fn explicit_empty_value_is_present() {
        let m = matches(&["test", "--strlist", ""]);
        let values = command_line_values(&arguments_schema(), false, &m);
        assert_eq!(values["strlist"], "");
    }

    #[test]
    fn config_flag_parsed() {
        let m = matches(&["test", "--config", "/etc/app.ini"]);
        assert_eq!(config_path(&m), Some(PathBuf::from("/etc/app.ini")));
        assert!(command_line_values(&arguments_schema(), false, &m).is_empty());
    }

    #[test]
    fn unknown_flag_is_error() {
        let result = build_command("test", None, &arguments_schema(), false)
            .try_get_matches_from(["test", "--nope", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn alias_flags() {
        let schema = Schema::new().field(Field::string("str_arg").alias("text_value"));
        let m = build_command("test", None, &schema, true)
            .try_get_matches_from(["test", "--text-value", "x"])
            .unwrap();
        assert_eq!(command_line_values(&schema, true, &m)["text_value"], "x");
    }

    #[test]
    fn help_shows_defaults_and_delimiters() {
        let help = build_command("test", None, &arguments_schema(), false)
            .render_help()
            .to_string();
        assert!(help.contains("--str-arg"));
        assert!(help.contains("[default: 1]"));
        assert!(help.contains("separated by \",\""));
        assert!(help.contains("--config"));
    }

    #[test]
    fn render_raw_list_uses_delimiter() {
        let field = Field::list("strlist", crate::value::ScalarType::String).delimiter(",");
        let value = Value::from(vec!["a,b", "c"]);
        assert_eq!(render_raw(&field, &value), r"a\,b,c");
    }

    // --- ConfigArgs ---

    /// Wrapper so we can use `try_parse_from` on the subcommand.
    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    fn parse(args: &[&str]) -> ConfigArgs {
        TestCli::try_parse_from(args).unwrap().config
    }

    #[test]
    fn parse_gen_no_output() {
        let action = parse(&["test", "gen"]).into_action();
        assert_eq!(action, ConfigAction::Gen { output: None });
    }

    #[test]
    fn parse_gen_with_output() {
        let action = parse(&["test", "gen", "-o", "out.ini"]).into_action();
        assert_eq!(
            action,
            ConfigAction::Gen {
                output: Some(PathBuf::from("out.ini"))
            }
        );
    }

    #[test]
    fn parse_get() {
        let action = parse(&["test", "get", "number"]).into_action();
        assert_eq!(
            action,
            ConfigAction::Get {
                key: "number".into()
            }
        );
    }

    #[test]
    fn parse_bare_config_is_list() {
        assert_eq!(parse(&["test"]).into_action(), ConfigAction::List);
        assert_eq!(parse(&["test", "list"]).into_action(), ConfigAction::List);
    }

    #[test]
    fn invalid_subcommand_errors() {
        assert!(TestCli::try_parse_from(["test", "nope"]).is_err());
    }
}
