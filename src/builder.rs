use std::ffi::OsString;
use std::marker::PhantomData;
use std::path::PathBuf;

use clap::Command;
use serde::de::DeserializeOwned;

use crate::cli;
use crate::env::env_var_name;
use crate::error::CaepError;
use crate::file;
use crate::ops::{self, ConfigResult};
use crate::report;
use crate::resolve::{self, ConfigSection, ResolveInput, ResolvedValues};
use crate::schema::{ConfigSchema, Schema};
use crate::types::{ConfigAction, SearchPath, UnknownKeyPolicy};

/// Entry point for building a caep configuration load.
pub struct Caep;

impl Caep {
    /// Start a builder for `T`, taking its fields from [`ConfigSchema::schema`].
    pub fn builder<T: ConfigSchema>() -> CaepBuilder<T> {
        CaepBuilder::new().schema(T::schema())
    }

    /// Start a builder for `T` with an explicit schema.
    pub fn with_schema<T>(schema: Schema) -> CaepBuilder<T> {
        CaepBuilder::new().schema(schema)
    }
}

/// Builder for configuring and running one configuration load.
///
/// Sources are consulted per field in fixed order: command line, environment,
/// config file section, declared default.
pub struct CaepBuilder<T> {
    schema: Option<Schema>,
    description: Option<String>,
    config_id: Option<String>,
    file_name: Option<String>,
    section_name: Option<String>,
    use_alias: bool,
    args: Option<Vec<OsString>>,
    env_vars: Option<Vec<(String, String)>>,
    env_enabled: bool,
    config_env: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    unknown_key_policy: UnknownKeyPolicy,
    require_section: bool,
    raise_on_validation_error: bool,
    _phantom: PhantomData<T>,
}

impl<T> CaepBuilder<T> {
    fn new() -> Self {
        Self {
            schema: None,
            description: None,
            config_id: None,
            file_name: None,
            section_name: None,
            use_alias: false,
            args: None,
            env_vars: None,
            env_enabled: true,
            config_env: None,
            search_paths: None,
            unknown_key_policy: UnknownKeyPolicy::default(),
            require_section: false,
            raise_on_validation_error: false,
            _phantom: PhantomData,
        }
    }

    /// Replace the field list.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Program description shown in `--help`.
    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Set the per-application identifier. This derives sensible defaults:
    /// - `file_name` → `"{config_id}.ini"`
    /// - `section_name` → `"{config_id}"`
    /// - config env var → `"{CONFIG_ID}_CONFIG"`
    /// - the `Platform` search path → `~/.config/{config_id}/` on Linux
    pub fn config_id(mut self, id: &str) -> Self {
        self.config_id = Some(id.to_string());
        self
    }

    /// Override the config file name (default: `"{config_id}.ini"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// INI section to read values from (default: the config id).
    pub fn section_name(mut self, name: &str) -> Self {
        self.section_name = Some(name.to_string());
        self
    }

    /// Look fields up by their alias instead of their name, in every source.
    pub fn alias(mut self, enabled: bool) -> Self {
        self.use_alias = enabled;
        self
    }

    /// Parse these arguments instead of the process arguments.
    /// Do not include the program name.
    pub fn opts<I, S>(mut self, opts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = Some(opts.into_iter().map(Into::into).collect());
        self
    }

    /// Read these variables instead of the process environment.
    pub fn env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Stop reading field values from the environment. The config env var is
    /// still honoured.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Name of the env var that points at the config file
    /// (default: `"{CONFIG_ID}_CONFIG"`).
    pub fn config_env(mut self, name: &str) -> Self {
        self.config_env = Some(name.to_string());
        self
    }

    /// Replace the default search paths entirely.
    ///
    /// Paths are listed in **priority-ascending** order: the last entry has the
    /// highest priority. See [`SearchPath`] for the available variants.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path (highest priority so far) without replacing the defaults.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(default_search_paths)
            .push(path);
        self
    }

    /// What to do with keys in the config section that match no field
    /// (default: [`UnknownKeyPolicy::Ignore`]).
    pub fn unknown_config_key(mut self, policy: UnknownKeyPolicy) -> Self {
        self.unknown_key_policy = policy;
        self
    }

    /// Treat a config file without the section as an error (default: `false`).
    pub fn require_section(mut self, required: bool) -> Self {
        self.require_section = required;
        self
    }

    /// Make [`load`](Self::load) return validation and command-line errors
    /// instead of printing them and exiting (default: `false`).
    pub fn raise_on_validation_error(mut self, raise: bool) -> Self {
        self.raise_on_validation_error = raise;
        self
    }

    fn effective_config_id(&self) -> Result<&str, CaepError> {
        self.config_id
            .as_deref()
            .ok_or(CaepError::ConfigIdRequired)
    }

    fn effective_schema(&self) -> Result<&Schema, CaepError> {
        self.schema
            .as_ref()
            .ok_or_else(|| CaepError::Schema("no schema given".into()))
    }

    fn effective_file_name(&self) -> Result<String, CaepError> {
        if let Some(name) = &self.file_name {
            return Ok(name.clone());
        }
        let id = self.effective_config_id()?;
        Ok(format!("{id}.ini"))
    }

    fn effective_section_name(&self) -> Result<String, CaepError> {
        if let Some(name) = &self.section_name {
            return Ok(name.clone());
        }
        Ok(self.effective_config_id()?.to_string())
    }

    fn effective_config_env(&self) -> Result<String, CaepError> {
        if let Some(name) = &self.config_env {
            return Ok(name.clone());
        }
        let id = self.effective_config_id()?;
        Ok(format!("{}_CONFIG", env_var_name(id)))
    }

    fn effective_search_paths(&self) -> Vec<SearchPath> {
        self.search_paths
            .clone()
            .unwrap_or_else(default_search_paths)
    }

    fn effective_args(&self) -> Result<Vec<OsString>, CaepError> {
        match &self.args {
            Some(opts) => {
                let mut argv = vec![OsString::from(self.effective_config_id()?)];
                argv.extend(opts.iter().cloned());
                Ok(argv)
            }
            None => Ok(std::env::args_os().collect()),
        }
    }

    fn effective_env_vars(&self) -> Vec<(String, String)> {
        match &self.env_vars {
            Some(vars) => vars.clone(),
            None => std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// The command-line parser for the current schema.
    pub fn command(&self) -> Result<Command, CaepError> {
        let schema = self.effective_schema()?;
        schema.check(self.use_alias)?;
        Ok(cli::build_command(
            self.effective_config_id()?,
            self.description.as_deref(),
            schema,
            self.use_alias,
        ))
    }

    /// Help text of the command-line parser, used after a validation report.
    pub fn usage(&self) -> String {
        self.command()
            .map(|mut cmd| cmd.render_help().to_string())
            .unwrap_or_default()
    }

    /// Gather every source into a `ResolveInput`. All I/O happens here.
    fn build_input(&self) -> Result<ResolveInput, CaepError> {
        let config_id = self.effective_config_id()?;
        let schema = self.effective_schema()?;
        let matches = self.command()?.try_get_matches_from(self.effective_args()?)?;
        let command_line = cli::command_line_values(schema, self.use_alias, &matches);

        let env_vars = self.effective_env_vars();
        let config_env = self.effective_config_env()?;
        let from_env = env_vars
            .iter()
            .find(|(k, v)| *k == config_env && !v.is_empty())
            .map(|(_, v)| PathBuf::from(v));

        let found = file::locate(
            cli::config_path(&matches),
            from_env,
            &self.effective_search_paths(),
            &self.effective_file_name()?,
            config_id,
        )?;

        let section_name = self.effective_section_name()?;
        let config = match found {
            Some(found) => file::load_section(&found, &section_name, self.require_section)?
                .map(|section| ConfigSection {
                    path: found.path.clone(),
                    section,
                }),
            None => None,
        };

        Ok(ResolveInput {
            command_line,
            env_vars,
            env_enabled: self.env_enabled,
            config,
            unknown_key_policy: self.unknown_key_policy,
        })
    }

    /// Resolve every field to a typed value, without building `T`.
    pub fn resolve(&self) -> Result<ResolvedValues, CaepError> {
        let input = self.build_input()?;
        resolve::resolve(self.effective_schema()?, self.use_alias, input)
    }

    /// Resolve and build `T`. Never prints and never exits.
    pub fn parse(&self) -> Result<T, CaepError>
    where
        T: DeserializeOwned,
    {
        self.resolve()?.into_config()
    }

    /// Resolve and build `T` for use at a program's entry point.
    ///
    /// Unless [`raise_on_validation_error`](Self::raise_on_validation_error)
    /// is set, a validation failure prints one line per failing field plus the
    /// help text to stderr and exits with status 1, and a malformed command
    /// line (or `--help`) is handled by clap. All other errors are returned.
    pub fn load(self) -> Result<T, CaepError>
    where
        T: DeserializeOwned,
    {
        match self.parse() {
            Err(CaepError::Validation(err)) if !self.raise_on_validation_error => {
                eprint!("{}", report::render(&err, &self.usage()));
                std::process::exit(report::EXIT_VALIDATION);
            }
            Err(CaepError::Cli(err)) if !self.raise_on_validation_error => err.exit(),
            other => other,
        }
    }

    /// Handle a `ConfigAction` and print the result to stdout.
    pub fn handle_and_print(&self, action: &ConfigAction) -> Result<(), CaepError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }

    /// Handle a `ConfigAction` (list / gen / get).
    pub fn handle(&self, action: &ConfigAction) -> Result<ConfigResult, CaepError> {
        let schema = self.effective_schema()?;
        match action {
            ConfigAction::List => {
                let values = self.resolve()?;
                Ok(ops::list_values(schema, self.use_alias, &values))
            }
            ConfigAction::Gen { output } => {
                let template = ops::generate_template(
                    schema,
                    &self.effective_section_name()?,
                    self.use_alias,
                );
                match output {
                    Some(path) => {
                        if let Some(parent) = path.parent()
                            && !parent.as_os_str().is_empty()
                        {
                            std::fs::create_dir_all(parent).map_err(|e| CaepError::IoError {
                                path: parent.to_path_buf(),
                                source: e,
                            })?;
                        }
                        std::fs::write(path, &template).map_err(|e| CaepError::IoError {
                            path: path.clone(),
                            source: e,
                        })?;
                        Ok(ConfigResult::TemplateWritten { path: path.clone() })
                    }
                    None => Ok(ConfigResult::Template(template)),
                }
            }
            ConfigAction::Get { key } => {
                let values = self.resolve()?;
                ops::get_value(schema, self.use_alias, &values, key)
            }
        }
    }
}

/// `/etc` first, the platform config directory last (highest priority).
fn default_search_paths() -> Vec<SearchPath> {
    vec![SearchPath::Path(PathBuf::from("/etc")), SearchPath::Platform]
}
