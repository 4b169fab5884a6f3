use std::fmt;
use std::path::PathBuf;

/// Where to search for the config file when no path is given explicitly.
///
/// Lists are priority-ascending: the last directory that contains the file wins.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory for the config id (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}

/// What to do with keys in the config section that match no declared field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownKeyPolicy {
    /// Skip them silently.
    #[default]
    Ignore,
    /// Report every unknown key and abort the load.
    Fail,
}

impl std::str::FromStr for UnknownKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(UnknownKeyPolicy::Ignore),
            "fail" => Ok(UnknownKeyPolicy::Fail),
            other => Err(format!(
                "unknown config key policy '{other}' (expected \"ignore\" or \"fail\")"
            )),
        }
    }
}

/// The source a resolved value came from, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    CommandLine,
    Environment,
    ConfigFile,
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::CommandLine => "command line",
            Source::Environment => "environment",
            Source::ConfigFile => "config file",
            Source::Default => "default",
        };
        f.write_str(name)
    }
}

/// A config operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    List,
    Gen { output: Option<PathBuf> },
    Get { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_recognized_values() {
        assert_eq!("ignore".parse(), Ok(UnknownKeyPolicy::Ignore));
        assert_eq!("fail".parse(), Ok(UnknownKeyPolicy::Fail));
    }

    #[test]
    fn policy_rejects_other_values() {
        let err = "strict".parse::<UnknownKeyPolicy>().unwrap_err();
        assert!(err.contains("strict"));
    }

    #[test]
    fn sources_order_by_precedence() {
        assert!(Source::CommandLine < Source::Environment);
        assert!(Source::Environment < Source::ConfigFile);
        assert!(Source::ConfigFile < Source::Default);
    }
}
