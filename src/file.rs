//! Config file discovery and loading.
//!
//! The config file location is resolved once per load, in order:
//!
//! 1. `--config <path>` on the command line.
//! 2. The config env var (by default `{CONFIG_ID}_CONFIG`).
//! 3. The search paths: each [`SearchPath`] is resolved to a directory and
//!    checked for `{dir}/{file_name}`. Lists are priority-ascending, so the
//!    list is searched from the end and the first file found wins.
//!
//! An explicit path (1 or 2) that does not exist is an error. A file missing
//! from every search path is not: the file source then contributes nothing.
//! Only actual I/O errors (permissions, etc.) are propagated in that case.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CaepError;
use crate::ini::{self, IniSection};
use crate::types::SearchPath;

/// How the config file path was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Flag,
    EnvVar,
    SearchPath,
}

/// A config file that was found and read.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub content: String,
    pub origin: Origin,
}

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// `config_id` is used by `SearchPath::Platform` to construct the platform-specific
/// config directory (e.g. `~/.config/{config_id}/` on Linux).
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath, config_id: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", config_id)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Determine and read the config file, if any.
///
/// `from_flag` and `from_env` are explicit user choices and must exist.
pub fn locate(
    from_flag: Option<PathBuf>,
    from_env: Option<PathBuf>,
    search_paths: &[SearchPath],
    file_name: &str,
    config_id: &str,
) -> Result<Option<ConfigFile>, CaepError> {
    let explicit = from_flag
        .map(|p| (p, Origin::Flag))
        .or_else(|| from_env.map(|p| (p, Origin::EnvVar)));

    if let Some((path, origin)) = explicit {
        debug!(path = %path.display(), ?origin, "using explicit config file");
        return match read_optional(&path)? {
            Some(content) => Ok(Some(ConfigFile {
                path,
                content,
                origin,
            })),
            None => Err(CaepError::ConfigNotFound { path }),
        };
    }

    let dirs: Vec<PathBuf> = search_paths
        .iter()
        .filter_map(|sp| resolve_search_path(sp, config_id))
        .collect();

    for dir in dirs.iter().rev() {
        let path = dir.join(file_name);
        if let Some(content) = read_optional(&path)? {
            debug!(path = %path.display(), "found config file on search path");
            return Ok(Some(ConfigFile {
                path,
                content,
                origin: Origin::SearchPath,
            }));
        }
    }

    debug!(file_name, "no config file found on search paths");
    Ok(None)
}

/// Read a file, mapping not-found (and directories) to `None`.
fn read_optional(path: &Path) -> Result<Option<String>, CaepError> {
    if path.is_dir() {
        return Ok(None);
    }
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CaepError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Parse `file` and extract `section`.
///
/// A missing section yields `None`, or [`CaepError::MissingSection`] when
/// `require_section` is set.
pub fn load_section(
    file: &ConfigFile,
    section: &str,
    require_section: bool,
) -> Result<Option<IniSection>, CaepError> {
    let doc = ini::parse(&file.content, &file.path)?;
    match doc.section(section) {
        Some(s) => Ok(Some(s)),
        None if require_section => Err(CaepError::MissingSection {
            section: section.to_string(),
            path: file.path.clone(),
        }),
        None => {
            debug!(section, path = %file.path.display(), "section not present in config file");
            Ok(None)
        }
    }
}
