//! Discovery of engine connection documents on disk.
//!
//! [`DockerConfigLoader`] looks inside a directory for `config.json` first and
//! a docker-machine style `env` file second. Filesystem access goes through
//! `cap_std::fs_utf8` so the loader only ever touches the directory it was
//! handed.

use std::io::ErrorKind;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::serde_json::{self, Value};
use tracing::debug;

use super::ConfigDocument;
use crate::error::{ConfigError, Result};

/// JSON document file name.
const JSON_FILE: &str = "config.json";

/// Shell env file name.
const ENV_FILE: &str = "env";

/// Loads a [`ConfigDocument`] from a configuration directory.
pub trait ConfigLoader {
    /// Loads the document stored in `directory`.
    ///
    /// Returns `Ok(None)` when the directory holds no recognised config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a config file exists but cannot be read or
    /// parsed.
    fn load(&self, directory: &Utf8Path) -> Result<Option<ConfigDocument>>;
}

/// The default loader for engine configuration directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct DockerConfigLoader;

impl ConfigLoader for DockerConfigLoader {
    fn load(&self, directory: &Utf8Path) -> Result<Option<ConfigDocument>> {
        let dir = match Dir::open_ambient_dir(directory, ambient_authority()) {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(%directory, "config directory does not exist");
                return Ok(None);
            }
            Err(e) => {
                return Err(ConfigError::ReadFailed {
                    path: directory.to_owned(),
                    message: e.to_string(),
                }
                .into());
            }
        };

        if let Some(content) = read_optional(&dir, directory, JSON_FILE)? {
            let path = directory.join(JSON_FILE);
            let value =
                serde_json::from_str::<Value>(&content).map_err(|e| ConfigError::ParseError {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            let document = ConfigDocument::from_json(&value).ok_or_else(|| {
                ConfigError::ParseError {
                    path: path.clone(),
                    message: String::from("expected a JSON object"),
                }
            })?;
            debug!(%path, keys = document.len(), "loaded engine config");
            return Ok(Some(document));
        }

        if let Some(content) = read_optional(&dir, directory, ENV_FILE)? {
            let document = ConfigDocument::from_env_file(&content);
            debug!(path = %directory.join(ENV_FILE), keys = document.len(), "loaded engine env file");
            return Ok(Some(document));
        }

        Ok(None)
    }
}

/// Reads `file_name` from `dir`, treating a missing file as `None`.
fn read_optional(dir: &Dir, directory: &Utf8Path, file_name: &str) -> Result<Option<String>> {
    match dir.read_to_string(file_name) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::ReadFailed {
            path: directory.join(file_name),
            message: e.to_string(),
        }
        .into()),
    }
}
