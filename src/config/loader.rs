//! Configuration loading with layered precedence.
//!
//! This module loads configuration with the precedence order (lowest to
//! highest): application defaults, configuration file, environment
//! variables, command-line arguments.
//!
//! Layers are composed manually with `MergeComposer` because the `Cli`
//! struct owns subcommand dispatch and `--config`, and because typed
//! environment values must fail fast instead of being silently ignored.
//!
//! # Environment Variable Handling
//!
//! Environment variables with unparseable values (e.g.,
//! `DOCKERLINK_TLS_VERIFY=maybe` instead of `true`/`false`) return an error
//! immediately. String fields are always accepted.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};
use tracing::debug;

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`). Invalid values return an error.
    Bool,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `DOCKERLINK_DOCKER_HOST`).
    env_var: &'static str,
    /// The configuration field it sets.
    field: &'static str,
    /// The expected value type.
    var_type: EnvVarType,
}

/// Table of all environment variables and the fields they set.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "DOCKERLINK_NAME",
        field: "name",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKERLINK_DOCKER_HOST",
        field: "docker_host",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKERLINK_CERT_PATH",
        field: "cert_path",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKERLINK_TLS_VERIFY",
        field: "tls_verify",
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "DOCKERLINK_CONFIG_DIR",
        field: "config_dir",
        var_type: EnvVarType::String,
    },
];

/// Returns the list of environment variable names recognised by the config loader.
///
/// Tests use this to clear every `DOCKERLINK_*` variable before running.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load a configuration file and push it to the composer.
///
/// Uses `cap_std::fs_utf8` to open the parent directory of the config file
/// and read from there.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    // A bare file name has an empty parent.
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ReadFailed {
            path: parent.to_owned(),
            message: e.to_string(),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ReadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            message: e.to_string(),
        })?;

    debug!(%path, "loaded configuration file");
    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Load configuration with full layer precedence.
///
/// Later sources override earlier ones:
/// 1. Application defaults defined in the struct
/// 2. Configuration file (from `--config`, or discovered via XDG paths or
///    `DOCKERLINK_CONFIG_PATH`). An explicit `--config` must exist.
/// 3. Environment variables prefixed with `DOCKERLINK_`
/// 4. Command-line arguments (from the provided `Cli`)
///
/// # Errors
///
/// Returns `ConfigError` if configuration loading fails due to:
/// - A missing or unreadable `--config` file
/// - Malformed configuration files
/// - Invalid typed environment variable values
/// - Layer merging failures
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::InvalidValue {
            field: String::from("defaults"),
            reason: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    let config_path: Option<Utf8PathBuf> =
        cli.config.clone().or_else(|| {
            let discovery = ConfigDiscovery::builder("dockerlink")
                .env_var("DOCKERLINK_CONFIG_PATH")
                .config_file_name("config.toml")
                .dotfile_name(".dockerlink.toml")
                .build();
            discovery
                .candidates()
                .into_iter()
                .filter(|p| p.exists())
                .find_map(|p| Utf8PathBuf::try_from(p).ok())
        });

    if let Some(ref path) = config_path {
        load_config_file(path, &mut composer)?;
    }

    let env_values = collect_env_vars()?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;

    Ok(config)
}

/// Collect `DOCKERLINK_*` environment variables into a JSON object.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a boolean variable has an
/// unparseable value.
fn collect_env_vars() -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Ok(raw_value) = std::env::var(spec.env_var) else {
            continue;
        };

        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::Bool => match raw_value.parse::<bool>() {
                Ok(b) => Value::Bool(b),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected bool (true/false), got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };

        root.insert(spec.field.to_owned(), json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref name) = cli.name {
        overrides.insert("name".to_owned(), Value::String(name.clone()));
    }
    if let Some(ref host) = cli.docker_host {
        overrides.insert("docker_host".to_owned(), Value::String(host.clone()));
    }
    if let Some(ref path) = cli.cert_path {
        overrides.insert("cert_path".to_owned(), Value::String(path.to_string()));
    }
    if let Some(verify) = cli.tls_verify {
        overrides.insert("tls_verify".to_owned(), Value::Bool(verify));
    }
    if let Some(ref dir) = cli.config_dir {
        overrides.insert("config_dir".to_owned(), Value::String(dir.to_string()));
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
