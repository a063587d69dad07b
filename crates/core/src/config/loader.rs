use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `SEASONWATCH_CATALOG__API_KEY`.
pub const ENV_PREFIX: &str = "SEASONWATCH_";

/// Separator between nested keys in environment overrides.
const ENV_NESTING: &str = "__";

/// Layers: the TOML file, then `SEASONWATCH_*` variables on top.
///
/// Nested keys use a double underscore so single underscores stay inside
/// key names (`SEASONWATCH_INVENTORY__MYSQL__PASSWORD`).
fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split(ENV_NESTING))
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    figment(path)
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from a TOML string, without environment overrides
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
