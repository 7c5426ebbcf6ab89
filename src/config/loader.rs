use std::path::Path;

use clap::{Arg, Command};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::Deserialize;

use super::{Config, ConfigRaw, defaults};
use crate::config::ConfigError;

/// Prefix of environment variables that override configuration values.
/// Nested keys are separated by `__`, e.g. `WATCHTOWER_CHAIN__NODE_PRIVATE_KEY`.
const ENV_PREFIX: &str = "WATCHTOWER_";

#[derive(Debug, Deserialize)]
struct EnvironmentConfig {
    environment: Option<String>,
}

pub(crate) fn load_configuration() -> Result<Config, ConfigError> {
    let matches = Command::new("Oracle Watchtower")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file (.toml format)"),
        )
        .get_matches();

    let custom_config_path = matches.get_one::<String>("config").map(String::as_str);
    let environment = resolve_environment(custom_config_path)?;

    tracing::info!("Loading configuration for environment: {}", environment);

    // Priority, lowest to highest: typed defaults, config.toml, --config, env vars
    let mut figment = figment_with_defaults(&environment)?;

    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if let Some(config_path) = custom_config_path {
        tracing::info!("Loading custom config file: {}", config_path);
        figment = figment.merge(Toml::file(config_path));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: ConfigRaw = figment.extract().map_err(Box::new)?;
    if normalize_env(config.environment.clone()) != environment {
        return Err(ConfigError::UnknownEnvironment(format!(
            "config environment '{}' does not match selected '{}'",
            config.environment, environment
        )));
    }

    config.resolve()
}

fn figment_with_defaults(environment: &str) -> Result<Figment, ConfigError> {
    Ok(Figment::from(Serialized::defaults(defaults::config_for(
        environment,
    )?)))
}

/// Environment from `WATCHTOWER_ENVIRONMENT`, else from the selected config file.
fn resolve_environment(custom_config_path: Option<&str>) -> Result<String, ConfigError> {
    let from_env = Figment::from(Env::prefixed(ENV_PREFIX).only(&["environment"]))
        .extract::<EnvironmentConfig>()
        .ok()
        .and_then(|config| config.environment);

    let environment = from_env
        .or_else(|| read_environment_from(custom_config_path.unwrap_or("config.toml")))
        .map(normalize_env)
        .ok_or_else(|| {
            ConfigError::MissingEnvironment(
                "set environment = \"development|testnet|mainnet\" in your config or WATCHTOWER_ENVIRONMENT"
                    .to_string(),
            )
        })?;

    if !matches!(environment.as_str(), "development" | "testnet" | "mainnet") {
        return Err(ConfigError::UnknownEnvironment(environment));
    }

    Ok(environment)
}

fn read_environment_from(path: &str) -> Option<String> {
    if !Path::new(path).exists() {
        return None;
    }

    Figment::from(Toml::file(path))
        .extract::<EnvironmentConfig>()
        .ok()
        .and_then(|config| config.environment)
}

fn normalize_env(env: String) -> String {
    env.trim().to_lowercase()
}
