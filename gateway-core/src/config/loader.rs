use crate::config::model::Config;
use anyhow::Context;
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 配置文件路径，优先使用CONFIG_PATH环境变量
pub fn get_config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// 加载配置：配置文件 -> 环境变量覆盖 -> 校验
pub fn load_config() -> Result<Config, anyhow::Error> {
    let config_path = get_config_path();

    let mut config = if Path::new(&config_path).exists() {
        load_config_from_path(&config_path)?
    } else if std::env::var("CONFIG_PATH").is_ok() {
        // 显式指定的配置文件必须存在
        anyhow::bail!("Config file not found: {}", config_path);
    } else {
        info!(
            "Config file {} not found, using defaults and environment variables",
            config_path
        );
        Config::default()
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

pub fn load_config_from_path(config_path: &str) -> Result<Config, anyhow::Error> {
    let config_str = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {config_path}"))?;
    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file: {config_path}"))?;
    Ok(config)
}

/// 使用环境变量覆盖配置项，变量名与原部署的.env保持一致
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("HOST") {
        debug!("HOST override: {}", host);
        config.server.host = host;
    }

    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("Invalid PORT value: {port}"))?;
    }

    if let Some(app_name) = lookup("APP_NAME") {
        config.server.app_name = app_name;
    }

    if let Some(debug) = lookup("DEBUG") {
        config.server.debug = parse_bool("DEBUG", &debug)?;
    }

    if let Some(base_url) = lookup("DOTNET_API_URL") {
        debug!("DOTNET_API_URL override: {}", base_url);
        config.downstream.base_url = base_url;
    }

    if let Some(timeout) = lookup("DOTNET_TIMEOUT_SECONDS") {
        config.downstream.timeout_seconds = timeout
            .trim()
            .parse()
            .with_context(|| format!("Invalid DOTNET_TIMEOUT_SECONDS value: {timeout}"))?;
    }

    if let Some(accept) = lookup("DOTNET_ACCEPT_INVALID_CERTS") {
        config.downstream.accept_invalid_certs =
            parse_bool("DOTNET_ACCEPT_INVALID_CERTS", &accept)?;
    }

    Ok(())
}

pub fn parse_bool(key: &str, value: &str) -> Result<bool, anyhow::Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("Invalid boolean for {}: {}", key, other),
    }
}
