//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, AuthMode};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// UTC 偏移上限（±14 小时）
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `BOOKSHELF_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `BOOKSHELF_SERVER__PORT=9000`
/// - `BOOKSHELF_DATABASE__PATH=/data/bookshelf.db`
/// - `BOOKSHELF_AUTH__MODE=fixed`
/// - `BOOKSHELF_STATS__UTC_OFFSET_MINUTES=540`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.path", "data/bookshelf.db")?
        .set_default("database.max_connections", 5)?
        .set_default("auth.mode", "token")?
        .set_default("stats.utc_offset_minutes", 0)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: BOOKSHELF_AUTH__FIXED_ACCOUNT_ID=dev
    builder = builder.add_source(
        Environment::with_prefix("BOOKSHELF")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.database.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "Database max_connections cannot be 0".to_string(),
        ));
    }

    match config.auth.mode {
        AuthMode::Fixed => {
            let account = config.auth.fixed_account_id.as_deref().unwrap_or("");
            if account.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "auth.fixed_account_id is required when auth.mode = fixed".to_string(),
                ));
            }
        }
        AuthMode::Token => {
            if config
                .auth
                .tokens
                .iter()
                .any(|entry| entry.token.trim().is_empty() || entry.account_id.trim().is_empty())
            {
                return Err(ConfigError::ValidationError(
                    "auth.tokens cannot contain empty tokens or account ids".to_string(),
                ));
            }
        }
    }

    if config.stats.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
        return Err(ConfigError::ValidationError(format!(
            "stats.utc_offset_minutes must be within ±{}",
            MAX_UTC_OFFSET_MINUTES
        )));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("Auth Mode: {}", config.auth.mode.as_str());
    if config.auth.mode == AuthMode::Token {
        tracing::info!("Auth Tokens: {}", config.auth.tokens.len());
        if config.auth.tokens.is_empty() {
            tracing::warn!("No auth tokens configured, every protected request will be rejected");
        }
    }
    tracing::info!("Stats UTC Offset: {} min", config.stats.utc_offset_minutes);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_fixed_mode_without_account() {
        let mut config = AppConfig::default();
        config.auth.mode = AuthMode::Fixed;
        assert!(validate_config(&config).is_err());

        config.auth.fixed_account_id = Some("dev".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_offset_out_of_range() {
        let mut config = AppConfig::default();
        config.stats.utc_offset_minutes = 841;
        assert!(validate_config(&config).is_err());

        config.stats.utc_offset_minutes = -840;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[server]
port = 9000

[database]
path = "/tmp/books.db"

[auth]
mode = "token"

[[auth.tokens]]
token = "Secret-Token"
account_id = "alice"

[stats]
utc_offset_minutes = 540
"#,
        );

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.path, "/tmp/books.db");
        assert_eq!(config.auth.tokens.len(), 1);
        assert_eq!(config.auth.tokens[0].token, "Secret-Token");
        assert_eq!(config.auth.tokens[0].account_id, "alice");
        assert_eq!(config.stats.utc_offset_minutes, 540);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let file = write_config(
            r#"
[auth]
mode = "fixed"
"#,
        );

        let err = load_config_from_path(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
