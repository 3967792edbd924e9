//! eats-config - 配置加载库
//!
//! 优先级（低 → 高）：内置默认值 → `{config_dir}/default.toml` →
//! `{config_dir}/{APP_ENV}.toml` → 环境变量。

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Toml},
    value::{Uncased, UncasedStr},
};
use secrecy::Secret;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 环境变量到配置字段的映射
const ENV_KEYS: [(&str, &str); 11] = [
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_NAME", "database.name"),
    ("DB_PASSWORD", "database.password"),
    ("DB_MAX_CONNECTIONS", "database.max_connections"),
    ("URL_PORT", "server.port"),
    ("SERVER_HOST", "server.host"),
    ("LOG_LEVEL", "telemetry.log_level"),
    ("APP_NAME", "app_name"),
    ("APP_ENV", "app_env"),
];

fn is_known_env(key: &UncasedStr) -> bool {
    ENV_KEYS
        .iter()
        .any(|(env, _)| key.as_str().eq_ignore_ascii_case(env))
}

fn env_key(key: &UncasedStr) -> Uncased<'_> {
    ENV_KEYS
        .iter()
        .find(|(env, _)| key.as_str().eq_ignore_ascii_case(env))
        .map(|(_, field)| Uncased::from(*field))
        .unwrap_or_else(|| Uncased::from(key.as_str()))
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    #[serde(deserialize_with = "scalar_string")]
    pub host: String,
    pub port: u16,
    #[serde(deserialize_with = "scalar_string")]
    pub user: String,
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(deserialize_with = "scalar_secret")]
    pub password: Secret<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            name: "authentication".to_string(),
            password: Secret::new("1111".to_string()),
            max_connections: 10,
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50051,
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_name: String,
    pub app_env: String,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "order-service".to_string(),
            app_env: "development".to_string(),
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        Ok(Self::figment(config_dir).extract()?)
    }

    /// 构建配置来源（不含 `.env`，见 [`load_dotenv`]）
    pub fn figment(config_dir: &str) -> Figment {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::raw().filter(is_known_env).map(env_key))
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

/// 加载当前目录（或其上级）的 `.env` 文件
///
/// 文件不存在时返回 `None`，由调用方记录日志。
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// 环境变量中的纯数字值会被解析成数字，这里统一还原为字符串
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Uint(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(String::from)
}

fn scalar_secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Secret<String>, D::Error> {
    scalar_string(deserializer).map(Secret::new)
}
