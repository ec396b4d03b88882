//! 服务配置
//!
//! 启动时从环境变量读取一次，之后只读共享。

use serde::{Deserialize, Serialize};
use tracing::warn;

/// 演示用的默认 API Key，生产环境请通过 `API_KEY` 覆盖
pub const DEFAULT_API_KEY: &str = "your-secret-api-key-123";

/// 运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// `development` / `dev` 为开发模式，其余一律视为生产模式
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 监听地址 (默认: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口 (默认: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// 写操作需要的共享密钥
    #[serde(default = "default_api_key")]
    pub api_key: String,

    #[serde(default)]
    pub environment: Environment,

    /// 启动时是否写入示例商品
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_seed_sample_data() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: default_api_key(),
            environment: Environment::default(),
            seed_sample_data: default_seed_sample_data(),
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置: HOST, PORT, API_KEY, APP_ENV, SEED_SAMPLE_DATA
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host;
        }

        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => warn!("PORT={} 无法解析，使用默认端口 {}", port, config.port),
            }
        }

        if let Some(api_key) = lookup("API_KEY").filter(|k| !k.is_empty()) {
            config.api_key = api_key;
        }

        if let Some(env) = lookup("APP_ENV") {
            config.environment = Environment::parse(&env);
        }

        if let Some(seed) = lookup("SEED_SAMPLE_DATA") {
            config.seed_sample_data = !matches!(
                seed.trim().to_ascii_lowercase().as_str(),
                "false" | "0" | "no"
            );
        }

        config
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
