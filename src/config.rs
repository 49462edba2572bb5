use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, ConfigError};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "grader.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 监听地址
    pub bind_address: String,
    /// 单次请求允许上传的最大体积（MB）
    pub max_upload_mb: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 日志过滤规则（`RUST_LOG` 优先）
    pub log_filter: String,
    // --- LLM 配置 ---
    /// 为空表示未配置，评分请求会直接返回错误
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            max_upload_mb: 25,
            verbose_logging: false,
            log_filter: "info".to_string(),
            llm_api_key: None,
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-1.5-pro-latest".to_string(),
            llm_temperature: 0.0,
            llm_max_tokens: 8192,
        }
    }
}

impl Config {
    /// 加载配置：TOML 文件（可选）→ 环境变量覆盖
    ///
    /// 配置文件路径取自 `GRADER_CONFIG`，未设置时尝试当前目录下的 `grader.toml`。
    pub fn load() -> Result<Self, AppError> {
        let explicit = std::env::var("GRADER_CONFIG").ok();
        let path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);

        let base = if Path::new(path).exists() {
            Self::from_toml_file(path)?
        } else if explicit.is_some() {
            return Err(AppError::Config(ConfigError::FileNotFound {
                path: path.to_string(),
            }));
        } else {
            Self::default()
        };

        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取配置，缺失的字段使用默认值
    pub fn from_toml_file(path: &str) -> Result<Self, AppError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AppError::file_read_failed(path, e))?;
        Self::from_toml_str(&content).map_err(|e| {
            AppError::Config(ConfigError::TomlParseFailed {
                path: path.to_string(),
                source: e,
            })
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        config.llm_api_key = normalize_key(config.llm_api_key);
        Ok(config)
    }

    /// 只使用默认值 + 环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        let base = self;
        let api_key = pick_api_key(
            std::env::var("GEMINI_API_KEY").ok(),
            std::env::var("LLM_API_KEY").ok(),
        );

        Self {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or(base.bind_address),
            max_upload_mb: std::env::var("MAX_UPLOAD_MB").ok().and_then(|v| v.parse().ok()).unwrap_or(base.max_upload_mb),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(base.verbose_logging),
            log_filter: std::env::var("LOG_FILTER").unwrap_or(base.log_filter),
            llm_api_key: api_key.or(base.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(base.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(base.llm_model_name),
            llm_temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(base.llm_temperature),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(base.llm_max_tokens),
        }
    }

    /// 上传体积上限（字节）
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

/// 空白的密钥视为未配置
fn normalize_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

/// `GEMINI_API_KEY` 优先；为空时再看 `LLM_API_KEY`
fn pick_api_key(gemini: Option<String>, generic: Option<String>) -> Option<String> {
    normalize_key(gemini).or_else(|| normalize_key(generic))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            bind_address = "0.0.0.0:9000"
            llm_model_name = "gemini-2.0-flash"
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:9000");
        assert_eq!(config.llm_model_name, "gemini-2.0-flash");
        assert_eq!(config.max_upload_mb, 25);
        assert!(config.llm_api_key.is_none());
    }

    #[test]
    fn test_blank_key_is_unconfigured() {
        let config = Config::from_toml_str(r#"llm_api_key = "   ""#).unwrap();
        assert!(config.llm_api_key.is_none());
    }

    #[test]
    fn test_api_key_precedence() {
        let key = |s: &str| Some(s.to_string());

        assert_eq!(pick_api_key(key("gemini"), key("generic")), key("gemini"));
        assert_eq!(pick_api_key(key(""), key("generic")), key("generic"));
        assert_eq!(pick_api_key(key("  "), key(" generic ")), key("generic"));
        assert_eq!(pick_api_key(None, key("generic")), key("generic"));
        assert_eq!(pick_api_key(key(""), key("")), None);
        assert_eq!(pick_api_key(None, None), None);
    }

    #[test]
    fn test_max_upload_bytes() {
        let config = Config {
            max_upload_mb: 2,
            ..Config::default()
        };
        assert_eq!(config.max_upload_bytes(), 2 * 1024 * 1024);
    }
}
