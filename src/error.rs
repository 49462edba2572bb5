//! 错误类型
//!
//! - [`GradingError`]：单份答卷评分流程中的错误，按份隔离，不影响其他答卷
//! - [`AppError`]：启动阶段（配置、监听端口）的错误
//!
//! HTTP 状态码的映射只在 `api::error` 中做一次。

use thiserror::Error;

/// 评分流程错误
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GradingError {
    /// 未配置 LLM API 密钥，不会发起网络请求
    #[error("GEMINI_API_KEY not found in environment variables.")]
    CredentialMissing,

    /// 声明为文本的文件不是合法的 UTF-8
    ///
    /// 只在流程内部用于触发多模态回退，不会返回给调用方
    #[error("file '{filename}' is not valid UTF-8 text")]
    DecodeFailure { filename: String },

    /// 网络请求或服务端返回错误
    #[error("LLM request failed: {0}")]
    RemoteTransportFailure(String),

    /// LLM 返回内容无法解析成评分结果
    #[error("LLM reply could not be parsed: {0}")]
    MalformedReply(String),
}

/// 单份答卷处理失败（流程边界上的错误）
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmissionError {
    /// 评分流程中的已知错误
    #[error(transparent)]
    Grading(#[from] GradingError),

    /// 流程中意外 panic
    #[error("An unexpected error occurred during grading: {0}")]
    Unexpected(String),
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 文件读取失败
    #[error("读取文件失败 ({path}): {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 监听地址绑定失败
    #[error("无法绑定地址 {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 显式指定的配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::FileRead {
            path: path.into(),
            source,
        }
    }

    /// 创建地址绑定错误
    pub fn bind_failed(address: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Bind {
            address: address.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for GradingError {
    fn from(err: serde_json::Error) -> Self {
        GradingError::MalformedReply(err.to_string())
    }
}

impl From<async_openai::error::OpenAIError> for GradingError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        GradingError::RemoteTransportFailure(err.to_string())
    }
}

// ========== Result 类型别名 ==========

/// 评分结果类型
pub type GradingResult<T> = Result<T, GradingError>;
