use axum::body::Bytes;
use serde::Serialize;

use crate::models::question::{GradedQuestion, GradingReport};

/// 纯文本文件扩展名
pub const PLAIN_TEXT_EXTENSION: &str = ".txt";

/// 无法判断类型时使用的 MIME
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// UTF-8 BOM（记事本保存的文本常带这个前缀）
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// 上传的文件（在 HTTP 边界一次性读完，之后只读）
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content_type: Option<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            bytes: bytes.into(),
        }
    }

    /// 文件名是否以 `.txt` 结尾（不区分大小写）
    pub fn is_plain_text(&self) -> bool {
        self.filename
            .to_ascii_lowercase()
            .ends_with(PLAIN_TEXT_EXTENSION)
    }

    /// 尝试按 UTF-8 解码，去掉开头的 BOM
    pub fn as_utf8(&self) -> Option<&str> {
        let text = std::str::from_utf8(&self.bytes).ok()?;
        Some(text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text))
    }

    /// 声明的 MIME（去掉 `; charset=...` 等参数）；缺失或为通用二进制类型时按文件名猜测
    pub fn mime_type(&self) -> String {
        let declared = self
            .content_type
            .as_deref()
            .and_then(|c| c.split(';').next())
            .map(str::trim);

        match declared {
            Some(declared) if !declared.is_empty() && declared != FALLBACK_MIME => {
                declared.to_string()
            }
            _ => mime_guess::from_path(&self.filename)
                .first_raw()
                .unwrap_or(FALLBACK_MIME)
                .to_string(),
        }
    }
}

/// 发送给 LLM 的原始文档（多模态路径）
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPayload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl From<&UploadedFile> for DocumentPayload {
    fn from(file: &UploadedFile) -> Self {
        Self {
            filename: file.filename.clone(),
            mime_type: file.mime_type(),
            bytes: file.bytes.clone(),
        }
    }
}

/// 单份答卷评分成功
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionResult {
    pub filename: String,
    pub total_score: f64,
    pub graded_questions: Vec<GradedQuestion>,
}

impl SubmissionResult {
    pub fn new(filename: impl Into<String>, report: GradingReport) -> Self {
        Self {
            filename: filename.into(),
            total_score: report.total_score,
            graded_questions: report.graded_questions,
        }
    }
}

/// 单份答卷评分失败
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionFailure {
    pub filename: String,
    pub error: String,
}

/// 批量评分汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    pub results: Vec<SubmissionResult>,
    pub errors: Vec<SubmissionFailure>,
    pub total_processed: usize,
    pub success_count: usize,
    pub error_count: usize,
}

impl BatchResult {
    /// 汇总结果并计算计数
    pub fn from_parts(results: Vec<SubmissionResult>, errors: Vec<SubmissionFailure>) -> Self {
        let success_count = results.len();
        let error_count = errors.len();
        Self {
            results,
            errors,
            total_processed: success_count + error_count,
            success_count,
            error_count,
        }
    }
}
