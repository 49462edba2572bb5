//! multipart 上传解析
//!
//! 把请求体一次性读成 [`UploadedFile`]，之后整个评分流程只读这些缓冲。

use axum::extract::Multipart;
use tracing::{debug, warn};

use crate::api::error::ApiError;
use crate::models::submission::UploadedFile;

/// 标准答案字段名
pub const SOLUTION_FIELD: &str = "solutionKey";

/// 学生答卷字段名（可重复）
pub const STUDENT_FIELD: &str = "studentSheet";

/// 一次评分请求上传的文件
#[derive(Debug, Default)]
pub struct GradeUpload {
    pub solution: Option<UploadedFile>,
    pub students: Vec<UploadedFile>,
}

impl GradeUpload {
    /// 读取全部 multipart 字段
    ///
    /// - `solutionKey` 出现多次时以最后一个为准
    /// - 未知字段忽略
    /// - 既没有文件名也没有内容的空字段忽略（浏览器未选择文件时会提交这种字段）
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut upload = GradeUpload::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid multipart data: {}", e.body_text())))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name != SOLUTION_FIELD && name != STUDENT_FIELD {
                debug!("忽略未知字段: {}", name);
                continue;
            }

            let filename = field
                .file_name()
                .filter(|f| !f.is_empty())
                .map(|f| f.to_string());
            let content_type = field.content_type().map(|c| c.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e.body_text())))?;

            let Some(filename) = filename.or_else(|| (!bytes.is_empty()).then(|| name.clone())) else {
                warn!("⚠️ 字段 {} 为空，已忽略", name);
                continue;
            };

            debug!("收到文件: {} = {} ({} 字节)", name, filename, bytes.len());
            let file = UploadedFile::new(filename, content_type, bytes);

            if name == SOLUTION_FIELD {
                upload.solution = Some(file);
            } else {
                upload.students.push(file);
            }
        }

        Ok(upload)
    }

    /// 要求标准答案和至少一份答卷都存在
    pub fn require_files(self) -> Result<(UploadedFile, Vec<UploadedFile>), ApiError> {
        match self.solution {
            Some(solution) if !self.students.is_empty() => Ok((solution, self.students)),
            _ => Err(ApiError::MissingFiles),
        }
    }
}
