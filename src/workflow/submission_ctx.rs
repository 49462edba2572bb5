//! 答卷处理上下文
//!
//! 封装"我正在处理这一批里的第几份答卷"这一信息

use std::fmt::Display;

/// 答卷处理上下文
#[derive(Debug, Clone)]
pub struct SubmissionCtx {
    /// 学生答卷文件名
    pub filename: String,

    /// 答卷在本批中的索引（从1开始，仅用于日志显示）
    pub submission_index: usize,

    /// 本批答卷总数
    pub total: usize,
}

impl SubmissionCtx {
    /// 创建新的答卷上下文
    pub fn new(filename: impl Into<String>, submission_index: usize, total: usize) -> Self {
        Self {
            filename: filename.into(),
            submission_index,
            total,
        }
    }
}

impl Display for SubmissionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[答卷 {}/{} {}]",
            self.submission_index, self.total, self.filename
        )
    }
}
