//! 批量答卷处理器 - 编排层
//!
//! ## 职责
//!
//! 用同一份标准答案依次评分多份学生答卷，汇总成 [`BatchResult`]。
//!
//! ## 设计特点
//!
//! - **顺序执行**：按上传顺序逐份处理，不并发
//! - **失败隔离**：单份答卷的错误（包括 panic）只记入该文件的 `errors`，不影响后续答卷
//! - **只读共享**：标准答案是不可变的字节缓冲，每份答卷直接复用
//! - **向下委托**：具体评分路径交给 `workflow::SubmissionFlow`

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{error, info};

use crate::error::SubmissionError;
use crate::models::question::GradingReport;
use crate::models::submission::{BatchResult, SubmissionFailure, SubmissionResult, UploadedFile};
use crate::services::Grader;
use crate::utils::logging::{log_batch_complete, log_batch_start, log_submission_start};
use crate::workflow::{SubmissionCtx, SubmissionFlow};

/// 批量答卷处理器
pub struct BatchProcessor<'a, G: Grader> {
    flow: SubmissionFlow<'a, G>,
}

impl<'a, G: Grader> BatchProcessor<'a, G> {
    pub fn new(grader: &'a G) -> Self {
        Self {
            flow: SubmissionFlow::new(grader),
        }
    }

    /// 处理一批答卷
    ///
    /// 返回的计数满足 `success_count + error_count == total_processed == students.len()`。
    pub async fn process(&self, solution: &UploadedFile, students: &[UploadedFile]) -> BatchResult {
        let total = students.len();
        log_batch_start(&solution.filename, total);

        let mut results = Vec::with_capacity(total);
        let mut errors = Vec::new();

        for (index, student) in students.iter().enumerate() {
            let ctx = SubmissionCtx::new(student.filename.clone(), index + 1, total);
            log_submission_start(&ctx);

            match self.process_one(solution, student, &ctx).await {
                Ok(report) => {
                    info!(
                        "{} ✓ 评分完成，总分 {} ({} 题，{} 题待人工复核)",
                        ctx,
                        report.total_score,
                        report.graded_questions.len(),
                        report.unscored_count()
                    );
                    results.push(SubmissionResult::new(student.filename.clone(), report));
                }
                Err(e) => {
                    error!("{} ❌ 评分失败: {}", ctx, e);
                    errors.push(SubmissionFailure {
                        filename: student.filename.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let batch = BatchResult::from_parts(results, errors);
        log_batch_complete(&batch);
        batch
    }

    /// 处理单份答卷（单文件接口也走这里）
    pub async fn process_one(
        &self,
        solution: &UploadedFile,
        student: &UploadedFile,
        ctx: &SubmissionCtx,
    ) -> Result<GradingReport, SubmissionError> {
        let outcome = AssertUnwindSafe(self.flow.run(solution, student, ctx))
            .catch_unwind()
            .await;

        match outcome {
            Ok(result) => result.map_err(SubmissionError::from),
            Err(panic) => Err(SubmissionError::Unexpected(panic_message(panic.as_ref()))),
        }
    }
}

/// 提取 panic 信息
fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
