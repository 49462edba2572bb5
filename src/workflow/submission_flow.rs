//! 答卷处理流程 - 流程层
//!
//! 核心职责：定义"一份答卷"的完整处理流程
//!
//! 流程顺序：
//! 1. 两个文件都是 `.txt` 且都能按 UTF-8 解码 → 本地切分 → 文本评分
//! 2. 解码失败 → 回退到多模态评分（不向调用方报错）
//! 3. 任一文件不是 `.txt` → 直接多模态评分，版面/OCR 交给远端模型

use tracing::{info, warn};

use crate::error::{GradingError, GradingResult};
use crate::models::question::{GradingReport, QuestionRecord};
use crate::models::submission::{DocumentPayload, UploadedFile};
use crate::services::record_builder::structure_texts;
use crate::services::Grader;
use crate::workflow::submission_ctx::SubmissionCtx;

/// 评分路径
#[derive(Debug, Clone, PartialEq)]
pub enum GradingPath {
    /// 本地切分后的题目记录
    Text { records: Vec<QuestionRecord> },
    /// 原始文档直接交给远端
    Multimodal {
        solution: DocumentPayload,
        student: DocumentPayload,
    },
}

impl GradingPath {
    pub fn name(&self) -> &'static str {
        match self {
            GradingPath::Text { .. } => "text",
            GradingPath::Multimodal { .. } => "multimodal",
        }
    }
}

/// 为一对文件选择评分路径
pub fn select_path(solution: &UploadedFile, student: &UploadedFile) -> GradingPath {
    if solution.is_plain_text() && student.is_plain_text() {
        match decode(solution).and_then(|s| decode(student).map(|t| (s, t))) {
            Ok((solution_text, student_text)) => {
                return GradingPath::Text {
                    records: structure_texts(solution_text, student_text),
                };
            }
            Err(e) => warn!("⚠️ {}，回退到多模态评分", e),
        }
    }

    GradingPath::Multimodal {
        solution: DocumentPayload::from(solution),
        student: DocumentPayload::from(student),
    }
}

/// 按 UTF-8 解码文本文件
///
/// 失败只用于触发回退，不会返回给调用方
fn decode(file: &UploadedFile) -> GradingResult<&str> {
    file.as_utf8().ok_or_else(|| GradingError::DecodeFailure {
        filename: file.filename.clone(),
    })
}

/// 答卷处理流程
///
/// - 决定走文本路径还是多模态路径
/// - 不持有任何资源，只依赖评分能力（[`Grader`]）
pub struct SubmissionFlow<'a, G: Grader> {
    grader: &'a G,
}

impl<'a, G: Grader> SubmissionFlow<'a, G> {
    /// 创建新的答卷处理流程
    pub fn new(grader: &'a G) -> Self {
        Self { grader }
    }

    pub async fn run(
        &self,
        solution: &UploadedFile,
        student: &UploadedFile,
        ctx: &SubmissionCtx,
    ) -> GradingResult<GradingReport> {
        let path = select_path(solution, student);
        info!("{} 评分路径: {}", ctx, path.name());

        match path {
            GradingPath::Text { records } => {
                info!("{} 📝 切分完成，共 {} 题", ctx, records.len());
                self.grader.grade_records(&records).await
            }
            GradingPath::Multimodal { solution, student } => {
                info!(
                    "{} 📎 发送原始文档 ({} / {})",
                    ctx, solution.mime_type, student.mime_type
                );
                self.grader.grade_documents(&solution, &student).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GradingError;
    use std::sync::Mutex;

    /// 记录调用路径的假评分器
    #[derive(Default)]
    struct RecordingGrader {
        calls: Mutex<Vec<&'static str>>,
    }

    impl Grader for RecordingGrader {
        async fn grade_records(&self, records: &[QuestionRecord]) -> GradingResult<GradingReport> {
            self.calls.lock().unwrap().push("records");
            if records.is_empty() {
                return Err(GradingError::MalformedReply("no records".to_string()));
            }
            Ok(GradingReport::from_questions(vec![]))
        }

        async fn grade_documents(
            &self,
            _solution: &DocumentPayload,
            _student: &DocumentPayload,
        ) -> GradingResult<GradingReport> {
            self.calls.lock().unwrap().push("documents");
            Ok(GradingReport::from_questions(vec![]))
        }
    }

    fn text_file(name: &str, content: &'static str) -> UploadedFile {
        UploadedFile::new(name, Some("text/plain".to_string()), content)
    }

    #[test]
    fn test_text_path_for_txt_pair() {
        let path = select_path(
            &text_file("key.txt", "1) A\nMarking Scheme: 2 pts"),
            &text_file("s1.txt", "1) a"),
        );

        match path {
            GradingPath::Text { records } => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].marking_scheme, "2 pts");
            }
            other => panic!("expected text path, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_multimodal() {
        let broken = UploadedFile::new("s1.txt", None, vec![0xffu8, 0xfe, 0x00]);
        let path = select_path(&text_file("key.txt", "1) A"), &broken);

        match path {
            GradingPath::Multimodal { solution, student } => {
                assert_eq!(solution.filename, "key.txt");
                assert_eq!(&student.bytes[..], &[0xffu8, 0xfe, 0x00]);
                assert_eq!(student.mime_type, "text/plain");
            }
            other => panic!("expected multimodal path, got {:?}", other),
        }
    }

    #[test]
    fn test_byte_order_mark_keeps_first_question() {
        let key = UploadedFile::new("key.txt", None, "\u{feff}1) A\nMarking Scheme: 2 pts\n2) B");
        let path = select_path(&key, &text_file("s1.txt", "1) a\n2) b"));

        match path {
            GradingPath::Text { records } => {
                let numbers: Vec<_> = records.iter().map(|r| r.question_number).collect();
                assert_eq!(numbers, vec![1, 2]);
                assert_eq!(records[0].solution_text, "A");
                assert_eq!(records[0].student_answer, "a");
            }
            other => panic!("expected text path, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_failure_names_file() {
        let broken = UploadedFile::new("s1.txt", None, vec![0xffu8, 0xfe]);

        assert_eq!(
            decode(&broken),
            Err(GradingError::DecodeFailure {
                filename: "s1.txt".to_string()
            })
        );
        assert_eq!(decode(&text_file("key.txt", "1) A")), Ok("1) A"));
    }

    #[test]
    fn test_non_text_extension_is_multimodal() {
        let scan = UploadedFile::new("s1.pdf", Some("application/pdf".to_string()), "%PDF-1.4");
        let path = select_path(&text_file("key.txt", "1) A"), &scan);

        assert_eq!(path.name(), "multimodal");
        if let GradingPath::Multimodal { student, .. } = path {
            assert_eq!(student.mime_type, "application/pdf");
        }
    }

    #[tokio::test]
    async fn test_run_dispatches_to_grader() {
        let grader = RecordingGrader::default();
        let flow = SubmissionFlow::new(&grader);
        let ctx = SubmissionCtx::new("s1", 1, 2);

        let key = text_file("key.txt", "1) A");
        flow.run(&key, &text_file("s1.txt", "1) a"), &ctx)
            .await
            .unwrap();
        flow.run(&key, &UploadedFile::new("s2.png", None, "img"), &ctx)
            .await
            .unwrap();

        assert_eq!(*grader.calls.lock().unwrap(), vec!["records", "documents"]);
    }
}
