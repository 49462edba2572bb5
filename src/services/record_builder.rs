//! 题目记录构建 - 业务能力层
//!
//! 以标准答案为准，把标准答案和学生答卷按题号对齐成 [`QuestionRecord`] 列表。

use tracing::debug;

use crate::models::question::{QuestionRecord, SegmentedDocument, NO_ANSWER, NO_MARKING_SCHEME};
use crate::services::segmenter::Segmenter;

/// 标准答案中评分标准的分隔标记（区分大小写）
pub const MARKING_SCHEME_MARKER: &str = "Marking Scheme:";

/// 对齐标准答案与学生答卷
///
/// - 按标准答案中题号出现的顺序输出，每个题号恰好一条
/// - 学生答卷中多出来的题号被忽略
/// - 学生缺答的题目使用占位文本
pub fn build_records(solution: &SegmentedDocument, student: &SegmentedDocument) -> Vec<QuestionRecord> {
    solution
        .iter()
        .map(|(number, body)| {
            let (solution_text, marking_scheme) = split_marking_scheme(body);
            let student_answer = student.get(number).unwrap_or(NO_ANSWER);

            QuestionRecord {
                question_number: number,
                solution_text,
                marking_scheme,
                student_answer: student_answer.to_string(),
            }
        })
        .collect()
}

/// 从原始文本直接构建记录
pub fn structure_texts(solution_text: &str, student_text: &str) -> Vec<QuestionRecord> {
    let segmenter = Segmenter::new();
    let solution = segmenter.parse(solution_text);
    let student = segmenter.parse(student_text);

    debug!(
        "切分完成: 标准答案 {} 题, 学生答卷 {} 题",
        solution.len(),
        student.len()
    );

    build_records(&solution, &student)
}

/// 拆分 `解答` 与 `评分标准`
fn split_marking_scheme(body: &str) -> (String, String) {
    match body.split_once(MARKING_SCHEME_MARKER) {
        Some((solution, scheme)) => (solution.trim().to_string(), scheme.trim().to_string()),
        None => (body.trim().to_string(), NO_MARKING_SCHEME.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_from_example_documents() {
        let records = structure_texts(
            "1) Prove X.\nMarking Scheme: 5 points for correct proof.\n2) Compute Y.",
            "1) My proof.\n2) 42",
        );

        assert_eq!(
            records,
            vec![
                QuestionRecord {
                    question_number: 1,
                    solution_text: "Prove X.".to_string(),
                    marking_scheme: "5 points for correct proof.".to_string(),
                    student_answer: "My proof.".to_string(),
                },
                QuestionRecord {
                    question_number: 2,
                    solution_text: "Compute Y.".to_string(),
                    marking_scheme: NO_MARKING_SCHEME.to_string(),
                    student_answer: "42".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_missing_student_answer_uses_placeholder() {
        let records = structure_texts("1) A\n2) B\n3) C", "2) only two");

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].student_answer, NO_ANSWER);
        assert_eq!(records[1].student_answer, "only two");
        assert_eq!(records[2].student_answer, NO_ANSWER);
    }

    #[test]
    fn test_student_extra_questions_ignored() {
        let records = structure_texts("1) A", "1) a\n2) b\n3) c");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question_number, 1);
    }

    #[test]
    fn test_solution_order_preserved() {
        let records = structure_texts("3) C\n1) A\n2) B", "");
        let numbers: Vec<_> = records.iter().map(|r| r.question_number).collect();

        assert_eq!(numbers, vec![3, 1, 2]);
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let records = structure_texts("1) Answer\nmarking scheme: 2 pts", "1) x");

        assert_eq!(records[0].solution_text, "Answer\nmarking scheme: 2 pts");
        assert_eq!(records[0].marking_scheme, NO_MARKING_SCHEME);
    }

    #[test]
    fn test_split_at_first_marker_only() {
        let (solution, scheme) =
            split_marking_scheme("Sol\nMarking Scheme: 1 pt\nMarking Scheme: extra");

        assert_eq!(solution, "Sol");
        assert_eq!(scheme, "1 pt\nMarking Scheme: extra");
    }
}
