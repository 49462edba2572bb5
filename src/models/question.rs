use serde::{Deserialize, Serialize};

/// 题号（文档内唯一的正整数）
pub type QuestionNumber = u32;

/// 缺少评分标准时的占位文本
pub const NO_MARKING_SCHEME: &str = "No marking scheme provided.";

/// 学生答卷中缺少该题时的占位文本
pub const NO_ANSWER: &str = "No answer provided for this question.";

/// 按题号切分后的文档
///
/// 保持题号首次出现的顺序；重复题号覆盖原有内容但不改变位置。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentedDocument {
    entries: Vec<(QuestionNumber, String)>,
}

impl SegmentedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入题目；题号已存在时覆盖并返回旧内容
    pub fn insert(&mut self, number: QuestionNumber, body: String) -> Option<String> {
        match self.entries.iter_mut().find(|(n, _)| *n == number) {
            Some((_, existing)) => Some(std::mem::replace(existing, body)),
            None => {
                self.entries.push((number, body));
                None
            }
        }
    }

    pub fn get(&self, number: QuestionNumber) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, body)| body.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionNumber, &str)> {
        self.entries.iter().map(|(n, body)| (*n, body.as_str()))
    }

    pub fn numbers(&self) -> Vec<QuestionNumber> {
        self.entries.iter().map(|(n, _)| *n).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 单题评分输入：标准答案 + 评分标准 + 学生作答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question_number: QuestionNumber,
    pub solution_text: String,
    pub marking_scheme: String,
    pub student_answer: String,
}

/// 单题评分结果
///
/// `score_awarded` 为 `None` 表示"未计分"：学生使用了与标准答案不同但有效的方法，需要人工复核。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedQuestion {
    pub question_number: QuestionNumber,
    #[serde(default)]
    pub score_awarded: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub justification: String,
    #[serde(default)]
    pub student_answer: String,
    #[serde(default)]
    pub solution_text: String,
    #[serde(default)]
    pub marking_scheme: String,
}

impl GradedQuestion {
    /// 计入总分的分值（未计分按 0 处理）
    pub fn counted_score(&self) -> f64 {
        self.score_awarded.unwrap_or(0.0)
    }

    pub fn is_scored(&self) -> bool {
        self.score_awarded.is_some()
    }
}

/// 单份答卷的评分报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingReport {
    pub total_score: f64,
    pub graded_questions: Vec<GradedQuestion>,
}

impl GradingReport {
    /// 由题目列表构建报告，总分在本地重新计算
    pub fn from_questions(graded_questions: Vec<GradedQuestion>) -> Self {
        let total_score = graded_questions.iter().map(GradedQuestion::counted_score).sum();
        Self {
            total_score,
            graded_questions,
        }
    }

    /// 需要人工复核的题目数量
    pub fn unscored_count(&self) -> usize {
        self.graded_questions.iter().filter(|q| !q.is_scored()).count()
    }
}
