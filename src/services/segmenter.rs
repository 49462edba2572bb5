//! 题目切分 - 业务能力层
//!
//! 把一整段答案/答卷文本按题号切成 `题号 → 题目内容`。
//!
//! 题号只在文本开头或换行之后识别：`<数字>.` 或 `<数字>)`。
//! 行内的数字模式（例如公式里的 `(2k+1)^2`）不会被当成新的题目。

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::models::question::{QuestionNumber, SegmentedDocument};
use crate::models::submission::BYTE_ORDER_MARK;

/// 行首题号
static BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+[.)]").expect("题号正则无效"));

/// 切块开头的题号（捕获数字）
static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[.)]").expect("题号正则无效"));

/// 题目切分服务
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter;

impl Segmenter {
    pub fn new() -> Self {
        Self
    }

    /// 切分文本
    ///
    /// - 没有题号开头的片段（如卷首说明）直接丢弃
    /// - 重复题号以最后一次出现为准，并输出警告
    /// - 题号必须是正整数，`0)` 或超出范围的数字按无题号处理
    pub fn parse(&self, text: &str) -> SegmentedDocument {
        let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

        let mut cuts: Vec<usize> = Vec::with_capacity(8);
        cuts.push(0);
        cuts.extend(BOUNDARY.find_iter(text).map(|m| m.start()));
        cuts.push(text.len());
        cuts.dedup();

        let mut document = SegmentedDocument::new();

        for window in cuts.windows(2) {
            let chunk = text[window[0]..window[1]].trim();
            if chunk.is_empty() {
                continue;
            }

            let Some((number, body)) = split_header(chunk) else {
                debug!("忽略无题号片段: {}", crate::utils::truncate_text(chunk, 40));
                continue;
            };

            if document.insert(number, body.to_string()).is_some() {
                warn!("⚠️ 题号 {} 重复出现，保留最后一次的内容", number);
            }
        }

        document
    }
}

/// 便捷函数：使用默认切分器
pub fn segment(text: &str) -> SegmentedDocument {
    Segmenter::new().parse(text)
}

/// 拆出开头的 `<数字><分隔符>`，返回题号和去掉题号后的内容
fn split_header(chunk: &str) -> Option<(QuestionNumber, &str)> {
    let captures = HEADER.captures(chunk)?;
    let header = captures.get(0)?;
    let number = captures
        .get(1)?
        .as_str()
        .parse::<QuestionNumber>()
        .ok()
        .filter(|n| *n > 0)?;
    Some((number, chunk[header.end()..].trim()))
}
