//! LLM 评分服务 - 业务能力层
//!
//! 只负责"把评分任务交给 LLM、把回复整理成 [`GradingReport`]"，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Gemini, Azure, Doubao 等）
//!
//! ## 两种输入
//! - 文本路径：本地切分好的 [`QuestionRecord`] 列表，序列化成 JSON 发送
//! - 多模态路径：标准答案和学生答卷的原始字节，以 `data:` URI 的形式附在消息里

use std::future::Future;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use base64::Engine as _;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{GradingError, GradingResult};
use crate::models::question::{GradedQuestion, GradingReport, QuestionRecord};
use crate::models::submission::DocumentPayload;

/// 评分指令（系统消息）
pub const GRADING_INSTRUCTIONS: &str = r#"You are an expert AI exam evaluator. Grade the student's answers strictly against the official solution and marking scheme supplied to you.

Rules:
1. Follow the marking scheme precisely. Award partial marks only where the marking scheme allows it.
2. If the student's method is valid but materially different from the method in the official solution, do NOT award a score and do NOT award zero. Set "score_awarded" to null and set "justification" to exactly: "The student used a different valid method (<method name>). Manual review recommended." where <method name> names the method the student used.
3. "max_score" is the maximum score available for the question according to the marking scheme (null if it cannot be determined).
4. Respond with pure JSON only. No prose, no explanations outside the JSON, no markdown code fences.

Required response shape:
{
  "total_score": <number>,
  "graded_questions": [
    {
      "question_number": <integer>,
      "score_awarded": <number or null>,
      "max_score": <number or null>,
      "justification": <string>,
      "student_answer": <string>,
      "solution_text": <string>,
      "marking_scheme": <string>
    }
  ]
}"#;

/// 评分能力
///
/// 编排层只依赖这个 trait，测试时可以替换成假的实现。
pub trait Grader {
    /// 是否具备调用远端服务的条件
    fn is_configured(&self) -> bool {
        true
    }

    /// 对本地切分好的题目记录评分
    fn grade_records(
        &self,
        records: &[QuestionRecord],
    ) -> impl Future<Output = GradingResult<GradingReport>> + Send;

    /// 直接对原始文档评分（多模态）
    fn grade_documents(
        &self,
        solution: &DocumentPayload,
        student: &DocumentPayload,
    ) -> impl Future<Output = GradingResult<GradingReport>> + Send;
}

/// LLM 后端：已配置 / 未配置
pub enum LlmBackend {
    Configured(Client<OpenAIConfig>),
    /// 缺少 API 密钥，所有调用直接返回 [`GradingError::CredentialMissing`]
    Unconfigured,
}

/// LLM 评分服务
///
/// 职责：
/// - 构造评分请求（文本 / 多模态）
/// - 调用 LLM API
/// - 解析回复并在本地重算总分
/// - 不关心批量流程，不做重试
pub struct LlmService {
    backend: LlmBackend,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let backend = match config.llm_api_key.as_deref() {
            Some(api_key) => {
                // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
                let openai_config = OpenAIConfig::new()
                    .with_api_key(api_key)
                    .with_api_base(&config.llm_api_base_url);
                LlmBackend::Configured(Client::with_config(openai_config))
            }
            None => {
                warn!("⚠️ 未配置 LLM API 密钥，所有评分请求都会失败");
                LlmBackend::Unconfigured
            }
        };

        Self {
            backend,
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    /// - `documents`: 附带的原始文档，每份前面加一段说明文字
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        documents: &[(&str, &DocumentPayload)],
    ) -> GradingResult<String> {
        let client = match &self.backend {
            LlmBackend::Configured(client) => client,
            LlmBackend::Unconfigured => return Err(GradingError::CredentialMissing),
        };

        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        // 构建消息列表
        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = if documents.is_empty() {
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()?
        } else {
            debug!("多模态请求，包含 {} 份文档", documents.len());
            ChatCompletionRequestUserMessageArgs::default()
                .content(ChatCompletionRequestUserMessageContent::Array(
                    build_content_parts(user_message, documents),
                ))
                .build()?
        };

        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()?;

        // 调用 API
        let response = client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            GradingError::RemoteTransportFailure(e.to_string())
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| GradingError::MalformedReply("LLM returned empty content".to_string()))?;

        Ok(content.trim().to_string())
    }
}

impl Grader for LlmService {
    fn is_configured(&self) -> bool {
        matches!(self.backend, LlmBackend::Configured(_))
    }

    async fn grade_records(&self, records: &[QuestionRecord]) -> GradingResult<GradingReport> {
        debug!("文本评分，共 {} 题", records.len());

        let records_json = serde_json::to_string_pretty(records)?;
        let user_message = format!(
            "Grade each of the following questions. Every record holds the official solution text, \
             the marking scheme and the student's answer for one question.\n\n{}",
            records_json
        );

        let reply = self
            .send_to_llm(&user_message, Some(GRADING_INSTRUCTIONS), &[])
            .await?;

        parse_grading_reply(&reply)
    }

    async fn grade_documents(
        &self,
        solution: &DocumentPayload,
        student: &DocumentPayload,
    ) -> GradingResult<GradingReport> {
        debug!(
            "多模态评分: 标准答案 {} ({}), 学生答卷 {} ({})",
            solution.filename, solution.mime_type, student.filename, student.mime_type
        );

        let user_message = "Two documents are attached. The first is the official solution key; \
                            each question in it may contain a marking scheme introduced by \"Marking Scheme:\". \
                            The second is the student's answer sheet. Identify every question in the solution key, \
                            find the student's answer to it and grade it. Use \"No answer provided for this question.\" \
                            as student_answer when the student did not answer.";

        let reply = self
            .send_to_llm(
                user_message,
                Some(GRADING_INSTRUCTIONS),
                &[
                    ("Official solution key:", solution),
                    ("Student answer sheet:", student),
                ],
            )
            .await?;

        parse_grading_reply(&reply)
    }
}

/// LLM 回复的原始结构
#[derive(Debug, Deserialize)]
struct GradingReply {
    /// 服务端自报的总分，只用于比对，不采信
    #[serde(default)]
    total_score: Option<serde_json::Value>,
    graded_questions: Vec<GradedQuestion>,
}

/// 解析评分回复
///
/// - 去掉可能包裹的 markdown 代码块
/// - 总分在本地按非空 `score_awarded` 重新求和
pub fn parse_grading_reply(reply: &str) -> GradingResult<GradingReport> {
    let cleaned = strip_code_fence(reply);
    let parsed: GradingReply = serde_json::from_str(cleaned)?;

    let report = GradingReport::from_questions(parsed.graded_questions);

    if let Some(reported) = parsed.total_score.as_ref().and_then(|v| v.as_f64()) {
        if (reported - report.total_score).abs() > f64::EPSILON {
            debug!(
                "LLM 自报总分 {} 与本地计算 {} 不一致，使用本地结果",
                reported, report.total_score
            );
        }
    }

    Ok(report)
}

/// 去掉首尾的 ``` / ```json 代码块标记
fn strip_code_fence(reply: &str) -> &str {
    let mut text = reply.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.find('\n') {
            Some(line_end) => &rest[line_end + 1..],
            None => rest.trim_start_matches("json"),
        };
    }

    let trimmed = text.trim_end();
    text = trimmed.strip_suffix("```").unwrap_or(trimmed);

    text.trim()
}

/// 构建多模态消息内容：正文 + (说明 + 文档) * N
fn build_content_parts(
    user_message: &str,
    documents: &[(&str, &DocumentPayload)],
) -> Vec<ChatCompletionRequestUserMessageContentPart> {
    let mut content_parts: Vec<ChatCompletionRequestUserMessageContentPart> = Vec::new();

    // 添加文本部分
    content_parts.push(ChatCompletionRequestUserMessageContentPart::Text(
        ChatCompletionRequestMessageContentPartText {
            text: user_message.to_string(),
        },
    ));

    for (label, document) in documents {
        content_parts.push(ChatCompletionRequestUserMessageContentPart::Text(
            ChatCompletionRequestMessageContentPartText {
                text: format!("{} {}", label, document.filename),
            },
        ));
        content_parts.push(ChatCompletionRequestUserMessageContentPart::ImageUrl(
            ChatCompletionRequestMessageContentPartImage {
                image_url: ImageUrl {
                    url: to_data_uri(document),
                    detail: Some(ImageDetail::High),
                },
            },
        ));
    }

    content_parts
}

/// `data:<mime>;base64,<payload>`
fn to_data_uri(document: &DocumentPayload) -> String {
    format!(
        "data:{};base64,{}",
        document.mime_type,
        base64::engine::general_purpose::STANDARD.encode(&document.bytes)
    )
}
