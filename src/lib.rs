//! # AI Exam Grader
//!
//! 接收标准答案和学生答卷，按题切分后交给 LLM 评分，返回结构化的分数和评语
//!
//! ## 架构设计
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `Segmenter` - 按行首题号切分文本
//! - `record_builder` - 标准答案与学生答卷按题号对齐
//! - `LlmService` - 调用 LLM 评分并整理回复
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 定义"一份答卷"的处理流程
//! - `SubmissionFlow` - 选择文本 / 多模态评分路径
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 多份答卷依次评分，失败隔离，汇总统计
//!
//! ### ④ 接口层（API）
//! - `api/` - HTTP 路由、multipart 上传、错误到状态码的映射
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, GradingError, GradingResult, SubmissionError};
pub use models::{BatchResult, GradedQuestion, GradingReport, QuestionRecord, UploadedFile};
pub use orchestrator::BatchProcessor;
pub use services::{Grader, LlmService};
pub use workflow::{SubmissionCtx, SubmissionFlow};
