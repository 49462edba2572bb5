//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和失败隔离，是整个评分流程的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! api (HTTP 请求 → UploadedFile)
//!     ↓
//! batch_processor (处理 Vec<UploadedFile>)
//!     ↓
//! workflow::SubmissionFlow (处理单份答卷，选择评分路径)
//!     ↓
//! services (能力层：segmenter / record_builder / llm_service)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：只做调度和统计，不做具体业务判断
//! 2. **向下依赖**：编排层 → workflow → services
//! 3. **失败隔离**：单份答卷失败不中断整批

pub mod batch_processor;

// 重新导出主要类型
pub use batch_processor::BatchProcessor;
