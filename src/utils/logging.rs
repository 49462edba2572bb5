//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::submission::BatchResult;
use crate::workflow::SubmissionCtx;

/// 初始化日志
///
/// `RUST_LOG` 优先，其次使用配置中的 `log_filter`；`verbose_logging` 打开时默认 debug。
/// 重复调用不会报错（测试中可能多次初始化）。
pub fn init(config: &Config) {
    let default_filter = if config.verbose_logging {
        "debug"
    } else {
        config.log_filter.as_str()
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 程序配置
/// - `llm_configured`: 是否配置了 LLM 密钥
pub fn log_startup(config: &Config, llm_configured: bool) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 评分服务启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 监听地址: {}", config.bind_address);
    info!("🤖 模型: {}", config.llm_model_name);
    if llm_configured {
        info!("🔑 LLM 密钥: 已配置");
    } else {
        info!("🔑 LLM 密钥: 未配置（评分请求将全部失败）");
    }
    info!("📦 上传上限: {} MB", config.max_upload_mb);
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
///
/// # 参数
/// - `solution_name`: 标准答案文件名
/// - `total`: 学生答卷数量
pub fn log_batch_start(solution_name: &str, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始批量评分");
    info!("📄 标准答案: {}", solution_name);
    info!("📋 学生答卷: {} 份", total);
    info!("{}", "=".repeat(60));
}

/// 记录单份答卷开始
pub fn log_submission_start(ctx: &SubmissionCtx) {
    info!("\n{}", "─".repeat(30));
    info!("{} 开始评分", ctx);
}

/// 记录批次完成信息
pub fn log_batch_complete(batch: &BatchResult) {
    info!("\n{}", "─".repeat(60));
    info!("📊 批量评分完成");
    info!("✅ 成功: {}/{}", batch.success_count, batch.total_processed);
    info!("❌ 失败: {}", batch.error_count);
    for failure in &batch.errors {
        info!("   - {}: {}", failure.filename, truncate_text(&failure.error, 120));
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
