//! 应用生命周期：初始化 → 监听 → 关闭

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::services::{Grader, LlmService};
use crate::utils::logging::log_startup;

/// 应用主结构
pub struct App {
    config: Config,
    grader: Arc<LlmService>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Self {
        // 评分服务只创建一次，之后只读共享
        let grader = Arc::new(LlmService::new(&config));

        log_startup(&config, grader.is_configured());

        Self { config, grader }
    }

    /// 运行 HTTP 服务，直到收到 Ctrl+C
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.bind_address)
            .await
            .map_err(|e| AppError::bind_failed(&self.config.bind_address, e))?;

        let router = api::build_router(self.grader, self.config.max_upload_bytes());

        info!("✓ 服务已就绪: http://{}", self.config.bind_address);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP 服务异常退出")?;

        info!("👋 服务已关闭");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听 Ctrl+C 信号: {}", e);
        std::future::pending::<()>().await;
    }
}
