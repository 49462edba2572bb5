//! HTTP 路由
//!
//! - `GET  /`                   存活检查（纯文本）
//! - `GET  /api/health`         健康检查（JSON）
//! - `POST /api/grade/`         批量评分：一个 `solutionKey` + 多个 `studentSheet`
//! - `POST /api/grade/single/`  单份评分：只取第一个 `studentSheet`

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::api::error::ApiError;
use crate::api::upload::GradeUpload;
use crate::models::question::GradingReport;
use crate::models::submission::BatchResult;
use crate::orchestrator::BatchProcessor;
use crate::services::Grader;
use crate::workflow::SubmissionCtx;

/// 路由共享状态
pub struct AppState<G> {
    grader: Arc<G>,
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            grader: Arc::clone(&self.grader),
        }
    }
}

/// 构建路由
///
/// 评分器在进程启动时创建一次，之后只读共享。
pub fn build_router<G>(grader: Arc<G>, max_upload_bytes: usize) -> Router
where
    G: Grader + Send + Sync + 'static,
{
    let state = AppState { grader };

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health::<G>))
        .route("/api/grade", post(grade_batch::<G>))
        .route("/api/grade/", post(grade_batch::<G>))
        .route("/api/grade/single", post(grade_single::<G>))
        .route("/api/grade/single/", post(grade_single::<G>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> &'static str {
    "AI Grader backend is running!"
}

async fn health<G>(State(state): State<AppState<G>>) -> Json<Value>
where
    G: Grader + Send + Sync + 'static,
{
    Json(json!({
        "status": "ok",
        "llm_configured": state.grader.is_configured(),
    }))
}

/// 批量评分
async fn grade_batch<G>(
    State(state): State<AppState<G>>,
    multipart: Multipart,
) -> Result<Json<BatchResult>, ApiError>
where
    G: Grader + Send + Sync + 'static,
{
    let (solution, students) = GradeUpload::read(multipart).await?.require_files()?;
    info!(
        "📥 收到批量评分请求: 标准答案 {}, 学生答卷 {} 份",
        solution.filename,
        students.len()
    );

    let batch = BatchProcessor::new(state.grader.as_ref())
        .process(&solution, &students)
        .await;

    Ok(Json(batch))
}

/// 单份评分
async fn grade_single<G>(
    State(state): State<AppState<G>>,
    multipart: Multipart,
) -> Result<Json<GradingReport>, ApiError>
where
    G: Grader + Send + Sync + 'static,
{
    let (solution, students) = GradeUpload::read(multipart).await?.require_files()?;
    let student = &students[0];
    info!(
        "📥 收到单份评分请求: 标准答案 {}, 学生答卷 {}",
        solution.filename, student.filename
    );

    let ctx = SubmissionCtx::new(student.filename.clone(), 1, 1);
    let report = BatchProcessor::new(state.grader.as_ref())
        .process_one(&solution, student, &ctx)
        .await?;

    Ok(Json(report))
}
