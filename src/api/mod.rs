//! API 模块
//!
//! 负责所有与 HTTP 前端的交互：路由、multipart 上传、错误响应

pub mod error;
pub mod router;
pub mod upload;

// 重新导出常用类型
pub use error::ApiError;
pub use router::build_router;
pub use upload::GradeUpload;
