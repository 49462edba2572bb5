use ai_exam_grader::utils::logging;
use ai_exam_grader::{App, Config};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // 读取 .env（不存在时忽略）
    dotenvy::dotenv().ok();

    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(&config);

    // 初始化并运行应用
    App::initialize(config).run().await?;

    Ok(())
}
