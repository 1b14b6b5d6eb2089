use anyhow::Context;
use student_records::{
    config::load_config,
    create_router,
    infrastructure::{logger::Logger, open_repository},
    AppState, StudentService,
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("加载配置失败")?;

    // guard 需要存活到进程退出
    let _log_guard = Logger::init(&config.logging)?;

    info!("启动学生记录服务...");

    let repository = open_repository(&config.storage).await.map_err(|e| {
        error!("Failed to initialize storage: {}", e);
        e
    })?;

    let state = AppState {
        student_service: StudentService::new(repository),
    };
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_address())
        .await
        .with_context(|| format!("无法绑定到 {}", config.listen_address()))?;
    let addr = listener.local_addr()?;

    info!("🚀 Student records server running on http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /students/      - 获取所有学生");
    info!("   POST   /students/      - 创建学生");
    info!("   GET    /students/:id   - 获取特定学生");
    info!("   PUT    /students/:id   - 更新学生");
    info!("   DELETE /students/:id   - 删除学生");
    info!("   GET    /health         - 健康检查");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("监听退出信号失败: {}", e);
    }
    info!("收到退出信号，正在关闭...");
}
