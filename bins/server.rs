use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging(json: bool) {
    // 复用公共日志初始化工具，统一日志格式与级别处理
    common::utils::logging::init_logging(json);
    info!(service = "vipi-catalog", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    // 提前加载 .env，使得 RUST_LOG / DATABASE_URL 等环境变量生效
    dotenv().ok();

    let cfg = match configs::AppConfig::load_or_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "vipi-catalog", event = "config_invalid", error = %e, "invalid configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    init_logging(cfg.server.json_logs);

    // 进程上下文（不含敏感信息）
    let instance_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // Panic 钩子：捕获异常并输出错误日志，便于排查问题
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "vipi-catalog",
            event = "panic",
            %instance_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let worker_threads = cfg.server.worker_threads;

    // 构建 Tokio 运行时（允许根据配置调整线程数）
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "vipi-catalog", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "vipi-catalog",
        event = "start",
        %instance_id,
        pid,
        version,
        backend = if cfg.has_remote_backend() { "remote" } else { "local" },
        threads = worker_threads.unwrap_or_default(),
        "catalog server starting"
    );

    // server::serve 内部监听 Ctrl+C 并优雅停机
    rt.block_on(async move {
        match server::startup::serve(cfg).await {
            Ok(()) => {
                info!(service = "vipi-catalog", event = "stop", %instance_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "vipi-catalog", event = "run_failed", error = %e, "server returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
