/// 日志初始化
///
/// 可以通过环境变量 RUST_LOG 设置日志级别，例如：
/// RUST_LOG=storage=debug

use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅器
///
/// RUST_LOG 优先，未设置时使用 `default_level`。重复调用时保留已安装的订阅器，返回 false。
pub fn init_tracing(default_level: &str) -> bool {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init()
        .is_ok()
}
