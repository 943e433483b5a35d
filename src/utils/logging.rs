//! 日志工具模块
//!
//! tracing 订阅器初始化和日志格式化辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 默认 info 级别，可用 RUST_LOG 环境变量覆盖。重复调用只生效第一次
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(auto_copy: bool, target_url: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 题目复制模式");
    info!("🎯 目标页面: {}", target_url);
    if auto_copy {
        info!("🔁 下一题自动复制: 开启");
    } else {
        info!("🔁 下一题自动复制: 关闭（仅手动按钮）");
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
