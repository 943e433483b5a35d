//! 通知服务 - 业务能力层
//!
//! 尽力而为的多通道用户反馈：桌面通知 → 页面提示 → 日志。
//! 各通道相互独立，任何一个失败都不影响其他通道，也从不向外抛错

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::services::page_ui::{MessageColor, PageUi};

/// 通知类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    /// 复制成功
    Success,
    /// 提取失败
    Error,
}

/// 通知服务
///
/// 职责：
/// - 桌面通知（平台支持时）
/// - 页面右上角临时提示
/// - 日志行（总是写）
/// - 只产生副作用，`notify` 永不失败
pub struct Notifier {
    ui: Arc<PageUi>,
    display_duration_ms: u64,
}

impl Notifier {
    /// 创建新的通知服务
    pub fn new(ui: Arc<PageUi>, display_duration_ms: u64) -> Self {
        Self {
            ui,
            display_duration_ms,
        }
    }

    /// 发送一条通知
    pub async fn notify(&self, title: &str, text: &str, kind: NotifyKind) {
        // 通道 1: 桌面通知
        send_desktop(title, text);

        // 通道 2: 页面提示
        let color = match kind {
            NotifyKind::Success => MessageColor::Green,
            NotifyKind::Error => MessageColor::Red,
        };
        if let Err(e) = self
            .ui
            .show_message(text, color, self.display_duration_ms)
            .await
        {
            debug!("页面提示注入失败: {}", e);
        }

        // 通道 3: 日志（总是写）
        match kind {
            NotifyKind::Success => info!("{}: {}", title, text),
            NotifyKind::Error => warn!("{}: {}", title, text),
        }
    }
}

/// 发送桌面通知（尽力而为）
#[cfg(target_os = "macos")]
fn send_desktop(title: &str, text: &str) {
    let script = format!(
        r#"display notification "{}" with title "{}""#,
        text.replace('"', r#"\""#),
        title.replace('"', r#"\""#)
    );
    if let Err(e) = std::process::Command::new("osascript")
        .args(["-e", &script])
        .output()
    {
        debug!("桌面通知发送失败: {}", e);
    }
}

/// 发送桌面通知（尽力而为）
#[cfg(target_os = "linux")]
fn send_desktop(title: &str, text: &str) {
    if let Err(e) = std::process::Command::new("notify-send")
        .args([title, text])
        .output()
    {
        debug!("桌面通知发送失败: {}", e);
    }
}

/// 当前平台没有桌面通知通道
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn send_desktop(_title: &str, _text: &str) {}
