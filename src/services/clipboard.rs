//! 剪贴板写入服务 - 业务能力层
//!
//! 只负责"写系统剪贴板"能力。写入按"发射后不管"处理：
//! 失败记日志，不进入错误流

use std::sync::Mutex;

use arboard::Clipboard;
use tracing::{debug, warn};

use crate::error::AppResult;

/// 剪贴板写入服务
///
/// 句柄在启动时创建一次并持有整个进程生命周期，
/// X11 下逐次创建的句柄在 drop 时会丢失选区内容
pub struct ClipboardWriter {
    inner: Mutex<Clipboard>,
}

impl ClipboardWriter {
    /// 创建新的剪贴板写入服务
    ///
    /// 拿不到系统剪贴板属于启动错误
    pub fn new() -> AppResult<Self> {
        let clipboard = Clipboard::new()?;
        Ok(Self {
            inner: Mutex::new(clipboard),
        })
    }

    /// 写入文本
    pub fn write(&self, text: &str) {
        let mut clipboard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match clipboard.set_text(text) {
            Ok(()) => debug!("剪贴板写入 {} 字符", text.chars().count()),
            Err(e) => warn!("剪贴板写入失败: {}", e),
        }
    }
}
