//! 复制记录写入服务 - 业务能力层
//!
//! 只负责"把复制成功的内容追加到日志文件"能力，不关心流程

use std::fs::OpenOptions;
use std::io::Write;

use anyhow::Result;
use tracing::debug;

/// 复制记录写入服务
pub struct CopyLog {
    log_file_path: String,
}

impl CopyLog {
    /// 创建新的复制记录服务
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            log_file_path: path.into(),
        }
    }

    /// 追加一条复制记录（带本地时间戳）
    pub async fn append(&self, content: &str) -> Result<()> {
        debug!(
            "写入复制记录: {} ({} 字符)",
            self.log_file_path,
            content.chars().count()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)?;

        let entry = format!(
            "{}\n[{}]\n{}\n",
            "─".repeat(40),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            content
        );

        file.write_all(entry.as_bytes())?;

        Ok(())
    }
}
