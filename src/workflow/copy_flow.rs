//! 复制流程 - 流程层
//!
//! 核心职责：定义"复制一道题"的完整流程
//!
//! 流程顺序：
//! 1. 读取页面快照 → 提取题目与选项
//! 2. 格式化 → 写剪贴板 → 追加复制记录
//! 3. 通知（成功或失败都通知）
//!
//! 提取失败在这一层被完全吃掉：只走通知器的错误通道加日志，
//! 绝不向上传播，程序保持运行等待下一次触发

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::JsExecutor;
use crate::services::{
    format_copy_text, ClipboardWriter, CopyLog, DomReader, Extractor, Notifier, NotifyKind, PageUi,
};
use crate::utils::logging::truncate_text;
use crate::watch::WatchOutcome;

/// 一次复制流程的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// 已复制到剪贴板
    Copied,
    /// 本次提取失败（已通知，等待下一次触发）
    Failed,
}

/// 复制流程
///
/// - 编排提取 → 格式化 → 剪贴板 → 通知
/// - 不持有 page 资源，只依赖业务能力（services）
/// - 可从监听会话（自动）或手动按钮进入
pub struct CopyFlow {
    reader: DomReader,
    extractor: Extractor,
    clipboard: Arc<ClipboardWriter>,
    notifier: Notifier,
    copy_log: CopyLog,
    verbose_logging: bool,
}

impl CopyFlow {
    /// 创建新的复制流程
    pub fn new(
        config: &Config,
        executor: Arc<JsExecutor>,
        ui: Arc<PageUi>,
        clipboard: Arc<ClipboardWriter>,
    ) -> Self {
        Self {
            reader: DomReader::new(executor, config.selectors.clone()),
            extractor: Extractor::new(),
            clipboard,
            notifier: Notifier::new(ui, config.message_duration_ms),
            copy_log: CopyLog::new(config.copy_log_file.clone()),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 监听会话结束后的入口（自动复制）
    pub async fn run_after_watch(&self, outcome: WatchOutcome) -> CopyOutcome {
        if outcome == WatchOutcome::TimedOut {
            // 兜底路径不是错误：容器整体替换可能观察不到子节点变化
            info!("监听超时，直接提取当前页面内容");
        }
        self.run().await
    }

    /// 运行一次完整的复制流程
    pub async fn run(&self) -> CopyOutcome {
        // 读取页面快照；CDP 读取失败与提取失败同等对待
        let snapshot = match self.reader.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("读取页面内容失败: {}", e);
                self.notifier
                    .notify("错误", &format!("提取失败: {}", e), NotifyKind::Error)
                    .await;
                return CopyOutcome::Failed;
            }
        };

        match self.extractor.extract(&snapshot) {
            Ok(extraction) => {
                let text = format_copy_text(&extraction.question, &extraction.options);

                self.clipboard.write(&text);

                if let Err(e) = self.copy_log.append(&text).await {
                    warn!("复制记录写入失败: {}", e);
                }

                if self.verbose_logging {
                    info!("已复制内容:\n{}", text);
                } else {
                    info!("已复制: {}", truncate_text(&extraction.question.text, 40));
                }

                self.notifier
                    .notify("复制成功", "题目和选项已复制到剪贴板", NotifyKind::Success)
                    .await;
                CopyOutcome::Copied
            }
            Err(e) => {
                warn!("提取内容失败: {}", e);
                self.notifier
                    .notify("错误", &format!("提取失败: {}", e), NotifyKind::Error)
                    .await;
                CopyOutcome::Failed
            }
        }
    }
}
