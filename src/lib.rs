//! # Question Copy
//!
//! 把考试页面当前题目和选项复制到剪贴板的 Rust 工具：
//! 手动点按钮复制，或在"下一题"后等待页面渲染稳定自动复制
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 和 binding 通道能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个服务一种能力
//! - `DomReader` - 页面快照读取能力
//! - `Extractor` - 题目与选项提取能力（纯函数）
//! - `format_copy_text` - 剪贴板文本格式化（纯函数）
//! - `ClipboardWriter` / `CopyLog` / `Notifier` / `PageUi`
//!
//! ### ③ 核心层（Watch）
//! - `watch/` - 变化监听与按钮绑定，整个系统的时序核心
//! - `ChangeWatcher` - 首批变化 + 静置延迟，超时兜底，会话抢占
//! - `TriggerBinder` - 下一题按钮的无限重试绑定（捕获阶段钩子）
//!
//! ### ④ 流程 / 编排层（Workflow / App）
//! - `workflow/CopyFlow` - 提取 → 格式化 → 剪贴板 → 通知
//! - `app` - 启动装配和单一事件循环

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod watch;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use browser::connect_to_quiz_page;
pub use config::{Config, SelectorConfig};
pub use error::{AppError, AppResult, ExtractError};
pub use infrastructure::JsExecutor;
pub use models::{DomSnapshot, Extraction, OptionItem, Question};
pub use watch::{AttachOutcome, ChangeWatcher, TriggerBinder, WatchOutcome};
pub use workflow::{CopyFlow, CopyOutcome};
