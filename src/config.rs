use std::fs;

use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, AppResult, ConfigError};

/// 默认配置文件名，放在工作目录下，缺失时使用内置默认值
pub const CONFIG_FILE: &str = "question_copy.toml";

/// 页面元素选择器配置
///
/// 把逻辑角色（题目容器、题目文本、选项条目、选项字母、下一题按钮）
/// 映射为 CSS 选择器，启动时解析一次，运行期不再变更
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SelectorConfig {
    /// 题目容器选择器（变化监听的观察范围）
    pub question_container: String,
    /// 题目文本选择器
    pub question_title: String,
    /// 单个选项选择器
    pub option_item: String,
    /// 选项字母选择器
    pub option_letter: String,
    /// 下一题按钮选择器
    pub next_trigger: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            question_container: ".question-main".to_string(),
            question_title: ".question-title div".to_string(),
            option_item: ".options-list".to_string(),
            option_letter: ".options-raido".to_string(),
            next_trigger: ".question-next".to_string(),
        }
    }
}

/// 程序配置
///
/// 解析顺序：内置默认值 ← 配置文件（可选） ← 环境变量（优先级最高）
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 考试页面 URL（用于查找已打开的页面，找不到时导航）
    pub target_url: String,
    /// 是否启用"下一题后自动复制"
    pub auto_copy: bool,
    /// 首次变化后的静置延迟(毫秒)，等待多步渲染完成
    pub settle_delay_ms: u64,
    /// 变化监听超时(毫秒)，超时后无条件提取（兜底路径）
    pub mutation_timeout_ms: u64,
    /// 下一题按钮查找重试间隔(毫秒)
    pub bind_retry_ms: u64,
    /// 页面提示显示时间(毫秒)
    pub message_duration_ms: u64,
    /// 复制内容日志文件
    pub copy_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 选择器配置
    pub selectors: SelectorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 2001,
            target_url: "https://js.zhixinst.com/exam/exam".to_string(),
            auto_copy: true,
            settle_delay_ms: 300,
            mutation_timeout_ms: 3000,
            bind_retry_ms: 1000,
            message_duration_ms: 2000,
            copy_log_file: "copy_log.txt".to_string(),
            verbose_logging: false,
            selectors: SelectorConfig::default(),
        }
    }
}

impl Config {
    /// 启动时解析配置：读取配置文件（如存在），再套用环境变量覆盖
    ///
    /// 配置文件缺失不算错误；文件存在但无法解析则启动失败
    pub fn load() -> AppResult<Self> {
        let mut config = match fs::read_to_string(CONFIG_FILE) {
            Ok(raw) => toml::from_str(&raw).map_err(|e| {
                AppError::Config(ConfigError::ParseFailed {
                    path: CONFIG_FILE.to_string(),
                    message: e.to_string(),
                })
            })?,
            Err(_) => {
                debug!("未找到配置文件 {}，使用默认配置", CONFIG_FILE);
                Self::default()
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// 套用环境变量覆盖
    fn apply_env(&mut self) {
        if let Some(v) = env_parse("BROWSER_DEBUG_PORT") {
            self.browser_debug_port = v;
        }
        if let Ok(v) = std::env::var("TARGET_URL") {
            self.target_url = v;
        }
        if let Some(v) = env_parse("AUTO_COPY") {
            self.auto_copy = v;
        }
        if let Some(v) = env_parse("SETTLE_DELAY_MS") {
            self.settle_delay_ms = v;
        }
        if let Some(v) = env_parse("MUTATION_TIMEOUT_MS") {
            self.mutation_timeout_ms = v;
        }
        if let Some(v) = env_parse("BIND_RETRY_MS") {
            self.bind_retry_ms = v;
        }
        if let Some(v) = env_parse("MESSAGE_DURATION_MS") {
            self.message_duration_ms = v;
        }
        if let Ok(v) = std::env::var("COPY_LOG_FILE") {
            self.copy_log_file = v;
        }
        if let Some(v) = env_parse("VERBOSE_LOGGING") {
            self.verbose_logging = v;
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
