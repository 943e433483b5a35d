//! 页面注入 UI - 业务能力层
//!
//! 负责两块展示性的页面元素：右侧的手动复制按钮和右上角的临时提示。
//! 两者都是单实例（固定 id，重建前先移除旧的）

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::infrastructure::{bindings, JsExecutor};

/// 复制按钮元素 id
const BUTTON_ID: &str = "qc-copy-button";
/// 提示消息元素 id
const MESSAGE_ID: &str = "qc-copy-message";

/// 提示消息配色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageColor {
    /// 绿色（成功）
    Green,
    /// 红色（失败）
    Red,
}

impl MessageColor {
    fn css(self) -> &'static str {
        match self {
            MessageColor::Green => "#4caf50",
            MessageColor::Red => "#f44336",
        }
    }
}

/// 页面注入 UI 服务
pub struct PageUi {
    executor: Arc<JsExecutor>,
}

impl PageUi {
    /// 创建新的页面 UI 服务
    pub fn new(executor: Arc<JsExecutor>) -> Self {
        Self { executor }
    }

    /// 在页面右侧注入手动复制按钮
    ///
    /// 点击通过 manual binding 通知 Rust 侧。重复调用会先移除旧按钮
    pub async fn install_copy_button(&self) -> Result<()> {
        let js_code = format!(
            r#"
            (() => {{
                const existing = document.getElementById({button_id});
                if (existing) {{
                    existing.remove();
                }}
                const button = document.createElement('button');
                button.id = {button_id};
                button.textContent = '复制题目';
                button.style.cssText =
                    'position:fixed;top:50%;right:20px;transform:translateY(-50%);' +
                    'z-index:9999;padding:12px 16px;background-color:#4caf50;color:#fff;' +
                    'border:none;border-radius:4px;cursor:pointer;font-size:14px;' +
                    'font-weight:bold;box-shadow:0 2px 10px rgba(0,0,0,0.2);';
                button.addEventListener('click', () => window[{manual_binding}](''));
                document.body.appendChild(button);
                return 'ok';
            }})()
            "#,
            button_id = serde_json::to_string(BUTTON_ID)?,
            manual_binding = serde_json::to_string(bindings::MANUAL)?,
        );

        self.executor.eval(js_code).await?;
        debug!("复制按钮已注入页面右侧");
        Ok(())
    }

    /// 在页面右上角显示临时提示，`duration_ms` 后淡出并移除
    ///
    /// 同一时刻只保留一条提示：新提示先移除旧的
    pub async fn show_message(
        &self,
        text: &str,
        color: MessageColor,
        duration_ms: u64,
    ) -> Result<()> {
        let js_code = format!(
            r#"
            (() => {{
                const existing = document.getElementById({message_id});
                if (existing) {{
                    existing.remove();
                }}
                const message = document.createElement('div');
                message.id = {message_id};
                message.textContent = {text};
                message.style.cssText =
                    'position:fixed;top:20px;right:20px;padding:12px 20px;color:#fff;' +
                    'border-radius:4px;z-index:10000;font-family:Arial,sans-serif;' +
                    'box-shadow:0 2px 10px rgba(0,0,0,0.2);transition:opacity 0.3s;';
                message.style.backgroundColor = {color};
                document.body.appendChild(message);
                setTimeout(() => {{
                    if (message.parentNode) {{
                        message.style.opacity = '0';
                        setTimeout(() => message.remove(), 300);
                    }}
                }}, {duration_ms});
                return 'ok';
            }})()
            "#,
            message_id = serde_json::to_string(MESSAGE_ID)?,
            text = serde_json::to_string(text)?,
            color = serde_json::to_string(color.css())?,
            duration_ms = duration_ms,
        );

        self.executor.eval(js_code).await?;
        Ok(())
    }
}
