//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露两种能力：
//! - 执行 JS 并取回结果
//! - 注册 CDP binding 并把页面回调转成通道事件

use anyhow::{Context, Result};
use chromiumoxide::cdp::js_protocol::runtime::{AddBindingParams, EventBindingCalled};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() / eval_as() 能力
/// - 暴露 binding 通道能力（页面 JS 调 window.<name>() → Rust 收到事件）
/// - 不认识题目 / 选项
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 注册一个 CDP binding 并返回其事件通道
    ///
    /// 页面里任何 `window.<name>(payload)` 调用都会以 payload 字符串的形式
    /// 出现在返回的接收端上。接收端被丢弃后转发任务自行退出
    pub async fn binding_channel(
        &self,
        name: &str,
        capacity: usize,
    ) -> Result<mpsc::Receiver<String>> {
        self.page
            .execute(AddBindingParams::new(name))
            .await
            .with_context(|| format!("注册 binding {} 失败", name))?;

        let mut events = self
            .page
            .event_listener::<EventBindingCalled>()
            .await
            .context("订阅 bindingCalled 事件失败")?;

        let (tx, rx) = mpsc::channel(capacity);
        let binding_name = name.to_string();
        tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.name != binding_name {
                    continue;
                }
                trace!("binding {} 被调用: {}", binding_name, event.payload);
                if tx.send(event.payload.clone()).await.is_err() {
                    break;
                }
            }
            debug!("binding {} 事件流结束", binding_name);
        });

        debug!("binding {} 注册完成", name);
        Ok(rx)
    }
}
