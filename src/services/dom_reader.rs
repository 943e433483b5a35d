//! 页面读取服务 - 业务能力层
//!
//! 只负责"把当前页面读成快照"能力，不做任何清洗和判断

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::config::SelectorConfig;
use crate::infrastructure::JsExecutor;
use crate::models::DomSnapshot;

/// 页面读取服务
///
/// 职责：
/// - 用一次 JS 求值把题目和选项读成 [`DomSnapshot`]
/// - 纯读取，不修改页面状态，可安全重复调用
/// - 不关心提取规则（清洗交给提取器）
pub struct DomReader {
    executor: Arc<JsExecutor>,
    selectors: SelectorConfig,
}

impl DomReader {
    /// 创建新的页面读取服务
    pub fn new(executor: Arc<JsExecutor>, selectors: SelectorConfig) -> Self {
        Self {
            executor,
            selectors,
        }
    }

    /// 读取当前页面的题目快照
    pub async fn snapshot(&self) -> Result<DomSnapshot> {
        let js_code = build_snapshot_js(&self.selectors)?;
        let snapshot: DomSnapshot = self.executor.eval_as(js_code).await?;
        debug!(
            "页面快照: 题目存在={}, 选项数={}",
            snapshot.title.is_some(),
            snapshot.options.len()
        );
        Ok(snapshot)
    }
}

/// 构造快照读取脚本
///
/// 选择器统一经 serde_json 转义后嵌入，避免引号问题
fn build_snapshot_js(selectors: &SelectorConfig) -> Result<String> {
    let js_code = format!(
        r#"
        (() => {{
            const titleElement = document.querySelector({title});
            const optionElements = Array.from(document.querySelectorAll({item}));
            return {{
                title: titleElement ? titleElement.textContent : null,
                options: optionElements.map((option) => {{
                    const letterElement = option.querySelector({letter});
                    return {{
                        letter: letterElement ? letterElement.textContent : null,
                        text: option.textContent || '',
                    }};
                }}),
            }};
        }})()
        "#,
        title = serde_json::to_string(&selectors.question_title)?,
        item = serde_json::to_string(&selectors.option_item)?,
        letter = serde_json::to_string(&selectors.option_letter)?,
    );
    Ok(js_code)
}
