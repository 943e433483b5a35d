//! 下一题按钮绑定 - 核心层
//!
//! 按钮是动态渲染的，脚本启动时多半还不存在：按固定间隔无限重试，
//! 找到后挂上捕获阶段的点击钩子。不设退避，按钮预期在页面加载后
//! 很快出现，简单轮询足够。
//!
//! 钩子必须在捕获阶段运行：页面自己的处理器还没开始改 DOM 时，
//! 页面侧的 MutationObserver 就已经同步装好了

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::config::SelectorConfig;
use crate::infrastructure::{bindings, JsExecutor};

/// 一次挂接尝试的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// 本次挂上了钩子
    Attached,
    /// 这个按钮实例已经挂过钩子（幂等重入）
    AlreadyBound,
    /// 按钮还不存在
    Missing,
}

/// 挂接能力的抽象
///
/// 把"尝试给按钮挂钩子"从重试状态机里拆出来，状态机不碰浏览器即可测试
#[async_trait]
pub trait ControlProbe: Send + Sync {
    /// 尝试找到按钮并挂接点击钩子
    async fn try_attach(&self) -> Result<AttachOutcome>;
}

/// 下一题按钮绑定器
///
/// 状态机：Searching（按钮无匹配，固定间隔重试，不限次数）→
/// Bound（挂上钩子，对该按钮实例终态）。
/// 按钮始终不出现时系统不会自动触发，只记日志，手动复制入口仍然可用
pub struct TriggerBinder<P> {
    probe: P,
    retry_delay: Duration,
}

impl<P: ControlProbe> TriggerBinder<P> {
    /// 创建新的绑定器
    pub fn new(probe: P, retry_delay: Duration) -> Self {
        Self { probe, retry_delay }
    }

    /// 绑定循环：直到挂上钩子（或确认已挂）才返回
    ///
    /// 可以在任何时刻幂等地重新调用；同一个按钮实例不会被挂两次钩子
    pub async fn bind(&self) -> AttachOutcome {
        let mut attempt = 0usize;
        loop {
            attempt += 1;
            match self.probe.try_attach().await {
                Ok(AttachOutcome::Attached) => {
                    info!("✓ 下一题按钮绑定成功 (第 {} 次尝试)", attempt);
                    return AttachOutcome::Attached;
                }
                Ok(AttachOutcome::AlreadyBound) => {
                    debug!("下一题按钮已绑定，跳过");
                    return AttachOutcome::AlreadyBound;
                }
                Ok(AttachOutcome::Missing) => {
                    debug!(
                        "未找到下一题按钮 (第 {} 次尝试)，{:?} 后重试",
                        attempt, self.retry_delay
                    );
                }
                Err(e) => {
                    warn!("绑定下一题按钮失败: {}，{:?} 后重试", e, self.retry_delay);
                }
            }
            sleep(self.retry_delay).await;
        }
    }
}

/// 基于页面 JS 的挂接实现
///
/// 点击钩子在捕获阶段做三件事（全部同步，先于页面自己的处理器）：
/// 1. 断开上一个页面侧观察器（如有）
/// 2. 在题目容器子树上装一个一次性 MutationObserver，
///    首批变化即断开自身并调 mutation binding
/// 3. 调 trigger binding 通知 Rust 侧开启监听会话
pub struct PageControlProbe {
    executor: Arc<JsExecutor>,
    selectors: SelectorConfig,
}

impl PageControlProbe {
    /// 创建新的页面挂接实现
    pub fn new(executor: Arc<JsExecutor>, selectors: SelectorConfig) -> Self {
        Self {
            executor,
            selectors,
        }
    }
}

/// 构造挂接脚本
///
/// 选择器和 binding 名统一经 serde_json 转义后嵌入
fn build_attach_js(selectors: &SelectorConfig) -> Result<String> {
    let js_code = format!(
            r#"
            (() => {{
                const control = document.querySelector({trigger});
                if (!control) {{
                    return 'missing';
                }}
                if (control.dataset.qcNextHook === '1') {{
                    return 'already';
                }}
                control.dataset.qcNextHook = '1';
                control.addEventListener('click', () => {{
                    try {{
                        if (window.__qcObserver) {{
                            window.__qcObserver.disconnect();
                        }}
                        const container =
                            document.querySelector({container}) || document.body;
                        const observer = new MutationObserver(() => {{
                            observer.disconnect();
                            window.__qcObserver = null;
                            window[{mutation_binding}]('');
                        }});
                        observer.observe(container, {{
                            childList: true,
                            characterData: true,
                            subtree: true,
                        }});
                        window.__qcObserver = observer;
                    }} catch (e) {{
                        // 观察器装不上时仍然上报触发，Rust 侧靠超时兜底
                    }}
                    window[{trigger_binding}]('');
                }}, true);
                return 'attached';
            }})()
            "#,
        trigger = serde_json::to_string(&selectors.next_trigger)?,
        container = serde_json::to_string(&selectors.question_container)?,
        mutation_binding = serde_json::to_string(bindings::MUTATION)?,
        trigger_binding = serde_json::to_string(bindings::TRIGGER)?,
    );
    Ok(js_code)
}

#[async_trait]
impl ControlProbe for PageControlProbe {
    async fn try_attach(&self) -> Result<AttachOutcome> {
        let js_code = build_attach_js(&self.selectors)?;
        let state: String = self.executor.eval_as(js_code).await?;
        Ok(match state.as_str() {
            "attached" => AttachOutcome::Attached,
            "already" => AttachOutcome::AlreadyBound,
            _ => AttachOutcome::Missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 按脚本顺序返回结果的探针；脚本耗尽后返回 Missing
    struct ScriptedProbe {
        script: Mutex<VecDeque<Result<AttachOutcome>>>,
        calls: AtomicUsize,
    }

    impl ScriptedProbe {
        fn new(script: Vec<Result<AttachOutcome>>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ControlProbe for ScriptedProbe {
        async fn try_attach(&self) -> Result<AttachOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .expect("测试探针锁")
                .pop_front()
                .unwrap_or(Ok(AttachOutcome::Missing))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_bind_succeeds_after_n_retries() {
        // 按钮在第 3 个重试周期后出现：第 4 次尝试绑定成功
        let probe = ScriptedProbe::new(vec![
            Ok(AttachOutcome::Missing),
            Ok(AttachOutcome::Missing),
            Ok(AttachOutcome::Missing),
            Ok(AttachOutcome::Attached),
        ]);
        let binder = TriggerBinder::new(probe, Duration::from_millis(1000));

        let outcome = binder.bind().await;
        assert_eq!(outcome, AttachOutcome::Attached);
        assert_eq!(binder.probe.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rebind_is_idempotent() {
        let probe = ScriptedProbe::new(vec![
            Ok(AttachOutcome::Attached),
            Ok(AttachOutcome::AlreadyBound),
        ]);
        let binder = TriggerBinder::new(probe, Duration::from_millis(1000));

        assert_eq!(binder.bind().await, AttachOutcome::Attached);
        // 重新初始化不会重复挂钩子
        assert_eq!(binder.bind().await, AttachOutcome::AlreadyBound);
        assert_eq!(binder.probe.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_error_keeps_retrying() {
        let probe = ScriptedProbe::new(vec![
            Err(anyhow!("页面求值失败")),
            Ok(AttachOutcome::Attached),
        ]);
        let binder = TriggerBinder::new(probe, Duration::from_millis(1000));

        assert_eq!(binder.bind().await, AttachOutcome::Attached);
        assert_eq!(binder.probe.calls(), 2);
    }

    #[test]
    fn test_attach_js_embeds_selectors_and_bindings() {
        let selectors = SelectorConfig {
            next_trigger: ".btn-next".to_string(),
            ..SelectorConfig::default()
        };

        let js_code = build_attach_js(&selectors).expect("脚本构造不应失败");
        assert!(js_code.contains(r#"".btn-next""#));
        assert!(js_code.contains(r#"".question-main""#));
        assert!(js_code.contains(bindings::MUTATION));
        assert!(js_code.contains(bindings::TRIGGER));
        // 捕获阶段注册
        assert!(js_code.contains("}, true);"));
    }
}
