//! 应用编排 - 编排层
//!
//! 启动时把各层组装起来，然后跑单一事件循环：
//! 下一题触发 → 开监听会话；手动按钮 → 立即复制；
//! 自动复制周期结束 → 幂等重绑按钮（切题可能重建了按钮实例）

use std::sync::Arc;

use anyhow::Result;
use chromiumoxide::Browser;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::browser::connect_to_quiz_page;
use crate::config::Config;
use crate::infrastructure::{bindings, JsExecutor};
use crate::services::{ClipboardWriter, PageUi};
use crate::utils::logging::log_startup;
use crate::watch::{ChangeWatcher, MutationNotice, PageControlProbe, TriggerBinder};
use crate::workflow::{CopyFlow, CopyOutcome};

/// 应用主结构
pub struct App {
    config: Config,
    // 连接句柄必须活到进程结束，否则 CDP 会话随之关闭
    _browser: Browser,
    executor: Arc<JsExecutor>,
    ui: Arc<PageUi>,
    flow: Arc<CopyFlow>,
    watcher: ChangeWatcher,
}

impl App {
    /// 初始化应用：连接浏览器、定位考试页面、组装各层
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(config.auto_copy, &config.target_url);

        let (browser, page) =
            connect_to_quiz_page(config.browser_debug_port, &config.target_url).await?;

        let executor = Arc::new(JsExecutor::new(page));
        let ui = Arc::new(PageUi::new(executor.clone()));
        let clipboard = Arc::new(ClipboardWriter::new()?);
        let flow = Arc::new(CopyFlow::new(
            &config,
            executor.clone(),
            ui.clone(),
            clipboard,
        ));
        let watcher = ChangeWatcher::new(
            Duration::from_millis(config.settle_delay_ms),
            Duration::from_millis(config.mutation_timeout_ms),
        );

        Ok(Self {
            config,
            _browser: browser,
            executor,
            ui,
            flow,
            watcher,
        })
    }

    /// 运行应用主循环
    pub async fn run(mut self) -> Result<()> {
        // binding 先注册：页面钩子脚本引用的 window 函数必须已存在
        let mut trigger_rx = self.executor.binding_channel(bindings::TRIGGER, 8).await?;
        let mut manual_rx = self.executor.binding_channel(bindings::MANUAL, 8).await?;
        let mut mutation_rx = self.executor.binding_channel(bindings::MUTATION, 32).await?;

        // 页面侧变化上报转成 broadcast：每个监听会话拿自己的订阅
        let (mutation_tx, _) = broadcast::channel::<MutationNotice>(16);
        let forward_tx = mutation_tx.clone();
        tokio::spawn(async move {
            while mutation_rx.recv().await.is_some() {
                // 没有在途会话时没人订阅，发送失败是正常情况
                let _ = forward_tx.send(MutationNotice);
            }
        });

        self.ui.install_copy_button().await?;

        let binder = Arc::new(TriggerBinder::new(
            PageControlProbe::new(self.executor.clone(), self.config.selectors.clone()),
            Duration::from_millis(self.config.bind_retry_ms),
        ));
        let mut bind_task: Option<JoinHandle<()>> = None;
        if self.config.auto_copy {
            bind_task = Some(spawn_bind(binder.clone()));
        }

        // 自动复制周期结束信号（用于幂等重绑）
        let (done_tx, mut done_rx) = mpsc::channel::<CopyOutcome>(8);

        info!("✓ 初始化完成，等待触发");

        loop {
            tokio::select! {
                Some(_) = trigger_rx.recv() => {
                    info!("🔔 检测到下一题操作，开始监听页面变化");
                    let flow = self.flow.clone();
                    let done = done_tx.clone();
                    self.watcher.watch(mutation_tx.subscribe(), move |outcome| async move {
                        let result = flow.run_after_watch(outcome).await;
                        let _ = done.send(result).await;
                    });
                }
                Some(_) = manual_rx.recv() => {
                    info!("🖱️ 手动复制触发");
                    // 手动复制抢占在途会话，同一时刻只跑一条流水线
                    self.watcher.cancel_active();
                    self.flow.run().await;
                }
                Some(_) = done_rx.recv() => {
                    if self.config.auto_copy {
                        let idle = bind_task.as_ref().map_or(true, |t| t.is_finished());
                        if idle {
                            bind_task = Some(spawn_bind(binder.clone()));
                        }
                    }
                }
                else => {
                    warn!("事件通道已全部关闭，退出主循环");
                    break;
                }
            }
        }

        Ok(())
    }
}

fn spawn_bind(binder: Arc<TriggerBinder<PageControlProbe>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        binder.bind().await;
    })
}
