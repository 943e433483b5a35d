//! 变化监听 - 核心层
//!
//! 一次"下一题"触发对应一个 [`WatchSession`]：等待容器子树的首批变化，
//! 静置片刻后运行提取流水线；若超时前没有任何变化，照样运行流水线兜底。
//! 整个系统的核心权衡就在这里：既不能在旧题还没替换时提前提取，
//! 也不能因为页面整体替换未触发子节点变化而永远等下去

use std::future::{pending, Future};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::debug;

/// 容器子树出现了一批变化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationNotice;

/// 一次监听的结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// 观察到首批变化并静置完毕
    Settled,
    /// 超时兜底（不是错误：容器被整体替换时可能观察不到子节点变化）
    TimedOut,
}

/// 一次触发对应的监听会话
///
/// 生命周期：触发时创建，流水线运行（静置完成或超时）后自然结束，
/// 或者被下一次触发抢占时取消
pub struct WatchSession {
    handle: JoinHandle<()>,
}

impl WatchSession {
    /// 取消会话：中止等待任务并随之丢弃变化订阅
    pub fn cancel(self) {
        self.handle.abort();
    }
}

/// 变化监听器
///
/// 同一容器同一时刻最多一个在途会话；新会话开始前必须取消旧会话，
/// 避免两条提取流水线在半渲染的页面上交错读取
pub struct ChangeWatcher {
    settle: Duration,
    timeout: Duration,
    active: Option<WatchSession>,
}

impl ChangeWatcher {
    /// 创建新的变化监听器
    pub fn new(settle: Duration, timeout: Duration) -> Self {
        Self {
            settle,
            timeout,
            active: None,
        }
    }

    /// 开始一次监听会话
    ///
    /// `notices` 是本次会话专属的变化订阅；`pipeline` 恰好被调用一次，
    /// 参数说明会话是正常静置还是超时兜底
    pub fn watch<F, Fut>(&mut self, mut notices: broadcast::Receiver<MutationNotice>, pipeline: F)
    where
        F: FnOnce(WatchOutcome) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        // 先取消上一个会话，保证流水线不会并发运行
        self.cancel_active();

        let settle = self.settle;
        let timeout = self.timeout;
        let handle = tokio::spawn(async move {
            let first_change = async {
                loop {
                    match notices.recv().await {
                        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => break,
                        // 事件源整体关闭：留给超时分支兜底
                        Err(broadcast::error::RecvError::Closed) => pending::<()>().await,
                    }
                }
            };

            let outcome = tokio::select! {
                _ = first_change => {
                    debug!("观察到首批页面变化，静置 {:?} 后提取", settle);
                    sleep(settle).await;
                    WatchOutcome::Settled
                }
                _ = sleep(timeout) => {
                    debug!("{:?} 内未观察到页面变化，超时兜底", timeout);
                    WatchOutcome::TimedOut
                }
            };

            pipeline(outcome).await;
        });

        self.active = Some(WatchSession { handle });
    }

    /// 取消当前在途会话（如有）
    pub fn cancel_active(&mut self) {
        if let Some(session) = self.active.take() {
            debug!("取消上一个监听会话");
            session.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const SETTLE: Duration = Duration::from_millis(300);
    const TIMEOUT: Duration = Duration::from_millis(3000);

    fn counting_pipeline(
        counter: &Arc<AtomicUsize>,
    ) -> impl FnOnce(WatchOutcome) -> std::future::Ready<()> + Send + 'static {
        let counter = counter.clone();
        move |_outcome| {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mutation_then_settle_runs_once() {
        let (tx, _) = broadcast::channel(8);
        let mut watcher = ChangeWatcher::new(SETTLE, TIMEOUT);
        let runs = Arc::new(AtomicUsize::new(0));

        watcher.watch(tx.subscribe(), counting_pipeline(&runs));
        tx.send(MutationNotice).expect("订阅者在位");

        // 静置期间还不能提取
        sleep(Duration::from_millis(200)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fallback_runs_exactly_once() {
        let (tx, _rx_keepalive) = broadcast::channel::<MutationNotice>(8);
        let mut watcher = ChangeWatcher::new(SETTLE, TIMEOUT);
        let runs = Arc::new(AtomicUsize::new(0));

        watcher.watch(tx.subscribe(), counting_pipeline(&runs));

        // 没有任何变化：超时前不运行，超时后恰好运行一次
        sleep(Duration::from_millis(2900)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        sleep(TIMEOUT * 2).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_session_preempts_previous() {
        let (tx, _) = broadcast::channel(8);
        let mut watcher = ChangeWatcher::new(SETTLE, TIMEOUT);
        let first_runs = Arc::new(AtomicUsize::new(0));
        let second_runs = Arc::new(AtomicUsize::new(0));

        watcher.watch(tx.subscribe(), counting_pipeline(&first_runs));
        // 第一个会话尚未结束就再次触发
        sleep(Duration::from_millis(100)).await;
        watcher.watch(tx.subscribe(), counting_pipeline(&second_runs));

        tx.send(MutationNotice).expect("订阅者在位");
        sleep(TIMEOUT * 2).await;

        // 只有第二个会话的流水线运行
        assert_eq!(first_runs.load(Ordering::SeqCst), 0);
        assert_eq!(second_runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_notice_does_not_rerun() {
        let (tx, _) = broadcast::channel(8);
        let mut watcher = ChangeWatcher::new(SETTLE, TIMEOUT);
        let runs = Arc::new(AtomicUsize::new(0));

        watcher.watch(tx.subscribe(), counting_pipeline(&runs));
        tx.send(MutationNotice).expect("订阅者在位");
        sleep(SETTLE * 2).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        // 会话已结束，后续变化不会再次触发流水线
        let _ = tx.send(MutationNotice);
        sleep(TIMEOUT * 2).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_active_stops_pending_session() {
        let (tx, _rx_keepalive) = broadcast::channel::<MutationNotice>(8);
        let mut watcher = ChangeWatcher::new(SETTLE, TIMEOUT);
        let runs = Arc::new(AtomicUsize::new(0));

        watcher.watch(tx.subscribe(), counting_pipeline(&runs));
        sleep(Duration::from_millis(100)).await;
        watcher.cancel_active();

        sleep(TIMEOUT * 2).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
