//! 卸载编排器
//!
//! 同一时间最多只有一个卸载操作在进行。正在进行时收到的新请求会被
//! 直接拒绝 ([`UninstallerError::Busy`])，不会影响当前操作。
//! 编排器被丢弃或调用 [`Orchestrator::cancel`] 时，正在运行的外部进程会被杀死。

pub mod models;
pub mod pipeline;
pub mod resolve;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::{Arc, Mutex};

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use crate::modules::common::config::UninstallConfig;
use crate::modules::common::error::UninstallerError;
use crate::modules::notifier::Notifier;
use crate::modules::reporter::storage::HistoryStore;
use crate::modules::runner::ProcessRunner;
use models::{OperationContext, OperationOutcome, OperationStatus, UninstallRequest};
use pipeline::Pipeline;

struct ActiveOperation {
    id: uuid::Uuid,
    status: watch::Receiver<OperationStatus>,
    task: JoinHandle<()>,
}

struct Inner {
    runner: Arc<dyn ProcessRunner>,
    notifier: Arc<dyn Notifier>,
    config: UninstallConfig,
    history: Option<HistoryStore>,
    active: Mutex<Option<ActiveOperation>>,
}

impl Inner {
    /// 操作结束后释放占用，仅当占用者仍是该操作时
    fn release(&self, id: uuid::Uuid) {
        let mut slot = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.as_ref().map(|active| active.id) == Some(id) {
            *slot = None;
        }
    }
}

/// 卸载编排器
pub struct Orchestrator {
    inner: Arc<Inner>,
}

/// 已接受的卸载请求，可等待其结果
#[derive(Debug)]
pub struct OperationTicket {
    pub id: uuid::Uuid,
    outcome: oneshot::Receiver<OperationOutcome>,
}

impl OperationTicket {
    /// 等待操作结束；操作被取消时返回 [`UninstallerError::Cancelled`]
    pub async fn wait(self) -> Result<OperationOutcome, UninstallerError> {
        self.outcome.await.map_err(|_| UninstallerError::Cancelled)
    }
}

impl Orchestrator {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        notifier: Arc<dyn Notifier>,
        config: UninstallConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                runner,
                notifier,
                config,
                history: None,
                active: Mutex::new(None),
            }),
        }
    }

    /// 每个结束的操作都写入历史记录
    pub fn with_history(
        runner: Arc<dyn ProcessRunner>,
        notifier: Arc<dyn Notifier>,
        config: UninstallConfig,
        history: HistoryStore,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                runner,
                notifier,
                config,
                history: Some(history),
                active: Mutex::new(None),
            }),
        }
    }

    /// 提交卸载请求
    ///
    /// 必须在 tokio 运行时中调用。请求立即在后台开始执行，结果通过通知反馈；
    /// 需要结果的调用方可以等待返回的 [`OperationTicket`]。
    pub fn submit(&self, content: impl Into<String>) -> Result<OperationTicket, UninstallerError> {
        let request = UninstallRequest::new(content);

        let mut slot = self
            .inner
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(active) = slot.as_ref() {
            if !active.task.is_finished() {
                tracing::warn!(
                    "拒绝卸载请求 {}: 操作 {} 仍在进行",
                    request.as_str(),
                    active.id
                );
                return Err(UninstallerError::Busy { active: active.id });
            }
        }

        let ctx = OperationContext::new(request);
        let id = ctx.id;
        let (status_tx, status_rx) = watch::channel(ctx.status());
        let (outcome_tx, outcome_rx) = oneshot::channel();

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let pipeline = Pipeline {
                runner: inner.runner.as_ref(),
                notifier: inner.notifier.as_ref(),
                config: &inner.config,
            };
            let outcome = pipeline.run(ctx, &status_tx).await;

            if let Some(history) = &inner.history {
                if let Err(e) = history.record(&outcome) {
                    tracing::warn!("写入卸载历史失败: {}", e);
                }
            }

            inner.release(id);
            let _ = outcome_tx.send(outcome);
        });

        *slot = Some(ActiveOperation {
            id,
            status: status_rx,
            task,
        });

        Ok(OperationTicket {
            id,
            outcome: outcome_rx,
        })
    }

    /// 当前操作的状态，空闲时为 None
    pub fn status(&self) -> Option<OperationStatus> {
        let slot = self
            .inner
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.as_ref()
            .filter(|active| !active.task.is_finished())
            .map(|active| active.status.borrow().clone())
    }

    /// 取出仍在进行的操作，同时释放占用
    fn take_active(&self) -> Option<ActiveOperation> {
        self.inner
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .filter(|active| !active.task.is_finished())
    }

    /// 中止当前操作，返回是否有操作被取消
    ///
    /// 只请求中止，返回时外部进程可能尚未被杀死；需要确认终止时使用 [`Orchestrator::shutdown`]。
    pub fn cancel(&self) -> bool {
        match self.take_active() {
            Some(active) => {
                let state = active.status.borrow().state;
                tracing::warn!("取消卸载操作 {} (状态: {})", active.id, state);
                active.task.abort();
                true
            }
            None => false,
        }
    }

    /// 中止当前操作并等待其结束，返回是否有操作被取消
    ///
    /// 返回时阶段 future 已被丢弃，正在运行的外部进程已被杀死。
    pub async fn shutdown(&self) -> bool {
        let Some(active) = self.take_active() else {
            return false;
        };

        let state = active.status.borrow().state;
        tracing::warn!("终止卸载操作 {} (状态: {})", active.id, state);
        active.task.abort();

        match active.task.await {
            Err(e) if e.is_cancelled() => {}
            Err(e) => tracing::error!("卸载任务异常退出 {}: {}", active.id, e),
            Ok(()) => tracing::debug!("卸载操作 {} 在终止前已结束", active.id),
        }
        true
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.cancel();
    }
}
