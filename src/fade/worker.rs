use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::select;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep_until};

use super::controller::{Begin, FadeController, FadeOutcome, FollowUp, Step};
use super::messages::{FadeCommand, RequestId};
use crate::error::PluginError;
use crate::host::PlayerHost;

const COMMAND_QUEUE: usize = 16;

/// 渐弱线程的发送端
#[derive(Debug, Clone)]
pub struct FadeHandle {
    tx_cmd: mpsc::Sender<FadeCommand>,
    next_id: Arc<AtomicU64>,
}

/// 一次渐弱请求的句柄：可等待结果，也可取消
#[derive(Debug)]
pub struct FadeTicket {
    id: RequestId,
    rx: oneshot::Receiver<FadeOutcome>,
    tx_cmd: mpsc::Sender<FadeCommand>,
}

impl FadeTicket {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// 线程已退出时返回 None
    pub async fn outcome(self) -> Option<FadeOutcome> {
        self.rx.await.ok()
    }

    /// 只取消本次请求启动的渐弱；请求被忽略或渐弱已结束时无效果
    pub fn cancel(&self) {
        send_cancel(&self.tx_cmd, Some(self.id));
    }
}

impl FadeHandle {
    /// 宿主回调是同步的，因此用 `try_send`
    pub fn start(&self, follow_up: FollowUp) -> Result<FadeTicket, PluginError> {
        let (reply, rx) = oneshot::channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.tx_cmd
            .try_send(FadeCommand::Start {
                id,
                follow_up,
                reply: Some(reply),
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => PluginError::WorkerBusy,
                mpsc::error::TrySendError::Closed(_) => PluginError::WorkerClosed,
            })?;
        Ok(FadeTicket {
            id,
            rx,
            tx_cmd: self.tx_cmd.clone(),
        })
    }

    /// 取消当前进行中的渐弱，不论由哪个请求发起
    pub fn cancel(&self) {
        send_cancel(&self.tx_cmd, None);
    }

    pub fn set_duration_ms(&self, duration_ms: u32) {
        if self
            .tx_cmd
            .try_send(FadeCommand::SetDurationMs(duration_ms))
            .is_err()
        {
            tracing::warn!(duration_ms, "FadeWorker 通道不可用：SetDurationMs 发送失败");
        }
    }

    /// 恢复进行中渐弱的音量并等待线程退出
    pub async fn close(&self) {
        let (done, rx) = oneshot::channel();
        if self
            .tx_cmd
            .send(FadeCommand::Close { done: Some(done) })
            .await
            .is_err()
        {
            return;
        }
        let _ = rx.await;
    }

    pub fn is_closed(&self) -> bool {
        self.tx_cmd.is_closed()
    }
}

struct FadeWorker {
    host: Arc<dyn PlayerHost>,
    rx_cmd: mpsc::Receiver<FadeCommand>,
    controller: FadeController,
    /// 进行中渐弱的请求编号和回复通道
    active: Option<RequestId>,
    pending: Option<oneshot::Sender<FadeOutcome>>,
    next_step_at: Option<Instant>,
}

impl FadeWorker {
    fn new(
        host: Arc<dyn PlayerHost>,
        rx_cmd: mpsc::Receiver<FadeCommand>,
        duration_ms: u32,
    ) -> Self {
        Self {
            host,
            rx_cmd,
            controller: FadeController::new(duration_ms),
            active: None,
            pending: None,
            next_step_at: None,
        }
    }

    async fn run(mut self) {
        loop {
            let deadline = self.next_step_at.unwrap_or_else(Instant::now);
            select! {
                biased;
                _ = sleep_until(deadline), if self.next_step_at.is_some() => {
                    self.advance();
                }
                maybe_cmd = self.rx_cmd.recv() => {
                    let Some(cmd) = maybe_cmd else {
                        self.shutdown();
                        break;
                    };
                    if let FadeCommand::Close { done } = cmd {
                        self.shutdown();
                        if let Some(done) = done {
                            let _ = done.send(());
                        }
                        break;
                    }
                    self.handle_command(cmd);
                }
            }
        }
        tracing::debug!("FadeWorker 已退出");
    }

    fn handle_command(&mut self, cmd: FadeCommand) {
        match cmd {
            FadeCommand::Start {
                id,
                follow_up,
                reply,
            } => {
                match self.controller.begin(self.host.as_ref(), follow_up) {
                    Begin::Started { .. } => {
                        self.active = Some(id);
                        self.pending = reply;
                        self.advance();
                    }
                    Begin::Skipped => send_outcome(reply, FadeOutcome::Skipped(follow_up)),
                    Begin::Busy => {
                        tracing::debug!(id, active = ?self.active, "已有渐弱在进行");
                        send_outcome(reply, FadeOutcome::Busy);
                    }
                }
            }
            FadeCommand::Cancel { id } => {
                if id.is_some() && id != self.active {
                    tracing::debug!(?id, active = ?self.active, "取消的不是当前渐弱，忽略");
                    return;
                }
                if !self.controller.request_cancel() {
                    tracing::debug!("没有进行中的渐弱，忽略取消");
                }
            }
            FadeCommand::SetDurationMs(ms) => {
                tracing::debug!(duration_ms = ms, "更新渐弱时长");
                self.controller.set_duration_ms(ms);
            }
            FadeCommand::Close { .. } => {}
        }
    }

    fn advance(&mut self) {
        match self.controller.step(self.host.as_ref()) {
            Step::Wait(delay) => {
                self.next_step_at = Some(Instant::now() + delay);
            }
            Step::Done(outcome) => {
                self.next_step_at = None;
                self.active = None;
                send_outcome(self.pending.take(), outcome);
            }
            Step::Idle => {
                self.next_step_at = None;
                self.active = None;
            }
        }
    }

    fn shutdown(&mut self) {
        self.next_step_at = None;
        self.active = None;
        if self.controller.abort(self.host.as_ref()) {
            send_outcome(self.pending.take(), FadeOutcome::Cancelled);
        }
    }
}

fn send_cancel(tx_cmd: &mpsc::Sender<FadeCommand>, id: Option<RequestId>) {
    if tx_cmd.try_send(FadeCommand::Cancel { id }).is_err() {
        tracing::warn!(?id, "FadeWorker 通道不可用：Cancel 发送失败");
    }
}

fn send_outcome(reply: Option<oneshot::Sender<FadeOutcome>>, outcome: FadeOutcome) {
    tracing::debug!(?outcome, "渐弱请求结束");
    if let Some(reply) = reply {
        let _ = reply.send(outcome);
    }
}

/// 启动渐弱线程；需在 tokio runtime 内调用
pub fn spawn_fade_worker(host: Arc<dyn PlayerHost>, duration_ms: u32) -> FadeHandle {
    let (tx_cmd, rx_cmd) = mpsc::channel::<FadeCommand>(COMMAND_QUEUE);
    tokio::spawn(async move {
        let worker = FadeWorker::new(host, rx_cmd, duration_ms);
        tracing::info!(duration_ms, "FadeWorker 已启动");
        worker.run().await;
    });
    FadeHandle {
        tx_cmd,
        next_id: Arc::new(AtomicU64::new(1)),
    }
}
