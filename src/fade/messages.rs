use tokio::sync::oneshot;

use super::controller::{FadeOutcome, FollowUp};

/// 每次 `Start` 的编号，由 `FadeHandle` 分配
pub type RequestId = u64;

#[derive(Debug)]
pub enum FadeCommand {
    Start {
        id: RequestId,
        follow_up: FollowUp,
        reply: Option<oneshot::Sender<FadeOutcome>>,
    },
    /// 取消进行中的渐弱（下一步生效）；`id` 为 None 时不区分请求
    Cancel { id: Option<RequestId> },
    SetDurationMs(u32),
    /// 立即恢复音量并退出
    Close {
        done: Option<oneshot::Sender<()>>,
    },
}
