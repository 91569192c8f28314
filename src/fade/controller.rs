use std::time::Duration;

use crate::host::{PlayState, PlayerHost};

/// 每一步降低的音量
pub const VOLUME_STEP: f32 = 0.01;

/// 低于该值视为已降到 0（避免浮点误差多走一步）
const LEVEL_EPSILON: f32 = 1e-4;

/// 渐弱结束后的后续动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowUp {
    /// 仅渐弱，音量停留在最后一级
    #[default]
    None,
    /// 停止播放，然后恢复原音量
    Stop,
    /// 恢复原音量，然后播放下一首
    PlayNext,
}

/// 一次渐弱请求的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeOutcome {
    /// 音量降到 0，后续动作已执行
    Completed(FollowUp),
    /// 播放中途被暂停/停止或被主动取消，原音量已恢复
    Cancelled,
    /// 起始音量为 0 或处于静音，未调整音量；后续的传输动作照常执行
    Skipped(FollowUp),
    /// 已有渐弱在进行，本次请求被忽略
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Begin {
    Started { delay: Duration, steps: u32 },
    Skipped,
    Busy,
}

/// `step` 的返回值，由外部调度器决定何时再次调用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Wait(Duration),
    Done(FadeOutcome),
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramp {
    next_step: u32,
    delay: Duration,
    follow_up: FollowUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeState {
    #[default]
    Idle,
    Fading(Ramp),
    Cancelling,
}

/// 音量渐弱状态机
///
/// 不持有计时器：`begin` 开始一次渐弱，之后由调度器按 `Step::Wait`
/// 的间隔反复调用 `step`，直到返回 `Step::Done`。
#[derive(Debug)]
pub struct FadeController {
    duration_ms: u32,
    state: FadeState,
    pre_fade_volume: f32,
}

impl FadeController {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms: duration_ms.max(1),
            state: FadeState::Idle,
            pre_fade_volume: 0.0,
        }
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// 只影响下一次渐弱
    pub fn set_duration_ms(&mut self, duration_ms: u32) {
        self.duration_ms = duration_ms.max(1);
    }

    pub fn state(&self) -> FadeState {
        self.state
    }

    pub fn is_fading(&self) -> bool {
        !matches!(self.state, FadeState::Idle)
    }

    pub fn pre_fade_volume(&self) -> f32 {
        self.pre_fade_volume
    }

    pub fn begin(&mut self, host: &dyn PlayerHost, follow_up: FollowUp) -> Begin {
        if self.is_fading() {
            tracing::debug!(?follow_up, "已有渐弱在进行，忽略本次请求");
            return Begin::Busy;
        }

        let volume = normalize_volume(host.volume());
        self.pre_fade_volume = volume;
        if volume <= 0.0 || host.is_muted() {
            tracing::debug!(volume, ?follow_up, "音量为 0 或已静音，跳过渐弱");
            run_transport(host, follow_up);
            return Begin::Skipped;
        }

        let delay = step_delay(self.duration_ms, volume);
        let steps = step_count(volume);
        tracing::info!(
            volume,
            duration_ms = self.duration_ms,
            delay_ms = delay.as_millis() as u64,
            steps,
            ?follow_up,
            "开始音量渐弱"
        );
        self.state = FadeState::Fading(Ramp {
            next_step: 0,
            delay,
            follow_up,
        });
        Begin::Started { delay, steps }
    }

    pub fn step(&mut self, host: &dyn PlayerHost) -> Step {
        match self.state {
            FadeState::Idle => Step::Idle,
            FadeState::Cancelling => {
                tracing::info!(restore = self.pre_fade_volume, "渐弱已取消，恢复音量");
                self.restore(host);
                Step::Done(FadeOutcome::Cancelled)
            }
            FadeState::Fading(mut ramp) => {
                let level = self.level(ramp.next_step);
                if level <= LEVEL_EPSILON {
                    self.state = FadeState::Idle;
                    self.finish(host, ramp.follow_up);
                    return Step::Done(FadeOutcome::Completed(ramp.follow_up));
                }

                let play_state = host.play_state();
                if play_state != PlayState::Playing {
                    tracing::info!(
                        %play_state,
                        step = ramp.next_step,
                        restore = self.pre_fade_volume,
                        "播放已中断，取消渐弱"
                    );
                    self.restore(host);
                    return Step::Done(FadeOutcome::Cancelled);
                }

                host.set_volume(level);
                ramp.next_step += 1;
                self.state = FadeState::Fading(ramp);
                Step::Wait(ramp.delay)
            }
        }
    }

    /// 在下一步时取消并恢复原音量；没有进行中的渐弱时返回 false
    pub fn request_cancel(&mut self) -> bool {
        if let FadeState::Fading(_) = self.state {
            self.state = FadeState::Cancelling;
            return true;
        }
        false
    }

    /// 立即中止并恢复原音量（插件关闭时使用）
    pub fn abort(&mut self, host: &dyn PlayerHost) -> bool {
        if !self.is_fading() {
            return false;
        }
        tracing::info!(restore = self.pre_fade_volume, "中止渐弱，恢复音量");
        self.restore(host);
        true
    }

    fn level(&self, step: u32) -> f32 {
        (self.pre_fade_volume - step as f32 * VOLUME_STEP).max(0.0)
    }

    fn restore(&mut self, host: &dyn PlayerHost) {
        host.set_volume(self.pre_fade_volume);
        self.state = FadeState::Idle;
    }

    fn finish(&self, host: &dyn PlayerHost, follow_up: FollowUp) {
        tracing::info!(?follow_up, "音量渐弱完成");
        match follow_up {
            FollowUp::None => {}
            FollowUp::Stop => {
                host.stop();
                host.set_volume(self.pre_fade_volume);
            }
            FollowUp::PlayNext => {
                host.set_volume(self.pre_fade_volume);
                host.play_next();
            }
        }
    }
}

fn run_transport(host: &dyn PlayerHost, follow_up: FollowUp) {
    match follow_up {
        FollowUp::None => {}
        FollowUp::Stop => host.stop(),
        FollowUp::PlayNext => host.play_next(),
    }
}

/// 每步间隔：总时长按起始音量对应的步数平分。
///
/// 间隔取整到毫秒，且步数按 0.01 向上取整，实际耗时只近似等于配置值；
/// 起始音量很低时误差最明显（例如 0.005 只有一步）。
pub fn step_delay(duration_ms: u32, volume: f32) -> Duration {
    let steps = f64::from(normalize_volume(volume)) * 100.0;
    if steps <= 0.0 {
        return Duration::ZERO;
    }
    let ms = (f64::from(duration_ms) / steps).round();
    Duration::from_millis(ms as u64)
}

/// 从 `volume` 以 0.01 递减到 0（不含）需要设置音量的次数
pub fn step_count(volume: f32) -> u32 {
    let volume = normalize_volume(volume);
    let mut n = 0;
    while volume - n as f32 * VOLUME_STEP > LEVEL_EPSILON {
        n += 1;
    }
    n
}

/// 宿主给出的音量限制在 0.0..=1.0，非有限值按 0 处理
fn normalize_volume(volume: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
