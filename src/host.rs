//! 宿主播放器接口
//!
//! 插件只通过 [`PlayerHost`] 与宿主交互：读写音量、查询静音与播放状态、
//! 停止/下一首、注册命令、获取持久化目录。

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// 宿主上报的播放状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Undefined,
    Loading,
    Playing,
    Paused,
    Stopped,
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlayState::Undefined => "undefined",
            PlayState::Loading => "loading",
            PlayState::Playing => "playing",
            PlayState::Paused => "paused",
            PlayState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// 宿主菜单/快捷键触发时调用的回调
pub type CommandHandler = Arc<dyn Fn() + Send + Sync>;

/// 宿主播放器能力
///
/// 方法均为 `&self`：宿主 API 本身由宿主线程同步，实现方自行使用内部可变性。
pub trait PlayerHost: Send + Sync + 'static {
    /// 当前音量（0.0..=1.0）
    fn volume(&self) -> f32;

    fn set_volume(&self, volume: f32);

    fn is_muted(&self) -> bool;

    fn play_state(&self) -> PlayState;

    fn stop(&self);

    fn play_next(&self);

    /// 注册一个具名命令（宿主在设置里可绑定快捷键）
    fn register_command(&self, name: &str, handler: CommandHandler);

    /// 插件可写的持久化目录
    fn persistent_storage_path(&self) -> PathBuf;
}
