use std::path::PathBuf;
use std::sync::Mutex;

use super::CommandRegistry;
use crate::host::{CommandHandler, PlayState, PlayerHost};

struct NullState {
    volume: f32,
    muted: bool,
    play_state: PlayState,
    tracks: Vec<String>,
    current: usize,
    volume_changes: usize,
}

/// 不出声的模拟播放器（`--no-audio`），也用于测试
pub struct NullHost {
    data_dir: PathBuf,
    state: Mutex<NullState>,
    commands: CommandRegistry,
}

impl NullHost {
    /// 以音量 1.0 开始"播放"第一首
    pub fn new(data_dir: PathBuf, tracks: Vec<String>) -> Self {
        Self {
            data_dir,
            state: Mutex::new(NullState {
                volume: 1.0,
                muted: false,
                play_state: PlayState::Playing,
                tracks,
                current: 0,
                volume_changes: 0,
            }),
            commands: CommandRegistry::default(),
        }
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn set_play_state(&self, play_state: PlayState) {
        self.with_state(|s| s.play_state = play_state);
    }

    pub fn set_muted(&self, muted: bool) {
        self.with_state(|s| s.muted = muted);
    }

    /// 直接设置音量，不计入 `volume_changes`
    pub fn preset_volume(&self, volume: f32) {
        self.with_state(|s| s.volume = volume.clamp(0.0, 1.0));
    }

    /// 插件调用 `set_volume` 的次数
    pub fn volume_changes(&self) -> usize {
        self.with_state(|s| s.volume_changes)
    }

    pub fn current_track(&self) -> Option<String> {
        self.with_state(|s| s.tracks.get(s.current).cloned())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut NullState) -> T) -> T {
        let mut guard = match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl PlayerHost for NullHost {
    fn volume(&self) -> f32 {
        self.with_state(|s| s.volume)
    }

    fn set_volume(&self, volume: f32) {
        self.with_state(|s| {
            s.volume = volume.clamp(0.0, 1.0);
            s.volume_changes += 1;
        });
        tracing::trace!(volume, "模拟音量");
    }

    fn is_muted(&self) -> bool {
        self.with_state(|s| s.muted)
    }

    fn play_state(&self) -> PlayState {
        self.with_state(|s| s.play_state)
    }

    fn stop(&self) {
        self.with_state(|s| s.play_state = PlayState::Stopped);
        tracing::info!("模拟播放器：停止");
    }

    fn play_next(&self) {
        let track = self.with_state(|s| {
            if s.current + 1 < s.tracks.len() {
                s.current += 1;
                s.play_state = PlayState::Playing;
            } else {
                s.play_state = PlayState::Stopped;
            }
            s.tracks.get(s.current).cloned()
        });
        tracing::info!(track = ?track, "模拟播放器：下一首");
    }

    fn register_command(&self, name: &str, handler: CommandHandler) {
        self.commands.register(name, handler);
    }

    fn persistent_storage_path(&self) -> PathBuf {
        self.data_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_next_advances_then_stops_at_end() {
        let host = NullHost::new(PathBuf::new(), vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(host.current_track().as_deref(), Some("a"));

        host.play_next();
        assert_eq!(host.current_track().as_deref(), Some("b"));
        assert_eq!(host.play_state(), PlayState::Playing);

        host.play_next();
        assert_eq!(host.play_state(), PlayState::Stopped);
    }

    #[test]
    fn test_volume_changes_counted() {
        let host = NullHost::new(PathBuf::new(), Vec::new());
        host.preset_volume(0.4);
        assert_eq!(host.volume_changes(), 0);
        host.set_volume(0.3);
        host.set_volume(1.5);
        assert_eq!(host.volume_changes(), 2);
        assert_eq!(host.volume(), 1.0);
    }
}
