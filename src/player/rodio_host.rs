use rodio::mixer::Mixer;
use rodio::{Decoder, Sink};
use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::host::{CommandHandler, PlayState, PlayerHost};

struct RodioState {
    sink: Option<Sink>,
    queue: VecDeque<PathBuf>,
    volume: f32,
}

/// 基于 rodio 的最小播放器：按顺序播放一组本地文件
///
/// `OutputStream` 由调用方持有，这里只保留 mixer。没有菜单，也没有静音开关。
pub struct RodioHost {
    mixer: Mixer,
    data_dir: PathBuf,
    state: Mutex<RodioState>,
}

impl RodioHost {
    pub fn new(mixer: Mixer, data_dir: PathBuf, files: Vec<PathBuf>) -> Self {
        Self {
            mixer,
            data_dir,
            state: Mutex::new(RodioState {
                sink: None,
                queue: files.into(),
                volume: 1.0,
            }),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut RodioState) -> T) -> T {
        let mut guard = match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl PlayerHost for RodioHost {
    fn volume(&self) -> f32 {
        self.with_state(|s| s.volume)
    }

    fn set_volume(&self, volume: f32) {
        self.with_state(|s| {
            s.volume = volume.clamp(0.0, 1.0);
            if let Some(sink) = s.sink.as_ref() {
                sink.set_volume(s.volume);
            }
        });
    }

    fn is_muted(&self) -> bool {
        false
    }

    fn play_state(&self) -> PlayState {
        self.with_state(|s| match s.sink.as_ref() {
            None => PlayState::Stopped,
            Some(sink) if sink.empty() => PlayState::Stopped,
            Some(sink) if sink.is_paused() => PlayState::Paused,
            Some(_) => PlayState::Playing,
        })
    }

    fn stop(&self) {
        self.with_state(|s| {
            if let Some(sink) = s.sink.take() {
                sink.stop();
            }
        });
        tracing::info!("播放已停止");
    }

    fn play_next(&self) {
        if let Some(old) = self.with_state(|s| s.sink.take()) {
            old.stop();
        }
        // 打开和解码文件时不持有锁
        while let Some(path) = self.with_state(|s| s.queue.pop_front()) {
            match build_sink(&self.mixer, &path) {
                Ok(sink) => {
                    self.with_state(|s| {
                        sink.set_volume(s.volume);
                        sink.play();
                        if let Some(stale) = s.sink.replace(sink) {
                            stale.stop();
                        }
                    });
                    tracing::info!(path = %path.display(), "开始播放");
                    return;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), err = %e, "跳过无法播放的文件");
                }
            }
        }
        tracing::info!("播放队列已空");
    }

    fn register_command(&self, name: &str, _handler: CommandHandler) {
        tracing::debug!(name, "演示播放器没有命令菜单，忽略注册");
    }

    fn persistent_storage_path(&self) -> PathBuf {
        self.data_dir.clone()
    }
}

fn build_sink(mixer: &Mixer, path: &Path) -> Result<Sink, String> {
    let file = File::open(path).map_err(|e| format!("打开音频文件失败: {e}"))?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| format!("解码失败: {e}"))?;
    let sink = Sink::connect_new(mixer);
    sink.pause();
    sink.append(decoder);
    Ok(sink)
}
