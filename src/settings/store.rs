use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

pub const DEFAULT_FADE_OUT_TIME_MS: u32 = 3000;

const SETTINGS_FILE: &str = "CueBee.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeSettings {
    /// 渐弱总时长（毫秒，> 0）
    #[serde(default = "default_fade_out_time_ms")]
    pub fade_out_time_ms: u32,
}

impl Default for FadeSettings {
    fn default() -> Self {
        Self {
            fade_out_time_ms: DEFAULT_FADE_OUT_TIME_MS,
        }
    }
}

fn default_fade_out_time_ms() -> u32 {
    DEFAULT_FADE_OUT_TIME_MS
}

/// 读取设置；文件缺失、损坏或数值无效时返回默认值
pub fn load_settings(data_dir: &Path) -> FadeSettings {
    match read_settings(data_dir) {
        Ok(s) => s,
        Err(e) if e.is_not_found() => {
            tracing::debug!(data_dir = %data_dir.display(), "设置文件不存在，使用默认值");
            FadeSettings::default()
        }
        Err(e) => {
            tracing::warn!(err = %e, "读取设置失败，使用默认值");
            FadeSettings::default()
        }
    }
}

pub fn read_settings(data_dir: &Path) -> Result<FadeSettings, SettingsError> {
    let p = settings_path(data_dir);
    let bytes = fs::read(&p).map_err(|source| SettingsError::Read {
        path: p.clone(),
        source,
    })?;
    let s: FadeSettings =
        serde_json::from_slice(&bytes).map_err(|source| SettingsError::Parse { source })?;
    if s.fade_out_time_ms == 0 {
        return Err(SettingsError::InvalidValue("fade_out_time_ms = 0".to_owned()));
    }
    Ok(s)
}

pub fn save_settings(data_dir: &Path, s: &FadeSettings) -> Result<(), SettingsError> {
    let p = settings_path(data_dir);
    let save_err = |source| SettingsError::Save {
        path: p.clone(),
        source,
    };
    fs::create_dir_all(data_dir).map_err(save_err)?;
    let tmp = p.with_extension("json.tmp");
    let bytes =
        serde_json::to_vec_pretty(s).map_err(|source| SettingsError::Serialize { source })?;
    fs::write(&tmp, bytes).map_err(save_err)?;
    if let Err(e) = fs::rename(&tmp, &p) {
        let _ = fs::remove_file(&p);
        fs::rename(&tmp, &p).map_err(|_| save_err(e))?;
    }
    tracing::debug!(path = %p.display(), fade_out_time_ms = s.fade_out_time_ms, "设置已保存");
    Ok(())
}

/// 删除设置文件（卸载时）；文件本不存在不算错误
pub fn remove_settings(data_dir: &Path) -> Result<(), SettingsError> {
    let p = settings_path(data_dir);
    match fs::remove_file(&p) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SettingsError::Remove { path: p, source }),
    }
}

/// 设置面板输入：非数字或 0 都回退为默认值
pub fn parse_fade_out_input(text: &str) -> u32 {
    match text.trim().parse::<u32>() {
        Ok(0) | Err(_) => DEFAULT_FADE_OUT_TIME_MS,
        Ok(v) => v,
    }
}

pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SETTINGS_FILE)
}
