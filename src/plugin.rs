//! 插件生命周期：初始化、设置面板、保存设置、通知、关闭、卸载

use std::path::PathBuf;
use std::sync::Arc;

use crate::commands::CommandTable;
use crate::error::PluginError;
use crate::fade::{FadeHandle, spawn_fade_worker};
use crate::host::PlayerHost;
use crate::settings::{self, FadeSettings};

pub const PLUGIN_NAME: &str = "CueBee";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub version_major: u16,
    pub version_minor: u16,
    pub revision: u16,
    /// 宿主为设置面板预留的高度（像素）
    pub configuration_panel_height: u32,
    pub receive_player_events: bool,
}

impl Default for PluginInfo {
    fn default() -> Self {
        Self {
            name: PLUGIN_NAME,
            description: "Plugin for using MusicBee for PA usage",
            author: "Keinsleif",
            version_major: 0,
            version_minor: 1,
            revision: 0,
            configuration_panel_height: 50,
            receive_player_events: true,
        }
    }
}

/// 宿主推送的通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    PluginStartup,
    PlayStateChanged,
    TrackChanged,
    VolumeLevelChanged,
    VolumeMuteChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    UserDisabled,
    HostShutdown,
}

pub struct Plugin {
    host: Arc<dyn PlayerHost>,
    info: PluginInfo,
    data_dir: PathBuf,
    settings: FadeSettings,
    fade: FadeHandle,
    commands: CommandTable,
    commands_registered: bool,
}

impl Plugin {
    /// 读取设置并启动渐弱线程；需在 tokio runtime 内调用
    pub fn initialise(host: Arc<dyn PlayerHost>) -> Self {
        let info = PluginInfo::default();
        let data_dir = host.persistent_storage_path();
        let settings = settings::load_settings(&data_dir);
        tracing::info!(
            data_dir = %data_dir.display(),
            fade_out_time_ms = settings.fade_out_time_ms,
            "{} 初始化",
            info.name
        );

        let fade = spawn_fade_worker(Arc::clone(&host), settings.fade_out_time_ms);
        let commands = CommandTable::new(fade.clone());
        Self {
            host,
            info,
            data_dir,
            settings,
            fade,
            commands,
            commands_registered: false,
        }
    }

    pub fn info(&self) -> &PluginInfo {
        &self.info
    }

    pub fn settings(&self) -> FadeSettings {
        self.settings
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn fade(&self) -> &FadeHandle {
        &self.fade
    }

    /// 打开设置面板：从磁盘重新读取设置
    pub fn configure(&mut self) -> FadeSettings {
        self.apply_settings(settings::load_settings(&self.data_dir));
        self.settings
    }

    /// 设置面板的输入框内容变化；返回实际生效的值
    pub fn set_fade_out_input(&mut self, text: &str) -> u32 {
        let ms = settings::parse_fade_out_input(text);
        self.apply_settings(FadeSettings {
            fade_out_time_ms: ms,
        });
        ms
    }

    /// 宿主点击"应用/保存"时调用
    pub fn save_settings(&self) -> Result<(), PluginError> {
        settings::save_settings(&self.data_dir, &self.settings)?;
        tracing::info!(fade_out_time_ms = self.settings.fade_out_time_ms, "设置已保存");
        Ok(())
    }

    pub fn receive_notification(&mut self, notification: Notification) {
        match notification {
            Notification::PluginStartup => {
                if self.commands_registered {
                    tracing::debug!("命令已注册，忽略重复的启动通知");
                    return;
                }
                self.commands.register_all(self.host.as_ref());
                self.commands_registered = true;
            }
            other => {
                tracing::trace!(?other, "忽略通知");
            }
        }
    }

    /// 插件被禁用或宿主退出：进行中的渐弱立即恢复原音量
    pub async fn close(&self, reason: CloseReason) {
        tracing::info!(?reason, "{} 关闭", self.info.name);
        self.fade.close().await;
    }

    /// 卸载：删除持久化的设置文件
    pub fn uninstall(&self) -> Result<(), PluginError> {
        settings::remove_settings(&self.data_dir)?;
        tracing::info!(data_dir = %self.data_dir.display(), "设置文件已删除");
        Ok(())
    }

    fn apply_settings(&mut self, s: FadeSettings) {
        if s != self.settings {
            tracing::debug!(
                old = self.settings.fade_out_time_ms,
                new = s.fade_out_time_ms,
                "渐弱时长变更"
            );
        }
        self.settings = s;
        self.fade.set_duration_ms(s.fade_out_time_ms);
    }
}
