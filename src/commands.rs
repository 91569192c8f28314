//! 宿主命令表
//!
//! 命令名 -> 渐弱后续动作。宿主在菜单或快捷键触发时调用注册的回调，
//! 回调把请求投递给渐弱线程。

use std::sync::Arc;

use crate::error::PluginError;
use crate::fade::{FadeHandle, FadeTicket, FollowUp};
use crate::host::{CommandHandler, PlayerHost};

pub const CMD_FADE_OUT: &str = "Player: Volume FadeOut";
pub const CMD_FADE_OUT_AND_STOP: &str = "Player: Volume FadeOut and Stop";
pub const CMD_FADE_OUT_AND_PLAY_NEXT: &str = "Player: Volume FadeOut and Play Next";

static ENTRIES: [(&str, FollowUp); 3] = [
    (CMD_FADE_OUT, FollowUp::None),
    (CMD_FADE_OUT_AND_STOP, FollowUp::Stop),
    (CMD_FADE_OUT_AND_PLAY_NEXT, FollowUp::PlayNext),
];

#[derive(Debug, Clone)]
pub struct CommandTable {
    fade: FadeHandle,
}

impl CommandTable {
    pub fn new(fade: FadeHandle) -> Self {
        Self { fade }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        ENTRIES.iter().map(|(name, _)| *name)
    }

    pub fn follow_up_for(name: &str) -> Option<FollowUp> {
        ENTRIES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, follow_up)| *follow_up)
    }

    /// 按命令名发起渐弱；未知命令返回 `Ok(None)`
    pub fn dispatch(&self, name: &str) -> Result<Option<FadeTicket>, PluginError> {
        let Some(follow_up) = Self::follow_up_for(name) else {
            tracing::warn!(name, "未知命令");
            return Ok(None);
        };
        tracing::info!(name, ?follow_up, "收到渐弱命令");
        self.fade.start(follow_up).map(Some)
    }

    /// 把全部命令注册到宿主
    pub fn register_all(&self, host: &dyn PlayerHost) {
        for &(name, follow_up) in ENTRIES.iter() {
            let fade = self.fade.clone();
            let handler: CommandHandler = Arc::new(move || {
                // 宿主回调不关心结果，ticket 直接丢弃
                if let Err(e) = fade.start(follow_up) {
                    tracing::warn!(name, err = %e, "渐弱命令投递失败");
                }
            });
            host.register_command(name, handler);
            tracing::debug!(name, "已注册命令");
        }
    }
}
