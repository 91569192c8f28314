use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::commands::{CMD_FADE_OUT, CMD_FADE_OUT_AND_PLAY_NEXT, CMD_FADE_OUT_AND_STOP};

#[derive(Debug, Parser)]
#[command(
    name = "cuebee",
    version,
    about = "音量渐弱插件的命令行宿主（播放本地文件并触发渐弱命令）"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 覆盖持久化目录（默认走系统 data_local_dir）
    #[arg(long, env = "CUEBEE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// 覆盖日志目录（默认 `{data_dir}/logs`）
    #[arg(long, env = "CUEBEE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// 覆盖日志过滤（等价于设置 RUST_LOG）
    #[arg(long, env = "RUST_LOG")]
    pub log_filter: Option<String>,

    /// 不打开音频设备，使用模拟播放器
    #[arg(long, env = "CUEBEE_NO_AUDIO")]
    pub no_audio: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 播放文件，若干秒后触发渐弱
    Play {
        /// 依次播放的音频文件（--no-audio 时仅作为曲目名）
        files: Vec<PathBuf>,

        /// 开始播放后多少秒触发渐弱
        #[arg(long, default_value_t = 5.0)]
        fade_after: f64,

        /// 渐弱结束后的动作
        #[arg(long, value_enum, default_value_t = Then::Stop)]
        then: Then,

        /// 覆盖本次的渐弱时长（毫秒，不保存）
        #[arg(long)]
        duration_ms: Option<String>,

        /// 渐弱结束后继续运行的秒数（便于听到下一首）
        #[arg(long, default_value_t = 3.0)]
        linger: f64,
    },

    /// 查看或修改渐弱时长
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// 删除持久化的设置文件
    Uninstall,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    Show,
    /// 设置渐弱时长（毫秒）；非数字或 0 会回退为默认值
    Set { fade_out_time_ms: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Then {
    None,
    Stop,
    Next,
}

impl Then {
    pub fn command_name(self) -> &'static str {
        match self {
            Then::None => CMD_FADE_OUT,
            Then::Stop => CMD_FADE_OUT_AND_STOP,
            Then::Next => CMD_FADE_OUT_AND_PLAY_NEXT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_play() {
        let cli = Cli::parse_from([
            "cuebee",
            "--no-audio",
            "play",
            "a.mp3",
            "b.mp3",
            "--fade-after",
            "1.5",
            "--then",
            "next",
        ]);
        assert!(cli.no_audio);
        match cli.command {
            Command::Play {
                files,
                fade_after,
                then,
                duration_ms,
                ..
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(fade_after, 1.5);
                assert_eq!(then, Then::Next);
                assert!(duration_ms.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::parse_from(["cuebee", "config", "set", "1200"]);
        match cli.command {
            Command::Config {
                action: ConfigAction::Set { fade_out_time_ms },
            } => assert_eq!(fade_out_time_ms, "1200"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_then_maps_to_command() {
        assert_eq!(Then::Stop.command_name(), CMD_FADE_OUT_AND_STOP);
        assert_eq!(Then::Next.command_name(), CMD_FADE_OUT_AND_PLAY_NEXT);
        assert_eq!(Then::None.command_name(), CMD_FADE_OUT);
    }
}
