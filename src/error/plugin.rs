//! 插件通用错误

use super::SettingsError;

/// 插件通用错误类型
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// 设置错误
    #[error("设置错误: {0}")]
    Settings(#[from] SettingsError),

    /// 渐弱线程已退出
    #[error("渐弱线程已退出")]
    WorkerClosed,

    /// 渐弱命令队列已满
    #[error("渐弱命令队列已满")]
    WorkerBusy,

    /// 音频输出初始化失败
    #[error("音频输出初始化失败: {0}")]
    Audio(String),

    /// 其他错误
    #[error("{0}")]
    Other(String),
}
