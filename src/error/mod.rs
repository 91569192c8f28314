//! 统一错误处理模块
//!
//! 设置读取失败不会成为错误（回退默认值），这里只覆盖保存/删除设置、
//! 渐弱线程通道和音频输出初始化等真正需要上报的情况。

mod plugin;
mod settings;

pub use plugin::PluginError;
pub use settings::SettingsError;
