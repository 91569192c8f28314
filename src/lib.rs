pub mod cli;
pub mod commands;
pub mod error;
pub mod fade;
pub mod host;
pub mod logging;
pub mod player;
pub mod plugin;
pub mod settings;

pub use error::{PluginError, SettingsError};
pub use host::{CommandHandler, PlayState, PlayerHost};
pub use plugin::{CloseReason, Notification, Plugin, PluginInfo};
