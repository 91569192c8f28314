pub mod store;

pub use store::{
    DEFAULT_FADE_OUT_TIME_MS, FadeSettings, load_settings, parse_fade_out_input, read_settings,
    remove_settings, save_settings, settings_path,
};
