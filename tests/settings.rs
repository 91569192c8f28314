use cuebee::settings::{
    DEFAULT_FADE_OUT_TIME_MS, FadeSettings, load_settings, read_settings, remove_settings,
    save_settings, settings_path,
};
use std::fs;

#[test]
fn settings_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("storage");

    let s = FadeSettings {
        fade_out_time_ms: 1250,
    };
    save_settings(&data_dir, &s).expect("save_settings");

    let loaded = load_settings(&data_dir);
    assert_eq!(loaded.fade_out_time_ms, 1250);
    assert!(!settings_path(&data_dir).with_extension("json.tmp").exists());
}

#[test]
fn settings_missing_file_falls_back_to_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let loaded = load_settings(dir.path());
    assert_eq!(loaded.fade_out_time_ms, DEFAULT_FADE_OUT_TIME_MS);
    assert_eq!(loaded.fade_out_time_ms, 3000);
}

#[test]
fn settings_corrupt_file_falls_back_to_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path();
    fs::write(settings_path(data_dir), b"<Config><FadeOutTimeMills>").expect("write");

    assert!(read_settings(data_dir).is_err());
    assert_eq!(load_settings(data_dir).fade_out_time_ms, 3000);
}

#[test]
fn settings_zero_or_negative_falls_back_to_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path();

    fs::write(settings_path(data_dir), br#"{"fade_out_time_ms":0}"#).expect("write");
    assert_eq!(load_settings(data_dir).fade_out_time_ms, 3000);

    fs::write(settings_path(data_dir), br#"{"fade_out_time_ms":-10}"#).expect("write");
    assert_eq!(load_settings(data_dir).fade_out_time_ms, 3000);
}

#[test]
fn settings_remove_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path();
    save_settings(data_dir, &FadeSettings::default()).expect("save_settings");
    assert!(settings_path(data_dir).exists());

    remove_settings(data_dir).expect("remove");
    assert!(!settings_path(data_dir).exists());
    remove_settings(data_dir).expect("remove missing");
}
