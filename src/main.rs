use clap::Parser;
use cuebee::cli::{Cli, Command, ConfigAction, Then};
use cuebee::fade::FadeOutcome;
use cuebee::player::{NullHost, RodioHost};
use cuebee::{CloseReason, Notification, PlayerHost, Plugin, PluginError, logging, settings};
use directories::ProjectDirs;
use rodio::OutputStreamBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), PluginError> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let _log_guard = logging::init(
        &data_dir,
        logging::LogConfig {
            dir: cli.log_dir.clone(),
            filter: cli.log_filter.clone(),
            stderr: matches!(cli.command, Command::Play { .. }),
        },
    );
    tracing::info!(data_dir = %data_dir.display(), "cuebee 启动");

    match cli.command {
        Command::Play {
            files,
            fade_after,
            then,
            duration_ms,
            linger,
        } => {
            let opts = PlayOptions {
                fade_after,
                then,
                duration_ms,
                linger,
            };
            if cli.no_audio {
                let tracks = files.iter().map(|p| p.display().to_string()).collect();
                let host = Arc::new(NullHost::new(data_dir, tracks));
                run_play(host, opts).await
            } else {
                if files.is_empty() {
                    return Err(PluginError::Other("没有可播放的文件".to_owned()));
                }
                let stream = OutputStreamBuilder::open_default_stream()
                    .map_err(|e| PluginError::Audio(e.to_string()))?;
                let host = Arc::new(RodioHost::new(stream.mixer().clone(), data_dir, files));
                host.play_next();
                let result = run_play(host, opts).await;
                drop(stream);
                result
            }
        }
        Command::Config { action } => {
            let host: Arc<dyn PlayerHost> = Arc::new(NullHost::new(data_dir.clone(), Vec::new()));
            let mut plugin = Plugin::initialise(host);
            let current = plugin.configure();
            match action {
                ConfigAction::Show => {
                    println!("fade_out_time_ms = {}", current.fade_out_time_ms);
                    println!("path = {}", settings::settings_path(&data_dir).display());
                }
                ConfigAction::Set { fade_out_time_ms } => {
                    let applied = plugin.set_fade_out_input(&fade_out_time_ms);
                    plugin.save_settings()?;
                    println!("fade_out_time_ms = {applied}");
                }
            }
            plugin.close(CloseReason::UserDisabled).await;
            Ok(())
        }
        Command::Uninstall => {
            let host: Arc<dyn PlayerHost> = Arc::new(NullHost::new(data_dir.clone(), Vec::new()));
            let plugin = Plugin::initialise(host);
            plugin.uninstall()?;
            plugin.close(CloseReason::UserDisabled).await;
            println!("已删除 {}", settings::settings_path(&data_dir).display());
            Ok(())
        }
    }
}

struct PlayOptions {
    fade_after: f64,
    then: Then,
    duration_ms: Option<String>,
    linger: f64,
}

async fn run_play(host: Arc<dyn PlayerHost>, opts: PlayOptions) -> Result<(), PluginError> {
    let mut plugin = Plugin::initialise(host);
    plugin.receive_notification(Notification::PluginStartup);
    if let Some(text) = opts.duration_ms.as_deref() {
        let ms = plugin.set_fade_out_input(text);
        tracing::info!(fade_out_time_ms = ms, "本次使用临时渐弱时长");
    }

    tokio::select! {
        _ = tokio::time::sleep(secs(opts.fade_after)) => {}
        _ = tokio::signal::ctrl_c() => {
            plugin.close(CloseReason::UserDisabled).await;
            return Ok(());
        }
    }

    let name = opts.then.command_name();
    let Some(ticket) = plugin.commands().dispatch(name)? else {
        return Err(PluginError::Other(format!("未知命令: {name}")));
    };

    let outcome = tokio::select! {
        outcome = ticket.outcome() => outcome,
        _ = tokio::signal::ctrl_c() => {
            // 退出前恢复音量
            plugin.close(CloseReason::UserDisabled).await;
            return Ok(());
        }
    };
    match outcome {
        Some(FadeOutcome::Completed(follow_up)) => println!("渐弱完成（{follow_up:?}）"),
        Some(FadeOutcome::Cancelled) => println!("播放已中断，音量已恢复"),
        Some(FadeOutcome::Skipped(_)) => println!("音量为 0 或已静音，未渐弱"),
        Some(FadeOutcome::Busy) => println!("已有渐弱在进行"),
        None => println!("渐弱线程已退出"),
    }

    if matches!(opts.then, Then::Next) {
        tokio::select! {
            _ = tokio::time::sleep(secs(opts.linger)) => {}
            _ = tokio::signal::ctrl_c() => {}
        }
    }
    plugin.close(CloseReason::HostShutdown).await;
    Ok(())
}

fn secs(v: f64) -> Duration {
    if v.is_finite() {
        Duration::from_secs_f64(v.clamp(0.0, 86_400.0))
    } else {
        Duration::ZERO
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("dev", "cuebee", "cuebee")
        .map(|d| d.data_local_dir().to_path_buf())
        .unwrap_or_else(|| Path::new(".").join(".cuebee"))
}
