use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub struct LogGuard(#[allow(dead_code)] Option<WorkerGuard>);

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub dir: Option<PathBuf>,
    pub filter: Option<String>,
    /// 同时输出到 stderr（演示模式下方便观察音量变化）
    pub stderr: bool,
}

pub fn init(data_dir: &Path, cfg: LogConfig) -> LogGuard {
    let log_dir = cfg.dir.unwrap_or_else(|| data_dir.join("logs"));

    // subscriber 还没装好，目录问题先记下来，初始化后再输出
    let (log_dir, fallback) = resolve_log_dir(log_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, "cuebee.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = match cfg.filter {
        Some(s) if !s.trim().is_empty() => EnvFilter::new(s),
        _ => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,symphonia=warn")),
    };

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer);

    let stderr_layer = cfg.stderr.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer);

    if let Err(e) = subscriber.try_init() {
        // 已有全局 subscriber（如测试中重复初始化），沿用已有的
        tracing::debug!(err = %e, "tracing 已初始化过，跳过");
    }
    if let Some(fallback) = fallback {
        tracing::warn!(
            wanted = %fallback.wanted.display(),
            err = %fallback.error,
            log_dir = %log_dir.display(),
            "无法创建日志目录，改用临时目录"
        );
    }
    tracing::info!(log_dir = %log_dir.display(), "tracing 已初始化");

    LogGuard(Some(guard))
}

struct DirFallback {
    wanted: PathBuf,
    error: std::io::Error,
}

/// 创建失败时退回到系统临时目录下的 `cuebee-logs`
fn resolve_log_dir(wanted: PathBuf) -> (PathBuf, Option<DirFallback>) {
    match fs::create_dir_all(&wanted) {
        Ok(()) => (wanted, None),
        Err(error) => {
            let tmp = std::env::temp_dir().join("cuebee-logs");
            if let Err(e) = fs::create_dir_all(&tmp) {
                // 最后一道退路也失败时 appender 会自行报错，这里只能打到 stderr
                eprintln!("cuebee: 无法创建日志目录 {}: {e}", tmp.display());
            }
            (tmp, Some(DirFallback { wanted, error }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_log_dir_is_used() {
        let dir = tempfile::tempdir().expect("tempdir");
        let wanted = dir.path().join("logs");
        let (resolved, fallback) = resolve_log_dir(wanted.clone());
        assert_eq!(resolved, wanted);
        assert!(fallback.is_none());
        assert!(wanted.is_dir());
    }

    #[test]
    fn test_unusable_log_dir_falls_back_to_temp() {
        let dir = tempfile::tempdir().expect("tempdir");
        // 父路径是普通文件，无法在其下建目录
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").expect("write");
        let wanted = blocker.join("logs");

        let (resolved, fallback) = resolve_log_dir(wanted.clone());
        assert_eq!(resolved, std::env::temp_dir().join("cuebee-logs"));
        let fallback = fallback.expect("fallback recorded");
        assert_eq!(fallback.wanted, wanted);
    }
}
