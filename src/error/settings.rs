//! 设置持久化相关错误

use std::path::PathBuf;

/// 设置相关错误
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// 读取设置文件失败
    #[error("读取设置失败({}): {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 解析设置失败
    #[error("解析设置失败: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// 序列化设置失败
    #[error("序列化设置失败: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    /// 保存设置失败
    #[error("保存设置失败({}): {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 删除设置文件失败
    #[error("删除设置失败({}): {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 设置值无效
    #[error("设置值无效: {0}")]
    InvalidValue(String),
}

impl SettingsError {
    /// 文件不存在（首次运行），不值得告警
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SettingsError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err = SettingsError::Parse { source: parse_err };
        assert!(err.to_string().contains("解析设置失败"));
    }

    #[test]
    fn test_save_error_mentions_path() {
        let err = SettingsError::Save {
            path: PathBuf::from("/data/CueBee.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied"),
        };
        let s = err.to_string();
        assert!(s.contains("CueBee.json"));
        assert!(s.contains("access denied"));
    }

    #[test]
    fn test_is_not_found() {
        let missing = SettingsError::Read {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        };
        assert!(missing.is_not_found());

        let denied = SettingsError::Read {
            path: PathBuf::from("denied.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        };
        assert!(!denied.is_not_found());
        assert!(!SettingsError::InvalidValue("0".to_owned()).is_not_found());
    }

    #[test]
    fn test_error_chain() {
        use std::error::Error;
        let err = SettingsError::Remove {
            path: PathBuf::from("x.json"),
            source: std::io::Error::other("test"),
        };
        assert!(err.source().is_some());
    }
}
