use std::collections::HashMap;
use std::sync::Mutex;

use crate::host::CommandHandler;

/// 宿主侧的命令表：名称 -> 回调，模拟宿主菜单/快捷键
#[derive(Default)]
pub struct CommandRegistry {
    handlers: Mutex<HashMap<String, CommandHandler>>,
}

impl CommandRegistry {
    pub fn register(&self, name: &str, handler: CommandHandler) {
        let Ok(mut handlers) = self.handlers.lock() else {
            tracing::warn!(name, "命令表锁已损坏，注册失败");
            return;
        };
        if handlers.insert(name.to_owned(), handler).is_some() {
            tracing::debug!(name, "覆盖已注册的命令");
        }
    }

    /// 触发命令；未注册时返回 false
    pub fn invoke(&self, name: &str) -> bool {
        let handler = match self.handlers.lock() {
            Ok(handlers) => handlers.get(name).cloned(),
            Err(_) => None,
        };
        match handler {
            Some(h) => {
                h();
                true
            }
            None => {
                tracing::warn!(name, "命令未注册");
                false
            }
        }
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .handlers
            .lock()
            .map(|h| h.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_invoke_registered_handler() {
        let registry = CommandRegistry::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_cb = Arc::clone(&hits);
        registry.register(
            "Player: Volume FadeOut",
            Arc::new(move || {
                hits_cb.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(registry.invoke("Player: Volume FadeOut"));
        assert!(registry.invoke("Player: Volume FadeOut"));
        assert!(!registry.invoke("Player: Unknown"));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(registry.names(), vec!["Player: Volume FadeOut".to_owned()]);
    }
}
