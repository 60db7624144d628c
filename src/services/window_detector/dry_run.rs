use crate::error::Result;
use crate::events::WindowInfo;
use parking_lot::RwLock;
use tracing::info;

use super::r#trait::WindowManager;

/// Эмуляция окон для dry-run: `focus` просто меняет "активный" заголовок
pub struct DryRunWindowManager {
    active: RwLock<WindowInfo>,
}

impl DryRunWindowManager {
    pub fn new(title: &str) -> Self {
        info!("Dry-run режим - WindowManager работает в режиме эмуляции");
        Self {
            active: RwLock::new(WindowInfo::new(title.to_string()).with_class("DryRun".to_string())),
        }
    }
}

impl WindowManager for DryRunWindowManager {
    fn active_window(&self) -> Result<WindowInfo> {
        Ok(self.active.read().clone())
    }

    fn focus(&self, title: &str) -> Result<()> {
        info!("[DRY RUN] Фокус на окно: {}", title);
        *self.active.write() = WindowInfo::new(title.to_string()).with_class("DryRun".to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_changes_active_window() {
        let manager = DryRunWindowManager::new("Terminal - dry_run");
        assert_eq!(manager.active_window().unwrap().title, "Terminal - dry_run");

        manager.focus("Editor").unwrap();
        assert_eq!(manager.active_window().unwrap().title, "Editor");
    }
}
