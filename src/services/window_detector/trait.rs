use crate::config::Config;
use crate::error::Result;
use crate::events::WindowInfo;
use std::sync::Arc;

/// Доступ к окнам рабочего стола
pub trait WindowManager: Send + Sync {
    /// Окно, которое сейчас владеет фокусом ввода
    fn active_window(&self) -> Result<WindowInfo>;

    /// Активировать окно по заголовку; при неудаче одна попытка по классу окна
    fn focus(&self, title: &str) -> Result<()>;
}

/// Factory function to create an appropriate window manager based on the dry_run flag
pub fn create_window_manager(config: &Config, dry_run: bool) -> Result<Arc<dyn WindowManager>> {
    if dry_run {
        Ok(Arc::new(super::dry_run::DryRunWindowManager::new("dry_run")))
    } else {
        Ok(Arc::new(super::window_detector::DesktopWindowManager::new(
            &config.window.detection_mode,
        )?))
    }
}
