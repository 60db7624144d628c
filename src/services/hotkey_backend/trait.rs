use crate::config::Config;
use crate::error::Result;
use crate::events::{HotkeyId, ModifierMask, VirtualKey};
use smallvec::SmallVec;

/// События срабатывания, полученные за один опрос
pub type TriggeredHotkeys = SmallVec<[HotkeyId; 4]>;

/// Системная регистрация глобальных хоткеев
pub trait HotkeyBackend: Send {
    /// Привязать комбинацию к идентификатору. Ошибка, если комбинация занята
    /// или клавиша не поддерживается
    fn register(&mut self, id: HotkeyId, modifiers: ModifierMask, key: VirtualKey) -> Result<()>;

    fn unregister(&mut self, id: HotkeyId);

    /// Неблокирующий опрос сработавших хоткеев
    fn poll_events(&mut self) -> TriggeredHotkeys;
}

/// Factory function to create an appropriate hotkey backend based on the dry_run flag
pub fn create_hotkey_backend(config: &Config, dry_run: bool) -> Result<Box<dyn HotkeyBackend>> {
    if dry_run {
        Ok(Box::new(super::dry_run::DryRunHotkeyBackend::new()))
    } else {
        Ok(Box::new(super::evdev_backend::EvdevHotkeyBackend::new(
            &config.input.device_path,
        )?))
    }
}
