use crate::error::{AhkError, Result};
use crate::events::{HotkeyId, ModifierMask, VirtualKey};
use std::collections::HashMap;
use tracing::info;

use super::r#trait::{HotkeyBackend, TriggeredHotkeys};

/// Бэкенд для dry-run режима: регистрации только логируются, события не приходят
#[derive(Debug, Default)]
pub struct DryRunHotkeyBackend {
    registered: HashMap<HotkeyId, (ModifierMask, VirtualKey)>,
}

impl DryRunHotkeyBackend {
    pub fn new() -> Self {
        info!("Dry-run режим - хоткеи регистрируются в режиме эмуляции");
        Self::default()
    }
}

impl HotkeyBackend for DryRunHotkeyBackend {
    fn register(&mut self, id: HotkeyId, modifiers: ModifierMask, key: VirtualKey) -> Result<()> {
        let taken = self
            .registered
            .values()
            .any(|(mods, vk)| mods.keys_only() == modifiers.keys_only() && *vk == key);
        if taken {
            return Err(AhkError::Registration(format!(
                "Комбинация {}+{} уже занята",
                modifiers, key
            )));
        }

        info!("[DRY RUN] Регистрация {} для {}+{}", id, modifiers, key);
        self.registered.insert(id, (modifiers, key));
        Ok(())
    }

    fn unregister(&mut self, id: HotkeyId) {
        if self.registered.remove(&id).is_some() {
            info!("[DRY RUN] Снятие регистрации {}", id);
        }
    }

    fn poll_events(&mut self) -> TriggeredHotkeys {
        TriggeredHotkeys::new()
    }
}
