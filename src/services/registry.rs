use crate::events::{HotkeyId, ModifierMask};
use crate::services::callback::Invocable;
use crate::services::hotkey_backend::{HotkeyBackend, TriggeredHotkeys};
use crate::services::registration_queue::PendingRegistration;
use std::collections::HashMap;
use tracing::{error, info};

/// Зарегистрированный хоткей
pub struct HotkeyEntry {
    pub id: HotkeyId,
    pub callback: Box<dyn Invocable>,
    pub window_filter: Option<String>,
}

/// Реестр хоткеев. Принадлежит потоку диспетчера, поэтому без блокировок.
pub struct HotkeyRegistry {
    entries: HashMap<HotkeyId, HotkeyEntry>,
    next_id: HotkeyId,
    backend: Box<dyn HotkeyBackend>,
}

impl HotkeyRegistry {
    pub fn new(backend: Box<dyn HotkeyBackend>) -> Self {
        Self {
            entries: HashMap::new(),
            next_id: HotkeyId::FIRST,
            backend,
        }
    }

    /// Зарегистрировать хоткей в системе и сохранить обработчик.
    ///
    /// Идентификатор расходуется даже при неудаче, повторных попыток нет.
    pub fn insert(&mut self, pending: PendingRegistration) -> Option<HotkeyId> {
        let id = self.next_id;
        self.next_id = id.next();

        let modifiers = pending.modifiers | ModifierMask::NOREPEAT;
        if let Err(e) = self.backend.register(id, modifiers, pending.key) {
            error!("Не удалось зарегистрировать хоткей {} ({}): {}", id, pending, e);
            return None;
        }

        info!("Хоткей {} зарегистрирован: {}", id, pending);
        self.entries.insert(
            id,
            HotkeyEntry {
                id,
                callback: pending.callback,
                window_filter: pending.window_filter,
            },
        );
        Some(id)
    }

    pub fn lookup(&self, id: HotkeyId) -> Option<&HotkeyEntry> {
        self.entries.get(&id)
    }

    pub fn poll_events(&mut self) -> TriggeredHotkeys {
        self.backend.poll_events()
    }

    /// Снять все регистрации и сбросить счётчик идентификаторов.
    /// Возвращает число снятых хоткеев.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        for id in self.entries.keys() {
            self.backend.unregister(*id);
        }
        self.entries.clear();

        // События, пришедшие до снятия регистрации, относятся к старым id
        let stale = self.backend.poll_events();
        if !stale.is_empty() {
            info!("Отброшено {} событий снятых хоткеев", stale.len());
        }

        self.next_id = HotkeyId::FIRST;
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VirtualKey;
    use crate::services::test_support::{pending_hotkey, CountingCallback, MockHotkeyBackend};

    #[test]
    fn test_ids_are_monotonic() {
        let backend = MockHotkeyBackend::new();
        let mut registry = HotkeyRegistry::new(Box::new(backend.clone()));
        let counter = CountingCallback::new();

        let ids: Vec<_> = (0..3)
            .map(|i| registry.insert(pending_hotkey(0x41 + i, counter.callback(), None)))
            .collect();

        assert_eq!(ids, vec![Some(HotkeyId(1)), Some(HotkeyId(2)), Some(HotkeyId(3))]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_norepeat_always_added() {
        let backend = MockHotkeyBackend::new();
        let mut registry = HotkeyRegistry::new(Box::new(backend.clone()));

        registry.insert(pending_hotkey(0x70, CountingCallback::new().callback(), None));

        let (mods, key) = backend.registered(HotkeyId(1)).unwrap();
        assert!(mods.contains(ModifierMask::NOREPEAT));
        assert!(mods.contains(ModifierMask::ALT));
        assert_eq!(key, VirtualKey(0x70));
    }

    #[test]
    fn test_failed_registration_is_dropped() {
        let backend = MockHotkeyBackend::new();
        backend.refuse(VirtualKey(0x42));
        let mut registry = HotkeyRegistry::new(Box::new(backend.clone()));
        let counter = CountingCallback::new();

        assert_eq!(registry.insert(pending_hotkey(0x42, counter.callback(), None)), None);
        assert!(registry.lookup(HotkeyId(1)).is_none());

        // Идентификатор не переиспользуется
        assert_eq!(
            registry.insert(pending_hotkey(0x43, counter.callback(), None)),
            Some(HotkeyId(2))
        );
    }

    #[test]
    fn test_clear_unregisters_and_resets() {
        let backend = MockHotkeyBackend::new();
        let mut registry = HotkeyRegistry::new(Box::new(backend.clone()));
        let counter = CountingCallback::new();

        registry.insert(pending_hotkey(0x41, counter.callback(), None));
        registry.insert(pending_hotkey(0x42, counter.callback(), None));
        backend.trigger(HotkeyId(1));

        assert_eq!(registry.clear(), 2);
        assert!(registry.is_empty());
        assert_eq!(backend.registered_count(), 0);
        assert!(registry.poll_events().is_empty());

        assert_eq!(
            registry.insert(pending_hotkey(0x41, counter.callback(), None)),
            Some(HotkeyId(1))
        );
    }
}
