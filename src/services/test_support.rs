//! Подделки системных сервисов для тестов диспетчера и реестра

use crate::error::{AhkError, Result};
use crate::events::{HotkeyId, ModifierMask, VirtualKey, WindowInfo};
use crate::services::callback::Invocable;
use crate::services::hotkey_backend::{HotkeyBackend, TriggeredHotkeys};
use crate::services::registration_queue::{PendingRegistration, PendingTimer};
use crate::services::timers::Clock;
use crate::services::window_detector::WindowManager;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Default)]
struct MockState {
    registered: HashMap<HotkeyId, (ModifierMask, VirtualKey)>,
    refused: HashSet<VirtualKey>,
    events: Vec<HotkeyId>,
}

/// Бэкенд хоткеев в памяти; клоны разделяют состояние
#[derive(Clone, Default)]
pub struct MockHotkeyBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockHotkeyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Отказывать в регистрации этой клавиши
    pub fn refuse(&self, key: VirtualKey) {
        self.state.lock().refused.insert(key);
    }

    pub fn registered(&self, id: HotkeyId) -> Option<(ModifierMask, VirtualKey)> {
        self.state.lock().registered.get(&id).copied()
    }

    pub fn registered_count(&self) -> usize {
        self.state.lock().registered.len()
    }

    pub fn registered_ids(&self) -> Vec<HotkeyId> {
        let mut ids: Vec<_> = self.state.lock().registered.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Событие срабатывания для идентификатора, даже незарегистрированного
    pub fn trigger(&self, id: HotkeyId) {
        self.state.lock().events.push(id);
    }

    /// Нажатие комбинации: срабатывает хоткей с теми же модификаторами и клавишей
    pub fn press(&self, modifiers: ModifierMask, key: VirtualKey) {
        let mut state = self.state.lock();
        let found = state
            .registered
            .iter()
            .find(|(_, (mods, vk))| mods.keys_only() == modifiers.keys_only() && *vk == key)
            .map(|(id, _)| *id);
        if let Some(id) = found {
            state.events.push(id);
        }
    }
}

impl HotkeyBackend for MockHotkeyBackend {
    fn register(&mut self, id: HotkeyId, modifiers: ModifierMask, key: VirtualKey) -> Result<()> {
        let mut state = self.state.lock();
        if state.refused.contains(&key) {
            return Err(AhkError::Registration(format!("{} отклонена", key)));
        }
        state.registered.insert(id, (modifiers, key));
        Ok(())
    }

    fn unregister(&mut self, id: HotkeyId) {
        self.state.lock().registered.remove(&id);
    }

    fn poll_events(&mut self) -> TriggeredHotkeys {
        self.state.lock().events.drain(..).collect()
    }
}

/// Активное окно с заданным заголовком
pub struct FixedWindow {
    title: RwLock<String>,
}

impl FixedWindow {
    pub fn new(title: &str) -> Self {
        Self {
            title: RwLock::new(title.to_string()),
        }
    }

    pub fn set_title(&self, title: &str) {
        *self.title.write() = title.to_string();
    }
}

impl WindowManager for FixedWindow {
    fn active_window(&self) -> Result<WindowInfo> {
        Ok(WindowInfo::new(self.title.read().clone()))
    }

    fn focus(&self, title: &str) -> Result<()> {
        self.set_title(title);
        Ok(())
    }
}

/// Часы, которые двигаются только вручную; клоны разделяют время
#[derive(Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }
}

/// Счётчик вызовов обработчиков
#[derive(Clone, Default)]
pub struct CountingCallback {
    count: Arc<AtomicUsize>,
}

impl CountingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback(&self) -> Box<dyn Invocable> {
        let count = Arc::clone(&self.count);
        Box::new(move || -> Result<()> {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    pub fn failing() -> Box<dyn Invocable> {
        Box::new(|| -> Result<()> { Err(AhkError::Internal("обработчик упал".to_string())) })
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

pub fn pending_hotkey(
    key: u32,
    callback: Box<dyn Invocable>,
    window_filter: Option<&str>,
) -> PendingRegistration {
    PendingRegistration {
        modifiers: ModifierMask::ALT,
        key: VirtualKey(key),
        callback,
        window_filter: window_filter.map(str::to_string),
        generation: 0,
    }
}

pub fn pending_timer(
    interval_ms: u64,
    callback: Box<dyn Invocable>,
    window_filter: Option<&str>,
) -> PendingTimer {
    PendingTimer {
        interval: Duration::from_millis(interval_ms),
        callback,
        window_filter: window_filter.map(str::to_string),
        generation: 0,
    }
}
