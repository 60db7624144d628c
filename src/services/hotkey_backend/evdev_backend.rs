use crate::{debug_if_enabled, trace_if_enabled};
use crate::error::{AhkError, Result};
use crate::events::{HotkeyId, ModifierMask, VirtualKey};
use crate::mappings::VirtualKeyToEvdev;
use crate::utils::DeviceFinder;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use evdev::{Device, EventType, InputEvent, KeyCode};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

use super::modifier_state::ModifierState;
use super::r#trait::{HotkeyBackend, TriggeredHotkeys};

/// Комбинация клавиш: физические модификаторы + evdev код
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Combo {
    modifiers: ModifierMask,
    code: u16,
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    id: HotkeyId,
    /// Срабатывать ли на автоповтор (нет флага NOREPEAT)
    repeat: bool,
}

/// Сопоставление событий клавиатуры с зарегистрированными комбинациями
struct KeyMatcher {
    modifiers: ModifierState,
    bindings: Arc<DashMap<Combo, Binding>>,
}

impl KeyMatcher {
    fn new(bindings: Arc<DashMap<Combo, Binding>>) -> Self {
        Self {
            modifiers: ModifierState::new(),
            bindings,
        }
    }

    /// Обработать нажатие; `emit` вызывается под блокировкой записи привязки,
    /// поэтому снятие регистрации дожидается доставки события.
    /// Возвращает `false`, если получатель событий закрыт.
    fn on_key<F>(&mut self, key: KeyCode, value: i32, emit: F) -> bool
    where
        F: FnOnce(HotkeyId) -> bool,
    {
        trace_if_enabled!("Клавиша {:?} = {}", key, value);

        if self.modifiers.update_key(key, value != 0) {
            return true;
        }

        let is_repeat = match value {
            1 => false,
            2 => true,
            _ => return true,
        };

        let combo = Combo {
            modifiers: self.modifiers.to_mask(),
            code: key.code(),
        };

        match self.bindings.get(&combo) {
            Some(binding) if !is_repeat || binding.repeat => {
                debug_if_enabled!("Сработала комбинация {}+{:?} -> {}", combo.modifiers, key, binding.id);
                emit(binding.id)
            }
            _ => true,
        }
    }
}

/// Глобальные хоткеи поверх evdev.
///
/// Клавиатура читается отдельным потоком без эксклюзивного захвата,
/// сработавшие идентификаторы передаются через канал и забираются `poll_events`.
pub struct EvdevHotkeyBackend {
    bindings: Arc<DashMap<Combo, Binding>>,
    triggered: Receiver<HotkeyId>,
}

impl EvdevHotkeyBackend {
    pub fn new(device_path: &str) -> Result<Self> {
        info!("Инициализация EvdevHotkeyBackend");

        let device_path = DeviceFinder::find_keyboard_device(device_path)?;

        let device = Device::open(&device_path).map_err(|e| {
            AhkError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        Self::log_device(&device);

        let bindings = Arc::new(DashMap::new());
        let (sender, triggered) = mpsc::channel();
        let matcher = KeyMatcher::new(Arc::clone(&bindings));

        thread::Builder::new()
            .name("evdev-reader".to_string())
            .spawn(move || Self::read_loop(device, matcher, sender))?;

        Ok(Self { bindings, triggered })
    }

    fn read_loop(mut device: Device, mut matcher: KeyMatcher, sender: Sender<HotkeyId>) {
        info!("Чтение событий клавиатуры запущено");

        loop {
            let events: Vec<InputEvent> = match device.fetch_events() {
                Ok(events) => events.collect(),
                Err(e) => {
                    error!("Ошибка чтения событий: {}", e);
                    thread::sleep(Duration::from_millis(100));
                    continue;
                }
            };

            for event in events {
                if event.event_type() != EventType::KEY {
                    continue;
                }

                let key = KeyCode::new(event.code());
                if !matcher.on_key(key, event.value(), |id| sender.send(id).is_ok()) {
                    info!("Получатель событий закрыт, чтение клавиатуры остановлено");
                    return;
                }
            }
        }
    }

    fn log_device(device: &Device) {
        info!("Устройство: {}", device.name().unwrap_or("Unknown"));
        info!("Физический путь: {:?}", device.physical_path());
    }
}

impl HotkeyBackend for EvdevHotkeyBackend {
    fn register(&mut self, id: HotkeyId, modifiers: ModifierMask, key: VirtualKey) -> Result<()> {
        let code = VirtualKeyToEvdev::translate(key).ok_or_else(|| {
            AhkError::Registration(format!("Клавиша {} не поддерживается evdev", key))
        })?;

        if VirtualKeyToEvdev::is_mouse_button(code) {
            return Err(AhkError::Registration(format!(
                "Кнопка мыши {} не может быть хоткеем: читается только клавиатура",
                key
            )));
        }

        if VirtualKeyToEvdev::is_modifier(code) {
            warn!("Хоткей {} назначен на клавишу-модификатор {:?}", id, code);
        }

        let combo = Combo {
            modifiers: modifiers.keys_only(),
            code: code.code(),
        };

        match self.bindings.entry(combo) {
            Entry::Occupied(existing) => Err(AhkError::Registration(format!(
                "Комбинация {}+{} уже занята хоткеем {}",
                combo.modifiers,
                key,
                existing.get().id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(Binding {
                    id,
                    repeat: !modifiers.contains(ModifierMask::NOREPEAT),
                });
                Ok(())
            }
        }
    }

    fn unregister(&mut self, id: HotkeyId) {
        self.bindings.retain(|_, binding| binding.id != id);
    }

    fn poll_events(&mut self) -> TriggeredHotkeys {
        self.triggered.try_iter().collect()
    }
}
