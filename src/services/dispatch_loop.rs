use crate::debug_if_enabled;
use crate::events::WindowInfo;
use crate::services::hotkey_backend::HotkeyBackend;
use crate::services::registration_queue::QueuedRequest;
use crate::services::registry::HotkeyRegistry;
use crate::services::scheduler::Scheduler;
use crate::services::timers::{Clock, SystemClock, TimerTable};
use crate::services::window_detector::WindowManager;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

/// Итог одного прохода диспетчера
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub registered: usize,
    pub cleared: bool,
    pub hotkeys_fired: usize,
    pub timers_fired: usize,
}

/// Единственный поток, который регистрирует хоткеи и вызывает обработчики.
///
/// Реестр и таблица таймеров живут внутри значения и переезжают вместе с ним
/// в поток диспетчера.
pub struct DispatchLoop {
    scheduler: Arc<Scheduler>,
    registry: HotkeyRegistry,
    timers: TimerTable,
    windows: Arc<dyn WindowManager>,
    clock: Box<dyn Clock>,
    idle: Duration,
}

impl DispatchLoop {
    pub fn new(
        scheduler: Arc<Scheduler>,
        backend: Box<dyn HotkeyBackend>,
        windows: Arc<dyn WindowManager>,
        idle: Duration,
    ) -> Self {
        Self::with_clock(scheduler, backend, windows, Box::new(SystemClock), idle)
    }

    pub fn with_clock(
        scheduler: Arc<Scheduler>,
        backend: Box<dyn HotkeyBackend>,
        windows: Arc<dyn WindowManager>,
        clock: Box<dyn Clock>,
        idle: Duration,
    ) -> Self {
        Self {
            scheduler,
            registry: HotkeyRegistry::new(backend),
            timers: TimerTable::new(),
            windows,
            clock,
            idle,
        }
    }

    pub fn run(mut self) -> ! {
        info!("Диспетчер запущен (пауза {:?})", self.idle);
        loop {
            self.run_cycle();
            thread::sleep(self.idle);
        }
    }

    pub fn run_cycle(&mut self) -> CycleReport {
        let registered = self.drain_queue();
        let cleared = self.process_clear();
        let hotkeys_fired = self.dispatch_hotkeys();
        let timers_fired = self.timers.tick(self.clock.now(), self.windows.as_ref());

        CycleReport {
            registered,
            cleared,
            hotkeys_fired,
            timers_fired,
        }
    }

    fn drain_queue(&mut self) -> usize {
        let generation = self.scheduler.generation();
        let mut registered = 0;

        for request in self.scheduler.queue().drain_all() {
            if request.generation() != generation {
                debug_if_enabled!("Отброшен запрос прошлого поколения: {}", request);
                continue;
            }

            match request {
                QueuedRequest::Hotkey(hotkey) => {
                    if self.registry.insert(hotkey).is_some() {
                        registered += 1;
                    }
                }
                QueuedRequest::Timer(timer) => {
                    self.timers.add(timer, self.clock.now());
                    registered += 1;
                }
            }
        }

        registered
    }

    fn process_clear(&mut self) -> bool {
        let reload = self.scheduler.reload();
        if !reload.clear.is_pending() {
            return false;
        }

        let discarded = self.scheduler.queue().drain_all().len();
        let hotkeys = self.registry.clear();
        let timers = self.timers.clear();
        let generation = self.scheduler.advance_generation();

        info!(
            "Очистка: снято хоткеев {}, таймеров {}, отброшено запросов {}; поколение {}",
            hotkeys, timers, discarded, generation
        );
        reload.clear.acknowledge();
        true
    }

    fn dispatch_hotkeys(&mut self) -> usize {
        let triggered = self.registry.poll_events();
        if triggered.is_empty() {
            return 0;
        }

        let mut active: Option<Option<WindowInfo>> = None;
        let mut fired = 0;

        for id in triggered {
            let Some(entry) = self.registry.lookup(id) else {
                debug_if_enabled!("Событие для незарегистрированного хоткея {}", id);
                continue;
            };

            if let Some(filter) = entry.window_filter.as_deref() {
                let windows = &self.windows;
                let window = active.get_or_insert_with(|| match windows.active_window() {
                    Ok(window) => Some(window),
                    Err(e) => {
                        warn!("Не удалось получить активное окно: {}", e);
                        None
                    }
                });
                match window {
                    Some(window) if window.title_contains(filter) => {}
                    _ => {
                        debug_if_enabled!("Хоткей {} пропущен, окно не содержит {:?}", id, filter);
                        continue;
                    }
                }
            }

            fired += 1;
            if let Err(e) = entry.callback.invoke() {
                error!("Ошибка в обработчике хоткея {}: {}", id, e);
            }
        }

        fired
    }

    pub fn hotkey_count(&self) -> usize {
        self.registry.len()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }
}
