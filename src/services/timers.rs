use crate::events::WindowInfo;
use crate::services::callback::Invocable;
use crate::services::registration_queue::PendingTimer;
use crate::services::window_detector::WindowManager;
use crate::debug_if_enabled;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Источник текущего времени для диспетчера
pub trait Clock: Send {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

pub struct TimerEntry {
    pub callback: Box<dyn Invocable>,
    pub interval: Duration,
    pub last_tick: Instant,
    pub window_filter: Option<String>,
}

impl TimerEntry {
    fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_tick) >= self.interval
    }
}

/// Таблица повторяющихся таймеров
#[derive(Default)]
pub struct TimerTable {
    entries: Vec<TimerEntry>,
}

impl TimerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить таймер; первый отсчёт начинается с `now`
    pub fn add(&mut self, pending: PendingTimer, now: Instant) {
        info!("Таймер добавлен: {}", pending);
        self.entries.push(TimerEntry {
            callback: pending.callback,
            interval: pending.interval,
            last_tick: now,
            window_filter: pending.window_filter,
        });
    }

    /// Вызвать наступившие таймеры. Таймер с фильтром срабатывает только при
    /// точном совпадении заголовка активного окна, но его отсчёт сдвигается
    /// в любом случае. Возвращает число вызванных обработчиков.
    pub fn tick(&mut self, now: Instant, windows: &dyn WindowManager) -> usize {
        let mut active: Option<Option<WindowInfo>> = None;
        let mut fired = 0;

        for entry in self.entries.iter_mut().filter(|entry| entry.is_due(now)) {
            entry.last_tick = now;

            if let Some(filter) = entry.window_filter.as_deref() {
                let window = active.get_or_insert_with(|| match windows.active_window() {
                    Ok(window) => Some(window),
                    Err(e) => {
                        warn!("Не удалось получить активное окно: {}", e);
                        None
                    }
                });
                match window {
                    Some(window) if window.title_equals(filter) => {}
                    _ => {
                        debug_if_enabled!("Таймер пропущен, окно не совпадает с {:?}", filter);
                        continue;
                    }
                }
            }

            fired += 1;
            if let Err(e) = entry.callback.invoke() {
                error!("Ошибка в обработчике таймера: {}", e);
            }
        }

        fired
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[TimerEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{pending_timer, CountingCallback, FixedWindow, ManualClock};

    #[test]
    fn test_tick_monotonicity() {
        let clock = ManualClock::new();
        let window = FixedWindow::new("Terminal");
        let counter = CountingCallback::new();
        let mut table = TimerTable::new();

        let start = clock.now();
        table.add(pending_timer(1000, counter.callback(), None), start);

        for _ in 0..3 {
            clock.advance(Duration::from_millis(400));
            table.tick(clock.now(), &window);
        }

        assert_eq!(counter.count(), 1);
        assert_eq!(table.entries()[0].last_tick, start + Duration::from_millis(1200));
    }

    #[test]
    fn test_filter_requires_exact_title() {
        let clock = ManualClock::new();
        let window = FixedWindow::new("Untitled - Notepad");
        let counter = CountingCallback::new();
        let mut table = TimerTable::new();

        table.add(pending_timer(100, counter.callback(), Some("Notepad")), clock.now());
        clock.advance(Duration::from_millis(100));
        assert_eq!(table.tick(clock.now(), &window), 0);
        // Отсчёт сдвинут, хотя обработчик не вызван
        assert_eq!(table.entries()[0].last_tick, clock.now());

        window.set_title("Notepad");
        clock.advance(Duration::from_millis(100));
        assert_eq!(table.tick(clock.now(), &window), 1);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_failing_callback_does_not_stop_others() {
        let clock = ManualClock::new();
        let window = FixedWindow::new("Terminal");
        let counter = CountingCallback::new();
        let mut table = TimerTable::new();

        table.add(pending_timer(50, CountingCallback::failing(), None), clock.now());
        table.add(pending_timer(50, counter.callback(), None), clock.now());

        clock.advance(Duration::from_millis(50));
        assert_eq!(table.tick(clock.now(), &window), 2);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_clear() {
        let clock = ManualClock::new();
        let mut table = TimerTable::new();
        table.add(pending_timer(10, CountingCallback::new().callback(), None), clock.now());

        assert_eq!(table.clear(), 1);
        assert!(table.is_empty());
    }
}
