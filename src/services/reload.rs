use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Шаг сна между проверками флага перезагрузки
const SLEEP_SLICE: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
struct ClearState {
    pending: bool,
    completed: u64,
}

/// Блокирующее рукопожатие очистки между хостом скрипта и диспетчером.
///
/// Запрашивающий поток ждёт на условной переменной, пока диспетчер не
/// подтвердит очистку, выполненную после запроса.
#[derive(Default)]
pub struct ClearHandshake {
    state: Mutex<ClearState>,
    done: Condvar,
}

impl ClearHandshake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запросить очистку и дождаться подтверждения
    pub fn request_and_wait(&self) {
        let mut state = self.state.lock();
        let target = state.completed + 1;
        state.pending = true;
        while state.completed < target {
            self.done.wait(&mut state);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().pending
    }

    /// Подтвердить выполненную очистку и разбудить ожидающих
    pub fn acknowledge(&self) {
        let mut state = self.state.lock();
        state.pending = false;
        state.completed += 1;
        self.done.notify_all();
    }

    pub fn completed(&self) -> u64 {
        self.state.lock().completed
    }
}

/// Состояние горячей перезагрузки скрипта
#[derive(Default)]
pub struct ReloadState {
    reload_requested: AtomicBool,
    pub clear: ClearHandshake,
}

impl ReloadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_reload(&self) {
        self.reload_requested.store(true, Ordering::SeqCst);
    }

    pub fn is_reload_requested(&self) -> bool {
        self.reload_requested.load(Ordering::SeqCst)
    }

    pub fn reset_reload(&self) {
        self.reload_requested.store(false, Ordering::SeqCst);
    }

    /// Ждать запроса перезагрузки, проверяя флаг с заданным периодом
    pub fn wait_for_reload(&self, poll: Duration) {
        while !self.is_reload_requested() {
            thread::sleep(poll);
        }
    }

    /// Спать `duration`, просыпаясь при запросе перезагрузки.
    /// Возвращает `false`, если сон прерван. Слишком большая длительность
    /// означает сон до перезагрузки.
    pub fn sleep_unless_reload(&self, duration: Duration) -> bool {
        let deadline = Instant::now().checked_add(duration);
        loop {
            if self.is_reload_requested() {
                return false;
            }
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return true;
                    }
                    (deadline - now).min(SLEEP_SLICE)
                }
                None => SLEEP_SLICE,
            };
            thread::sleep(slice);
        }
    }
}
