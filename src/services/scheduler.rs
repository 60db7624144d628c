use crate::ahk_error;
use crate::error::Result;
use crate::events::{ModifierMask, VirtualKey};
use crate::services::callback::Invocable;
use crate::services::registration_queue::{
    normalize_window_filter, PendingRegistration, PendingTimer, QueuedRequest, RegistrationQueue,
};
use crate::services::reload::ReloadState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::info;

/// Общая точка входа для скрипта, хоста и диспетчера.
///
/// Запросы ставятся в очередь с номером текущего поколения скрипта;
/// каждая очистка начинает новое поколение.
#[derive(Default)]
pub struct Scheduler {
    queue: RegistrationQueue,
    reload: ReloadState,
    generation: AtomicU64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(
        &self,
        modifiers: ModifierMask,
        key: VirtualKey,
        callback: Box<dyn Invocable>,
        window_filter: Option<String>,
    ) {
        self.queue.enqueue(QueuedRequest::Hotkey(PendingRegistration {
            modifiers,
            key,
            callback,
            window_filter: normalize_window_filter(window_filter),
            generation: self.generation(),
        }));
    }

    pub fn set_interval(
        &self,
        interval: Duration,
        callback: Box<dyn Invocable>,
        window_filter: Option<String>,
    ) -> Result<()> {
        if interval.is_zero() {
            return Err(ahk_error!(registration, "Интервал таймера должен быть больше нуля"));
        }

        self.queue.enqueue(QueuedRequest::Timer(PendingTimer {
            interval,
            callback,
            window_filter: normalize_window_filter(window_filter),
            generation: self.generation(),
        }));
        Ok(())
    }

    /// Снять все хоткеи и таймеры. Блокирует до подтверждения диспетчером,
    /// после возврата ни один старый обработчик больше не вызывается.
    pub fn clear(&self) {
        info!("Запрошена очистка хоткеев и таймеров");
        self.reload.clear.request_and_wait();
        info!("Очистка подтверждена, поколение {}", self.generation());
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub(crate) fn advance_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn queue(&self) -> &RegistrationQueue {
        &self.queue
    }

    pub fn reload(&self) -> &ReloadState {
        &self.reload
    }
}
