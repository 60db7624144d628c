use crate::events::{ModifierMask, VirtualKey};
use crate::services::callback::Invocable;
use parking_lot::Mutex;
use std::fmt;
use std::time::Duration;

/// Запрос на регистрацию хоткея, ожидающий диспетчера
pub struct PendingRegistration {
    pub modifiers: ModifierMask,
    pub key: VirtualKey,
    pub callback: Box<dyn Invocable>,
    pub window_filter: Option<String>,
    /// Поколение скрипта на момент постановки в очередь
    pub generation: u64,
}

/// Запрос на добавление повторяющегося таймера
pub struct PendingTimer {
    pub interval: Duration,
    pub callback: Box<dyn Invocable>,
    pub window_filter: Option<String>,
    pub generation: u64,
}

pub enum QueuedRequest {
    Hotkey(PendingRegistration),
    Timer(PendingTimer),
}

impl QueuedRequest {
    pub fn generation(&self) -> u64 {
        match self {
            QueuedRequest::Hotkey(hotkey) => hotkey.generation,
            QueuedRequest::Timer(timer) => timer.generation,
        }
    }
}

impl fmt::Display for PendingRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}+{} | Окно: {}",
            self.modifiers,
            self.key,
            self.window_filter.as_deref().unwrap_or("Global")
        )
    }
}

impl fmt::Display for PendingTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "каждые {}мс | Окно: {}",
            self.interval.as_millis(),
            self.window_filter.as_deref().unwrap_or("Global")
        )
    }
}

impl fmt::Display for QueuedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueuedRequest::Hotkey(hotkey) => write!(f, "хоткей {}", hotkey),
            QueuedRequest::Timer(timer) => write!(f, "таймер {}", timer),
        }
    }
}

/// Пустой фильтр окна означает "любое окно"
pub fn normalize_window_filter(filter: Option<String>) -> Option<String> {
    filter.filter(|title| !title.is_empty())
}

/// Потокобезопасная очередь запросов на регистрацию.
///
/// Мьютекс защищает только саму очередь. `drain_all` забирает содержимое
/// обменом вектора, вся работа с ОС происходит уже без блокировки.
#[derive(Default)]
pub struct RegistrationQueue {
    pending: Mutex<Vec<QueuedRequest>>,
}

impl RegistrationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, request: QueuedRequest) {
        self.pending.lock().push(request);
    }

    pub fn drain_all(&self) -> Vec<QueuedRequest> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn hotkey(key: u32) -> QueuedRequest {
        QueuedRequest::Hotkey(PendingRegistration {
            modifiers: ModifierMask::ALT,
            key: VirtualKey(key),
            callback: Box::new(|| -> crate::error::Result<()> { Ok(()) }),
            window_filter: None,
            generation: 0,
        })
    }

    #[test]
    fn test_drain_empties_queue() {
        let queue = RegistrationQueue::new();
        queue.enqueue(hotkey(0x41));
        queue.enqueue(hotkey(0x42));

        let drained = queue.drain_all();
        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());
        assert!(queue.drain_all().is_empty());
    }

    #[test]
    fn test_drain_preserves_order() {
        let queue = RegistrationQueue::new();
        for key in 0x41..0x45 {
            queue.enqueue(hotkey(key));
        }

        let keys: Vec<u32> = queue
            .drain_all()
            .into_iter()
            .map(|request| match request {
                QueuedRequest::Hotkey(hotkey) => hotkey.key.value(),
                QueuedRequest::Timer(_) => unreachable!(),
            })
            .collect();

        assert_eq!(keys, vec![0x41, 0x42, 0x43, 0x44]);
    }

    #[test]
    fn test_concurrent_enqueue() {
        let queue = Arc::new(RegistrationQueue::new());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for key in 0..50 {
                        queue.enqueue(hotkey(key));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(queue.len(), 100);
        assert_eq!(queue.drain_all().len(), 100);
    }

    #[test]
    fn test_normalize_window_filter() {
        assert_eq!(normalize_window_filter(Some(String::new())), None);
        assert_eq!(normalize_window_filter(None), None);
        assert_eq!(
            normalize_window_filter(Some("Notepad".to_string())),
            Some("Notepad".to_string())
        );
    }
}
