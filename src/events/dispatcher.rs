use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Событие изменения содержимого директории скриптов
pub const ON_DIRECTORY_CHANGE: &str = "OnDirectoryChange";

pub type Callback = Box<dyn Fn() + Send + Sync>;

/// Синхронный издатель-подписчик внутри процесса.
///
/// Подписчики вызываются в порядке подписки на потоке, вызвавшем `publish`.
/// Паника подписчика не изолируется и прерывает доставку остальным, поэтому
/// колбэки должны быть лёгкими (в этой программе они только выставляют флаг).
/// Подписка изнутри колбэка приведёт к взаимоблокировке.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: RwLock<HashMap<String, Vec<Callback>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, event: &str, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners
            .write()
            .entry(event.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Возвращает число вызванных подписчиков
    pub fn publish(&self, event: &str) -> usize {
        let listeners = self.listeners.read();
        match listeners.get(event) {
            Some(callbacks) => {
                debug!("Публикация события {} для {} подписчиков", event, callbacks.len());
                for callback in callbacks {
                    callback();
                }
                callbacks.len()
            }
            None => 0,
        }
    }
}
