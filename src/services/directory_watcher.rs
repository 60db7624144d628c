use crate::error::Result;
use crate::events::{EventDispatcher, ON_DIRECTORY_CHANGE};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Наблюдение за директорией скриптов.
///
/// Каждая пачка изменений публикуется одним событием `OnDirectoryChange`.
pub struct DirectoryWatcher {
    path: PathBuf,
    dispatcher: Arc<EventDispatcher>,
}

impl DirectoryWatcher {
    pub fn new(path: PathBuf, dispatcher: Arc<EventDispatcher>) -> Self {
        Self { path, dispatcher }
    }

    /// Блокирующий цикл наблюдения. Возвращается только при ошибке;
    /// системный наблюдатель освобождается при любом выходе.
    pub fn run(&self) {
        if let Err(e) = self.watch() {
            error!("Наблюдение за {:?} остановлено: {}", self.path, e);
        }
    }

    fn watch(&self) -> Result<()> {
        info!("Наблюдение за директорией {:?}", self.path);

        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        while let Ok(first) = rx.recv() {
            let mut changed = is_change(&first?);

            // Схлопываем всё, что пришло одновременно, в одно событие
            for res in rx.try_iter() {
                changed |= is_change(&res?);
            }

            if changed {
                let notified = self.dispatcher.publish(ON_DIRECTORY_CHANGE);
                debug!("Изменение в {:?}, уведомлено подписчиков: {}", self.path, notified);
            }
        }

        Ok(())
    }
}

fn is_change(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_file_change_publishes_event() {
        let dir = std::env::temp_dir().join(format!("ahk-script-watch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let dispatcher = Arc::new(EventDispatcher::new());
        let changes = Arc::new(AtomicUsize::new(0));
        {
            let changes = Arc::clone(&changes);
            dispatcher.subscribe(ON_DIRECTORY_CHANGE, move || {
                changes.fetch_add(1, Ordering::SeqCst);
            });
        }

        let watcher = DirectoryWatcher::new(dir.clone(), Arc::clone(&dispatcher));
        thread::spawn(move || watcher.run());
        thread::sleep(Duration::from_millis(200));

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut attempt = 0;
        while changes.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            std::fs::write(dir.join("main.lua"), format!("-- {}", attempt)).unwrap();
            attempt += 1;
            thread::sleep(Duration::from_millis(100));
        }

        assert!(changes.load(Ordering::SeqCst) > 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_directory_ends_watch() {
        let dispatcher = Arc::new(EventDispatcher::new());
        let watcher = DirectoryWatcher::new(
            PathBuf::from("/nonexistent/ahk-script-watch"),
            dispatcher,
        );
        assert!(watcher.watch().is_err());
    }
}
