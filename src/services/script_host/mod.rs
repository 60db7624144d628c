mod lua_api;
mod lua_callback;

pub use self::lua_api::ApiContext;
pub use self::lua_callback::LuaCallback;

use crate::config::Config;
use crate::error::Result;
use crate::events::{EventDispatcher, ON_DIRECTORY_CHANGE};
use crate::services::input::InputDevice;
use crate::services::scheduler::Scheduler;
use crate::services::window_detector::WindowManager;
use mlua::{Lua, MultiValue, ThreadStatus, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Цикл хоста скрипта: загрузить, дождаться перезагрузки, очистить, повторить
pub struct ScriptHost {
    ctx: ApiContext,
    script_path: PathBuf,
    reload_poll: Duration,
}

impl ScriptHost {
    pub fn new(
        config: &Config,
        scheduler: Arc<Scheduler>,
        input: Arc<dyn InputDevice>,
        windows: Arc<dyn WindowManager>,
    ) -> Self {
        Self {
            ctx: ApiContext {
                scheduler,
                input,
                windows,
            },
            script_path: config.script.path.clone(),
            reload_poll: config.reload_poll_interval(),
        }
    }

    /// Изменение директории скриптов выставляет флаг перезагрузки
    pub fn subscribe_reload(&self, dispatcher: &EventDispatcher) {
        let scheduler = Arc::clone(&self.ctx.scheduler);
        dispatcher.subscribe(ON_DIRECTORY_CHANGE, move || {
            scheduler.reload().request_reload();
        });
    }

    pub fn run(&self) -> ! {
        info!("Хост скрипта запущен: {:?}", self.script_path);
        loop {
            self.run_cycle();
        }
    }

    /// Один цикл жизни скрипта. Возвращается после очистки, вызванной
    /// запросом перезагрузки.
    pub fn run_cycle(&self) {
        let reload = self.ctx.scheduler.reload();
        reload.reset_reload();

        let lua = self.start_script();

        reload.wait_for_reload(self.reload_poll);
        info!("Перезагрузка скрипта {:?}", self.script_path);

        // Обработчики держат функции Lua, состояние освобождается после очистки
        self.ctx.scheduler.clear();
        drop(lua);
    }

    /// Новое состояние Lua с выполненным скриптом. Ошибка скрипта логируется,
    /// уже поставленные им регистрации остаются в силе.
    pub fn start_script(&self) -> Option<Lua> {
        let lua = match self.create_state() {
            Ok(lua) => lua,
            Err(e) => {
                error!("Не удалось создать состояние Lua: {}", e);
                return None;
            }
        };

        match self.run_script(&lua) {
            Ok(true) => info!("Скрипт {:?} выполнен", self.script_path),
            Ok(false) => info!("Скрипт {:?} прерван перезагрузкой", self.script_path),
            Err(e) => error!("Ошибка скрипта {:?}: {}", self.script_path, e),
        }

        Some(lua)
    }

    fn create_state(&self) -> Result<Lua> {
        let lua = Lua::new();
        lua_api::install(&lua, &self.ctx)?;
        Ok(lua)
    }

    /// Тело скрипта выполняется сопрограммой. `sleep`/`wait` в нём уступают
    /// управление, и хост спит между возобновлениями, не удерживая состояние
    /// Lua, поэтому обработчики на потоке диспетчера не ждут.
    /// Возвращает `false`, если сон прерван перезагрузкой.
    fn run_script(&self, lua: &Lua) -> Result<bool> {
        let source = std::fs::read_to_string(&self.script_path)?;
        let body = lua
            .load(source)
            .set_name(format!("@{}", self.script_path.display()))
            .into_function()?;
        let script = lua.create_thread(body)?;
        lua_api::bind_script_thread(lua, &script)?;

        let reload = self.ctx.scheduler.reload();
        loop {
            let yielded: MultiValue = script.resume(())?;
            if !matches!(script.status(), ThreadStatus::Resumable) {
                return Ok(true);
            }

            let pause = lua_api::millis_to_duration(yielded_millis(&yielded));
            if !reload.sleep_unless_reload(pause) {
                return Ok(false);
            }
        }
    }
}

fn yielded_millis(values: &MultiValue) -> f64 {
    match values.iter().next() {
        Some(Value::Integer(ms)) => *ms as f64,
        Some(Value::Number(ms)) => *ms,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dispatch_loop::DispatchLoop;
    use crate::services::input::DryRunInput;
    use crate::services::test_support::{FixedWindow, MockHotkeyBackend};
    use crate::services::callback::Invocable;
    use crate::services::registration_queue::QueuedRequest;
    use std::path::Path;
    use std::thread;
    use std::time::Instant;

    fn script_file(name: &str, source: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ahk-script-host-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, source).unwrap();
        path
    }

    fn host(path: &Path, scheduler: &Arc<Scheduler>) -> ScriptHost {
        let mut config = Config::default();
        config.script.path = path.to_path_buf();
        config.script.reload_poll_ms = 5;
        ScriptHost::new(
            &config,
            Arc::clone(scheduler),
            Arc::new(DryRunInput::new()),
            Arc::new(FixedWindow::new("Terminal")),
        )
    }

    #[test]
    fn test_script_error_is_absorbed() {
        let scheduler = Arc::new(Scheduler::new());
        let path = script_file("broken.lua", "bind(MOD.ALT, KEY.F1, function() end)\nerror('boom')");
        let host = host(&path, &scheduler);

        assert!(host.start_script().is_some());
        assert_eq!(scheduler.queue().len(), 1);
    }

    #[test]
    fn test_missing_script_is_absorbed() {
        let scheduler = Arc::new(Scheduler::new());
        let host = host(Path::new("/nonexistent/ahk-script/main.lua"), &scheduler);

        assert!(host.start_script().is_some());
        assert!(scheduler.queue().is_empty());
    }

    #[test]
    fn test_reload_cycle_clears_registrations() {
        let scheduler = Arc::new(Scheduler::new());
        let backend = MockHotkeyBackend::new();
        let mut dispatch = DispatchLoop::new(
            Arc::clone(&scheduler),
            Box::new(backend.clone()),
            Arc::new(FixedWindow::new("Terminal")),
            Duration::from_millis(1),
        );
        let path = script_file(
            "reload.lua",
            "bind(MOD.ALT, KEY.F1, function() end)\nset_interval(1000, function() end)",
        );

        let dispatcher = EventDispatcher::new();
        let host = host(&path, &scheduler);
        host.subscribe_reload(&dispatcher);
        let cycle = thread::spawn(move || host.run_cycle());

        while dispatch.hotkey_count() == 0 {
            dispatch.run_cycle();
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(dispatch.timer_count(), 1);

        dispatcher.publish(ON_DIRECTORY_CHANGE);
        while !cycle.is_finished() {
            dispatch.run_cycle();
            thread::sleep(Duration::from_millis(1));
        }
        cycle.join().unwrap();

        assert_eq!(dispatch.hotkey_count(), 0);
        assert_eq!(dispatch.timer_count(), 0);
        assert_eq!(backend.registered_count(), 0);
        assert_eq!(scheduler.generation(), 1);
    }

    #[test]
    fn test_callback_runs_while_script_sleeps() {
        let scheduler = Arc::new(Scheduler::new());
        let path = script_file(
            "sleepy.lua",
            "bind(MOD.ALT, KEY.F1, function() hits = (hits or 0) + 1 end)\nsleep(1500)\nlog('проснулся')",
        );
        let host = host(&path, &scheduler);
        let script = thread::spawn(move || host.start_script());

        let deadline = Instant::now() + Duration::from_secs(5);
        while scheduler.queue().is_empty() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        let callback = match scheduler.queue().drain_all().pop() {
            Some(QueuedRequest::Hotkey(hotkey)) => hotkey.callback,
            _ => panic!("ожидался хоткей"),
        };
        thread::sleep(Duration::from_millis(100));

        let started = Instant::now();
        callback.invoke().unwrap();
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(!script.is_finished());

        drop(callback);
        assert!(script.join().unwrap().is_some());
    }

    #[test]
    fn test_sleeping_script_stops_on_reload() {
        let scheduler = Arc::new(Scheduler::new());
        let path = script_file("loop.lua", "while true do sleep(1000) end");
        let host = host(&path, &scheduler);
        let script = thread::spawn(move || host.start_script());

        thread::sleep(Duration::from_millis(100));
        let requested = Instant::now();
        scheduler.reload().request_reload();

        assert!(script.join().unwrap().is_some());
        assert!(requested.elapsed() < Duration::from_millis(900));
    }
}
