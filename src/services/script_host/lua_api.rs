use crate::events::{ModifierMask, VirtualKey};
use crate::mappings::{KEY_CONSTANTS, MODIFIER_CONSTANTS};
use crate::services::input::{InputDevice, MouseButton};
use crate::services::scheduler::Scheduler;
use crate::services::window_detector::WindowManager;
use mlua::{Function, Lua, Table, Thread};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use super::lua_callback::LuaCallback;

/// Сервисы, доступные скрипту
#[derive(Clone)]
pub struct ApiContext {
    pub scheduler: Arc<Scheduler>,
    pub input: Arc<dyn InputDevice>,
    pub windows: Arc<dyn WindowManager>,
}

/// Установить глобальные функции и таблицы `MOD`/`KEY` в состояние Lua
pub fn install(lua: &Lua, ctx: &ApiContext) -> mlua::Result<()> {
    let globals = lua.globals();

    globals.set("MOD", modifier_table(lua)?)?;
    globals.set("KEY", key_table(lua)?)?;

    let scheduler = Arc::clone(&ctx.scheduler);
    globals.set(
        "bind",
        lua.create_function(
            move |_, (mods, key, callback, window): (u32, u32, Function, Option<String>)| {
                scheduler.bind(
                    ModifierMask::new(mods),
                    VirtualKey::new(key),
                    Box::new(LuaCallback::new(callback)),
                    window,
                );
                Ok(())
            },
        )?,
    )?;

    let scheduler = Arc::clone(&ctx.scheduler);
    globals.set(
        "set_interval",
        lua.create_function(
            move |_, (ms, callback, window): (i64, Function, Option<String>)| {
                if ms <= 0 {
                    return Err(mlua::Error::runtime(format!(
                        "set_interval: интервал должен быть больше нуля, получено {}",
                        ms
                    )));
                }
                scheduler
                    .set_interval(
                        Duration::from_millis(ms as u64),
                        Box::new(LuaCallback::new(callback)),
                        window,
                    )
                    .map_err(|e| mlua::Error::runtime(e.to_string()))
            },
        )?,
    )?;

    let input = Arc::clone(&ctx.input);
    globals.set(
        "send",
        lua.create_function(move |_, key: u32| {
            if let Err(e) = input.send_key(VirtualKey::new(key)) {
                error!("send: {}", e);
            }
            Ok(())
        })?,
    )?;

    let input = Arc::clone(&ctx.input);
    globals.set(
        "write",
        lua.create_function(move |_, text: String| {
            if let Err(e) = input.type_text(&text) {
                error!("write: {}", e);
            }
            Ok(())
        })?,
    )?;

    let windows = Arc::clone(&ctx.windows);
    globals.set(
        "focus",
        lua.create_function(move |_, title: String| {
            // Неудача уже залогирована менеджером окон
            let _ = windows.focus(&title);
            Ok(())
        })?,
    )?;

    let input = Arc::clone(&ctx.input);
    globals.set(
        "mouse_move",
        lua.create_function(move |_, (x, y): (i32, i32)| {
            if let Err(e) = input.move_cursor(x, y) {
                error!("mouse_move: {}", e);
            }
            Ok(())
        })?,
    )?;

    let input = Arc::clone(&ctx.input);
    globals.set(
        "mouse_click",
        lua.create_function(move |_, button: Option<i64>| {
            let button = MouseButton::from_index(button.unwrap_or(0));
            if let Err(e) = input.click(button) {
                error!("mouse_click: {}", e);
            }
            Ok(())
        })?,
    )?;

    let input = Arc::clone(&ctx.input);
    globals.set(
        "mouse_pos",
        lua.create_function(move |lua, ()| match input.cursor_position() {
            Ok((x, y)) => {
                let position = lua.create_table()?;
                position.set("x", x)?;
                position.set("y", y)?;
                Ok(Some(position))
            }
            Err(e) => {
                error!("mouse_pos: {}", e);
                Ok(None)
            }
        })?,
    )?;

    install_sleep(lua, ctx)?;

    globals.set(
        "log",
        lua.create_function(|_, message: String| {
            info!(target: "script", "{}", message);
            Ok(())
        })?,
    )?;

    Ok(())
}

fn modifier_table(lua: &Lua) -> mlua::Result<Table> {
    let table = lua.create_table()?;
    for (name, mask) in MODIFIER_CONSTANTS.iter() {
        table.set(*name, mask.bits())?;
    }
    Ok(table)
}

fn key_table(lua: &Lua) -> mlua::Result<Table> {
    let table = lua.create_table()?;
    for (name, code) in KEY_CONSTANTS.iter() {
        table.set(name.as_str(), *code)?;
    }
    Ok(table)
}

/// `sleep`/`wait` на Lua: в теле скрипта уступают управление хосту,
/// в обработчиках спят на вызывающем потоке
const SLEEP_PRELUDE: &str = r#"
local pause = ...
local running, isyieldable, yield = coroutine.running, coroutine.isyieldable, coroutine.yield
local script_thread

function sleep(ms)
    if script_thread ~= nil and running() == script_thread and isyieldable() then
        yield(pause(ms, false))
    else
        pause(ms, true)
    end
end

function wait(seconds)
    if type(seconds) ~= "number" then
        error("wait: ожидается число секунд", 2)
    end
    sleep(seconds * 1000)
end

return function(thread) script_thread = thread end
"#;

const SCRIPT_THREAD_KEY: &str = "ahk_bind_script_thread";

fn install_sleep(lua: &Lua, ctx: &ApiContext) -> mlua::Result<()> {
    let scheduler = Arc::clone(&ctx.scheduler);
    let pause = lua.create_function(move |_, (ms, block): (f64, bool)| {
        let reload = scheduler.reload();
        if reload.is_reload_requested() {
            return Err(interrupted());
        }
        let ms = if ms.is_nan() { 0.0 } else { ms.max(0.0) };
        if block && !reload.sleep_unless_reload(millis_to_duration(ms)) {
            return Err(interrupted());
        }
        Ok(ms)
    })?;

    let bind_thread: Function = lua.load(SLEEP_PRELUDE).set_name("=sleep").call(pause)?;
    lua.set_named_registry_value(SCRIPT_THREAD_KEY, bind_thread)
}

fn interrupted() -> mlua::Error {
    mlua::Error::runtime("ожидание прервано перезагрузкой скрипта")
}

/// Сопрограмма тела скрипта: только в ней `sleep`/`wait` уступают управление
pub fn bind_script_thread(lua: &Lua, thread: &Thread) -> mlua::Result<()> {
    let bind_thread: Function = lua.named_registry_value(SCRIPT_THREAD_KEY)?;
    bind_thread.call::<()>(thread.clone())
}

/// Миллисекунды из Lua в длительность; непредставимо большие значения
/// становятся `Duration::MAX`, то есть сном до перезагрузки
pub fn millis_to_duration(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::input::DryRunInput;
    use crate::services::registration_queue::QueuedRequest;
    use crate::services::window_detector::DryRunWindowManager;
    use std::thread;
    use std::time::Instant;

    fn lua_with_api() -> (Lua, ApiContext) {
        let ctx = ApiContext {
            scheduler: Arc::new(Scheduler::new()),
            input: Arc::new(DryRunInput::new()),
            windows: Arc::new(DryRunWindowManager::new("Terminal")),
        };
        let lua = Lua::new();
        install(&lua, &ctx).unwrap();
        (lua, ctx)
    }

    #[test]
    fn test_mod_and_key_tables() {
        let (lua, _ctx) = lua_with_api();
        lua.load(
            r#"
            assert(MOD.ALT == 1 and MOD.CTRL == 2 and MOD.SHIFT == 4 and MOD.WIN == 8)
            assert(MOD.NOREPEAT == 0x4000)
            assert(KEY.F1 == 0x70 and KEY.A == 0x41 and KEY.N0 == 0x30)
            assert(KEY.ESCAPE == 0x1B and KEY.NUM5 == 0x65)
            "#,
        )
        .exec()
        .unwrap();
    }

    #[test]
    fn test_bind_enqueues_request() {
        let (lua, ctx) = lua_with_api();
        lua.load(r#"bind(MOD.ALT + MOD.SHIFT, KEY.F1, function() end, "Notepad")"#)
            .exec()
            .unwrap();

        let mut requests = ctx.scheduler.queue().drain_all();
        assert_eq!(requests.len(), 1);
        match requests.pop() {
            Some(QueuedRequest::Hotkey(hotkey)) => {
                assert_eq!(hotkey.modifiers, ModifierMask::ALT | ModifierMask::SHIFT);
                assert_eq!(hotkey.key, VirtualKey(0x70));
                assert_eq!(hotkey.window_filter.as_deref(), Some("Notepad"));
            }
            _ => panic!("ожидался хоткей"),
        }
    }

    #[test]
    fn test_set_interval_validates_ms() {
        let (lua, ctx) = lua_with_api();

        assert!(lua.load("set_interval(0, function() end)").exec().is_err());
        assert!(lua.load("set_interval(-5, function() end)").exec().is_err());
        assert!(ctx.scheduler.queue().is_empty());

        lua.load("set_interval(250, function() end)").exec().unwrap();
        assert_eq!(ctx.scheduler.queue().len(), 1);
    }

    #[test]
    fn test_mouse_and_focus() {
        let (lua, ctx) = lua_with_api();
        lua.load(
            r#"
            mouse_move(5, 7)
            local p = mouse_pos()
            assert(p.x == 5 and p.y == 7)
            mouse_click(1)
            focus("Editor")
            send(KEY.ENTER)
            write("Hello!")
            log("готово")
            "#,
        )
        .exec()
        .unwrap();

        assert_eq!(ctx.windows.active_window().unwrap().title, "Editor");
    }

    #[test]
    fn test_wait_aborts_on_reload() {
        let (lua, ctx) = lua_with_api();
        ctx.scheduler.reload().request_reload();

        let started = Instant::now();
        let result = lua.load("while true do wait(10) end").exec();

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_sleep_completes_without_reload() {
        let (lua, _ctx) = lua_with_api();
        lua.load("sleep(20); wait(0.01)").exec().unwrap();
    }

    #[test]
    fn test_huge_wait_with_reload_pending() {
        let (lua, ctx) = lua_with_api();
        ctx.scheduler.reload().request_reload();

        assert!(lua.load("wait(1e19)").exec().is_err());
    }

    #[test]
    fn test_huge_wait_ends_on_reload() {
        let (lua, ctx) = lua_with_api();
        let scheduler = Arc::clone(&ctx.scheduler);
        let reloader = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            scheduler.reload().request_reload();
        });

        let started = Instant::now();
        assert!(lua.load("wait(1e19)").exec().is_err());
        assert!(started.elapsed() < Duration::from_secs(2));
        reloader.join().unwrap();
    }

    #[test]
    fn test_millis_to_duration() {
        assert_eq!(millis_to_duration(1500.0), Duration::from_millis(1500));
        assert_eq!(millis_to_duration(-3.0), Duration::ZERO);
        assert_eq!(millis_to_duration(1e22), Duration::MAX);
    }
}
