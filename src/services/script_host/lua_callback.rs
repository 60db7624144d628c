use crate::error::Result;
use crate::services::callback::Invocable;
use mlua::Function;

/// Обработчик из скрипта. Держит ссылку на функцию Lua, поэтому состояние
/// Lua должно жить, пока обработчик зарегистрирован.
pub struct LuaCallback {
    function: Function,
}

impl LuaCallback {
    pub fn new(function: Function) -> Self {
        Self { function }
    }
}

impl Invocable for LuaCallback {
    fn invoke(&self) -> Result<()> {
        self.function.call::<()>(())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AhkError;
    use mlua::Lua;

    #[test]
    fn test_invoke_calls_lua_function() {
        let lua = Lua::new();
        let function: Function = lua
            .load("return function() hits = (hits or 0) + 1 end")
            .eval()
            .unwrap();

        let callback = LuaCallback::new(function);
        callback.invoke().unwrap();
        callback.invoke().unwrap();

        assert_eq!(lua.globals().get::<i64>("hits").unwrap(), 2);
    }

    #[test]
    fn test_lua_error_is_returned() {
        let lua = Lua::new();
        let function: Function = lua
            .load("return function() error('boom') end")
            .eval()
            .unwrap();

        let result = LuaCallback::new(function).invoke();
        assert!(matches!(result, Err(AhkError::Lua(_))));
    }
}
