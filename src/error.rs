use thiserror::Error;

#[derive(Error, Debug)]
pub enum AhkError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка Lua: {0}")]
    Lua(#[from] mlua::Error),

    #[error("Ошибка отслеживания файлов: {0}")]
    Notify(#[from] notify::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Не удалось зарегистрировать хоткей: {0}")]
    Registration(String),

    #[error("Окно не найдено: {0}")]
    WindowNotFound(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl AhkError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(AhkError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, AhkError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! ahk_error {
    (registration, $($arg:tt)*) => {
        $crate::error::AhkError::Registration(format!($($arg)*))
    };
    (window_not_found, $($arg:tt)*) => {
        $crate::error::AhkError::WindowNotFound(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::AhkError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::AhkError::Internal(format!($($arg)*))
    };
}
