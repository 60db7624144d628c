use crate::error::{AhkError, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{info, warn};

const INPUT_DIR: &str = "/dev/input";
const UINPUT_DEVICE: &str = "/dev/uinput";

/// Проверить доступ к клавиатуре (чтение хоткеев) и uinput (эмуляция ввода)
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_devices_access()?;
    check_uinput_access()?;
    warn_if_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access() -> Result<()> {
    fs::read_dir(INPUT_DIR).map_err(|e| {
        AhkError::Permission(format!(
            "Нет доступа к {}: {}. Добавьте пользователя в группу 'input'",
            INPUT_DIR, e
        ))
    })?;
    Ok(())
}

fn check_uinput_access() -> Result<()> {
    if !Path::new(UINPUT_DEVICE).exists() {
        // Модуль может быть загружен позже, создание устройства сообщит об ошибке само
        warn!("{} не существует, выполните: sudo modprobe uinput", UINPUT_DEVICE);
        return Ok(());
    }

    let mode = fs::metadata(UINPUT_DEVICE)
        .map_err(|e| {
            AhkError::Permission(format!("Не удалось проверить {}: {}", UINPUT_DEVICE, e))
        })?
        .permissions()
        .mode();

    if !uinput_mode_allows_access(mode) {
        return Err(AhkError::Permission(format!(
            "Нет прав доступа к {}. Добавьте пользователя в группу 'uinput' или 'input'",
            UINPUT_DEVICE
        )));
    }
    Ok(())
}

/// Доступ есть, если устройство открыто группе или всем
fn uinput_mode_allows_access(mode: u32) -> bool {
    mode & 0o060 != 0 || mode & 0o006 != 0
}

fn warn_if_root() {
    if std::env::var("USER").is_ok_and(|user| user == "root") {
        warn!("Приложение запущено от имени root");
        warn!("Рекомендуется: sudo usermod -a -G input,uinput $USER и повторный вход в систему");
    }
}
