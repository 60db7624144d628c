use crate::error::{AhkError, Result};
use evdev::{Device, KeyCode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BY_ID_DIR: &str = "/dev/input/by-id";
const INPUT_DIR: &str = "/dev/input";

/// Слова в имени устройства, по которым оно точно не клавиатура
const NOT_KEYBOARD: [&str; 4] = ["mouse", "touchpad", "trackpoint", "deathadder"];

/// Поиск клавиатуры для чтения хоткеев
pub struct DeviceFinder;

impl DeviceFinder {
    /// `auto` ищет клавиатуру сама, иначе используется указанный путь
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            if !path.exists() {
                return AhkError::device_not_found(format!(
                    "Указанное устройство не найдено: {:?}",
                    path
                ));
            }
            info!("Используется указанное устройство: {:?}", path);
            return Ok(path);
        }

        info!("Автопоиск клавиатурного устройства...");
        if let Some(path) = Self::find_by_id()? {
            info!("Клавиатура найдена по ID: {:?}", path);
            return Ok(path);
        }
        if let Some(path) = Self::find_by_event_devices()? {
            info!("Клавиатура найдена среди event устройств: {:?}", path);
            return Ok(path);
        }

        AhkError::device_not_found(
            "Клавиатура не найдена. Проверьте права доступа к /dev/input (группа input)",
        )
    }

    /// Ссылки из by-id: `*-event-kbd` предпочтительнее прочих
    fn find_by_id() -> Result<Option<PathBuf>> {
        let Ok(entries) = fs::read_dir(BY_ID_DIR) else {
            debug!("{} недоступна", BY_ID_DIR);
            return Ok(None);
        };

        let mut candidates = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let name = file_name(&path).to_lowercase();
            if !name.contains("event") || !(name.contains("kbd") || name.contains("keyboard")) {
                continue;
            }
            if Self::is_keyboard_device(&path) {
                let priority = if name.ends_with("event-kbd") { 100 } else { 10 };
                candidates.push((priority, path));
            }
        }

        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(candidates.into_iter().next().map(|(_, path)| path))
    }

    fn find_by_event_devices() -> Result<Option<PathBuf>> {
        let entries = fs::read_dir(INPUT_DIR).map_err(|e| {
            AhkError::Permission(format!("Нет доступа к {}: {}", INPUT_DIR, e))
        })?;

        let mut devices = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if file_name(&path).starts_with("event") {
                devices.push(path);
            }
        }
        devices.sort();

        Ok(devices.into_iter().find(|path| Self::is_keyboard_device(path)))
    }

    /// Клавиатура: есть буквы, пробел и Enter, и имя не похоже на мышь
    fn is_keyboard_device(path: &Path) -> bool {
        let device = match Device::open(path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Не удалось открыть {:?}: {}", path, e);
                return false;
            }
        };

        let name = device.name().unwrap_or("Unknown").to_lowercase();
        if NOT_KEYBOARD.iter().any(|word| name.contains(word)) {
            debug!("Пропускаем {:?} ({})", path, name);
            return false;
        }

        let is_keyboard = device.supported_keys().is_some_and(|keys| {
            keys.contains(KeyCode::KEY_A)
                && keys.contains(KeyCode::KEY_SPACE)
                && keys.contains(KeyCode::KEY_ENTER)
                && keys.iter().count() > 20
        });
        debug!("{:?} ({}): клавиатура = {}", path, name, is_keyboard);
        is_keyboard
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}
