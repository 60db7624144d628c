use crate::debug_if_enabled;
use crate::error::{AhkError, Result};
use crate::events::VirtualKey;
use crate::mappings::VirtualKeyToEvdev;
use evdev::KeyCode;
use parking_lot::Mutex;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use super::r#trait::MouseButton;

const EV_SYN: i32 = 0;
const EV_KEY: i32 = 1;

/// Пауза между символами при печати текста
const TYPE_DELAY: Duration = Duration::from_millis(15);

/// Виртуальные коды кнопок мыши
const VK_LBUTTON: u32 = 0x01;
const VK_RBUTTON: u32 = 0x02;
const VK_MBUTTON: u32 = 0x04;

/// Виртуальная клавиатура и кнопки мыши через uinput
pub struct VirtualDevice {
    device: Mutex<uinput::Device>,
}

impl VirtualDevice {
    pub fn new(device_name: &str) -> Result<Self> {
        info!("Создание виртуального устройства uinput '{}'", device_name);

        let device = uinput::default()?
            .name(device_name)?
            .event(uinput::event::Keyboard::All)?
            .event(uinput::event::Controller::All)?
            .create()
            .map_err(|e| {
                AhkError::Internal(format!(
                    "Не удалось создать виртуальное устройство '{}': {}",
                    device_name, e
                ))
            })?;

        info!("Виртуальное устройство '{}' создано успешно", device_name);
        Ok(Self {
            device: Mutex::new(device),
        })
    }

    fn write_key(device: &mut uinput::Device, code: KeyCode, pressed: bool) -> Result<()> {
        device.write(EV_KEY, code.code() as i32, pressed as i32)?;
        device.write(EV_SYN, 0, 0)?;
        Ok(())
    }

    fn tap(&self, code: KeyCode, shift: bool) -> Result<()> {
        let mut device = self.device.lock();
        if shift {
            Self::write_key(&mut device, KeyCode::KEY_LEFTSHIFT, true)?;
        }
        Self::write_key(&mut device, code, true)?;
        Self::write_key(&mut device, code, false)?;
        if shift {
            Self::write_key(&mut device, KeyCode::KEY_LEFTSHIFT, false)?;
        }
        Ok(())
    }

    pub fn send_key(&self, key: VirtualKey) -> Result<()> {
        match key.value() {
            VK_LBUTTON => return self.click(MouseButton::Left),
            VK_RBUTTON => return self.click(MouseButton::Right),
            VK_MBUTTON => return self.click(MouseButton::Middle),
            _ => {}
        }

        let code = VirtualKeyToEvdev::translate(key).ok_or_else(|| {
            AhkError::Internal(format!("Клавиша {} не поддерживается", key))
        })?;

        debug_if_enabled!("Нажатие {} -> {:?}", key, code);
        self.tap(code, false)
    }

    pub fn type_text(&self, text: &str) -> Result<()> {
        for c in text.chars() {
            match VirtualKeyToEvdev::char_to_key(c) {
                Some((code, shift)) => self.tap(code, shift)?,
                None => warn!("Символ {:?} не поддерживается раскладкой, пропущен", c),
            }
            thread::sleep(TYPE_DELAY);
        }
        Ok(())
    }

    pub fn click(&self, button: MouseButton) -> Result<()> {
        let code = match button {
            MouseButton::Left => KeyCode::BTN_LEFT,
            MouseButton::Right => KeyCode::BTN_RIGHT,
            MouseButton::Middle => KeyCode::BTN_MIDDLE,
        };

        debug_if_enabled!("Клик {:?}", button);
        let mut device = self.device.lock();
        Self::write_key(&mut device, code, true)?;
        Self::write_key(&mut device, code, false)
    }
}

impl Drop for VirtualDevice {
    fn drop(&mut self) {
        info!("Закрытие виртуального устройства");
    }
}
