use crate::error::Result;
use crate::events::VirtualKey;
use std::sync::Arc;

use super::pointer::XdotoolPointer;
use super::virtual_device::VirtualDevice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// 0 - левая, 1 - правая, остальные значения - средняя
    pub fn from_index(index: i64) -> Self {
        match index {
            0 => MouseButton::Left,
            1 => MouseButton::Right,
            _ => MouseButton::Middle,
        }
    }
}

/// Эмуляция ввода от имени скрипта
pub trait InputDevice: Send + Sync {
    /// Нажать и отпустить клавишу
    fn send_key(&self, key: VirtualKey) -> Result<()>;

    /// Напечатать текст посимвольно
    fn type_text(&self, text: &str) -> Result<()>;

    /// Переместить курсор в абсолютные координаты экрана
    fn move_cursor(&self, x: i32, y: i32) -> Result<()>;

    fn click(&self, button: MouseButton) -> Result<()>;

    fn cursor_position(&self) -> Result<(i32, i32)>;
}

/// Клавиатура и кнопки мыши через uinput, положение курсора через xdotool
pub struct LinuxInput {
    device: VirtualDevice,
    pointer: XdotoolPointer,
}

impl InputDevice for LinuxInput {
    fn send_key(&self, key: VirtualKey) -> Result<()> {
        self.device.send_key(key)
    }

    fn type_text(&self, text: &str) -> Result<()> {
        self.device.type_text(text)
    }

    fn move_cursor(&self, x: i32, y: i32) -> Result<()> {
        self.pointer.move_to(x, y)
    }

    fn click(&self, button: MouseButton) -> Result<()> {
        self.device.click(button)
    }

    fn cursor_position(&self) -> Result<(i32, i32)> {
        self.pointer.position()
    }
}

/// Factory function to create an appropriate input device based on the dry_run flag
pub fn create_input_device(dry_run: bool) -> Result<Arc<dyn InputDevice>> {
    if dry_run {
        Ok(Arc::new(super::dry_run::DryRunInput::new()))
    } else {
        Ok(Arc::new(LinuxInput {
            device: VirtualDevice::new("AHK-Script Virtual Device")?,
            pointer: XdotoolPointer::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_button_from_index() {
        assert_eq!(MouseButton::from_index(0), MouseButton::Left);
        assert_eq!(MouseButton::from_index(1), MouseButton::Right);
        assert_eq!(MouseButton::from_index(2), MouseButton::Middle);
        assert_eq!(MouseButton::from_index(-1), MouseButton::Middle);
    }
}
