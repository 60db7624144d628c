use crate::error::Result;
use crate::events::VirtualKey;
use parking_lot::Mutex;
use tracing::info;

use super::r#trait::{InputDevice, MouseButton};

/// Ввод для dry-run режима: действия логируются, курсор запоминается
pub struct DryRunInput {
    cursor: Mutex<(i32, i32)>,
}

impl DryRunInput {
    pub fn new() -> Self {
        info!("Dry-run режим - эмуляция ввода отключена");
        Self {
            cursor: Mutex::new((0, 0)),
        }
    }
}

impl InputDevice for DryRunInput {
    fn send_key(&self, key: VirtualKey) -> Result<()> {
        info!("[DRY RUN] Нажатие {}", key);
        Ok(())
    }

    fn type_text(&self, text: &str) -> Result<()> {
        info!("[DRY RUN] Печать текста: {:?}", text);
        Ok(())
    }

    fn move_cursor(&self, x: i32, y: i32) -> Result<()> {
        info!("[DRY RUN] Курсор -> ({}, {})", x, y);
        *self.cursor.lock() = (x, y);
        Ok(())
    }

    fn click(&self, button: MouseButton) -> Result<()> {
        info!("[DRY RUN] Клик {:?}", button);
        Ok(())
    }

    fn cursor_position(&self) -> Result<(i32, i32)> {
        Ok(*self.cursor.lock())
    }
}
