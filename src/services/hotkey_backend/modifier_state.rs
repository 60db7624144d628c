use crate::events::ModifierMask;
use evdev::KeyCode;

/// Текущее состояние модификаторов физической клавиатуры
#[derive(Debug, Default)]
pub struct ModifierState {
    ctrl: bool,
    alt: bool,
    shift: bool,
    super_key: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_mask(&self) -> ModifierMask {
        ModifierMask::NONE
            .with(ModifierMask::CTRL, self.ctrl)
            .with(ModifierMask::ALT, self.alt)
            .with(ModifierMask::SHIFT, self.shift)
            .with(ModifierMask::WIN, self.super_key)
    }

    /// Обновить состояние; возвращает `true`, если клавиша была модификатором
    pub fn update_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::KEY_LEFTCTRL | KeyCode::KEY_RIGHTCTRL => self.ctrl = pressed,
            KeyCode::KEY_LEFTALT | KeyCode::KEY_RIGHTALT => self.alt = pressed,
            KeyCode::KEY_LEFTSHIFT | KeyCode::KEY_RIGHTSHIFT => self.shift = pressed,
            KeyCode::KEY_LEFTMETA | KeyCode::KEY_RIGHTMETA => self.super_key = pressed,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_press_and_release() {
        let mut state = ModifierState::new();

        assert!(state.update_key(KeyCode::KEY_LEFTALT, true));
        assert!(state.update_key(KeyCode::KEY_RIGHTCTRL, true));
        assert_eq!(state.to_mask(), ModifierMask::ALT | ModifierMask::CTRL);

        assert!(state.update_key(KeyCode::KEY_LEFTALT, false));
        assert_eq!(state.to_mask(), ModifierMask::CTRL);
    }

    #[test]
    fn test_regular_key_is_not_modifier() {
        let mut state = ModifierState::new();
        assert!(!state.update_key(KeyCode::KEY_F1, true));
        assert!(state.to_mask().is_empty());
    }
}
