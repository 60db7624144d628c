use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Идентификатор зарегистрированного хоткея (начинается с 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HotkeyId(pub u32);

impl HotkeyId {
    pub const FIRST: HotkeyId = HotkeyId(1);

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> HotkeyId {
        HotkeyId(self.0 + 1)
    }
}

impl fmt::Display for HotkeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Виртуальный код клавиши (совместим с кодами VK_* Windows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VirtualKey(pub u32);

impl VirtualKey {
    pub fn new(code: u32) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VK_0x{:02X}", self.0)
    }
}

/// Битовая маска модификаторов (значения MOD_* Windows)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierMask(pub u32);

impl ModifierMask {
    pub const NONE: ModifierMask = ModifierMask(0);
    pub const ALT: ModifierMask = ModifierMask(0x0001);
    pub const CTRL: ModifierMask = ModifierMask(0x0002);
    pub const SHIFT: ModifierMask = ModifierMask(0x0004);
    pub const WIN: ModifierMask = ModifierMask(0x0008);
    /// Не срабатывать на автоповтор удерживаемой комбинации
    pub const NOREPEAT: ModifierMask = ModifierMask(0x4000);

    pub fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: ModifierMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn with(self, other: ModifierMask, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | other.0)
        } else {
            Self(self.0 & !other.0)
        }
    }

    /// Маска без служебных флагов, только физические модификаторы
    pub fn keys_only(&self) -> ModifierMask {
        Self(self.0 & (Self::ALT.0 | Self::CTRL.0 | Self::SHIFT.0 | Self::WIN.0))
    }

    pub fn is_empty(&self) -> bool {
        self.keys_only().0 == 0
    }

    pub fn to_vec(&self) -> Vec<&'static str> {
        let mut result = Vec::new();
        if self.contains(Self::CTRL) { result.push("ctrl"); }
        if self.contains(Self::ALT) { result.push("alt"); }
        if self.contains(Self::SHIFT) { result.push("shift"); }
        if self.contains(Self::WIN) { result.push("win"); }
        result
    }
}

impl BitOr for ModifierMask {
    type Output = ModifierMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        ModifierMask(self.0 | rhs.0)
    }
}

impl fmt::Display for ModifierMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.to_vec();
        if modifiers.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", modifiers.join("+"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_mask_combination() {
        let mask = ModifierMask::CTRL | ModifierMask::SHIFT;

        assert!(mask.contains(ModifierMask::CTRL));
        assert!(mask.contains(ModifierMask::SHIFT));
        assert!(!mask.contains(ModifierMask::ALT));
        assert_eq!(mask.to_string(), "ctrl+shift");
    }

    #[test]
    fn test_norepeat_is_not_a_key() {
        let mask = ModifierMask::ALT | ModifierMask::NOREPEAT;

        assert_eq!(mask.keys_only(), ModifierMask::ALT);
        assert!(ModifierMask::NOREPEAT.is_empty());
        assert_eq!(mask.to_string(), "alt");
    }

    #[test]
    fn test_with_toggles_bits() {
        let mask = ModifierMask::NONE
            .with(ModifierMask::WIN, true)
            .with(ModifierMask::ALT, true)
            .with(ModifierMask::WIN, false);

        assert_eq!(mask, ModifierMask::ALT);
    }

    #[test]
    fn test_hotkey_id_sequence() {
        assert_eq!(HotkeyId::FIRST.next(), HotkeyId(2));
        assert_eq!(HotkeyId(7).to_string(), "#7");
    }
}
