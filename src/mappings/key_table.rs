use crate::events::ModifierMask;
use once_cell::sync::Lazy;

/// Таблица `MOD` для скриптов
pub static MODIFIER_CONSTANTS: [(&str, ModifierMask); 6] = [
    ("NONE", ModifierMask::NONE),
    ("ALT", ModifierMask::ALT),
    ("CTRL", ModifierMask::CTRL),
    ("SHIFT", ModifierMask::SHIFT),
    ("WIN", ModifierMask::WIN),
    ("NOREPEAT", ModifierMask::NOREPEAT),
];

/// Таблица `KEY` для скриптов: имя → виртуальный код клавиши (VK_* Windows)
pub static KEY_CONSTANTS: Lazy<Vec<(String, u32)>> = Lazy::new(|| {
    let mut keys: Vec<(String, u32)> = Vec::with_capacity(128);

    // Кнопки мыши
    keys.push(("LBUTTON".into(), 0x01));
    keys.push(("RBUTTON".into(), 0x02));
    keys.push(("MBUTTON".into(), 0x04));
    keys.push(("XBUTTON1".into(), 0x05));
    keys.push(("XBUTTON2".into(), 0x06));

    // Буквы, цифры верхнего ряда, функциональные клавиши, цифровой блок
    for c in b'A'..=b'Z' {
        keys.push(((c as char).to_string(), c as u32));
    }
    for n in b'0'..=b'9' {
        keys.push((format!("N{}", n as char), n as u32));
    }
    for i in 1..=24u32 {
        keys.push((format!("F{}", i), 0x70 + (i - 1)));
    }
    for i in 0..=9u32 {
        keys.push((format!("NUM{}", i), 0x60 + i));
    }

    let named: [(&str, u32); 35] = [
        ("MULTIPLY", 0x6A),
        ("ADD", 0x6B),
        ("SEPARATOR", 0x6C),
        ("SUBTRACT", 0x6D),
        ("DECIMAL", 0x6E),
        ("DIVIDE", 0x6F),
        ("SPACE", 0x20),
        ("ENTER", 0x0D),
        ("ESCAPE", 0x1B),
        ("BACKSPACE", 0x08),
        ("TAB", 0x09),
        ("CAPSLOCK", 0x14),
        ("NUMLOCK", 0x90),
        ("SCROLLLOCK", 0x91),
        ("PRINTSCREEN", 0x2C),
        ("PAUSE", 0x13),
        ("LEFT", 0x25),
        ("UP", 0x26),
        ("RIGHT", 0x27),
        ("DOWN", 0x28),
        ("INSERT", 0x2D),
        ("DELETE", 0x2E),
        ("HOME", 0x24),
        ("END", 0x23),
        ("PAGEUP", 0x21),
        ("PAGEDOWN", 0x22),
        ("LSHIFT", 0xA0),
        ("RSHIFT", 0xA1),
        ("LCTRL", 0xA2),
        ("RCTRL", 0xA3),
        ("LALT", 0xA4),
        ("RALT", 0xA5),
        ("LWIN", 0x5B),
        ("RWIN", 0x5C),
        ("APPS", 0x5D),
    ];
    keys.extend(named.iter().map(|(name, code)| (name.to_string(), *code)));

    keys
});

/// Найти виртуальный код по имени из таблицы `KEY`
pub fn key_code(name: &str) -> Option<u32> {
    KEY_CONSTANTS
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, code)| *code)
}
