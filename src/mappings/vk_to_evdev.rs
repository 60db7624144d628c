use crate::events::VirtualKey;
use evdev::KeyCode;

/// Преобразование виртуальных кодов клавиш (VK_*) в коды evdev
/// Отвечает за трансляцию кодов из таблицы `KEY` в физические клавиши Linux
pub struct VirtualKeyToEvdev;

impl VirtualKeyToEvdev {
    /// Получить evdev код по виртуальному коду
    pub fn translate(key: VirtualKey) -> Option<KeyCode> {
        let vk = key.value();

        // Буквы 'A'..'Z'
        if (0x41..=0x5A).contains(&vk) {
            return Some(LETTERS[(vk - 0x41) as usize]);
        }
        // Цифры верхнего ряда '0'..'9'
        if (0x30..=0x39).contains(&vk) {
            return Some(DIGITS[(vk - 0x30) as usize]);
        }
        // F1..F24
        if (0x70..=0x87).contains(&vk) {
            return Some(FUNCTION_KEYS[(vk - 0x70) as usize]);
        }
        // Цифровой блок 0..9
        if (0x60..=0x69).contains(&vk) {
            return Some(NUMPAD_DIGITS[(vk - 0x60) as usize]);
        }

        let code = match vk {
            // Кнопки мыши
            0x01 => KeyCode::BTN_LEFT,
            0x02 => KeyCode::BTN_RIGHT,
            0x04 => KeyCode::BTN_MIDDLE,
            0x05 => KeyCode::BTN_SIDE,
            0x06 => KeyCode::BTN_EXTRA,

            // Операции цифрового блока
            0x6A => KeyCode::KEY_KPASTERISK,
            0x6B => KeyCode::KEY_KPPLUS,
            0x6C => KeyCode::KEY_KPCOMMA,
            0x6D => KeyCode::KEY_KPMINUS,
            0x6E => KeyCode::KEY_KPDOT,
            0x6F => KeyCode::KEY_KPSLASH,

            // Специальные клавиши
            0x20 => KeyCode::KEY_SPACE,
            0x0D => KeyCode::KEY_ENTER,
            0x1B => KeyCode::KEY_ESC,
            0x08 => KeyCode::KEY_BACKSPACE,
            0x09 => KeyCode::KEY_TAB,
            0x14 => KeyCode::KEY_CAPSLOCK,
            0x90 => KeyCode::KEY_NUMLOCK,
            0x91 => KeyCode::KEY_SCROLLLOCK,
            0x2C => KeyCode::KEY_SYSRQ,
            0x13 => KeyCode::KEY_PAUSE,

            // Навигация
            0x25 => KeyCode::KEY_LEFT,
            0x26 => KeyCode::KEY_UP,
            0x27 => KeyCode::KEY_RIGHT,
            0x28 => KeyCode::KEY_DOWN,
            0x2D => KeyCode::KEY_INSERT,
            0x2E => KeyCode::KEY_DELETE,
            0x24 => KeyCode::KEY_HOME,
            0x23 => KeyCode::KEY_END,
            0x21 => KeyCode::KEY_PAGEUP,
            0x22 => KeyCode::KEY_PAGEDOWN,

            // Модификаторы
            0xA0 => KeyCode::KEY_LEFTSHIFT,
            0xA1 => KeyCode::KEY_RIGHTSHIFT,
            0xA2 => KeyCode::KEY_LEFTCTRL,
            0xA3 => KeyCode::KEY_RIGHTCTRL,
            0xA4 => KeyCode::KEY_LEFTALT,
            0xA5 => KeyCode::KEY_RIGHTALT,
            0x5B => KeyCode::KEY_LEFTMETA,
            0x5C => KeyCode::KEY_RIGHTMETA,
            0x5D => KeyCode::KEY_COMPOSE,

            _ => return None,
        };

        Some(code)
    }

    /// Клавиша и необходимость Shift для символа (раскладка US)
    pub fn char_to_key(c: char) -> Option<(KeyCode, bool)> {
        if c.is_ascii_lowercase() {
            return Some((LETTERS[(c as u8 - b'a') as usize], false));
        }
        if c.is_ascii_uppercase() {
            return Some((LETTERS[(c as u8 - b'A') as usize], true));
        }
        if c.is_ascii_digit() {
            return Some((DIGITS[(c as u8 - b'0') as usize], false));
        }

        let key = match c {
            ' ' => (KeyCode::KEY_SPACE, false),
            '\n' => (KeyCode::KEY_ENTER, false),
            '\t' => (KeyCode::KEY_TAB, false),
            '-' => (KeyCode::KEY_MINUS, false),
            '=' => (KeyCode::KEY_EQUAL, false),
            '[' => (KeyCode::KEY_LEFTBRACE, false),
            ']' => (KeyCode::KEY_RIGHTBRACE, false),
            ';' => (KeyCode::KEY_SEMICOLON, false),
            '\'' => (KeyCode::KEY_APOSTROPHE, false),
            '`' => (KeyCode::KEY_GRAVE, false),
            '\\' => (KeyCode::KEY_BACKSLASH, false),
            ',' => (KeyCode::KEY_COMMA, false),
            '.' => (KeyCode::KEY_DOT, false),
            '/' => (KeyCode::KEY_SLASH, false),

            '!' => (KeyCode::KEY_1, true),
            '@' => (KeyCode::KEY_2, true),
            '#' => (KeyCode::KEY_3, true),
            '$' => (KeyCode::KEY_4, true),
            '%' => (KeyCode::KEY_5, true),
            '^' => (KeyCode::KEY_6, true),
            '&' => (KeyCode::KEY_7, true),
            '*' => (KeyCode::KEY_8, true),
            '(' => (KeyCode::KEY_9, true),
            ')' => (KeyCode::KEY_0, true),
            '_' => (KeyCode::KEY_MINUS, true),
            '+' => (KeyCode::KEY_EQUAL, true),
            '{' => (KeyCode::KEY_LEFTBRACE, true),
            '}' => (KeyCode::KEY_RIGHTBRACE, true),
            ':' => (KeyCode::KEY_SEMICOLON, true),
            '"' => (KeyCode::KEY_APOSTROPHE, true),
            '~' => (KeyCode::KEY_GRAVE, true),
            '|' => (KeyCode::KEY_BACKSLASH, true),
            '<' => (KeyCode::KEY_COMMA, true),
            '>' => (KeyCode::KEY_DOT, true),
            '?' => (KeyCode::KEY_SLASH, true),

            _ => return None,
        };

        Some(key)
    }

    /// Является ли код клавишей-модификатором
    /// Кнопки мыши: приходят не с клавиатуры, поэтому не годятся для хоткеев
    pub fn is_mouse_button(code: KeyCode) -> bool {
        matches!(
            code,
            KeyCode::BTN_LEFT
                | KeyCode::BTN_RIGHT
                | KeyCode::BTN_MIDDLE
                | KeyCode::BTN_SIDE
                | KeyCode::BTN_EXTRA
        )
    }

    pub fn is_modifier(code: KeyCode) -> bool {
        matches!(
            code,
            KeyCode::KEY_LEFTCTRL
                | KeyCode::KEY_RIGHTCTRL
                | KeyCode::KEY_LEFTALT
                | KeyCode::KEY_RIGHTALT
                | KeyCode::KEY_LEFTSHIFT
                | KeyCode::KEY_RIGHTSHIFT
                | KeyCode::KEY_LEFTMETA
                | KeyCode::KEY_RIGHTMETA
        )
    }
}

const LETTERS: [KeyCode; 26] = [
    KeyCode::KEY_A, KeyCode::KEY_B, KeyCode::KEY_C, KeyCode::KEY_D, KeyCode::KEY_E,
    KeyCode::KEY_F, KeyCode::KEY_G, KeyCode::KEY_H, KeyCode::KEY_I, KeyCode::KEY_J,
    KeyCode::KEY_K, KeyCode::KEY_L, KeyCode::KEY_M, KeyCode::KEY_N, KeyCode::KEY_O,
    KeyCode::KEY_P, KeyCode::KEY_Q, KeyCode::KEY_R, KeyCode::KEY_S, KeyCode::KEY_T,
    KeyCode::KEY_U, KeyCode::KEY_V, KeyCode::KEY_W, KeyCode::KEY_X, KeyCode::KEY_Y,
    KeyCode::KEY_Z,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::KEY_0, KeyCode::KEY_1, KeyCode::KEY_2, KeyCode::KEY_3, KeyCode::KEY_4,
    KeyCode::KEY_5, KeyCode::KEY_6, KeyCode::KEY_7, KeyCode::KEY_8, KeyCode::KEY_9,
];

const FUNCTION_KEYS: [KeyCode; 24] = [
    KeyCode::KEY_F1, KeyCode::KEY_F2, KeyCode::KEY_F3, KeyCode::KEY_F4,
    KeyCode::KEY_F5, KeyCode::KEY_F6, KeyCode::KEY_F7, KeyCode::KEY_F8,
    KeyCode::KEY_F9, KeyCode::KEY_F10, KeyCode::KEY_F11, KeyCode::KEY_F12,
    KeyCode::KEY_F13, KeyCode::KEY_F14, KeyCode::KEY_F15, KeyCode::KEY_F16,
    KeyCode::KEY_F17, KeyCode::KEY_F18, KeyCode::KEY_F19, KeyCode::KEY_F20,
    KeyCode::KEY_F21, KeyCode::KEY_F22, KeyCode::KEY_F23, KeyCode::KEY_F24,
];

const NUMPAD_DIGITS: [KeyCode; 10] = [
    KeyCode::KEY_KP0, KeyCode::KEY_KP1, KeyCode::KEY_KP2, KeyCode::KEY_KP3, KeyCode::KEY_KP4,
    KeyCode::KEY_KP5, KeyCode::KEY_KP6, KeyCode::KEY_KP7, KeyCode::KEY_KP8, KeyCode::KEY_KP9,
];
