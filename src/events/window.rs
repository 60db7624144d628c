use serde::{Deserialize, Serialize};
use std::fmt;

/// Информация об активном окне
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowInfo {
    pub title: String,
    pub class: String,
}

impl WindowInfo {
    pub fn new(title: String) -> Self {
        Self {
            title,
            class: String::new(),
        }
    }

    pub fn with_class(mut self, class: String) -> Self {
        self.class = class;
        self
    }

    /// Правило для хоткеев: заголовок содержит фильтр как подстроку (с учётом регистра)
    pub fn title_contains(&self, filter: &str) -> bool {
        self.title.contains(filter)
    }

    /// Правило для таймеров: точное совпадение заголовка
    pub fn title_equals(&self, filter: &str) -> bool {
        self.title == filter
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class.is_empty() {
            write!(f, "\"{}\"", self.title)
        } else {
            write!(f, "\"{}\" ({})", self.title, self.class)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_info_creation() {
        let window = WindowInfo::new("Test Window".to_string())
            .with_class("TestApp".to_string());

        assert_eq!(window.title, "Test Window");
        assert_eq!(window.class, "TestApp");
        assert_eq!(window.to_string(), "\"Test Window\" (TestApp)");
    }

    #[test]
    fn test_substring_and_exact_rules() {
        let notepad = WindowInfo::new("Untitled - Notepad".to_string());
        let notepad_pp = WindowInfo::new("Notepad++".to_string());

        assert!(notepad.title_contains("Notepad"));
        assert!(notepad_pp.title_contains("Notepad"));
        assert!(!notepad.title_contains("notepad"));

        assert!(!notepad.title_equals("Notepad"));
        assert!(WindowInfo::new("Notepad".to_string()).title_equals("Notepad"));
    }
}
