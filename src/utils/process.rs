use crate::error::{AhkError, Result};
use std::process::Command;
use tracing::debug;

/// Выполнить внешнюю утилиту и вернуть её stdout без пробелов по краям
pub fn run_tool(command: &mut Command, tool: &str) -> Result<String> {
    let output = command.output().map_err(|e| {
        debug!("{} не найден или не работает: {}", tool, e);
        AhkError::ServiceUnavailable(format!("{} не найден: {}", tool, e))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("{} вернул ошибку: {}", tool, stderr.trim());
        return Err(AhkError::Internal(format!("{} вернул ошибку: {}", tool, stderr.trim())));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Регулярное выражение, совпадающее ровно с `text`
pub fn exact_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('^');
    for c in text.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('$');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_pattern_escapes_metacharacters() {
        assert_eq!(exact_pattern("Notepad"), "^Notepad$");
        assert_eq!(exact_pattern("Notepad++"), "^Notepad\\+\\+$");
        assert_eq!(exact_pattern("a (b)"), "^a \\(b\\)$");
    }

    #[test]
    fn test_missing_tool_is_unavailable() {
        let result = run_tool(&mut Command::new("definitely-not-a-real-tool-ahk"), "fake");
        assert!(matches!(result, Err(AhkError::ServiceUnavailable(_))));
    }
}
