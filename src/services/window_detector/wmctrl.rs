use crate::error::{AhkError, Result};
use crate::events::WindowInfo;
use crate::utils::run_tool;
use std::process::Command;

pub struct WmctrlDetector;

impl WmctrlDetector {
    pub fn new() -> Self {
        Self
    }

    fn command(args: &[&str]) -> Command {
        let mut cmd = Command::new("wmctrl");
        cmd.args(args);
        cmd
    }

    pub fn test(&self) -> Result<()> {
        run_tool(&mut Self::command(&["-l"]), "wmctrl").map(|_| ())
    }

    pub fn get_active_window(&self) -> Result<WindowInfo> {
        // wmctrl не показывает активное окно в списке, поэтому сначала узнаём его id
        let output = Self::command(&["-v", "-a", ":ACTIVE:"])
            .output()
            .map_err(|e| AhkError::ServiceUnavailable(format!("wmctrl не найден: {}", e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let window_id = stderr
            .lines()
            .find_map(|line| line.strip_prefix("Using window: "))
            .map(|id| id.trim().to_string())
            .ok_or_else(|| AhkError::Internal("wmctrl не сообщил активное окно".to_string()))?;

        let list = run_tool(&mut Self::command(&["-l"]), "wmctrl")?;
        parse_window_title(&list, &window_id)
            .map(WindowInfo::new)
            .ok_or_else(|| AhkError::Internal("Активное окно не найдено".to_string()))
    }

    pub fn activate_by_title(&self, title: &str) -> Result<()> {
        run_tool(&mut Self::command(&["-F", "-a", title]), "wmctrl").map(|_| ())
    }

    pub fn activate_by_class(&self, class: &str) -> Result<()> {
        run_tool(&mut Self::command(&["-x", "-a", class]), "wmctrl").map(|_| ())
    }
}

/// Найти заголовок окна с данным id в выводе `wmctrl -l`
fn parse_window_title(list: &str, window_id: &str) -> Option<String> {
    let wanted = u64::from_str_radix(window_id.trim_start_matches("0x"), 16).ok()?;

    list.lines().find_map(|line| {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let id = u64::from_str_radix(parts.first()?.trim_start_matches("0x"), 16).ok()?;
        if id == wanted && parts.len() > 3 {
            Some(parts[3..].join(" "))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_title() {
        let list = "0x03a00003  0 host Terminal\n0x04200007  0 host Untitled - Notepad\n";

        assert_eq!(
            parse_window_title(list, "0x4200007"),
            Some("Untitled - Notepad".to_string())
        );
        assert_eq!(parse_window_title(list, "0x0badf00d"), None);
    }
}
