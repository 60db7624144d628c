use crate::error::{AhkError, Result};
use crate::events::WindowInfo;
use crate::utils::{exact_pattern, run_tool};
use std::process::Command;

pub struct SwayDetector;

impl SwayDetector {
    pub fn new() -> Self {
        Self
    }

    fn command(args: &[&str]) -> Command {
        let mut cmd = Command::new("swaymsg");
        cmd.args(args);
        cmd
    }

    pub fn test(&self) -> Result<()> {
        run_tool(&mut Self::command(&["-t", "get_tree"]), "swaymsg").map(|_| ())
    }

    pub fn get_active_window(&self) -> Result<WindowInfo> {
        let tree = run_tool(&mut Self::command(&["-t", "get_tree"]), "swaymsg")?;
        parse_focused_title(&tree)
            .map(WindowInfo::new)
            .ok_or_else(|| AhkError::Internal("Активное окно в Sway не найдено".to_string()))
    }

    pub fn activate_by_title(&self, title: &str) -> Result<()> {
        let criteria = format!("[title=\"{}\"] focus", exact_pattern(title));
        run_tool(&mut Self::command(&[criteria.as_str()]), "swaymsg").map(|_| ())
    }

    pub fn activate_by_class(&self, class: &str) -> Result<()> {
        let criteria = format!("[app_id=\"{}\"] focus", exact_pattern(class));
        run_tool(&mut Self::command(&[criteria.as_str()]), "swaymsg").map(|_| ())
    }
}

fn parse_focused_title(tree: &str) -> Option<String> {
    let start = tree.find("\"focused\":true").or_else(|| tree.find("\"focused\": true"))?;
    let before = &tree[..start];
    let name_start = before.rfind("\"name\":\"").map(|i| i + 8)
        .or_else(|| before.rfind("\"name\": \"").map(|i| i + 9))?;
    let name_part = &before[name_start..];
    let name_end = name_part.find('"')?;
    Some(name_part[..name_end].to_string())
}
