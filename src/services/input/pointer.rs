use crate::error::{AhkError, Result};
use crate::utils::run_tool;
use std::process::Command;

/// Положение и перемещение курсора через xdotool
pub struct XdotoolPointer;

impl XdotoolPointer {
    pub fn new() -> Self {
        Self
    }

    pub fn move_to(&self, x: i32, y: i32) -> Result<()> {
        run_tool(
            Command::new("xdotool")
                .arg("mousemove")
                .arg(x.to_string())
                .arg(y.to_string()),
            "xdotool",
        )?;
        Ok(())
    }

    pub fn position(&self) -> Result<(i32, i32)> {
        let output = run_tool(
            Command::new("xdotool").arg("getmouselocation").arg("--shell"),
            "xdotool",
        )?;
        parse_mouse_location(&output)
    }
}

/// Разбор вывода `xdotool getmouselocation --shell` (строки вида `X=10`)
fn parse_mouse_location(output: &str) -> Result<(i32, i32)> {
    let mut x = None;
    let mut y = None;

    for line in output.lines() {
        match line.split_once('=') {
            Some(("X", value)) => x = value.trim().parse().ok(),
            Some(("Y", value)) => y = value.trim().parse().ok(),
            _ => {}
        }
    }

    match (x, y) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(AhkError::Internal(format!(
            "Не удалось разобрать положение курсора: {:?}",
            output
        ))),
    }
}
