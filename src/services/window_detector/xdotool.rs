use crate::error::Result;
use crate::events::WindowInfo;
use crate::utils::{exact_pattern, run_tool};
use std::process::Command;
use tracing::debug;

pub struct XdotoolDetector;

impl XdotoolDetector {
    pub fn new() -> Self {
        Self
    }

    fn command(args: &[&str]) -> Command {
        let mut cmd = Command::new("xdotool");
        cmd.args(args);
        cmd
    }

    pub fn test(&self) -> Result<()> {
        run_tool(&mut Self::command(&["getactivewindow", "getwindowname"]), "xdotool").map(|_| ())
    }

    pub fn get_active_window(&self) -> Result<WindowInfo> {
        debug!("Попытка получить активное окно через xdotool");
        let title = run_tool(&mut Self::command(&["getactivewindow", "getwindowname"]), "xdotool")?;
        debug!("xdotool получил заголовок окна: '{}'", title);

        let class = run_tool(&mut Self::command(&["getactivewindow", "getwindowclassname"]), "xdotool")
            .unwrap_or_else(|_| {
                debug!("Не удалось получить класс окна");
                "Unknown".to_string()
            });

        Ok(WindowInfo::new(title).with_class(class))
    }

    pub fn activate_by_title(&self, title: &str) -> Result<()> {
        let pattern = exact_pattern(title);
        run_tool(
            &mut Self::command(&["search", "--limit", "1", "--name", &pattern, "windowactivate"]),
            "xdotool",
        )
        .map(|_| ())
    }

    pub fn activate_by_class(&self, class: &str) -> Result<()> {
        let pattern = exact_pattern(class);
        run_tool(
            &mut Self::command(&["search", "--limit", "1", "--class", &pattern, "windowactivate"]),
            "xdotool",
        )
        .map(|_| ())
    }
}
