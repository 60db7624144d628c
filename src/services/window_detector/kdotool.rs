use crate::error::{AhkError, Result};
use crate::events::WindowInfo;
use crate::utils::{exact_pattern, run_tool};
use std::collections::HashMap;
use std::process::Command;
use tracing::debug;

pub struct KdotoolDetector;

fn build_env_overrides() -> HashMap<String, String> {
    let mut env_vars = HashMap::new();

    if std::env::var("USER").unwrap_or_default() == "root" {
        if let Ok(sudo_user) = std::env::var("SUDO_USER") {
            if let Ok(output) = Command::new("id").args(["-u", &sudo_user]).output() {
                if let Ok(uid_str) = String::from_utf8(output.stdout) {
                    let uid = uid_str.trim();
                    let user_runtime_dir = format!("/run/user/{}", uid);
                    let dbus_address = format!("unix:path={}/bus", user_runtime_dir);

                    debug!("Подставляем переменные окружения для пользователя {}: uid={}", sudo_user, uid);
                    env_vars.insert("DBUS_SESSION_BUS_ADDRESS".to_string(), dbus_address);
                    env_vars.insert("XDG_RUNTIME_DIR".to_string(), user_runtime_dir);
                    env_vars.insert("USER".to_string(), sudo_user);
                }
            }
        }
    }

    if let Ok(display_var) = std::env::var("DISPLAY") {
        env_vars.insert("DISPLAY".to_string(), display_var);
    }

    env_vars
}

impl KdotoolDetector {
    pub fn new() -> Self {
        Self
    }

    fn create_command(args: &[&str]) -> Command {
        let mut cmd = if let Ok(sudo_user) = std::env::var("SUDO_USER") {
            let mut cmd = Command::new("sudo");
            cmd.args(["-E", "-u", &sudo_user, "kdotool"]);
            cmd.args(args);
            cmd
        } else {
            let mut cmd = Command::new("kdotool");
            cmd.args(args);
            cmd
        };

        for (key, value) in build_env_overrides() {
            cmd.env(key, value);
        }

        cmd
    }

    pub fn test(&self) -> Result<()> {
        debug!("=== Тестируем kdotool ===");
        let window_id = run_tool(&mut Self::create_command(&["getactivewindow"]), "kdotool")?;
        run_tool(&mut Self::create_command(&["getwindowname", &window_id]), "kdotool")?;
        debug!("=== kdotool работает ===");
        Ok(())
    }

    pub fn get_active_window(&self) -> Result<WindowInfo> {
        let window_id = run_tool(&mut Self::create_command(&["getactivewindow"]), "kdotool")?;
        let title = run_tool(&mut Self::create_command(&["getwindowname", &window_id]), "kdotool")?;
        if title.is_empty() {
            return Err(AhkError::Internal("kdotool вернул пустое название".to_string()));
        }

        Ok(WindowInfo::new(title).with_class("KDE".to_string()))
    }

    pub fn activate_by_title(&self, title: &str) -> Result<()> {
        self.search_and_activate("--name", title)
    }

    pub fn activate_by_class(&self, class: &str) -> Result<()> {
        self.search_and_activate("--class", class)
    }

    fn search_and_activate(&self, field: &str, value: &str) -> Result<()> {
        let pattern = exact_pattern(value);
        let ids = run_tool(&mut Self::create_command(&["search", field, &pattern]), "kdotool")?;
        let window_id = ids
            .lines()
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AhkError::WindowNotFound(value.to_string()))?;

        run_tool(&mut Self::create_command(&["windowactivate", window_id]), "kdotool").map(|_| ())
    }
}
