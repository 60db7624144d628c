use crate::error::{AhkError, Result};
use crate::events::WindowInfo;
use parking_lot::RwLock;
use std::process::Command;
use tracing::{error, info, warn};

use super::kdotool::KdotoolDetector;
use super::r#trait::WindowManager;
use super::sway::SwayDetector;
use super::wmctrl::WmctrlDetector;
use super::xdotool::XdotoolDetector;

#[derive(Debug, Clone, Copy)]
enum DesktopEnvironment {
    KDE,
    GNOME,
    X11Generic,
    WaylandGeneric,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkingMethod {
    Kdotool,
    Xdotool,
    Wmctrl,
    Sway,
}

/// Окна рабочего стола через внешние утилиты (kdotool, xdotool, wmctrl, swaymsg)
pub struct DesktopWindowManager {
    desktop_env: DesktopEnvironment,
    working_method: RwLock<Option<WorkingMethod>>,
    // Детекторы утилит
    kdotool: KdotoolDetector,
    xdotool: XdotoolDetector,
    wmctrl: WmctrlDetector,
    sway: SwayDetector,
}

impl DesktopWindowManager {
    pub fn new(detection_mode: &str) -> Result<Self> {
        info!("Инициализация DesktopWindowManager");

        let desktop_env = Self::detect_desktop_environment();
        info!("Обнаружена среда рабочего стола: {:?}", desktop_env);

        let manager = Self {
            desktop_env,
            working_method: RwLock::new(None),
            kdotool: KdotoolDetector::new(),
            xdotool: XdotoolDetector::new(),
            wmctrl: WmctrlDetector::new(),
            sway: SwayDetector::new(),
        };

        let method = match detection_mode {
            "auto" => manager.detect_working_method().ok(),
            "kdotool" => Some(WorkingMethod::Kdotool),
            "xdotool" => Some(WorkingMethod::Xdotool),
            "wmctrl" => Some(WorkingMethod::Wmctrl),
            "sway" => Some(WorkingMethod::Sway),
            other => {
                return Err(AhkError::Internal(format!(
                    "Неизвестный режим детекции: {}",
                    other
                )))
            }
        };

        match method {
            Some(method) => info!("Метод работы с окнами: {:?}", method),
            None => warn!("Ни один метод детекции окон пока не работает, повторим при первом запросе"),
        }
        *manager.working_method.write() = method;

        Ok(manager)
    }

    fn detect_desktop_environment() -> DesktopEnvironment {
        if let Ok(desktop) = std::env::var("XDG_CURRENT_DESKTOP") {
            match desktop.to_lowercase().as_str() {
                d if d.contains("kde") => return DesktopEnvironment::KDE,
                d if d.contains("gnome") => return DesktopEnvironment::GNOME,
                _ => {}
            }
        }

        if let Ok(session) = std::env::var("XDG_SESSION_TYPE") {
            match session.as_str() {
                "wayland" => return DesktopEnvironment::WaylandGeneric,
                "x11" => return DesktopEnvironment::X11Generic,
                _ => {}
            }
        }

        if let Ok(output) = Command::new("pgrep").arg("-f").arg("kwin").output() {
            if !output.stdout.is_empty() {
                return DesktopEnvironment::KDE;
            }
        }

        DesktopEnvironment::Unknown
    }

    /// Порядок проверки утилит зависит от среды рабочего стола
    fn candidate_methods(&self) -> &'static [WorkingMethod] {
        match self.desktop_env {
            DesktopEnvironment::KDE => &[
                WorkingMethod::Kdotool,
                WorkingMethod::Xdotool,
                WorkingMethod::Wmctrl,
            ],
            DesktopEnvironment::WaylandGeneric => &[
                WorkingMethod::Sway,
                WorkingMethod::Kdotool,
                WorkingMethod::Xdotool,
            ],
            DesktopEnvironment::GNOME
            | DesktopEnvironment::X11Generic
            | DesktopEnvironment::Unknown => &[
                WorkingMethod::Xdotool,
                WorkingMethod::Wmctrl,
                WorkingMethod::Kdotool,
                WorkingMethod::Sway,
            ],
        }
    }

    fn detect_working_method(&self) -> Result<WorkingMethod> {
        info!("Определяем рабочий метод детекции окон...");

        for method in self.candidate_methods() {
            let result = match method {
                WorkingMethod::Kdotool => self.kdotool.test(),
                WorkingMethod::Xdotool => self.xdotool.test(),
                WorkingMethod::Wmctrl => self.wmctrl.test(),
                WorkingMethod::Sway => self.sway.test(),
            };
            if result.is_ok() {
                info!("Используем {:?}", method);
                return Ok(*method);
            }
        }

        Err(AhkError::ServiceUnavailable("Ни один метод детекции окон не работает".to_string()))
    }

    fn current_method(&self) -> Result<WorkingMethod> {
        if let Some(method) = *self.working_method.read() {
            return Ok(method);
        }

        let method = self.detect_working_method()?;
        *self.working_method.write() = Some(method);
        Ok(method)
    }

    fn get_window_by_method(&self, method: WorkingMethod) -> Result<WindowInfo> {
        match method {
            WorkingMethod::Kdotool => self.kdotool.get_active_window(),
            WorkingMethod::Xdotool => self.xdotool.get_active_window(),
            WorkingMethod::Wmctrl => self.wmctrl.get_active_window(),
            WorkingMethod::Sway => self.sway.get_active_window(),
        }
    }

    fn activate_by_title(&self, method: WorkingMethod, title: &str) -> Result<()> {
        match method {
            WorkingMethod::Kdotool => self.kdotool.activate_by_title(title),
            WorkingMethod::Xdotool => self.xdotool.activate_by_title(title),
            WorkingMethod::Wmctrl => self.wmctrl.activate_by_title(title),
            WorkingMethod::Sway => self.sway.activate_by_title(title),
        }
    }

    fn activate_by_class(&self, method: WorkingMethod, class: &str) -> Result<()> {
        match method {
            WorkingMethod::Kdotool => self.kdotool.activate_by_class(class),
            WorkingMethod::Xdotool => self.xdotool.activate_by_class(class),
            WorkingMethod::Wmctrl => self.wmctrl.activate_by_class(class),
            WorkingMethod::Sway => self.sway.activate_by_class(class),
        }
    }
}

impl WindowManager for DesktopWindowManager {
    fn active_window(&self) -> Result<WindowInfo> {
        let method = self.current_method()?;

        match self.get_window_by_method(method) {
            Ok(window) => Ok(window),
            Err(e) => {
                warn!("Рабочий метод {:?} перестал работать: {}. Переопределяем...", method, e);
                *self.working_method.write() = None;
                let method = self.current_method()?;
                self.get_window_by_method(method)
            }
        }
    }

    fn focus(&self, title: &str) -> Result<()> {
        let method = self.current_method()?;

        if let Err(e) = self.activate_by_title(method, title) {
            error!("Окно не найдено по заголовку: {} ({})", title, e);

            if let Err(e) = self.activate_by_class(method, title) {
                error!("Окно не найдено по классу: {} ({})", title, e);
                return Err(AhkError::WindowNotFound(title.to_string()));
            }
        }

        info!("Фокус переведён на окно: {}", title);
        Ok(())
    }
}

impl Drop for DesktopWindowManager {
    fn drop(&mut self) {
        info!("DesktopWindowManager завершает работу");
    }
}
