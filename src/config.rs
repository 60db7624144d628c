use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub script: ScriptConfig,
    pub dispatch: DispatchConfig,
    pub input: InputConfig,
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScriptConfig {
    /// Путь к основному скрипту; отслеживается родительская директория
    pub path: PathBuf,
    /// Как часто хост скрипта проверяет флаг перезагрузки
    pub reload_poll_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Пауза между циклами диспетчера
    pub idle_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub device_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    pub detection_mode: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
            script: ScriptConfig {
                path: PathBuf::from("scripts/main.lua"),
                reload_poll_ms: 100,
            },
            dispatch: DispatchConfig { idle_ms: 10 },
            input: InputConfig {
                device_path: "auto".to_string(),
            },
            window: WindowConfig {
                detection_mode: "auto".to_string(),
            },
        }
    }
}

/// Значения из командной строки, перекрывающие файл и окружение
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub script: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    /// Собрать конфигурацию (умолчания, файл, окружение, командная строка)
    /// и проверить результат
    pub fn load<P: AsRef<Path>>(config_path: P, overrides: ConfigOverrides) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("AHK_").split("__"));

        let mut config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        if let Some(script) = overrides.script {
            config.script.path = script;
        }
        if let Some(level) = overrides.log_level {
            config.logging.level = level;
        }

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "pretty" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.script.path.as_os_str().is_empty() {
            anyhow::bail!("Путь к скрипту не задан");
        }

        if self.script.reload_poll_ms == 0 {
            anyhow::bail!("reload_poll_ms должно быть больше 0");
        }

        if self.dispatch.idle_ms == 0 || self.dispatch.idle_ms > 1000 {
            anyhow::bail!("idle_ms должно быть в диапазоне 1..=1000");
        }

        match self.window.detection_mode.as_str() {
            "auto" | "kdotool" | "xdotool" | "wmctrl" | "sway" => {}
            _ => anyhow::bail!(
                "Неверный режим детекции окон: {}",
                self.window.detection_mode
            ),
        }

        Ok(())
    }

    /// Директория, за которой следит горячая перезагрузка
    pub fn script_dir(&self) -> PathBuf {
        match self.script.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.dispatch.idle_ms)
    }

    pub fn reload_poll_interval(&self) -> Duration {
        Duration::from_millis(self.script.reload_poll_ms)
    }
}
