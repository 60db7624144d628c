use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tokio::signal;
use tracing::{error, info, warn};

mod config;
mod error;
mod events;
mod mappings;
mod services;
mod utils;

use config::{Config, ConfigOverrides};
use events::EventDispatcher;
use services::{
    create_hotkey_backend, create_input_device, create_window_manager, DirectoryWatcher,
    DispatchLoop, Scheduler, ScriptHost,
};

#[derive(Parser, Debug)]
#[command(name = "ahk-script")]
#[command(about = "Глобальные хоткеи и таймеры из Lua-скрипта с горячей перезагрузкой")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "ahk.toml")]
    config: String,

    /// Путь к скрипту (перекрывает script.path из конфигурации)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(
        &args.config,
        ConfigOverrides {
            script: args.script,
            log_level: args.log_level,
        },
    )?;

    init_tracing(&config.logging.level, &config.logging.format)?;

    info!("Запуск AHK Script v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    } else {
        utils::permissions::check_permissions()?;
    }

    let scheduler = Arc::new(Scheduler::new());
    let dispatcher = Arc::new(EventDispatcher::new());

    let backend = create_hotkey_backend(&config, args.dry_run)?;
    let windows = create_window_manager(&config, args.dry_run)?;
    let input = create_input_device(args.dry_run)?;

    info!("Все компоненты инициализированы");

    let dispatch = DispatchLoop::new(
        Arc::clone(&scheduler),
        backend,
        Arc::clone(&windows),
        config.idle_interval(),
    );
    thread::Builder::new()
        .name("dispatch".to_string())
        .spawn(move || dispatch.run())?;

    let host = ScriptHost::new(&config, Arc::clone(&scheduler), input, windows);
    host.subscribe_reload(&dispatcher);

    let watcher = DirectoryWatcher::new(config.script_dir(), Arc::clone(&dispatcher));
    thread::Builder::new()
        .name("directory-watch".to_string())
        .spawn(move || watcher.run())?;

    thread::Builder::new()
        .name("script-host".to_string())
        .spawn(move || host.run())?;

    info!("Все сервисы запущены");

    match signal::ctrl_c().await {
        Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
        Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
    }

    info!("AHK Script завершил работу");
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        "pretty" => registry.with(fmt::layer().pretty()).init(),
        _ => registry.with(fmt::layer().compact()).init(),
    }

    Ok(())
}
