pub mod callback;
pub mod directory_watcher;
pub mod dispatch_loop;
pub mod hotkey_backend;
pub mod input;
pub mod registration_queue;
pub mod registry;
pub mod reload;
pub mod scheduler;
pub mod script_host;
pub mod timers;
pub mod window_detector;

#[cfg(test)]
pub(crate) mod test_support;

pub use directory_watcher::DirectoryWatcher;
pub use dispatch_loop::DispatchLoop;
pub use hotkey_backend::create_hotkey_backend;
pub use input::create_input_device;
pub use scheduler::Scheduler;
pub use script_host::ScriptHost;
pub use window_detector::create_window_manager;
