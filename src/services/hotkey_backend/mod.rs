mod dry_run;
mod evdev_backend;
mod modifier_state;
mod r#trait;

pub use self::dry_run::DryRunHotkeyBackend;
pub use self::evdev_backend::EvdevHotkeyBackend;
pub use self::r#trait::{create_hotkey_backend, HotkeyBackend, TriggeredHotkeys};
