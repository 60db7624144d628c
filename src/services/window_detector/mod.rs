//! WindowDetector service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for querying the active window
//! title and activating windows by title or class. It MUST NOT decide whether a hotkey
//! or timer fires; filter rules live in the dispatch loop.

mod dry_run;
mod kdotool;
mod sway;
mod window_detector;
mod wmctrl;
mod xdotool;
mod r#trait;

pub use self::dry_run::DryRunWindowManager;
pub use self::r#trait::{create_window_manager, WindowManager};
pub use self::window_detector::DesktopWindowManager;
