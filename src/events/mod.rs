pub mod dispatcher;
pub mod hotkey;
pub mod window;

pub use dispatcher::{EventDispatcher, ON_DIRECTORY_CHANGE};
pub use hotkey::{HotkeyId, ModifierMask, VirtualKey};
pub use window::WindowInfo;
