pub mod key_table;
pub mod vk_to_evdev;

pub use key_table::{KEY_CONSTANTS, MODIFIER_CONSTANTS};
pub use vk_to_evdev::VirtualKeyToEvdev;
