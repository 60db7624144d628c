mod dry_run;
mod pointer;
mod virtual_device;
mod r#trait;

pub use self::dry_run::DryRunInput;
pub use self::r#trait::{create_input_device, InputDevice, MouseButton};
