//! Text helpers shared by the controllers and the terminal shell.

mod text;

pub use text::{clean_field, strip_control_chars, truncate_to_width};
