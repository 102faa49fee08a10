mod console;
mod handler;
mod ui;

pub use console::Console;
pub use handler::{parse_choice, MenuAction};
pub use ui::*;
