//! Cursor-following magnifier: render loop, zoom state, overlay window, and
//! the stdin command channel that drives them.

mod command;
mod loop_worker;
mod overlay;
mod zoom;

pub use command::{spawn_command_listener, Command, MagnifierControls};
pub use loop_worker::render_loop;
pub use overlay::OverlayWindow;
pub use zoom::ZoomState;
