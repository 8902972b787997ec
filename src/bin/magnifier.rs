//! Full-window magnifier process.
//!
//! Spawned by the control panel with no arguments (an optional settings file
//! path may be passed as argv[1]). Commands arrive as newline-terminated
//! tokens on stdin: `zoom_in`, `zoom_out`, `exit`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use loupe::capture::ScreenSource;
use loupe::config::Settings;
use loupe::magnifier::{
    render_loop, spawn_command_listener, MagnifierControls, OverlayWindow, ZoomState,
};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load_or_default(settings_path.as_deref());
    let config = settings.magnifier;

    let source = ScreenSource::new().context("cannot acquire screen capture handle")?;

    let controls = Arc::new(MagnifierControls::new(ZoomState::new(
        config.min_scale,
        config.max_scale,
        config.zoom_step,
    )));

    let (viewport_w, viewport_h) = config.viewport();
    let mut overlay = OverlayWindow::new("Loupe", viewport_w, viewport_h)
        .context("cannot create magnifier overlay")?;

    // The listener thread is detached on purpose: stdin EOF ends only the
    // listener, and process exit after the render loop tears it down.
    spawn_command_listener(Arc::clone(&controls))?;

    info!("magnifier running; send zoom_in/zoom_out/exit on stdin");
    render_loop(&source, &controls, &mut overlay, &config);

    Ok(())
}
