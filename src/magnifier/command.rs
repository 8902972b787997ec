use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};

use super::zoom::ZoomState;

// Set to false to silence listener logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// One token of the line-oriented control protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ZoomIn,
    ZoomOut,
    Exit,
}

impl Command {
    /// Parse one protocol line. Unrecognized tokens map to `None` and are
    /// dropped silently, which keeps the channel forward-compatible.
    pub fn parse(line: &str) -> Option<Command> {
        match line.trim() {
            "zoom_in" => Some(Command::ZoomIn),
            "zoom_out" => Some(Command::ZoomOut),
            "exit" => Some(Command::Exit),
            _ => None,
        }
    }
}

/// Shared control cell between the command listener and the render tick.
///
/// The listener (and the overlay's own zoom keys) write; the render tick
/// reads. ZoomState sits behind a mutex since scale updates are not
/// single-word; the running flag is a plain atomic.
pub struct MagnifierControls {
    zoom: Mutex<ZoomState>,
    running: AtomicBool,
}

impl MagnifierControls {
    pub fn new(zoom: ZoomState) -> Self {
        Self {
            zoom: Mutex::new(zoom),
            running: AtomicBool::new(true),
        }
    }

    pub fn apply(&self, command: Command) {
        match command {
            Command::ZoomIn => self.zoom.lock().unwrap().zoom_in(),
            Command::ZoomOut => self.zoom.lock().unwrap().zoom_out(),
            Command::Exit => self.stop(),
        }
    }

    pub fn scale(&self) -> f32 {
        self.zoom.lock().unwrap().scale()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Listen for newline-terminated command tokens on stdin and post them into
/// the control cell.
///
/// Runs on its own thread so a slow or absent sender never stalls rendering.
/// End-of-stream or a read error ends only the listener; the render loop
/// keeps ticking until an explicit `exit` arrives or the process dies.
pub fn spawn_command_listener(controls: Arc<MagnifierControls>) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("command-listener".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        log_warn!("command channel read failed: {err}");
                        break;
                    }
                };
                match Command::parse(&line) {
                    Some(Command::Exit) => {
                        log_info!("exit command received");
                        controls.stop();
                        break;
                    }
                    Some(command) => controls.apply(command),
                    None => {}
                }
            }
            log_info!("command listener stopped");
        })
        .context("failed to spawn command listener thread")
}
