use anyhow::{Context, Result};
use image::RgbaImage;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use super::command::Command;

/// Always-on-top, borderless, semi-transparent preview window that follows
/// the cursor. Scoped acquisition: dropping the overlay releases the window.
pub struct OverlayWindow {
    window: Window,
    width: usize,
    height: usize,
}

impl OverlayWindow {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let window = Window::new(
            title,
            width as usize,
            height as usize,
            WindowOptions {
                borderless: true,
                title: false,
                topmost: true,
                transparency: true,
                ..WindowOptions::default()
            },
        )
        .context("cannot create overlay window")?;

        Ok(Self {
            window,
            width: width as usize,
            height: height as usize,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Ctrl+Up / Ctrl+Down on the overlay mirror the channel's zoom commands.
    pub fn zoom_key(&self) -> Option<Command> {
        let ctrl =
            self.window.is_key_down(Key::LeftCtrl) || self.window.is_key_down(Key::RightCtrl);
        if !ctrl {
            return None;
        }
        if self.window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            return Some(Command::ZoomIn);
        }
        if self.window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            return Some(Command::ZoomOut);
        }
        None
    }

    /// Redraw with `frame` and move the window so its center sits on `center`.
    pub fn present(&mut self, frame: &RgbaImage, center: (i32, i32)) -> Result<()> {
        self.window.set_position(
            center.0 as isize - (self.width / 2) as isize,
            center.1 as isize - (self.height / 2) as isize,
        );

        let buffer: Vec<u32> = frame
            .pixels()
            .map(|p| {
                let [r, g, b, _] = p.0;
                ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        self.window
            .update_with_buffer(&buffer, frame.width() as usize, frame.height() as usize)
            .context("overlay redraw failed")
    }
}
