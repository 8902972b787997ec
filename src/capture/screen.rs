use anyhow::{anyhow, bail, Context, Result};
use device_query::{DeviceQuery, DeviceState};
use image::RgbaImage;
use log::info;
use xcap::Monitor;

use super::{FrameSource, Region};

/// Frame source backed by the primary monitor.
///
/// Holds no platform handles between calls: the monitor and the input device
/// are re-opened per capture/query, which keeps the source `Send + Sync` and
/// lets the reader loop run capture on a blocking worker. Startup verifies
/// both handles once so a machine we cannot see fails fast with a clear
/// diagnostic instead of skipping every tick.
pub struct ScreenSource {
    screen_width: u32,
    screen_height: u32,
}

fn primary_monitor() -> Result<Monitor> {
    let monitors = Monitor::all().context("monitor enumeration failed")?;
    let mut first = None;
    for monitor in monitors {
        if monitor.is_primary().unwrap_or(false) {
            return Ok(monitor);
        }
        if first.is_none() {
            first = Some(monitor);
        }
    }
    first.ok_or_else(|| anyhow!("no monitors detected"))
}

impl ScreenSource {
    pub fn new() -> Result<Self> {
        let monitor = primary_monitor()?;
        let screen_width = monitor.width().context("monitor width query failed")?;
        let screen_height = monitor.height().context("monitor height query failed")?;

        // Probe the input device once; per-tick queries reuse the same path.
        DeviceState::checked_new()
            .ok_or_else(|| anyhow!("cannot open input device for cursor tracking"))?;

        info!("screen source ready: {}x{}", screen_width, screen_height);
        Ok(Self {
            screen_width,
            screen_height,
        })
    }
}

impl FrameSource for ScreenSource {
    fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    fn cursor_position(&self) -> Result<(i32, i32)> {
        let device = DeviceState::checked_new()
            .ok_or_else(|| anyhow!("input device unavailable for cursor query"))?;
        Ok(device.get_mouse().coords)
    }

    fn capture(&self, region: &Region) -> Result<RgbaImage> {
        if region.is_empty() {
            bail!("empty capture region {:?}", region);
        }

        let monitor = primary_monitor()?;
        let full = monitor
            .capture_image()
            .context("monitor capture failed")?;

        // Guard against the capture differing from the cached dimensions
        // (resolution change between ticks).
        if region.left + region.width > full.width() || region.top + region.height > full.height()
        {
            bail!(
                "capture region {:?} outside frame {}x{}",
                region,
                full.width(),
                full.height()
            );
        }

        let view =
            image::imageops::crop_imm(&full, region.left, region.top, region.width, region.height);
        Ok(view.to_image())
    }
}
