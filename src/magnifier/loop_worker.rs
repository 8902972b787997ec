use std::thread;
use std::time::Instant;

use anyhow::Result;
use image::imageops::FilterType;
use image::RgbaImage;

use crate::capture::{FrameSource, Region};
use crate::config::MagnifierConfig;

use super::command::MagnifierControls;
use super::overlay::OverlayWindow;

// Set to false to silence per-tick logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Fixed-cadence render loop: capture around the cursor, scale by the current
/// zoom factor, and redraw the overlay centered on the cursor.
///
/// Runs on the thread that owns the overlay window. A failed tick is logged
/// and skipped; the next scheduled tick proceeds normally. The loop ends when
/// the running flag clears (exit command) or the overlay is closed, releasing
/// the window on return.
pub fn render_loop(
    source: &dyn FrameSource,
    controls: &MagnifierControls,
    overlay: &mut OverlayWindow,
    config: &MagnifierConfig,
) {
    let tick = config.tick_interval();
    log_info!(
        "render loop started: {}ms tick, viewport {:?}",
        config.tick_interval_ms,
        config.viewport()
    );

    while controls.is_running() && overlay.is_open() {
        let tick_start = Instant::now();

        if let Some(command) = overlay.zoom_key() {
            controls.apply(command);
        }

        match render_tick(source, controls.scale(), overlay, config) {
            Ok(()) => {}
            Err(err) => log_warn!("render tick skipped: {err:#}"),
        }

        if let Some(remaining) = tick.checked_sub(tick_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    log_info!("render loop stopped");
}

fn render_tick(
    source: &dyn FrameSource,
    scale: f32,
    overlay: &mut OverlayWindow,
    config: &MagnifierConfig,
) -> Result<()> {
    let cursor = source.cursor_position()?;
    let (screen_width, screen_height) = source.screen_size();
    let (viewport_w, viewport_h) = config.viewport();

    let region = Region::centered(cursor, viewport_w, viewport_h, screen_width, screen_height);
    let frame = source.capture(&region)?;
    let view = magnify(&frame, scale, viewport_w, viewport_h);
    overlay.present(&view, cursor)
}

/// Scale the captured frame by `scale` and cut the viewport-sized window out
/// of its center, so the magnified view stays centered on the cursor.
fn magnify(frame: &RgbaImage, scale: f32, viewport_w: u32, viewport_h: u32) -> RgbaImage {
    let scaled_w = ((frame.width() as f32) * scale).round().max(1.0) as u32;
    let scaled_h = ((frame.height() as f32) * scale).round().max(1.0) as u32;
    let scaled = image::imageops::resize(frame, scaled_w, scaled_h, FilterType::Nearest);

    let crop_w = viewport_w.min(scaled_w);
    let crop_h = viewport_h.min(scaled_h);
    let x0 = (scaled_w - crop_w) / 2;
    let y0 = (scaled_h - crop_h) / 2;
    image::imageops::crop_imm(&scaled, x0, y0, crop_w, crop_h).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn magnified_view_matches_the_viewport() {
        let frame = RgbaImage::new(400, 300);
        let view = magnify(&frame, 2.5, 400, 300);
        assert_eq!(view.dimensions(), (400, 300));
    }

    #[test]
    fn edge_shrunk_capture_yields_a_smaller_view() {
        // Near a screen corner the clamped region is smaller than the
        // viewport; the magnified cut can then be at most scale * capture.
        let frame = RgbaImage::new(100, 60);
        let view = magnify(&frame, 2.5, 400, 300);
        assert_eq!(view.dimensions(), (250, 150));
    }

    #[test]
    fn view_center_tracks_the_frame_center() {
        let mut frame = RgbaImage::from_pixel(400, 300, Rgba([0, 0, 0, 255]));
        for y in 148..153 {
            for x in 198..203 {
                frame.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }

        for scale in [2.5, 3.3, 5.0] {
            let view = magnify(&frame, scale, 400, 300);
            let center = view.get_pixel(view.width() / 2, view.height() / 2);
            assert_eq!(center.0, [255, 0, 0, 255], "scale {scale}");
        }
    }
}
