//! Screen capture domain: cursor-centered capture rectangles and the
//! frame source abstraction over the platform screen/input APIs.

mod region;
mod screen;

pub use region::Region;
pub use screen::ScreenSource;

use anyhow::Result;
use image::RgbaImage;

/// One tick's worth of perception input: where the cursor is and what the
/// screen looks like around it. Both loops consume this seam, and tests
/// substitute it to drive the loops without a display.
pub trait FrameSource: Send + Sync {
    fn screen_size(&self) -> (u32, u32);

    fn cursor_position(&self) -> Result<(i32, i32)>;

    /// Capture `region` as a fresh pixel buffer. The buffer belongs to the
    /// calling tick; it is never reused across iterations.
    fn capture(&self, region: &Region) -> Result<RgbaImage>;
}
