/// A capture rectangle in screen pixel coordinates.
///
/// Always within monitor bounds: `left + width <= screen_width` and
/// `top + height <= screen_height`. A region may end up empty when the
/// cursor sits outside the monitor; callers treat that as a skipped tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Compute the capture window of size `width` x `height` centered on the
    /// cursor, clamped to the monitor. Each axis clamps independently: near an
    /// edge the window keeps its size and shifts inward, and a window larger
    /// than the monitor collapses to the full monitor extent on that axis.
    pub fn centered(
        cursor: (i32, i32),
        width: u32,
        height: u32,
        screen_width: u32,
        screen_height: u32,
    ) -> Region {
        let (x, y) = cursor;

        let left = (x - (width / 2) as i32).max(0) as u32;
        let top = (y - (height / 2) as i32).max(0) as u32;

        let left = left.min(screen_width);
        let top = top.min(screen_height);

        Region {
            left,
            top,
            width: width.min(screen_width - left),
            height: height.min(screen_height - top),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN_W: u32 = 1920;
    const SCREEN_H: u32 = 1080;

    fn in_bounds(region: &Region) {
        assert!(region.left + region.width <= SCREEN_W);
        assert!(region.top + region.height <= SCREEN_H);
    }

    #[test]
    fn centered_on_mid_screen_keeps_full_extent() {
        let region = Region::centered((960, 540), 600, 250, SCREEN_W, SCREEN_H);
        assert_eq!(
            region,
            Region {
                left: 660,
                top: 415,
                width: 600,
                height: 250,
            }
        );
    }

    #[test]
    fn cursor_at_origin_pins_to_top_left() {
        let region = Region::centered((0, 0), 600, 250, SCREEN_W, SCREEN_H);
        assert_eq!(region.left, 0);
        assert_eq!(region.top, 0);
        assert_eq!(region.width, 600);
        assert_eq!(region.height, 250);
        in_bounds(&region);
    }

    #[test]
    fn cursor_at_bottom_right_shrinks_extent() {
        let region = Region::centered(
            (SCREEN_W as i32 - 1, SCREEN_H as i32 - 1),
            600,
            250,
            SCREEN_W,
            SCREEN_H,
        );
        in_bounds(&region);
        assert!(region.width < 600);
        assert!(region.height < 250);
    }

    #[test]
    fn oversized_extent_clamps_to_full_screen_per_axis() {
        let region = Region::centered((0, 0), 4000, 200, SCREEN_W, SCREEN_H);
        assert_eq!(region.left, 0);
        assert_eq!(region.width, SCREEN_W);
        assert_eq!(region.height, 200);
        in_bounds(&region);
    }

    #[test]
    fn every_cursor_position_stays_in_bounds() {
        for x in [-500, 0, 13, 960, 1919, 1920, 5000] {
            for y in [-500, 0, 7, 540, 1079, 1080, 5000] {
                let region = Region::centered((x, y), 400, 300, SCREEN_W, SCREEN_H);
                in_bounds(&region);
            }
        }
    }

    #[test]
    fn cursor_past_right_edge_yields_empty_region() {
        let region = Region::centered((SCREEN_W as i32 + 400, 540), 400, 300, SCREEN_W, SCREEN_H);
        assert!(region.is_empty());
        in_bounds(&region);
    }
}
