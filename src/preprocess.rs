//! OCR image preprocessing.
//!
//! Stage order matters: blur runs before thresholding so speckle noise does
//! not get amplified into broken glyphs by Otsu's method, and dilation runs
//! after thresholding to reconnect character strokes the binarization split.

use image::{GrayImage, RgbaImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;

const BLUR_SIGMA: f32 = 0.8;
const DILATE_RADIUS: u8 = 1;

/// Turn a raw region capture into a binarized, denoised image suitable for
/// text recognition: grayscale, Gaussian blur, Otsu threshold, dilation.
pub fn prepare_for_ocr(frame: &RgbaImage) -> GrayImage {
    let gray = image::imageops::grayscale(frame);
    let blurred = gaussian_blur_f32(&gray, BLUR_SIGMA);
    let level = otsu_level(&blurred);
    let binary = threshold(&blurred, level, ThresholdType::Binary);
    dilate(&binary, Norm::LInf, DILATE_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn text_like_frame() -> RgbaImage {
        // White background with a dark block, like a glyph on a page.
        let mut frame = RgbaImage::from_pixel(64, 32, Rgba([245, 245, 245, 255]));
        for y in 10..22 {
            for x in 20..44 {
                frame.put_pixel(x, y, Rgba([20, 20, 20, 255]));
            }
        }
        frame
    }

    #[test]
    fn output_is_strictly_binary() {
        let processed = prepare_for_ocr(&text_like_frame());
        assert!(processed.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn output_keeps_input_dimensions() {
        let frame = text_like_frame();
        let processed = prepare_for_ocr(&frame);
        assert_eq!(processed.dimensions(), frame.dimensions());
    }

    #[test]
    fn dark_ink_separates_from_light_background() {
        let processed = prepare_for_ocr(&text_like_frame());
        // Center of the block stays one class, far background the other.
        assert_ne!(processed.get_pixel(32, 16), processed.get_pixel(2, 2));
    }
}
