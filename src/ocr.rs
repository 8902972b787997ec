//! Text recognition seam.
//!
//! The loops only require "preprocessed image in, recognized string out";
//! the engine behind that is pluggable. The default engine pipes PNG bytes
//! through the `tesseract` executable, so no native bindings are linked.

use std::io::{Cursor, Write};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use image::GrayImage;

/// A text recognition engine operating on preprocessed images.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<String>;
}

/// OCR via the `tesseract` command-line tool.
///
/// Uses the LSTM engine with uniform-block page segmentation, matching how
/// short cursor-hover captures read best.
pub struct TesseractCli {
    language: String,
}

const TESSERACT_ARGS: [&str; 6] = ["stdin", "stdout", "--oem", "1", "--psm", "6"];

impl TesseractCli {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }

    /// Verify the executable is present and runnable. Called once at startup;
    /// a missing binary is a fatal configuration error, not a per-cycle one.
    pub fn ensure_available(&self) -> Result<()> {
        let output = Command::new("tesseract")
            .arg("--version")
            .output()
            .context("tesseract executable not found on PATH")?;
        if !output.status.success() {
            bail!("tesseract --version exited with {}", output.status);
        }
        Ok(())
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &GrayImage) -> Result<String> {
        let mut png_bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
            .context("PNG encode failed")?;

        let mut child = Command::new("tesseract")
            .args(TESSERACT_ARGS)
            .args(["-l", &self.language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("failed to spawn tesseract")?;

        // Tesseract reads all of stdin before writing output, so a plain
        // write-then-wait cannot deadlock.
        child
            .stdin
            .take()
            .expect("stdin was piped")
            .write_all(&png_bytes)
            .context("failed to stream image to tesseract")?;

        let output = child
            .wait_with_output()
            .context("failed to collect tesseract output")?;
        if !output.status.success() {
            bail!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
