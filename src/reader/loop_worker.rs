use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::capture::{FrameSource, Region};
use crate::config::ReaderConfig;
use crate::ocr::OcrEngine;
use crate::preprocess::prepare_for_ocr;
use crate::speech::SpeechSink;

use super::stabilizer::TextStabilizer;

// Set to false to silence per-cycle logging in this module
const ENABLE_LOGS: bool = true;

// Import the logging macros (exported at crate root)
use crate::{log_info, log_warn};

/// Fixed-interval hover reader: capture around the cursor, recognize text,
/// and narrate once the reading stabilizes.
///
/// Narration happens inside the cycle, so speech in progress delays the next
/// capture rather than overlapping it. Transient capture or recognition
/// failures skip the cycle and leave the stabilizer untouched.
pub async fn reader_loop(
    source: Arc<dyn FrameSource>,
    engine: Arc<dyn OcrEngine>,
    speech: Arc<dyn SpeechSink>,
    config: ReaderConfig,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(config.cycle_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut stabilizer = TextStabilizer::new(config.min_text_chars, config.stable_reads);

    log_info!(
        "reader loop started: {}ms cycle, {}x{} capture window",
        config.cycle_interval_ms,
        config.capture_width,
        config.capture_height
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match run_cycle(&source, &engine, &speech, &config, &mut stabilizer).await {
                    Ok(()) => {}
                    Err(err) => log_warn!("reader cycle skipped: {err:#}"),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("reader loop shutting down");
                break;
            }
        }
    }
}

async fn run_cycle(
    source: &Arc<dyn FrameSource>,
    engine: &Arc<dyn OcrEngine>,
    speech: &Arc<dyn SpeechSink>,
    config: &ReaderConfig,
    stabilizer: &mut TextStabilizer,
) -> Result<()> {
    let cursor = source.cursor_position()?;
    let (screen_width, screen_height) = source.screen_size();
    let region = Region::centered(
        cursor,
        config.capture_width,
        config.capture_height,
        screen_width,
        screen_height,
    );

    let capture_start = Instant::now();
    let frame = tokio::task::spawn_blocking({
        let source = Arc::clone(source);
        move || source.capture(&region)
    })
    .await
    .context("capture worker join failed")??;
    let capture_ms = capture_start.elapsed().as_millis();

    let processed = tokio::task::spawn_blocking(move || prepare_for_ocr(&frame))
        .await
        .context("preprocess worker join failed")?;

    let ocr_start = Instant::now();
    let recognition = tokio::task::spawn_blocking({
        let engine = Arc::clone(engine);
        move || engine.recognize(&processed)
    });
    // On timeout the blocking worker is left to finish in the background;
    // nothing waits on its result.
    let text = match tokio::time::timeout(config.ocr_timeout(), recognition).await {
        Ok(joined) => joined.context("ocr worker join failed")??,
        Err(_) => bail!(
            "recognition timed out (> {}ms)",
            config.ocr_timeout_ms
        ),
    };
    let ocr_ms = ocr_start.elapsed().as_millis();

    log_info!(
        "cycle at ({},{}): capture {}ms, ocr {}ms, {} chars",
        cursor.0,
        cursor.1,
        capture_ms,
        ocr_ms,
        text.trim().len()
    );

    if let Some(utterance) = stabilizer.observe(&text) {
        log_info!("speaking: {utterance}");
        let speak_start = Instant::now();
        tokio::task::spawn_blocking({
            let speech = Arc::clone(speech);
            move || speech.say(&utterance)
        })
        .await
        .context("speech worker join failed")??;
        log_info!("narration took {}ms", speak_start.elapsed().as_millis());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::sync::Mutex;

    struct FixedFrameSource;

    impl FrameSource for FixedFrameSource {
        fn screen_size(&self) -> (u32, u32) {
            (800, 600)
        }

        fn cursor_position(&self) -> Result<(i32, i32)> {
            Ok((400, 300))
        }

        fn capture(&self, region: &Region) -> Result<RgbaImage> {
            Ok(RgbaImage::new(region.width, region.height))
        }
    }

    struct ScriptedEngine {
        reads: Mutex<Vec<&'static str>>,
    }

    impl OcrEngine for ScriptedEngine {
        fn recognize(&self, _image: &image::GrayImage) -> Result<String> {
            let mut reads = self.reads.lock().unwrap();
            if reads.is_empty() {
                bail!("engine stumbled");
            }
            Ok(reads.remove(0).to_string())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        spoken: Mutex<Vec<String>>,
    }

    impl SpeechSink for RecordingSink {
        fn say(&self, text: &str) -> Result<()> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn test_config() -> ReaderConfig {
        ReaderConfig {
            cycle_interval_ms: 1,
            ..ReaderConfig::default()
        }
    }

    #[tokio::test]
    async fn stable_reads_reach_the_speech_sink() {
        let source: Arc<dyn FrameSource> = Arc::new(FixedFrameSource);
        let engine: Arc<dyn OcrEngine> = Arc::new(ScriptedEngine {
            reads: Mutex::new(vec!["hello world", "hello world", "hello world"]),
        });
        let sink = Arc::new(RecordingSink::default());
        let speech: Arc<dyn SpeechSink> = sink.clone();
        let config = test_config();
        let mut stabilizer = TextStabilizer::new(config.min_text_chars, config.stable_reads);

        for _ in 0..3 {
            run_cycle(&source, &engine, &speech, &config, &mut stabilizer)
                .await
                .unwrap();
        }

        assert_eq!(
            *sink.spoken.lock().unwrap(),
            vec!["hello world hello world hello world".to_string()]
        );
    }

    #[tokio::test]
    async fn engine_failure_skips_the_cycle_without_touching_state() {
        let source: Arc<dyn FrameSource> = Arc::new(FixedFrameSource);
        let engine: Arc<dyn OcrEngine> = Arc::new(ScriptedEngine {
            reads: Mutex::new(vec!["hello world", "hello world"]),
        });
        let sink = Arc::new(RecordingSink::default());
        let speech: Arc<dyn SpeechSink> = sink.clone();
        let config = test_config();
        let mut stabilizer = TextStabilizer::new(config.min_text_chars, config.stable_reads);

        // Two good reads, one engine failure, then the third good read
        // arrives from a fresh engine; the streak must survive the failure.
        run_cycle(&source, &engine, &speech, &config, &mut stabilizer)
            .await
            .unwrap();
        run_cycle(&source, &engine, &speech, &config, &mut stabilizer)
            .await
            .unwrap();
        assert!(run_cycle(&source, &engine, &speech, &config, &mut stabilizer)
            .await
            .is_err());
        assert!(sink.spoken.lock().unwrap().is_empty());

        let engine: Arc<dyn OcrEngine> = Arc::new(ScriptedEngine {
            reads: Mutex::new(vec!["hello world"]),
        });
        run_cycle(&source, &engine, &speech, &config, &mut stabilizer)
            .await
            .unwrap();
        assert_eq!(
            *sink.spoken.lock().unwrap(),
            vec!["hello world hello world hello world".to_string()]
        );
    }
}
