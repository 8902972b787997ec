//! Hover reader process.
//!
//! Standalone loop: capture around the cursor, recognize text, narrate once
//! stable. Takes an optional settings file path as argv[1]. Terminated by
//! Ctrl-C or process kill.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use tokio_util::sync::CancellationToken;

use loupe::capture::{FrameSource, ScreenSource};
use loupe::config::Settings;
use loupe::ocr::{OcrEngine, TesseractCli};
use loupe::reader::reader_loop;
use loupe::speech::{SpeechEngine, SpeechSink};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load_or_default(settings_path.as_deref());

    let source: Arc<dyn FrameSource> =
        Arc::new(ScreenSource::new().context("cannot acquire screen capture handle")?);

    let tesseract = TesseractCli::new(&settings.reader.language);
    tesseract
        .ensure_available()
        .context("text recognition unavailable")?;
    let engine: Arc<dyn OcrEngine> = Arc::new(tesseract);

    let speech: Arc<dyn SpeechSink> = Arc::new(
        SpeechEngine::spawn(&settings.speech).context("cannot initialize text-to-speech")?,
    );

    let cancel_token = CancellationToken::new();
    {
        let cancel_token = cancel_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel_token.cancel();
            }
        });
    }

    info!("reader started; move the cursor over text to hear it");
    reader_loop(source, engine, speech, settings.reader, cancel_token).await;

    Ok(())
}
