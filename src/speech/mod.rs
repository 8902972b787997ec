//! Speech synthesis seam.
//!
//! Narration is deliberately synchronous: `say` returns only once the
//! utterance has been spoken, which is what lets the reader loop hold off
//! further captures while speech is in progress. The platform TTS handle is
//! not `Send` everywhere, so a dedicated thread owns it and callers talk to
//! that thread over a channel.

use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use tts::Tts;

use crate::config::SpeechConfig;

/// Anything that can narrate text, blocking until spoken or queued.
pub trait SpeechSink: Send + Sync {
    fn say(&self, text: &str) -> Result<()>;
}

enum SpeechCommand {
    Say {
        text: String,
        done: Sender<Result<(), String>>,
    },
}

/// Handle to the speech thread. Dropping the handle ends the thread once the
/// current utterance finishes.
pub struct SpeechEngine {
    tx: Mutex<Sender<SpeechCommand>>,
}

// Rates in the platform TTS APIs are unitless floats around `normal_rate`;
// treat normal as roughly this many words per minute to map the configured
// rate onto the platform scale.
const NOMINAL_WPM: f32 = 180.0;

const SPEECH_POLL: Duration = Duration::from_millis(25);

impl SpeechEngine {
    /// Spawn the speech thread, pick the first available voice, and apply the
    /// configured rate. Fails if the platform TTS backend cannot be opened.
    pub fn spawn(config: &SpeechConfig) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<SpeechCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), String>>();
        let rate_wpm = config.rate_wpm;

        thread::Builder::new()
            .name("speech-engine".to_string())
            .spawn(move || {
                let mut tts = match Tts::default() {
                    Ok(tts) => tts,
                    Err(err) => {
                        let _ = init_tx.send(Err(err.to_string()));
                        return;
                    }
                };

                match tts.voices() {
                    Ok(voices) if !voices.is_empty() => {
                        if let Err(err) = tts.set_voice(&voices[0]) {
                            warn!("could not select voice {}: {}", voices[0].name(), err);
                        } else {
                            info!("using voice: {}", voices[0].name());
                        }
                    }
                    Ok(_) => warn!("no voices reported; using platform default"),
                    Err(err) => warn!("voice enumeration failed: {}", err),
                }

                let rate = (tts.normal_rate() * (rate_wpm / NOMINAL_WPM))
                    .clamp(tts.min_rate(), tts.max_rate());
                if let Err(err) = tts.set_rate(rate) {
                    warn!("could not set speech rate: {}", err);
                }

                let _ = init_tx.send(Ok(()));

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        SpeechCommand::Say { text, done } => {
                            let result = speak_blocking(&mut tts, &text);
                            let _ = done.send(result.map_err(|err| err.to_string()));
                        }
                    }
                }
            })
            .context("failed to spawn speech thread")?;

        init_rx
            .recv()
            .context("speech thread exited before reporting readiness")?
            .map_err(|err| anyhow!("text-to-speech init failed: {err}"))?;

        Ok(Self { tx: Mutex::new(tx) })
    }
}

impl SpeechSink for SpeechEngine {
    fn say(&self, text: &str) -> Result<()> {
        let (done_tx, done_rx) = mpsc::channel();
        self.tx
            .lock()
            .unwrap()
            .send(SpeechCommand::Say {
                text: text.to_string(),
                done: done_tx,
            })
            .map_err(|_| anyhow!("speech thread is gone"))?;
        done_rx
            .recv()
            .context("speech thread dropped the utterance")?
            .map_err(|err| anyhow!("narration failed: {err}"))
    }
}

fn speak_blocking(tts: &mut Tts, text: &str) -> Result<(), tts::Error> {
    tts.speak(text, false)?;
    loop {
        if !tts.is_speaking()? {
            return Ok(());
        }
        thread::sleep(SPEECH_POLL);
    }
}
