//! Hover reader: the OCR stabilization loop that turns noisy per-cycle
//! recognition into a single coherent utterance.

mod loop_worker;
mod stabilizer;

pub use loop_worker::reader_loop;
pub use stabilizer::TextStabilizer;
