//! Record post-processing
//!
//! Applied to every extracted record before it is emitted. Post analytics
//! records get their `text` handles obfuscated and a `start_time` stamped.

mod processor;

pub use processor::{obfuscate_text, Processed, ProcessorKind, RecordProcessor, OBFUSCATED};
