//! Common settings in Fenci.

use bincode::config::{self, Fixint, LittleEndian};

/// Magic header of a binary model exported by [`Model::write()`](crate::Model::write).
pub const MODEL_MAGIC: &[u8] = b"FenciModel 0.1\n";

/// Maximum number of characters in a dictionary word considered by the DAG.
pub const MAX_WORD_LENGTH: usize = 16;

/// Log-probability substituted for unseen starts, transitions, and emissions.
///
/// It is finite so that sums over long sequences never produce NaN.
pub const SMOOTHING_LOG_PROB: f64 = -3.14e100;

/// Part-of-speech tag returned for words absent from the dictionary.
pub const UNKNOWN_POS: &str = "UNK";

/// Gets the common bincode configuration of serialization.
pub fn bincode_config() -> config::Configuration<LittleEndian, Fixint> {
    config::standard()
        .with_little_endian()
        .with_fixed_int_encoding()
}
