//! Segmenters of Chinese runs.
mod max_prob;
mod unknown;

pub use max_prob::MaxProbSegmenter;
pub(crate) use unknown::BmesIds;
pub use unknown::{Bmes, HmmSegmenter};

#[cfg(test)]
pub(crate) use unknown::spans as unknown_spans;
