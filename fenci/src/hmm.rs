//! Hidden Markov model with log-probability tables.
mod builder;
mod viterbi;

use bincode::{
    de::Decoder,
    enc::Encoder,
    error::{DecodeError, EncodeError},
    Decode, Encode,
};
use hashbrown::HashMap;

use crate::common::SMOOTHING_LOG_PROB;

pub use builder::{
    EMIT_LOG_PROB_FILENAME, START_LOG_PROB_FILENAME, STATES_FILENAME, TRANS_LOG_PROB_FILENAME,
};
pub use viterbi::{Observation, Terminals, ViterbiPath};

/// Hidden Markov model over a fixed set of states.
///
/// Starts and transitions are dense tables; emissions are sparse per state.
/// Every missing entry reads as [`SMOOTHING_LOG_PROB`].
#[derive(Decode, Encode)]
pub struct Hmm {
    states: Vec<String>,
    start: Vec<f64>, // indexed by state id
    trans: Vec<f64>, // indexed by from * num_states + to
    emit: Vec<Emissions>,
}

impl Hmm {
    /// Gets the state names in their declared order.
    #[inline(always)]
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Gets the number of states.
    #[inline(always)]
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Gets the id of the state named `name`.
    pub fn state_id(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s == name)
    }

    /// Gets the name of the state `id`.
    #[inline(always)]
    pub fn state_name(&self, id: usize) -> &str {
        &self.states[id]
    }

    /// Gets the start log-probability of state `k`.
    #[inline(always)]
    pub fn start_log_prob(&self, k: usize) -> f64 {
        self.start[k]
    }

    /// Gets the transition log-probability from `k0` to `k`.
    #[inline(always)]
    pub fn trans_log_prob(&self, k0: usize, k: usize) -> f64 {
        debug_assert!(k0 < self.num_states() && k < self.num_states());
        self.trans[k0 * self.num_states() + k]
    }

    /// Gets the log-probability that state `k` emits `symbol`.
    #[inline(always)]
    pub fn emit_log_prob(&self, k: usize, symbol: &str) -> f64 {
        self.emit[k].log_prob(symbol)
    }
}

/// Sparse emission table of one state.
#[derive(Default, Debug, Clone)]
pub(crate) struct Emissions {
    map: HashMap<String, f64>,
}

impl Emissions {
    #[inline(always)]
    pub fn log_prob(&self, symbol: &str) -> f64 {
        self.map.get(symbol).copied().unwrap_or(SMOOTHING_LOG_PROB)
    }

    #[inline(always)]
    pub fn insert(&mut self, symbol: String, log_prob: f64) -> Option<f64> {
        self.map.insert(symbol, log_prob)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

impl Encode for Emissions {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        let mut pairs: Vec<(&String, &f64)> = self.map.iter().collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        let pairs: Vec<(String, f64)> = pairs
            .into_iter()
            .map(|(s, &p)| (s.clone(), p))
            .collect();
        Encode::encode(&pairs, encoder)?;
        Ok(())
    }
}

impl Decode for Emissions {
    fn decode<D: Decoder>(decoder: &mut D) -> Result<Self, DecodeError> {
        let pairs: Vec<(String, f64)> = Decode::decode(decoder)?;
        Ok(Self {
            map: pairs.into_iter().collect(),
        })
    }
}

bincode::impl_borrow_decode!(Emissions);
