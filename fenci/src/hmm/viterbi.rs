use crate::errors::{FenciError, Result};
use crate::hmm::Hmm;

/// Observation that can be looked up in an emission table.
///
/// Characters are used for unknown-word tagging and whole words for POS
/// tagging; both are looked up through their string form.
pub trait Observation {
    /// Calls `f` with the string form of the observation.
    fn with_symbol<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R;
}

impl Observation for char {
    #[inline(always)]
    fn with_symbol<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        let mut buf = [0; 4];
        f(self.encode_utf8(&mut buf))
    }
}

impl Observation for str {
    #[inline(always)]
    fn with_symbol<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        f(self)
    }
}

impl Observation for String {
    #[inline(always)]
    fn with_symbol<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        f(self)
    }
}

impl<T> Observation for &T
where
    T: Observation + ?Sized,
{
    #[inline(always)]
    fn with_symbol<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        (**self).with_symbol(f)
    }
}

/// States allowed at the last time step.
#[derive(Debug, Clone, Copy)]
pub enum Terminals<'s> {
    /// Any state can end the sequence.
    Any,
    /// Only the given state ids can end the sequence.
    Only(&'s [usize]),
}

/// Best state sequence and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ViterbiPath {
    log_prob: f64,
    states: Vec<usize>,
}

impl ViterbiPath {
    /// Gets the cumulative log-probability of the path.
    #[inline(always)]
    pub fn log_prob(&self) -> f64 {
        self.log_prob
    }

    /// Gets the state ids, one per observation.
    #[inline(always)]
    pub fn states(&self) -> &[usize] {
        &self.states
    }

    /// Consumes the path and returns its state ids.
    #[inline(always)]
    pub fn into_states(self) -> Vec<usize> {
        self.states
    }
}

/// Scores and backpointers of one decode call, `len × num_states`.
struct Trellis {
    num_states: usize,
    scores: Vec<f64>,
    backs: Vec<usize>,
}

impl Trellis {
    fn new(len: usize, num_states: usize) -> Self {
        Self {
            num_states,
            scores: vec![0.0; len * num_states],
            backs: vec![0; len * num_states],
        }
    }

    #[inline(always)]
    fn score(&self, t: usize, k: usize) -> f64 {
        self.scores[t * self.num_states + k]
    }

    #[inline(always)]
    fn set(&mut self, t: usize, k: usize, score: f64, back: usize) {
        let idx = t * self.num_states + k;
        self.scores[idx] = score;
        self.backs[idx] = back;
    }

    fn backtrace(&self, last: usize, len: usize) -> Vec<usize> {
        let mut states = vec![0; len];
        let mut k = last;
        for t in (0..len).rev() {
            states[t] = k;
            k = self.backs[t * self.num_states + k];
        }
        states
    }
}

impl Hmm {
    /// Computes the most likely state sequence emitting `obs`.
    ///
    /// Exact ties resolve to the state declared first.
    ///
    /// # Errors
    ///
    /// [`FenciError`] is returned when `obs` is empty, or when `terminals`
    /// names no valid state.
    pub fn viterbi<O>(&self, obs: &[O], terminals: Terminals) -> Result<ViterbiPath>
    where
        O: Observation,
    {
        if obs.is_empty() {
            return Err(FenciError::invalid_argument(
                "obs",
                "observations must not be empty.",
            ));
        }
        self.decode(obs, terminals).ok_or_else(|| {
            FenciError::invalid_argument("terminals", "no valid terminal state is given.")
        })
    }

    pub(crate) fn decode<O>(&self, obs: &[O], terminals: Terminals) -> Option<ViterbiPath>
    where
        O: Observation,
    {
        let len = obs.len();
        let num_states = self.num_states();
        if len == 0 {
            return None;
        }

        let mut trellis = Trellis::new(len, num_states);
        obs[0].with_symbol(|symbol| {
            for k in 0..num_states {
                let score = self.start_log_prob(k) + self.emit_log_prob(k, symbol);
                trellis.set(0, k, score, k);
            }
        });

        for (t, o) in obs.iter().enumerate().skip(1) {
            o.with_symbol(|symbol| {
                for k in 0..num_states {
                    let mut best_score = f64::NEG_INFINITY;
                    let mut best_k0 = 0;
                    for k0 in 0..num_states {
                        let score = trellis.score(t - 1, k0) + self.trans_log_prob(k0, k);
                        if score > best_score {
                            best_score = score;
                            best_k0 = k0;
                        }
                    }
                    trellis.set(t, k, best_score + self.emit_log_prob(k, symbol), best_k0);
                }
            });
        }

        let mut best: Option<(f64, usize)> = None;
        for k in 0..num_states {
            if let Terminals::Only(ids) = terminals {
                if !ids.contains(&k) {
                    continue;
                }
            }
            let score = trellis.score(len - 1, k);
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, k));
            }
        }
        let (log_prob, last) = best?;

        Some(ViterbiPath {
            log_prob,
            states: trellis.backtrace(last, len),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::common::SMOOTHING_LOG_PROB;

    // A toy weather model with two states.
    fn weather() -> Hmm {
        Hmm::from_readers(
            "Rainy Sunny".as_bytes(),
            "Rainy\t-0.5108\nSunny\t-0.9163".as_bytes(),
            "Rainy\tRainy\t-0.3567\nRainy\tSunny\t-1.2040\n\
             Sunny\tRainy\t-0.9163\nSunny\tSunny\t-0.5108"
                .as_bytes(),
            "Rainy\twalk\t-2.3026\nRainy\tshop\t-0.9163\nRainy\tclean\t-0.6931\n\
             Sunny\twalk\t-0.5108\nSunny\tshop\t-1.2040\nSunny\tclean\t-2.3026"
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_weather() {
        let hmm = weather();
        let path = hmm
            .viterbi(&["walk", "shop", "clean"], Terminals::Any)
            .unwrap();
        let names: Vec<_> = path.states().iter().map(|&k| hmm.state_name(k)).collect();
        assert_eq!(names, vec!["Sunny", "Rainy", "Rainy"]);

        let expected = -0.9163 - 0.5108 - 0.9163 - 0.9163 - 0.3567 - 0.6931;
        assert!((path.log_prob() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_terminal_restriction() {
        let hmm = weather();
        let sunny = hmm.state_id("Sunny").unwrap();
        let path = hmm
            .viterbi(&["walk", "shop", "clean"], Terminals::Only(&[sunny]))
            .unwrap();
        assert_eq!(path.states().len(), 3);
        assert_eq!(*path.states().last().unwrap(), sunny);
    }

    #[test]
    fn test_unknown_symbols_use_floor() {
        let hmm = weather();
        let path = hmm.viterbi(&["sleep"], Terminals::Any).unwrap();
        // The floor swallows both start scores, so the first state wins.
        assert_eq!(path.states(), &[0]);
        assert_eq!(path.log_prob(), SMOOTHING_LOG_PROB);
    }

    #[test]
    fn test_tie_prefers_first_state() {
        let hmm = Hmm::from_readers(
            "X Y".as_bytes(),
            "X\t-0.6931\nY\t-0.6931".as_bytes(),
            "X\tX\t-0.6931\nX\tY\t-0.6931\nY\tX\t-0.6931\nY\tY\t-0.6931".as_bytes(),
            "X\ta\t-1.0\nY\ta\t-1.0".as_bytes(),
        )
        .unwrap();
        let path = hmm.viterbi(&['a', 'a', 'a'], Terminals::Any).unwrap();
        assert_eq!(path.into_states(), vec![0, 0, 0]);
    }

    #[test]
    fn test_char_observations() {
        let hmm = Hmm::from_readers(
            "B M E S".as_bytes(),
            "B\t-0.26\nS\t-1.46".as_bytes(),
            "B\tE\t-0.51\nB\tM\t-0.91\nE\tB\t-0.59\nE\tS\t-0.80\n\
             M\tE\t-0.33\nM\tM\t-1.26\nS\tB\t-0.72\nS\tS\t-0.66"
                .as_bytes(),
            "B\t上\t-5.0\nE\t海\t-4.0\nS\t的\t-3.0".as_bytes(),
        )
        .unwrap();
        let chars: Vec<_> = "上海的".chars().collect();
        let path = hmm.viterbi(&chars, Terminals::Only(&[2, 3])).unwrap();
        assert_eq!(path.states(), &[0, 2, 3]);
    }

    #[test]
    fn test_empty_observations() {
        let hmm = weather();
        let obs: [&str; 0] = [];
        assert!(hmm.viterbi(&obs, Terminals::Any).is_err());
    }

    #[test]
    fn test_no_valid_terminal() {
        let hmm = weather();
        assert!(hmm.viterbi(&["walk"], Terminals::Only(&[7])).is_err());
        assert!(hmm.viterbi(&["walk"], Terminals::Only(&[])).is_err());
    }
}
