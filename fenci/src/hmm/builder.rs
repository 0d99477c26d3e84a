use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::common::SMOOTHING_LOG_PROB;
use crate::errors::{FenciError, Result};
use crate::hmm::{Emissions, Hmm};
use crate::utils;

/// File name of the state set in a model directory.
pub const STATES_FILENAME: &str = "states.dat";
/// File name of the start log-probabilities in a model directory.
pub const START_LOG_PROB_FILENAME: &str = "start_log_prob.dat";
/// File name of the transition log-probabilities in a model directory.
pub const TRANS_LOG_PROB_FILENAME: &str = "trans_log_prob.dat";
/// File name of the emission log-probabilities in a model directory.
pub const EMIT_LOG_PROB_FILENAME: &str = "emit_log_prob.dat";

impl Hmm {
    /// Creates a new instance from readers of the four parameter tables.
    ///
    /// # Arguments
    ///
    ///  - `states_rdr`: State names separated by whitespace.
    ///  - `start_rdr`: Rows of `state<TAB>log_prob`.
    ///  - `trans_rdr`: Rows of `from<TAB>to<TAB>log_prob`.
    ///  - `emit_rdr`: Rows of `state<TAB>symbol<TAB>log_prob`.
    ///
    /// Malformed rows are skipped with a warning.
    ///
    /// # Errors
    ///
    /// [`FenciError`] is returned when a reader fails, or when the state set or
    /// any of the tables ends up empty.
    pub fn from_readers<S, P, T, E>(
        states_rdr: S,
        start_rdr: P,
        trans_rdr: T,
        emit_rdr: E,
    ) -> Result<Self>
    where
        S: Read,
        P: Read,
        T: Read,
        E: Read,
    {
        let states = Self::parse_states(states_rdr)?;
        let num_states = states.len();
        let mut hmm = Self {
            states,
            start: vec![SMOOTHING_LOG_PROB; num_states],
            trans: vec![SMOOTHING_LOG_PROB; num_states * num_states],
            emit: vec![Emissions::default(); num_states],
        };

        let n = hmm.load_table(start_rdr, START_LOG_PROB_FILENAME, 1, false, |hmm, ids, _, p| {
            hmm.start[ids[0]] = p;
        })?;
        ensure_nonempty(n, START_LOG_PROB_FILENAME)?;

        let n = hmm.load_table(trans_rdr, TRANS_LOG_PROB_FILENAME, 2, false, |hmm, ids, _, p| {
            hmm.trans[ids[0] * num_states + ids[1]] = p;
        })?;
        ensure_nonempty(n, TRANS_LOG_PROB_FILENAME)?;

        let n = hmm.load_table(emit_rdr, EMIT_LOG_PROB_FILENAME, 1, true, |hmm, ids, symbol, p| {
            hmm.emit[ids[0]].insert(symbol.to_string(), p);
        })?;
        ensure_nonempty(n, EMIT_LOG_PROB_FILENAME)?;

        info!(
            states = hmm.num_states(),
            emissions = hmm.emit.iter().map(Emissions::len).sum::<usize>(),
            "loaded an hmm"
        );
        Ok(hmm)
    }

    /// Creates a new instance from a model directory holding
    /// [`STATES_FILENAME`], [`START_LOG_PROB_FILENAME`],
    /// [`TRANS_LOG_PROB_FILENAME`], and [`EMIT_LOG_PROB_FILENAME`].
    ///
    /// # Errors
    ///
    /// See [`Hmm::from_readers()`].
    pub fn from_dir<P>(dir: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        Self::from_readers(
            File::open(dir.join(STATES_FILENAME))?,
            File::open(dir.join(START_LOG_PROB_FILENAME))?,
            File::open(dir.join(TRANS_LOG_PROB_FILENAME))?,
            File::open(dir.join(EMIT_LOG_PROB_FILENAME))?,
        )
    }

    fn parse_states<R>(rdr: R) -> Result<Vec<String>>
    where
        R: Read,
    {
        let mut states: Vec<String> = vec![];
        for line in utils::read_lines(rdr) {
            let (lineno, line) = line?;
            for name in line.split_whitespace() {
                if states.iter().any(|s| s == name) {
                    warn!(
                        source = STATES_FILENAME,
                        line = lineno,
                        state = name,
                        "skipped a duplicate state"
                    );
                } else {
                    states.push(name.to_string());
                }
            }
        }
        if states.is_empty() {
            return Err(FenciError::invalid_format(
                STATES_FILENAME,
                "no state is defined.",
            ));
        }
        Ok(states)
    }

    /// Reads rows of `num_ids` state names, optionally a symbol, and a
    /// log-probability. Returns the number of accepted rows.
    fn load_table<R, F>(
        &mut self,
        rdr: R,
        source: &'static str,
        num_ids: usize,
        has_symbol: bool,
        mut f: F,
    ) -> Result<usize>
    where
        R: Read,
        F: FnMut(&mut Self, &[usize], &str, f64),
    {
        let num_cols = num_ids + 1 + usize::from(has_symbol);

        let mut num_loaded = 0;
        for line in utils::read_lines(rdr) {
            let (lineno, line) = line?;
            match self.parse_row(&line, source, num_ids, num_cols) {
                Ok((ids, symbol, log_prob)) => {
                    f(self, &ids, &symbol, log_prob);
                    num_loaded += 1;
                }
                Err(e) => {
                    warn!(source, line = lineno, "skipped a malformed line: {e}");
                }
            }
        }
        Ok(num_loaded)
    }

    fn parse_row(
        &self,
        line: &str,
        source: &'static str,
        num_ids: usize,
        num_cols: usize,
    ) -> Result<(Vec<usize>, String, f64)> {
        let cols = utils::parse_tsv_row(line);
        if cols.len() != num_cols {
            let msg = format!("A row must have {num_cols} tab-separated fields, {line}");
            return Err(FenciError::invalid_format(source, msg));
        }

        let mut ids = Vec::with_capacity(num_ids);
        for name in &cols[..num_ids] {
            let id = self.state_id(name.trim()).ok_or_else(|| {
                FenciError::invalid_format(source, format!("undefined state {name}"))
            })?;
            ids.push(id);
        }
        let symbol = if num_cols > num_ids + 1 {
            cols[num_ids].clone()
        } else {
            String::new()
        };
        let log_prob = parse_log_prob(&cols[num_cols - 1], source)?;
        Ok((ids, symbol, log_prob))
    }
}

/// Parses a log-probability, clamping anything below the smoothing floor
/// (including negative infinity) to the floor.
fn parse_log_prob(s: &str, source: &'static str) -> Result<f64> {
    let p: f64 = s.trim().parse()?;
    if p.is_nan() || p > 0.0 {
        let msg = format!("log-probability must be a non-positive number, {s}");
        return Err(FenciError::invalid_format(source, msg));
    }
    Ok(p.max(SMOOTHING_LOG_PROB))
}

fn ensure_nonempty(num_loaded: usize, source: &'static str) -> Result<()> {
    if num_loaded == 0 {
        return Err(FenciError::invalid_format(source, "no valid row is found."));
    }
    Ok(())
}
