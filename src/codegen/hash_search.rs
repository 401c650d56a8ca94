//! Brute force search for a parameter name hash function
//!
//! The plugin looks up parameters by name through a small hash table; this
//! finds the multiplier, shift and modulus that spread the known names most
//! evenly over the buckets.

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

const LETTER_OFFSET: i64 = 'A' as i64 - 10;
const DIGIT_OFFSET: i64 = '0' as i64;

/// Only this many leading characters take part in the hash
pub const MAX_HASHED_CHARS: usize = 5;

/// Largest exclusive shift bound; shifts run up to 63
pub const MAX_SHIFT: u32 = 64;
/// Largest multiplier index for which `2 * i + 1` fits an `i64`
pub const MAX_MULTIPLIER_INDEX: i64 = (i64::MAX - 1) / 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchSpaceError {
    #[error("--max-multiplier must be between 2 and {max}, got: {0}", max = MAX_MULTIPLIER_INDEX)]
    MultiplierOutOfRange(i64),
    #[error("--max-shift must be at most {max}, got: {0}", max = MAX_SHIFT)]
    ShiftOutOfRange(u32),
    #[error("--modulus must be positive, got: {0}")]
    InvalidModulus(i64),
}

/// Parameters of one hash function candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub multiplier: i64,
    pub shift: u32,
    pub modulus: i64,
}

/// Hash a parameter name
///
/// The first [`MAX_HASHED_CHARS`] characters are read as base 36 digits, the
/// index of the last one read is mixed into the low bits, then the result is
/// multiplied, shifted and reduced.
///
/// # Example
/// ```
/// use synthgen::codegen::hash_search::{param_hash, HashParams};
///
/// let params = HashParams { multiplier: 1, shift: 0, modulus: 1 << 20 };
/// // "A" = 10, shifted left by 3, plus index 0
/// assert_eq!(param_hash("A", params), 80);
/// ```
pub fn param_hash(name: &str, params: HashParams) -> i64 {
    let mut h: i64 = 0;
    let mut last = 0;
    for (i, c) in name.chars().take(MAX_HASHED_CHARS).enumerate() {
        let mut c = c as i64;
        if c >= LETTER_OFFSET {
            c -= LETTER_OFFSET;
        } else {
            c -= DIGIT_OFFSET;
        }
        h = h * 36 + c;
        last = i as i64;
    }
    h <<= 3;
    h += last;
    // Two's complement wrap, like the plugin's integer arithmetic
    h = h.wrapping_mul(params.multiplier) >> params.shift.min(MAX_SHIFT - 1);
    h.rem_euclid(params.modulus)
}

/// Bucket statistics of a hash function over a set of names
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketStats {
    /// Length of the longest bucket
    pub max_collisions: usize,
    /// Average length of the non-empty buckets
    pub avg_len: f64,
    /// Number of non-empty buckets
    pub utilized: usize,
}

impl BucketStats {
    /// Strictly better: fewer collisions, or as many but shorter buckets
    pub fn is_better_than(&self, other: &BucketStats) -> bool {
        self.max_collisions < other.max_collisions
            || (self.max_collisions == other.max_collisions && self.avg_len < other.avg_len)
    }
}

pub fn evaluate<S: AsRef<str>>(names: &[S], params: HashParams) -> BucketStats {
    let mut buckets: HashMap<i64, usize> = HashMap::new();
    for name in names {
        *buckets.entry(param_hash(name.as_ref(), params)).or_default() += 1;
    }
    let max_collisions = buckets.values().copied().max().unwrap_or(0);
    let avg_len = if buckets.is_empty() {
        0.0
    } else {
        names.len() as f64 / buckets.len() as f64
    };
    BucketStats {
        max_collisions,
        avg_len,
        utilized: buckets.len(),
    }
}

/// Candidate ranges to try
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpace {
    /// Multipliers are `2 * i + 1` for `i` in `1..max_multiplier_index`
    pub max_multiplier_index: i64,
    /// Shifts tried are `0..max_shift`
    pub max_shift: u32,
    pub moduli: Vec<i64>,
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            max_multiplier_index: 100000,
            max_shift: 23,
            moduli: vec![128],
        }
    }
}

impl SearchSpace {
    /// Reject ranges that would overflow or divide by zero
    pub fn validate(&self) -> Result<(), SearchSpaceError> {
        if !(2..=MAX_MULTIPLIER_INDEX).contains(&self.max_multiplier_index) {
            return Err(SearchSpaceError::MultiplierOutOfRange(self.max_multiplier_index));
        }
        if self.max_shift > MAX_SHIFT {
            return Err(SearchSpaceError::ShiftOutOfRange(self.max_shift));
        }
        if let Some(&m) = self.moduli.iter().find(|&&m| m < 1) {
            return Err(SearchSpaceError::InvalidModulus(m));
        }
        Ok(())
    }
}

/// A candidate that beat every earlier one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Improvement {
    pub elapsed_secs: f64,
    pub params: HashParams,
    pub stats: BucketStats,
}

impl fmt::Display for Improvement {
    /// Tab separated `key=value` pairs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time={}\tmultiplier={}\tshift={}\tmax_coll={}\tavg_len={}\tmod={}\tutilized={}",
            self.elapsed_secs,
            self.params.multiplier,
            self.params.shift,
            self.stats.max_collisions,
            self.stats.avg_len,
            self.params.modulus,
            self.stats.utilized
        )
    }
}

/// Try every candidate in `space`, calling `on_improvement` for each new best
///
/// Returns the best candidate, if any was tried.
pub fn search<S, F>(names: &[S], space: &SearchSpace, mut on_improvement: F) -> Option<Improvement>
where
    S: AsRef<str>,
    F: FnMut(&Improvement),
{
    let start = Instant::now();
    let mut best: Option<Improvement> = None;

    for i in 1..space.max_multiplier_index {
        let multiplier = i * 2 + 1;
        for shift in 0..space.max_shift {
            for &modulus in &space.moduli {
                let params = HashParams {
                    multiplier,
                    shift,
                    modulus,
                };
                let stats = evaluate(names, params);
                let better = best.map_or(true, |b| stats.is_better_than(&b.stats));
                if better {
                    let improvement = Improvement {
                        elapsed_secs: start.elapsed().as_secs_f64(),
                        params,
                        stats,
                    };
                    on_improvement(&improvement);
                    best = Some(improvement);
                }
            }
        }
    }

    if let Some(b) = &best {
        info!(
            multiplier = b.params.multiplier,
            shift = b.params.shift,
            modulus = b.params.modulus,
            max_coll = b.stats.max_collisions,
            "hash search finished"
        );
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(modulus: i64) -> HashParams {
        HashParams {
            multiplier: 1,
            shift: 0,
            modulus,
        }
    }

    #[test]
    fn test_hash_reads_base36() {
        // "10" = 36, shifted to 288, plus index 1
        assert_eq!(param_hash("10", identity(1 << 30)), 289);
        // Only the first five characters count; the index stays at 4
        assert_eq!(
            param_hash("ABCDE", identity(1 << 30)),
            param_hash("ABCDEFGH", identity(1 << 30))
        );
        assert_eq!(param_hash("", identity(7)), 0);
    }

    #[test]
    fn test_hash_is_deterministic_and_bounded() {
        let params = HashParams {
            multiplier: 23781,
            shift: 9,
            modulus: 128,
        };
        for name in ["MAMP", "CAMP", "M20RND", "L8FRQ", "N1AMT"] {
            let h = param_hash(name, params);
            assert_eq!(h, param_hash(name, params));
            assert!((0..128).contains(&h));
        }
    }

    #[test]
    fn test_search_space_bounds() {
        assert_eq!(SearchSpace::default().validate(), Ok(()));
        let space = |max_multiplier_index, max_shift, moduli: Vec<i64>| SearchSpace {
            max_multiplier_index,
            max_shift,
            moduli,
        };
        assert_eq!(space(2, 64, vec![1]).validate(), Ok(()));
        assert_eq!(
            space(2, 70, vec![128]).validate(),
            Err(SearchSpaceError::ShiftOutOfRange(70))
        );
        assert_eq!(
            space(1, 23, vec![128]).validate(),
            Err(SearchSpaceError::MultiplierOutOfRange(1))
        );
        assert_eq!(
            space(i64::MAX, 23, vec![128]).validate(),
            Err(SearchSpaceError::MultiplierOutOfRange(i64::MAX))
        );
        assert_eq!(
            space(2, 23, vec![128, 0]).validate(),
            Err(SearchSpaceError::InvalidModulus(0))
        );
    }

    #[test]
    fn test_hash_extreme_params() {
        let params = HashParams {
            multiplier: MAX_MULTIPLIER_INDEX * 2 + 1,
            shift: 70,
            modulus: 128,
        };
        for name in ["MAMP", "ZZZZZ", "N12DYN"] {
            assert!((0..128).contains(&param_hash(name, params)));
        }
        let wrapped = HashParams {
            multiplier: i64::MAX,
            shift: 0,
            modulus: 1 << 20,
        };
        let h = (80_i64).wrapping_mul(i64::MAX).rem_euclid(1 << 20);
        assert_eq!(param_hash("A", wrapped), h);
    }

    #[test]
    fn test_evaluate() {
        let stats = evaluate(&["A", "B", "C"], identity(1));
        assert_eq!(stats.max_collisions, 3);
        assert_eq!(stats.utilized, 1);
        assert_eq!(stats.avg_len, 3.0);

        let stats = evaluate(&["A", "B", "C"], identity(1 << 20));
        assert_eq!(stats.max_collisions, 1);
        assert_eq!(stats.utilized, 3);
    }

    #[test]
    fn test_search_reports_strict_improvements() {
        let names = ["MAMP", "MVS", "MFLD", "CAMP", "CVS", "CFLD", "EV1V", "EOG"];
        let space = SearchSpace {
            max_multiplier_index: 50,
            max_shift: 4,
            moduli: vec![16],
        };
        let mut reported = Vec::new();
        let best = search(&names, &space, |i| reported.push(*i)).unwrap();
        assert_eq!(reported.last().unwrap().params, best.params);
        for pair in reported.windows(2) {
            assert!(pair[1].stats.is_better_than(&pair[0].stats));
        }
        assert_eq!(reported[0].params.multiplier, 3);
        assert_eq!(reported[0].params.shift, 0);
    }

    #[test]
    fn test_improvement_line() {
        let line = Improvement {
            elapsed_secs: 0.5,
            params: HashParams {
                multiplier: 3,
                shift: 2,
                modulus: 128,
            },
            stats: BucketStats {
                max_collisions: 2,
                avg_len: 1.25,
                utilized: 100,
            },
        }
        .to_string();
        assert_eq!(
            line,
            "time=0.5\tmultiplier=3\tshift=2\tmax_coll=2\tavg_len=1.25\tmod=128\tutilized=100"
        );
    }
}
