//! Opponent time sources.
//!
//! A source supplies the opponent's time for a round, together with the
//! scramble it was solved on. Sources may use recorded real-world solves
//! or fall back to sampling from the difficulty profile; either way the
//! resolvers only ever see a plain positive float.

use crate::config::DifficultyProfile;
use crate::error::DuelError;
use crate::sampler::sample;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Floor applied to every opponent time a source hands out.
pub const MIN_OPPONENT_TIME: f64 = 0.01;

/// Scramble label used when no recorded data is available.
pub const UNKNOWN_SCRAMBLE: &str = "Unknown scramble";

/// One opponent time draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Draw {
    /// Opaque scramble identifier for display.
    pub scramble: String,
    /// Opponent time in seconds, always `>= MIN_OPPONENT_TIME`.
    pub time: f64,
    /// Whether the time came from a recorded solve rather than sampling.
    pub recorded: bool,
}

/// Trait for opponent time sources.
///
/// # Examples
///
/// ```rust
/// use cubeduel::source::{FixedSource, TimeSource};
/// use cubeduel::DifficultyProfile;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut source = FixedSource(11.0);
/// let mut rng = StdRng::seed_from_u64(0);
/// let draw = source.draw(&mut rng, &DifficultyProfile::default());
/// assert_eq!(draw.time, 11.0);
/// ```
pub trait TimeSource: Send {
    /// Produce the opponent's time for the next round.
    fn draw(&mut self, rng: &mut dyn RngCore, profile: &DifficultyProfile) -> Draw;
}

/// Sample a simulated opponent time from the profile's distribution.
pub fn sampled_time(rng: &mut dyn RngCore, profile: &DifficultyProfile) -> f64 {
    let raw = sample(rng, profile.time_mean, profile.time_std);
    if raw < MIN_OPPONENT_TIME {
        tracing::trace!(raw, "clamping simulated opponent time");
    }
    raw.max(MIN_OPPONENT_TIME)
}

/// A source that always samples from the profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampledSource;

impl TimeSource for SampledSource {
    fn draw(&mut self, rng: &mut dyn RngCore, profile: &DifficultyProfile) -> Draw {
        Draw {
            scramble: UNKNOWN_SCRAMBLE.to_string(),
            time: sampled_time(rng, profile),
            recorded: false,
        }
    }
}

/// A source that always returns the same time.
#[derive(Debug, Clone, Copy)]
pub struct FixedSource(pub f64);

impl TimeSource for FixedSource {
    fn draw(&mut self, _rng: &mut dyn RngCore, _profile: &DifficultyProfile) -> Draw {
        Draw {
            scramble: UNKNOWN_SCRAMBLE.to_string(),
            time: self.0.max(MIN_OPPONENT_TIME),
            recorded: false,
        }
    }
}

/// A source that replays a fixed list of times, wrapping around at the
/// end. Useful for scripted matches and tests.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    times: Vec<f64>,
    next: usize,
}

impl ScriptedSource {
    pub fn new(times: Vec<f64>) -> Self {
        Self { times, next: 0 }
    }
}

impl TimeSource for ScriptedSource {
    fn draw(&mut self, rng: &mut dyn RngCore, profile: &DifficultyProfile) -> Draw {
        if self.times.is_empty() {
            return SampledSource.draw(rng, profile);
        }
        let time = self.times[self.next % self.times.len()];
        self.next += 1;
        Draw {
            scramble: UNKNOWN_SCRAMBLE.to_string(),
            time: time.max(MIN_OPPONENT_TIME),
            recorded: false,
        }
    }
}

/// A recorded solve keyed by its scramble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrambleRow {
    #[serde(alias = "scr")]
    pub scramble: String,
    /// Recorded opponent time, if one exists for this scramble.
    #[serde(default, alias = "rest")]
    pub time: Option<f64>,
}

/// A bank of scrambles with optional recorded opponent times.
///
/// Each draw picks a random row. The recorded time is used when the
/// profile allows it and the row has a usable one; otherwise the time is
/// sampled. An empty bank behaves like [`SampledSource`].
///
/// # Examples
///
/// ```rust
/// use cubeduel::source::{ScrambleBank, TimeSource};
/// use cubeduel::DifficultyProfile;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut bank = ScrambleBank::from_json(r#"[{"scr": "R U R' U'", "rest": 9.87}]"#).unwrap();
/// let mut rng = StdRng::seed_from_u64(0);
///
/// let mut profile = DifficultyProfile::default();
/// profile.use_recorded_times = true;
/// let draw = bank.draw(&mut rng, &profile);
/// assert_eq!(draw.scramble, "R U R' U'");
/// assert_eq!(draw.time, 9.87);
/// assert!(draw.recorded);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScrambleBank {
    rows: Vec<ScrambleRow>,
}

impl ScrambleBank {
    pub fn new(rows: Vec<ScrambleRow>) -> Self {
        Self { rows }
    }

    /// Build a bank from `(scramble, recorded time)` pairs.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<f64>)>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|(scramble, time)| ScrambleRow {
                    scramble: scramble.into(),
                    time,
                })
                .collect(),
        }
    }

    /// Parse a JSON array of rows.
    pub fn from_json(json: &str) -> Result<Self, DuelError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TimeSource for ScrambleBank {
    fn draw(&mut self, rng: &mut dyn RngCore, profile: &DifficultyProfile) -> Draw {
        if self.rows.is_empty() {
            return SampledSource.draw(rng, profile);
        }
        let row = &self.rows[rng.gen_range(0..self.rows.len())];
        let recorded = row
            .time
            .filter(|t| profile.use_recorded_times && t.is_finite() && *t > 0.0);

        match recorded {
            Some(time) => Draw {
                scramble: row.scramble.clone(),
                time: time.max(MIN_OPPONENT_TIME),
                recorded: true,
            },
            None => {
                tracing::trace!(scramble = %row.scramble, "no recorded time, sampling");
                Draw {
                    scramble: row.scramble.clone(),
                    time: sampled_time(rng, profile),
                    recorded: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sampled_time_is_positive() {
        let mut rng = StdRng::seed_from_u64(3);
        let profile = DifficultyProfile {
            time_mean: 0.0,
            time_std: 5.0,
            ..DifficultyProfile::default()
        };
        for _ in 0..1_000 {
            assert!(sampled_time(&mut rng, &profile) >= MIN_OPPONENT_TIME);
        }
    }

    #[test]
    fn test_bank_falls_back_without_recorded_time() {
        let mut bank = ScrambleBank::from_rows(vec![("F2 B2", None)]);
        let mut rng = StdRng::seed_from_u64(5);
        let profile = DifficultyProfile {
            use_recorded_times: true,
            ..DifficultyProfile::default()
        };
        let draw = bank.draw(&mut rng, &profile);
        assert_eq!(draw.scramble, "F2 B2");
        assert!(!draw.recorded);
        assert!(draw.time > 0.0);
    }

    #[test]
    fn test_bank_ignores_recorded_when_disabled() {
        let mut bank = ScrambleBank::from_rows(vec![("D L2", Some(8.0))]);
        let mut rng = StdRng::seed_from_u64(5);
        let profile = DifficultyProfile {
            use_recorded_times: false,
            time_std: 0.0,
            time_mean: 13.0,
            ..DifficultyProfile::default()
        };
        let draw = bank.draw(&mut rng, &profile);
        assert!(!draw.recorded);
        assert_eq!(draw.time, 13.0);
    }

    #[test]
    fn test_empty_bank_uses_placeholder() {
        let mut bank = ScrambleBank::default();
        let mut rng = StdRng::seed_from_u64(5);
        let draw = bank.draw(&mut rng, &DifficultyProfile::default());
        assert_eq!(draw.scramble, UNKNOWN_SCRAMBLE);
    }

    #[test]
    fn test_scripted_source_wraps() {
        let mut source = ScriptedSource::new(vec![10.0, 12.0]);
        let mut rng = StdRng::seed_from_u64(0);
        let profile = DifficultyProfile::default();
        let times: Vec<f64> = (0..4).map(|_| source.draw(&mut rng, &profile).time).collect();
        assert_eq!(times, vec![10.0, 12.0, 10.0, 12.0]);
    }

    #[test]
    fn test_bank_json_rejects_garbage() {
        assert!(ScrambleBank::from_json("{").is_err());
    }
}
