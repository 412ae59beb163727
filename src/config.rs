//! Difficulty profiles and match configuration.
//!
//! A `DifficultyProfile` is the parameter bag the host loads before a
//! battle starts. The engine does not interpret it beyond reading the
//! numbers: opponent time distribution, damage scaling, whether recorded
//! solves are preferred, and the assist distribution.

use crate::error::DuelError;
use serde::{Deserialize, Serialize};

/// Preset difficulty levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Opponent and scoring parameters for one battle.
///
/// Missing fields in a JSON document fall back to the Medium preset.
///
/// # Examples
///
/// ```rust
/// use cubeduel::{Difficulty, DifficultyProfile};
///
/// let hard = DifficultyProfile::preset(Difficulty::Hard);
/// assert!(hard.time_mean < DifficultyProfile::preset(Difficulty::Easy).time_mean);
///
/// let custom = DifficultyProfile::from_json(r#"{"time_mean": 9.0, "damage_multiplier": 6.0}"#).unwrap();
/// assert_eq!(custom.time_mean, 9.0);
/// assert_eq!(custom.assist_mean, 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyProfile {
    /// Mean simulated opponent time in seconds.
    pub time_mean: f64,
    /// Standard deviation of simulated opponent times.
    pub time_std: f64,
    /// Seconds-to-damage scale in `round(diff × multiplier + 5)`.
    pub damage_multiplier: f64,
    /// Prefer recorded solves over sampling when available.
    pub use_recorded_times: bool,
    /// Mean assisted time.
    pub assist_mean: f64,
    /// Standard deviation of assisted times.
    pub assist_std: f64,
}

impl DifficultyProfile {
    /// Build one of the three presets.
    pub fn preset(difficulty: Difficulty) -> Self {
        let (time_mean, time_std, use_recorded_times) = match difficulty {
            Difficulty::Easy => (13.5, 1.5, false),
            Difficulty::Medium => (11.62, 1.10, true),
            Difficulty::Hard => (9.5, 0.8, false),
        };
        Self {
            time_mean,
            time_std,
            damage_multiplier: 5.0,
            use_recorded_times,
            assist_mean: 5.0,
            assist_std: 0.5,
        }
    }

    /// Build and validate a fully custom profile.
    pub fn custom(
        time_mean: f64,
        time_std: f64,
        damage_multiplier: f64,
        use_recorded_times: bool,
        assist_mean: f64,
        assist_std: f64,
    ) -> Result<Self, DuelError> {
        let profile = Self {
            time_mean,
            time_std,
            damage_multiplier,
            use_recorded_times,
            assist_mean,
            assist_std,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Parse and validate a profile from JSON.
    pub fn from_json(json: &str) -> Result<Self, DuelError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_json(&self) -> Result<String, DuelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check that every number is usable.
    pub fn validate(&self) -> Result<(), DuelError> {
        let numbers = [
            ("time_mean", self.time_mean),
            ("time_std", self.time_std),
            ("damage_multiplier", self.damage_multiplier),
            ("assist_mean", self.assist_mean),
            ("assist_std", self.assist_std),
        ];
        if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DuelError::InvalidProfile(format!("{} must be finite", name)));
        }
        if self.time_std < 0.0 || self.assist_std < 0.0 {
            return Err(DuelError::InvalidProfile(
                "standard deviations must not be negative".into(),
            ));
        }
        if self.damage_multiplier <= 0.0 {
            return Err(DuelError::InvalidProfile(
                "damage_multiplier must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::preset(Difficulty::Medium)
    }
}

/// Everything needed to set up a `Progression`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub profile: DifficultyProfile,
    /// Seed for every random draw in the match. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl MatchConfig {
    pub fn new(profile: DifficultyProfile) -> Self {
        Self {
            profile,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
