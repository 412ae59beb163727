//! Error types for battle progression.
//!
//! Every recoverable condition the engine can report is represented by
//! the `DuelError` enum. Resolvers themselves never fail on well-formed
//! input; errors come from validation at the `Progression` boundary.

use crate::progression::Phase;
use thiserror::Error;

/// Errors that can occur while driving a battle.
///
/// # Examples
///
/// ```rust
/// use cubeduel::DuelError;
///
/// let err = DuelError::InvalidTime { value: -1.0 };
/// println!("{}", err); // "Invalid solve time: -1"
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DuelError {
    /// A submitted time was not a finite, positive number of seconds.
    ///
    /// The battle stays in its current phase and waits for a valid
    /// resubmission.
    #[error("Invalid solve time: {value}")]
    InvalidTime { value: f64 },

    /// An operation was invoked in a phase that does not allow it.
    #[error("Expected phase {expected:?}, battle is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    /// The submission shape does not match the active game mode.
    #[error("Submission {submission} is not valid in {mode} mode")]
    ModeMismatch {
        mode: &'static str,
        submission: &'static str,
    },

    /// A cooperative submission carried the wrong number of times.
    #[error("Expected {expected} co-op times, got {actual}")]
    RosterMismatch { expected: usize, actual: usize },

    /// A cooperative round was resolved with nobody left alive.
    ///
    /// Terminal checks fire before this can happen, so reaching it means
    /// the round ordering was broken.
    #[error("Co-op round resolved with no living players")]
    NoLivingPlayers,

    /// The assist was requested with no uses left.
    #[error("No assists left")]
    NoAssistsLeft,

    /// A power-up was chosen while none was on offer.
    #[error("No power-up offer is pending")]
    NoPowerUpOffer,

    /// A power-up index outside the current offer was chosen.
    #[error("Power-up choice {index} is out of range (offered {offered})")]
    InvalidPowerUpChoice { index: usize, offered: usize },

    /// The run cannot advance until the pending power-up is chosen.
    #[error("A power-up must be chosen before the next round")]
    PowerUpChoicePending,

    /// A difficulty profile failed validation.
    #[error("Invalid difficulty profile: {0}")]
    InvalidProfile(String),

    /// A configuration document could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for DuelError {
    fn from(err: serde_json::Error) -> Self {
        DuelError::Config(err.to_string())
    }
}

/// Validate a submitted solve time.
pub(crate) fn check_time(value: f64) -> Result<f64, DuelError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DuelError::InvalidTime { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DuelError::RosterMismatch {
            expected: 3,
            actual: 2,
        };
        let display = err.to_string();
        assert!(display.contains('3'));
        assert!(display.contains('2'));
    }

    #[test]
    fn test_check_time() {
        assert_eq!(check_time(11.5), Ok(11.5));
        assert!(check_time(0.0).is_err());
        assert!(check_time(-3.0).is_err());
        assert!(check_time(f64::NAN).is_err());
        assert!(check_time(f64::INFINITY).is_err());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err: DuelError = parse.unwrap_err().into();
        assert!(matches!(err, DuelError::Config(_)));
    }
}
