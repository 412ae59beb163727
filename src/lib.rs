//! # cubeduel - Deterministic Turn Resolution for Speedcubing Battles
//!
//! A battle engine for speedcubing minigames. Each round every side
//! submits a solve time; damage comes from the time difference and HP
//! drains until one side reaches zero. The engine provides:
//! - **Pure resolvers** (same input → same outcome, no hidden state)
//! - **Several modes** on one scoring core: single-player, hotseat,
//!   co-op boss fights and an endless roguelite run
//! - **Explicit modifier pipeline** for quirks and power-ups
//! - **Seeded randomness** so a whole match can be replayed
//!
//! ## Core Concepts
//!
//! ### Round Pipeline
//!
//! ```text
//! [Submission] → [Progression] → [Resolver] → [RoundOutcome] → [log]
//! ```
//!
//! 1. **Progression** validates the submission and draws the opponent's
//!    time from a [`TimeSource`](source::TimeSource)
//! 2. **Resolvers** compute the next state from the current one
//! 3. **Outcomes** carry the new HP and streaks plus a step-by-step
//!    [`Narrative`] of the formula
//!
//! ### Base Formula
//!
//! ```text
//! damage = round(|player - opponent| × multiplier + 5) + winner's new streak
//! ```
//!
//! Rounding is half-up. HP never goes below zero.
//!
//! ## Example
//!
//! ```rust
//! use cubeduel::*;
//! use cubeduel::progression::{Setup, Submission};
//! use cubeduel::source::ScriptedSource;
//!
//! let config = MatchConfig::new(DifficultyProfile::preset(Difficulty::Medium)).with_seed(42);
//! let mut battle = Progression::with_source(config, ScriptedSource::new(vec![11.0]));
//! battle.start(Setup::Solo { player_name: "Ana".into() }).unwrap();
//!
//! // Faster by 1s: round(1 × 5 + 5) + 1 combo
//! let entry = battle.submit(Submission::Time(10.0)).unwrap().unwrap();
//! assert_eq!(entry.round, 1);
//! assert_eq!(battle.phase(), Phase::RoundTransition);
//! battle.finish_round().unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`numeric`] - Rounding and damage helpers
//! - [`combatant`] - One side of a duel
//! - [`outcome`] - Round outcomes and narratives
//! - [`turn`] - Single-player and hotseat resolver
//! - [`sampler`] - Normally-distributed time sampling
//! - [`source`] - Opponent time sources
//! - [`config`] - Difficulty profiles and match configuration
//! - [`modifier`] - Quirks, power-ups and pipeline stages
//! - [`catalog`] - Static infinite-mode content
//! - [`infinite`] - Infinite-mode resolver and run state
//! - [`coop`] - Cooperative boss resolver
//! - [`progression`] - The battle state machine
//! - [`error`] - Error types

pub mod catalog;
pub mod combatant;
pub mod config;
pub mod coop;
pub mod error;
pub mod infinite;
pub mod modifier;
pub mod numeric;
pub mod outcome;
pub mod progression;
pub mod sampler;
pub mod source;
pub mod turn;

// Re-export main types for convenience
pub use combatant::Combatant;
pub use config::{Difficulty, DifficultyProfile, MatchConfig};
pub use error::DuelError;
pub use outcome::{Narrative, RoundOutcome, TerminalReason, Winner};
pub use progression::{Phase, Progression};
pub use turn::resolve_turn;

// Re-export the other resolvers
pub use coop::{resolve_coop_turn, CoopOutcome, CoopTask, TaskKind};
pub use infinite::{resolve_infinite_turn, InfiniteContext, InfiniteOutcome, InfiniteRun};

// Re-export modifier types
pub use modifier::{Modifier, ModifierStage, PowerUp, Quirk, QuirkEffect};
