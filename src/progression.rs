//! The battle state machine.
//!
//! ```text
//! Setup → Battle → (RoundTransition → Battle)* → GameOver
//! ```
//!
//! `Progression` is the single writer of battle state. It validates
//! input, picks the resolver for the active mode, applies the outcome,
//! appends to the round log and decides whether the battle goes on.
//! Exactly one round is in flight at a time: after a round resolves the
//! machine sits in `RoundTransition` with `processing` set, and any
//! submission is dropped until [`Progression::finish_round`] is called.

use crate::combatant::{Combatant, BASE_MAX_HP};
use crate::config::MatchConfig;
use crate::coop::{self, resolve_coop_turn, CoopOutcome, CoopTask, ELIMINATED_TIME};
use crate::error::{check_time, DuelError};
use crate::infinite::{InfiniteRun, RunReport};
use crate::modifier::PowerUp;
use crate::outcome::{RoundOutcome, TerminalReason};
use crate::sampler::sample;
use crate::source::{Draw, SampledSource, TimeSource, MIN_OPPONENT_TIME};
use crate::turn::resolve_turn;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Assist uses per single-player battle.
pub const ASSIST_USES: u32 = 3;

/// Lifecycle phase of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for a mode and roster.
    Setup,
    /// Accepting a round submission.
    Battle,
    /// A round was applied; waiting for the host to continue.
    RoundTransition,
    /// The battle has ended. Only [`Progression::reset`] leaves this phase.
    GameOver,
}

/// Mode-specific parameters for a new battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Setup {
    /// One player against a simulated or recorded opponent.
    Solo { player_name: String },
    /// Two players on one device.
    Versus { first: String, second: String },
    /// Several players against one boss. `handicaps` is empty or holds one
    /// time offset per player.
    Coop {
        players: Vec<String>,
        handicaps: Vec<f64>,
    },
    /// An endless run. `best_round` is the value the host persisted.
    Infinite { player_name: String, best_round: u32 },
}

/// Input for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Submission {
    /// The player's solve time.
    Time(f64),
    /// Let the assist solve this round.
    Assist,
    /// Both hotseat times.
    Versus { first: f64, second: f64 },
    /// One time per co-op roster slot. Entries for eliminated players are
    /// ignored.
    Coop(Vec<f64>),
}

impl Submission {
    fn kind(&self) -> &'static str {
        match self {
            Submission::Time(_) => "time",
            Submission::Assist => "assist",
            Submission::Versus { .. } => "versus",
            Submission::Coop(_) => "coop",
        }
    }
}

/// One co-op roster slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoopMember {
    pub name: String,
    pub combatant: Combatant,
    /// Seconds added to every submitted time.
    pub handicap: f64,
}

/// Battle state for the active mode.
#[derive(Debug, Clone)]
pub enum Arena {
    Solo {
        player_name: String,
        player: Combatant,
        opponent: Combatant,
        assists_left: u32,
    },
    Versus {
        names: [String; 2],
        first: Combatant,
        second: Combatant,
    },
    Coop {
        members: Vec<CoopMember>,
        boss: Combatant,
        task: CoopTask,
    },
    Infinite {
        player_name: String,
        run: InfiniteRun,
    },
}

impl Arena {
    pub fn mode(&self) -> &'static str {
        match self {
            Arena::Solo { .. } => "solo",
            Arena::Versus { .. } => "versus",
            Arena::Coop { .. } => "coop",
            Arena::Infinite { .. } => "infinite",
        }
    }
}

/// What a resolved round produced, per mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RoundReport {
    Duel(RoundOutcome),
    Coop(CoopOutcome),
    Infinite(RunReport),
}

impl RoundReport {
    fn terminal(&self) -> Option<TerminalReason> {
        match self {
            RoundReport::Duel(outcome) => outcome.terminal,
            RoundReport::Coop(outcome) => outcome.terminal,
            RoundReport::Infinite(report) => {
                report.run_over.then_some(TerminalReason::Defeat)
            }
        }
    }
}

/// One entry of the round log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Round number, starting at 1.
    pub round: u32,
    pub scramble: String,
    /// Time the player's side was compared against, when there was one.
    pub opponent_time: Option<f64>,
    /// Whether the assist produced the player's time.
    pub assisted: bool,
    pub report: RoundReport,
}

/// Drives one battle from setup to game over.
///
/// # Examples
///
/// ```rust
/// use cubeduel::progression::{Phase, Progression, Setup, Submission};
/// use cubeduel::source::FixedSource;
/// use cubeduel::MatchConfig;
///
/// let mut battle = Progression::with_source(MatchConfig::default().with_seed(1), FixedSource(12.0));
/// battle.start(Setup::Solo { player_name: "Ana".into() }).unwrap();
///
/// let entry = battle.submit(Submission::Time(11.0)).unwrap().unwrap();
/// assert_eq!(entry.round, 1);
/// assert_eq!(battle.phase(), Phase::RoundTransition);
///
/// // A second submission while the round is being applied is dropped.
/// assert!(battle.submit(Submission::Time(11.0)).unwrap().is_none());
///
/// battle.finish_round().unwrap();
/// assert_eq!(battle.phase(), Phase::Battle);
/// ```
pub struct Progression {
    phase: Phase,
    processing: bool,
    round: u32,
    config: MatchConfig,
    rng: StdRng,
    source: Box<dyn TimeSource>,
    arena: Option<Arena>,
    pending: Option<Draw>,
    log: Vec<LogEntry>,
    last_submitted_time: Option<f64>,
    personal_best_single: Option<f64>,
    result: Option<TerminalReason>,
}

impl Progression {
    /// A battle that samples every opponent time from the profile.
    pub fn new(config: MatchConfig) -> Self {
        Self::with_source(config, SampledSource)
    }

    /// A battle that takes opponent times from `source`.
    pub fn with_source(config: MatchConfig, source: impl TimeSource + 'static) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            phase: Phase::Setup,
            processing: false,
            round: 0,
            config,
            rng,
            source: Box::new(source),
            arena: None,
            pending: None,
            log: Vec::new(),
            last_submitted_time: None,
            personal_best_single: None,
            result: None,
        }
    }

    /// Configure a mode and enter `Battle`.
    pub fn start(&mut self, setup: Setup) -> Result<(), DuelError> {
        self.expect_phase(Phase::Setup)?;
        self.config.profile.validate()?;

        let arena = match setup {
            Setup::Solo { player_name } => Arena::Solo {
                player_name,
                player: Combatant::default(),
                opponent: Combatant::default(),
                assists_left: ASSIST_USES,
            },
            Setup::Versus { first, second } => Arena::Versus {
                names: [first, second],
                first: Combatant::default(),
                second: Combatant::default(),
            },
            Setup::Coop { players, handicaps } => {
                if players.is_empty() {
                    return Err(DuelError::RosterMismatch {
                        expected: 1,
                        actual: 0,
                    });
                }
                if !handicaps.is_empty() && handicaps.len() != players.len() {
                    return Err(DuelError::RosterMismatch {
                        expected: players.len(),
                        actual: handicaps.len(),
                    });
                }
                if let Some(&value) = handicaps.iter().find(|h| !h.is_finite()) {
                    return Err(DuelError::InvalidTime { value });
                }
                let boss = Combatant::new(coop::boss_hp(players.len(), BASE_MAX_HP));
                let members = players
                    .into_iter()
                    .enumerate()
                    .map(|(i, name)| CoopMember {
                        name,
                        combatant: Combatant::default(),
                        handicap: handicaps.get(i).copied().unwrap_or(0.0),
                    })
                    .collect();
                Arena::Coop {
                    members,
                    boss,
                    task: CoopTask::generate(&mut self.rng),
                }
            }
            Setup::Infinite {
                player_name,
                best_round,
            } => Arena::Infinite {
                player_name,
                run: InfiniteRun::new(best_round, &mut self.rng),
            },
        };

        tracing::debug!(mode = arena.mode(), "battle started");
        self.arena = Some(arena);
        self.round = 1;
        self.result = None;
        self.log.clear();
        self.draw_next();
        self.phase = Phase::Battle;
        Ok(())
    }

    /// Submit one round.
    ///
    /// Returns `Ok(None)` without touching any state if a round is
    /// already in flight. Invalid times are rejected and the battle stays
    /// in `Battle`.
    pub fn submit(&mut self, submission: Submission) -> Result<Option<LogEntry>, DuelError> {
        if self.processing {
            tracing::debug!(round = self.round, "submission ignored, round in flight");
            return Ok(None);
        }
        self.expect_phase(Phase::Battle)?;

        let (report, opponent_time, assisted) = self.resolve(&submission)?;
        self.processing = true;

        let scramble = self
            .pending
            .take()
            .map(|d| d.scramble)
            .unwrap_or_default();
        let entry = LogEntry {
            round: self.round,
            scramble,
            opponent_time,
            assisted,
            report,
        };
        tracing::debug!(
            round = entry.round,
            opponent_time = ?entry.opponent_time,
            "round resolved"
        );
        self.log.push(entry.clone());
        self.round += 1;

        match entry.report.terminal() {
            Some(reason) => {
                self.result = Some(reason);
                self.phase = Phase::GameOver;
                self.processing = false;
                tracing::info!(?reason, rounds = entry.round, "battle over");
            }
            None => {
                self.phase = Phase::RoundTransition;
                tracing::debug!(phase = ?self.phase, "awaiting next round");
            }
        }
        Ok(Some(entry))
    }

    fn resolve(
        &mut self,
        submission: &Submission,
    ) -> Result<(RoundReport, Option<f64>, bool), DuelError> {
        let profile = &self.config.profile;
        let opponent_time = self.pending.as_ref().map_or(MIN_OPPONENT_TIME, |d| d.time);
        let arena = self.arena.as_mut().ok_or(DuelError::WrongPhase {
            expected: Phase::Battle,
            actual: self.phase,
        })?;

        match (arena, submission) {
            (
                Arena::Solo {
                    player,
                    opponent,
                    assists_left,
                    ..
                },
                Submission::Time(_) | Submission::Assist,
            ) => {
                let (time, assisted) = match submission {
                    Submission::Time(t) => (check_time(*t)?, false),
                    _ => {
                        if *assists_left == 0 {
                            return Err(DuelError::NoAssistsLeft);
                        }
                        *assists_left -= 1;
                        let t = sample(&mut self.rng, profile.assist_mean, profile.assist_std)
                            .max(MIN_OPPONENT_TIME);
                        (t, true)
                    }
                };
                record_time(
                    &mut self.last_submitted_time,
                    &mut self.personal_best_single,
                    time,
                    !assisted,
                );
                let outcome = resolve_turn(
                    time,
                    opponent_time,
                    player,
                    opponent,
                    profile.damage_multiplier,
                );
                *player = outcome.player;
                *opponent = outcome.opponent;
                Ok((RoundReport::Duel(outcome), Some(opponent_time), assisted))
            }
            (Arena::Versus { first, second, .. }, Submission::Versus { first: a, second: b }) => {
                let a = check_time(*a)?;
                let b = check_time(*b)?;
                let outcome = resolve_turn(a, b, first, second, profile.damage_multiplier);
                *first = outcome.player;
                *second = outcome.opponent;
                Ok((RoundReport::Duel(outcome), None, false))
            }
            (Arena::Coop { members, boss, task }, Submission::Coop(submitted)) => {
                if submitted.len() != members.len() {
                    return Err(DuelError::RosterMismatch {
                        expected: members.len(),
                        actual: submitted.len(),
                    });
                }
                let times = members
                    .iter()
                    .zip(submitted)
                    .map(|(m, &t)| {
                        if m.combatant.is_defeated() {
                            Ok(ELIMINATED_TIME)
                        } else {
                            check_time(t + m.handicap)
                        }
                    })
                    .collect::<Result<Vec<f64>, DuelError>>()?;
                let players: Vec<Combatant> = members.iter().map(|m| m.combatant).collect();
                let outcome = resolve_coop_turn(
                    &times,
                    &players,
                    boss,
                    opponent_time,
                    task,
                    profile.damage_multiplier,
                )?;
                for (member, after) in members.iter_mut().zip(&outcome.players) {
                    member.combatant = *after;
                }
                *boss = outcome.boss;
                *task = CoopTask::generate(&mut self.rng);
                Ok((RoundReport::Coop(outcome), Some(opponent_time), false))
            }
            (Arena::Infinite { run, .. }, Submission::Time(t)) => {
                let time = check_time(*t)?;
                record_time(
                    &mut self.last_submitted_time,
                    &mut self.personal_best_single,
                    time,
                    true,
                );
                let report = run.submit(time, &mut self.rng);
                let ai_time = report.outcome.effective_opponent_time;
                Ok((RoundReport::Infinite(report), Some(ai_time), false))
            }
            (arena, submission) => Err(DuelError::ModeMismatch {
                mode: arena.mode(),
                submission: submission.kind(),
            }),
        }
    }

    /// Leave `RoundTransition` and accept the next round.
    ///
    /// In infinite mode a pending power-up offer must be resolved first.
    pub fn finish_round(&mut self) -> Result<(), DuelError> {
        self.expect_phase(Phase::RoundTransition)?;
        if let Some(Arena::Infinite { run, .. }) = &self.arena {
            if !run.pending_offer().is_empty() {
                return Err(DuelError::PowerUpChoicePending);
            }
        }
        self.draw_next();
        self.processing = false;
        self.phase = Phase::Battle;
        tracing::debug!(round = self.round, "next round ready");
        Ok(())
    }

    /// Claim a power-up from the pending infinite-mode offer.
    pub fn choose_power_up(&mut self, index: usize) -> Result<PowerUp, DuelError> {
        match self.arena.as_mut() {
            Some(Arena::Infinite { run, .. }) => run.choose_power_up(index),
            Some(arena) => Err(DuelError::ModeMismatch {
                mode: arena.mode(),
                submission: "power-up",
            }),
            None => Err(DuelError::NoPowerUpOffer),
        }
    }

    /// Return to `Setup`. Per-player statistics survive.
    pub fn reset(&mut self) {
        tracing::debug!(from = ?self.phase, "battle reset");
        self.phase = Phase::Setup;
        self.processing = false;
        self.round = 0;
        self.arena = None;
        self.pending = None;
        self.log.clear();
        self.result = None;
    }

    fn draw_next(&mut self) {
        let draw = self.source.draw(&mut self.rng, &self.config.profile);
        self.pending = Some(draw);
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), DuelError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(DuelError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Number of the round the next submission resolves.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn arena(&self) -> Option<&Arena> {
        self.arena.as_ref()
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Scramble for the round awaiting submission.
    pub fn scramble(&self) -> Option<&str> {
        self.pending.as_ref().map(|d| d.scramble.as_str())
    }

    pub fn last_submitted_time(&self) -> Option<f64> {
        self.last_submitted_time
    }

    /// Fastest unassisted single-player time across battles.
    pub fn personal_best_single(&self) -> Option<f64> {
        self.personal_best_single
    }

    /// How the battle ended, once in `GameOver`.
    pub fn result(&self) -> Option<TerminalReason> {
        self.result
    }

    /// Assist uses left in a single-player battle.
    pub fn assists_left(&self) -> Option<u32> {
        match &self.arena {
            Some(Arena::Solo { assists_left, .. }) => Some(*assists_left),
            _ => None,
        }
    }

    /// Best infinite-mode round, for the host to persist.
    pub fn best_round(&self) -> Option<u32> {
        match &self.arena {
            Some(Arena::Infinite { run, .. }) => Some(run.best_round()),
            _ => None,
        }
    }
}

fn record_time(last: &mut Option<f64>, best: &mut Option<f64>, time: f64, counts: bool) {
    *last = Some(time);
    if counts && best.map_or(true, |b| time < b) {
        *best = Some(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DifficultyProfile;
    use crate::source::{FixedSource, ScriptedSource};

    fn solo(source: impl TimeSource + 'static) -> Progression {
        let mut p = Progression::with_source(MatchConfig::default().with_seed(5), source);
        p.start(Setup::Solo {
            player_name: "Ana".into(),
        })
        .unwrap();
        p
    }

    #[test]
    fn test_start_only_from_setup() {
        let mut p = solo(FixedSource(12.0));
        let err = p
            .start(Setup::Solo {
                player_name: "Ana".into(),
            })
            .unwrap_err();
        assert_eq!(
            err,
            DuelError::WrongPhase {
                expected: Phase::Setup,
                actual: Phase::Battle
            }
        );
    }

    #[test]
    fn test_invalid_time_keeps_battle() {
        let mut p = solo(FixedSource(12.0));
        for bad in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                p.submit(Submission::Time(bad)),
                Err(DuelError::InvalidTime { .. })
            ));
        }
        assert_eq!(p.phase(), Phase::Battle);
        assert!(!p.is_processing());
        assert!(p.log().is_empty());
    }

    #[test]
    fn test_submit_before_start() {
        let mut p = Progression::new(MatchConfig::default().with_seed(1));
        let err = p.submit(Submission::Time(10.0)).unwrap_err();
        assert!(matches!(err, DuelError::WrongPhase { .. }));
    }

    #[test]
    fn test_mode_mismatch() {
        let mut p = solo(FixedSource(12.0));
        let err = p
            .submit(Submission::Versus {
                first: 1.0,
                second: 2.0,
            })
            .unwrap_err();
        assert_eq!(
            err,
            DuelError::ModeMismatch {
                mode: "solo",
                submission: "versus"
            }
        );
    }

    #[test]
    fn test_assist_limited() {
        // A steady assist against an equal opponent ties every round.
        let profile = DifficultyProfile {
            assist_std: 0.0,
            ..DifficultyProfile::default()
        };
        let mut p = Progression::with_source(
            MatchConfig::new(profile).with_seed(5),
            FixedSource(5.0),
        );
        p.start(Setup::Solo {
            player_name: "Ana".into(),
        })
        .unwrap();
        for _ in 0..ASSIST_USES {
            let entry = p.submit(Submission::Assist).unwrap().unwrap();
            assert!(entry.assisted);
            p.finish_round().unwrap();
        }
        assert_eq!(p.assists_left(), Some(0));
        assert_eq!(
            p.submit(Submission::Assist).unwrap_err(),
            DuelError::NoAssistsLeft
        );
        assert!(p.personal_best_single().is_none());
        assert!(p.last_submitted_time().is_some());
    }

    #[test]
    fn test_personal_best_tracks_fastest() {
        let mut p = solo(FixedSource(12.5));
        for t in [12.0, 10.5, 11.0] {
            p.submit(Submission::Time(t)).unwrap();
            p.finish_round().unwrap();
        }
        assert_eq!(p.personal_best_single(), Some(10.5));
        assert_eq!(p.last_submitted_time(), Some(11.0));
    }

    #[test]
    fn test_game_over_and_reset() {
        // Ten seconds faster: round(10×5+5) + 1 = 56, one round knockout.
        let mut p = solo(ScriptedSource::new(vec![20.0]));
        let entry = p.submit(Submission::Time(10.0)).unwrap().unwrap();
        assert!(matches!(entry.report, RoundReport::Duel(ref o) if o.damage == 56));
        assert_eq!(p.phase(), Phase::GameOver);
        assert_eq!(p.result(), Some(TerminalReason::Victory));
        assert!(p.finish_round().is_err());

        p.reset();
        assert_eq!(p.phase(), Phase::Setup);
        assert!(p.log().is_empty());
        assert_eq!(p.personal_best_single(), Some(10.0));
    }

    #[test]
    fn test_versus_hotseat() {
        let mut p = Progression::new(MatchConfig::default().with_seed(2));
        p.start(Setup::Versus {
            first: "A".into(),
            second: "B".into(),
        })
        .unwrap();
        p.submit(Submission::Versus {
            first: 12.0,
            second: 11.0,
        })
        .unwrap();
        match p.arena() {
            Some(Arena::Versus { first, second, .. }) => {
                assert_eq!(first.hp, 39);
                assert_eq!(second.combo_streak, 1);
            }
            other => panic!("unexpected arena {:?}", other),
        }
    }

    #[test]
    fn test_coop_handicap_applies() {
        let mut p = Progression::with_source(
            MatchConfig::default().with_seed(3),
            FixedSource(11.0),
        );
        p.start(Setup::Coop {
            players: vec!["A".into(), "B".into()],
            handicaps: vec![0.0, 2.0],
        })
        .unwrap();
        let entry = p.submit(Submission::Coop(vec![10.0, 10.0])).unwrap().unwrap();
        match entry.report {
            RoundReport::Coop(outcome) => {
                assert_eq!(outcome.hits, vec![(0, 10)]);
                // B's 12.0 is slowest: round(1×5+5)
                assert_eq!(outcome.boss_attack, Some((1, 10)));
            }
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_coop_roster_checked() {
        let mut p = Progression::new(MatchConfig::default().with_seed(3));
        let err = p
            .start(Setup::Coop {
                players: vec!["A".into(), "B".into()],
                handicaps: vec![1.0],
            })
            .unwrap_err();
        assert_eq!(
            err,
            DuelError::RosterMismatch {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(p.phase(), Phase::Setup);
    }
}
