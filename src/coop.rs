//! Cooperative boss fights: N players against one shared boss.
//!
//! Every living player faster than the boss lands a hit. A shared task
//! can add bonus damage, and the boss strikes back at the slowest living
//! player when it beat that player's time.

use crate::combatant::Combatant;
use crate::error::DuelError;
use crate::numeric::hit_damage;
use crate::outcome::{Narrative, TerminalReason};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Time reported for eliminated players. They neither deal nor take damage.
pub const ELIMINATED_TIME: f64 = 9999.0;
/// Flat damage dealt to the boss when the task is achieved.
pub const TASK_BONUS_DAMAGE: u32 = 5;
/// Allowed distance between the living players' mean and an average target.
pub const AVERAGE_TOLERANCE: f64 = 0.3;
/// Allowed distance between each living player's time and an identical target.
pub const IDENTICAL_TOLERANCE: f64 = 0.5;

/// Boss HP for a roster of `players` players.
pub fn boss_hp(players: usize, base_hp: u32) -> u32 {
    base_hp.saturating_mul(u32::try_from(players).unwrap_or(u32::MAX))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// The living players' mean time must land near the target.
    AverageTime,
    /// Every living player's time must land near the target.
    IdenticalTime,
}

/// Per-round bonus objective.
///
/// # Examples
///
/// ```rust
/// use cubeduel::coop::{CoopTask, TaskKind};
///
/// let task = CoopTask { kind: TaskKind::AverageTime, target: 10.2 };
/// assert!(task.evaluate(&[10.0, 10.4]));
/// assert!(!task.evaluate(&[10.0, 11.4]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoopTask {
    pub kind: TaskKind,
    pub target: f64,
}

impl CoopTask {
    /// Draw a fresh task. Both kinds are equally likely.
    ///
    /// Average targets fall in `[10, 15)` at one decimal; identical
    /// targets are whole seconds from 10 to 15.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            let raw: f64 = rng.gen_range(10.0..15.0);
            Self {
                kind: TaskKind::AverageTime,
                target: ((raw * 10.0).round() / 10.0).min(14.9),
            }
        } else {
            Self {
                kind: TaskKind::IdenticalTime,
                target: f64::from(rng.gen_range(10u8..=15)),
            }
        }
    }

    /// Check the task against the living players' times.
    ///
    /// An empty slice never achieves anything.
    pub fn evaluate(&self, alive_times: &[f64]) -> bool {
        if alive_times.is_empty() {
            return false;
        }
        match self.kind {
            TaskKind::AverageTime => {
                let mean = alive_times.iter().sum::<f64>() / alive_times.len() as f64;
                (mean - self.target).abs() <= AVERAGE_TOLERANCE
            }
            TaskKind::IdenticalTime => alive_times
                .iter()
                .all(|t| (t - self.target).abs() <= IDENTICAL_TOLERANCE),
        }
    }
}

/// The result of one cooperative round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoopOutcome {
    /// `(player index, damage)` for every player who hit the boss.
    pub hits: Vec<(usize, u32)>,
    pub task_achieved: bool,
    /// `(player index, damage)` if the boss struck back.
    pub boss_attack: Option<(usize, u32)>,
    /// Every player after the round, in roster order.
    pub players: Vec<Combatant>,
    pub boss: Combatant,
    pub narrative: Narrative,
    pub terminal: Option<TerminalReason>,
}

impl CoopOutcome {
    /// Total damage dealt to the boss, task bonus included.
    pub fn boss_damage(&self) -> u32 {
        let hits = self
            .hits
            .iter()
            .fold(0u32, |total, (_, d)| total.saturating_add(*d));
        if self.task_achieved {
            hits.saturating_add(TASK_BONUS_DAMAGE)
        } else {
            hits
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }
}

/// Resolve one cooperative round.
///
/// `times` is indexed like `players`; entries for eliminated players are
/// ignored. Fails loudly with [`DuelError::NoLivingPlayers`] if called
/// after the whole roster has fallen.
///
/// # Examples
///
/// ```rust
/// use cubeduel::coop::{resolve_coop_turn, CoopTask, TaskKind};
/// use cubeduel::Combatant;
///
/// let players = vec![Combatant::new(50), Combatant::new(50)];
/// let boss = Combatant::new(100);
/// let task = CoopTask { kind: TaskKind::AverageTime, target: 10.2 };
///
/// let outcome = resolve_coop_turn(&[10.0, 10.4], &players, &boss, 11.0, &task, 5.0).unwrap();
/// // round(1.0×5+5) + round(0.6×5+5) + task bonus 5
/// assert_eq!(outcome.boss.hp, 100 - 10 - 8 - 5);
/// ```
pub fn resolve_coop_turn(
    times: &[f64],
    players: &[Combatant],
    boss: &Combatant,
    boss_time: f64,
    task: &CoopTask,
    damage_multiplier: f64,
) -> Result<CoopOutcome, DuelError> {
    if times.len() != players.len() {
        return Err(DuelError::RosterMismatch {
            expected: players.len(),
            actual: times.len(),
        });
    }
    let alive: Vec<usize> = (0..players.len())
        .filter(|&i| !players[i].is_defeated())
        .collect();
    if alive.is_empty() {
        return Err(DuelError::NoLivingPlayers);
    }

    let mut players = players.to_vec();
    let mut boss = *boss;
    let mut narrative = Narrative::default();
    narrative.add_step("Boss time", boss_time);
    for (i, &time) in times.iter().enumerate() {
        let shown = if players[i].is_defeated() {
            ELIMINATED_TIME
        } else {
            time
        };
        narrative.add_step(format!("Player {} time", i + 1), shown);
    }

    let mut hits = Vec::new();
    for &i in &alive {
        if times[i] < boss_time {
            let damage = hit_damage(boss_time - times[i], damage_multiplier);
            boss.take_damage(damage);
            hits.push((i, damage));
            narrative.add_step(format!("Player {} hits boss", i + 1), f64::from(damage));
        }
    }

    let alive_times: Vec<f64> = alive.iter().map(|&i| times[i]).collect();
    let task_achieved = task.evaluate(&alive_times);
    if task_achieved {
        boss.take_damage(TASK_BONUS_DAMAGE);
        narrative.add_step("Task bonus", f64::from(TASK_BONUS_DAMAGE));
    }

    // First index wins ties for slowest.
    let slowest = alive
        .iter()
        .copied()
        .fold(None, |acc: Option<usize>, i| match acc {
            Some(j) if times[j] >= times[i] => Some(j),
            _ => Some(i),
        });
    let mut boss_attack = None;
    if let Some(i) = slowest {
        if boss_time < times[i] {
            let damage = hit_damage(times[i] - boss_time, damage_multiplier);
            players[i].take_damage(damage);
            boss_attack = Some((i, damage));
            narrative.add_step(format!("Boss hits player {}", i + 1), f64::from(damage));
        }
    }
    narrative.add_step("Boss HP", f64::from(boss.hp));

    let terminal = if boss.is_defeated() {
        Some(TerminalReason::Victory)
    } else if players.iter().all(Combatant::is_defeated) {
        Some(TerminalReason::Defeat)
    } else {
        None
    };

    Ok(CoopOutcome {
        hits,
        task_achieved,
        boss_attack,
        players,
        boss,
        narrative,
        terminal,
    })
}
