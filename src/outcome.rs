//! Round outcome records.
//!
//! Contains the `RoundOutcome` type produced by every duel resolver,
//! along with the `Narrative` trace of formula steps that led to it.
//! Outcomes are plain data: they can be cloned, compared and
//! serialized for a rendering sink.

use crate::combatant::Combatant;
use serde::Serialize;

/// Which side won a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Winner {
    Player,
    Opponent,
    Tie,
}

impl Winner {
    /// Swap player and opponent; a tie stays a tie.
    pub fn reversed(self) -> Self {
        match self {
            Winner::Player => Winner::Opponent,
            Winner::Opponent => Winner::Player,
            Winner::Tie => Winner::Tie,
        }
    }
}

/// Why a battle ended, from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminalReason {
    /// The player's side reached 0 HP. Also chosen when both sides hit 0
    /// in the same round.
    Defeat,
    /// The opposing side reached 0 HP.
    Victory,
}

/// Decide whether a pair of HP values ends the battle.
///
/// The player's HP is checked first, so a double knockout is a defeat.
pub fn terminal_for(player: &Combatant, opponent: &Combatant) -> Option<TerminalReason> {
    if player.is_defeated() {
        Some(TerminalReason::Defeat)
    } else if opponent.is_defeated() {
        Some(TerminalReason::Victory)
    } else {
        None
    }
}

/// Step-by-step trace of how an outcome was computed.
///
/// Each entry is `(description, value)`. Entries are listed in the order
/// the steps ran.
///
/// # Examples
///
/// ```rust
/// use cubeduel::Narrative;
///
/// let mut narrative = Narrative::default();
/// narrative.add_step("Player time", 10.5);
/// narrative.add_step("Opponent time", 11.0);
/// assert_eq!(narrative.steps.len(), 2);
/// assert_eq!(narrative.steps[0].0, "Player time");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Narrative {
    pub steps: Vec<(String, f64)>,
}

impl Narrative {
    /// Append one step to the trace.
    pub fn add_step(&mut self, description: impl Into<String>, value: f64) {
        self.steps.push((description.into(), value));
    }

    /// Look up the value of the first step with the given description.
    pub fn value_of(&self, description: &str) -> Option<f64> {
        self.steps
            .iter()
            .find(|(desc, _)| desc == description)
            .map(|(_, value)| *value)
    }

    /// Render the trace as one line per step.
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .map(|(desc, value)| format!("{}: {:.2}", desc, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The result of resolving one two-sided round.
///
/// Read-only and replay-safe: resolvers build it from their inputs
/// without touching any shared state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundOutcome {
    /// Damage dealt to the loser; zero on a tie or a blocked hit.
    pub damage: u32,
    pub winner: Winner,
    /// Player side after the round.
    pub player: Combatant,
    /// Opponent side after the round.
    pub opponent: Combatant,
    pub narrative: Narrative,
    /// `Some` when this round ended the battle.
    pub terminal: Option<TerminalReason>,
}

impl RoundOutcome {
    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed() {
        assert_eq!(Winner::Player.reversed(), Winner::Opponent);
        assert_eq!(Winner::Opponent.reversed(), Winner::Player);
        assert_eq!(Winner::Tie.reversed(), Winner::Tie);
    }

    #[test]
    fn test_double_knockout_is_defeat() {
        let mut a = Combatant::new(50);
        let mut b = Combatant::new(50);
        a.take_damage(50);
        b.take_damage(50);
        assert_eq!(terminal_for(&a, &b), Some(TerminalReason::Defeat));
    }

    #[test]
    fn test_terminal_none_while_alive() {
        let a = Combatant::new(50);
        let mut b = Combatant::new(50);
        assert_eq!(terminal_for(&a, &b), None);
        b.take_damage(49);
        assert_eq!(terminal_for(&a, &b), None);
        b.take_damage(1);
        assert_eq!(terminal_for(&a, &b), Some(TerminalReason::Victory));
    }

    #[test]
    fn test_narrative_lookup_and_render() {
        let mut narrative = Narrative::default();
        narrative.add_step("Base damage", 10.0);
        narrative.add_step("Combo bonus", 2.0);
        assert_eq!(narrative.value_of("Combo bonus"), Some(2.0));
        assert_eq!(narrative.value_of("Missing"), None);
        assert_eq!(narrative.render(), "Base damage: 10.00\nCombo bonus: 2.00");
    }
}
