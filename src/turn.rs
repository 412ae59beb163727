//! Single-player and hotseat round resolution.
//!
//! This is the base formula every other mode specializes:
//!
//! ```text
//! diff = |player - opponent|
//! damage = round(diff × multiplier + 5) + winner's new streak
//! ```

use crate::combatant::Combatant;
use crate::numeric::hit_damage;
use crate::outcome::{terminal_for, Narrative, RoundOutcome, Winner};

/// Resolve one round between two sides.
///
/// The faster side wins, extends its streak and deals
/// `round(diff × multiplier + 5) + new_streak` damage. The slower side's
/// streak resets. Equal times deal nothing and leave both streaks alone.
/// The function is symmetric, so hotseat play uses it with the second
/// player on the opponent side.
///
/// # Examples
///
/// ```rust
/// use cubeduel::{resolve_turn, Combatant, Winner};
///
/// let player = Combatant::new(50);
/// let opponent = Combatant::new(50);
///
/// let outcome = resolve_turn(10.0, 11.0, &player, &opponent, 5.0);
/// assert_eq!(outcome.winner, Winner::Player);
/// // round(1.0 × 5 + 5) + 1 combo
/// assert_eq!(outcome.damage, 11);
/// assert_eq!(outcome.opponent.hp, 39);
/// assert_eq!(outcome.player.combo_streak, 1);
/// ```
pub fn resolve_turn(
    player_time: f64,
    opponent_time: f64,
    player: &Combatant,
    opponent: &Combatant,
    damage_multiplier: f64,
) -> RoundOutcome {
    let mut player = *player;
    let mut opponent = *opponent;
    let mut narrative = Narrative::default();
    narrative.add_step("Player time", player_time);
    narrative.add_step("Opponent time", opponent_time);

    let diff = (player_time - opponent_time).abs();
    narrative.add_step("Difference", diff);

    let (winner, damage) = if player_time == opponent_time {
        narrative.add_step("Tie", 0.0);
        (Winner::Tie, 0)
    } else {
        let player_wins = player_time < opponent_time;
        let (win_side, lose_side) = if player_wins {
            (&mut player, &mut opponent)
        } else {
            (&mut opponent, &mut player)
        };

        let base = hit_damage(diff, damage_multiplier);
        let combo = win_side.register_win();
        lose_side.register_loss();
        let total = base.saturating_add(combo);
        lose_side.take_damage(total);

        narrative.add_step("Base damage", f64::from(base));
        narrative.add_step("Combo bonus", f64::from(combo));
        narrative.add_step("Total damage", f64::from(total));

        let winner = if player_wins {
            Winner::Player
        } else {
            Winner::Opponent
        };
        (winner, total)
    };

    narrative.add_step("Player HP", f64::from(player.hp));
    narrative.add_step("Opponent HP", f64::from(opponent.hp));

    RoundOutcome {
        damage,
        winner,
        terminal: terminal_for(&player, &opponent),
        player,
        opponent,
        narrative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::TerminalReason;

    #[test]
    fn test_tie_changes_nothing() {
        let mut player = Combatant::new(50);
        player.combo_streak = 3;
        let opponent = Combatant::new(50);

        let outcome = resolve_turn(12.34, 12.34, &player, &opponent, 5.0);
        assert_eq!(outcome.winner, Winner::Tie);
        assert_eq!(outcome.damage, 0);
        assert_eq!(outcome.player, player);
        assert_eq!(outcome.opponent, opponent);
        assert!(!outcome.is_terminal());
    }

    #[test]
    fn test_opponent_win_resets_player_streak() {
        let mut player = Combatant::new(50);
        player.combo_streak = 4;
        let opponent = Combatant::new(50);

        let outcome = resolve_turn(12.0, 10.0, &player, &opponent, 5.0);
        assert_eq!(outcome.winner, Winner::Opponent);
        // round(2 × 5 + 5) + 1
        assert_eq!(outcome.damage, 16);
        assert_eq!(outcome.player.hp, 34);
        assert_eq!(outcome.player.combo_streak, 0);
        assert_eq!(outcome.opponent.combo_streak, 1);
    }

    #[test]
    fn test_combo_bonus_grows() {
        let mut player = Combatant::new(50);
        player.combo_streak = 2;
        let opponent = Combatant::new(50);

        let outcome = resolve_turn(10.0, 10.5, &player, &opponent, 5.0);
        // round(0.5 × 5 + 5) = round(7.5) = 8, plus streak 3
        assert_eq!(outcome.damage, 11);
        assert_eq!(outcome.player.combo_streak, 3);
        assert_eq!(outcome.narrative.value_of("Combo bonus"), Some(3.0));
    }

    #[test]
    fn test_hp_clamps_and_terminates() {
        let player = Combatant::new(50);
        let mut opponent = Combatant::new(50);
        opponent.hp = 5;

        let outcome = resolve_turn(5.0, 15.0, &player, &opponent, 5.0);
        assert_eq!(outcome.opponent.hp, 0);
        assert_eq!(outcome.terminal, Some(TerminalReason::Victory));
    }

    #[test]
    fn test_custom_multiplier() {
        let player = Combatant::new(50);
        let opponent = Combatant::new(50);

        let outcome = resolve_turn(10.0, 11.0, &player, &opponent, 10.0);
        // round(1 × 10 + 5) + 1
        assert_eq!(outcome.damage, 16);
    }

    #[test]
    fn test_huge_loss_margin_knocks_out() {
        let mut player = Combatant::new(50);
        player.combo_streak = 2;
        let mut opponent = Combatant::new(50);
        opponent.combo_streak = 3;

        let outcome = resolve_turn(858_993_468.2, 10.0, &player, &opponent, 5.0);
        assert_eq!(outcome.winner, Winner::Opponent);
        assert_eq!(outcome.damage, u32::MAX);
        assert_eq!(outcome.player.hp, 0);
        assert_eq!(outcome.terminal, Some(TerminalReason::Defeat));
    }
}
