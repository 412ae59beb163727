//! One side of a duel.

use serde::{Deserialize, Serialize};

/// Starting and maximum HP under the base rules.
pub const BASE_MAX_HP: u32 = 50;

/// One side of a duel: health plus its current win streak.
///
/// HP is unsigned and every mutation saturates, so it can never go
/// negative.
///
/// # Examples
///
/// ```rust
/// use cubeduel::Combatant;
///
/// let mut c = Combatant::new(50);
/// c.take_damage(80);
/// assert_eq!(c.hp, 0);
/// assert!(c.is_defeated());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    /// Current health, `0..=max_hp`.
    pub hp: u32,
    /// Health cap.
    pub max_hp: u32,
    /// Consecutive round wins.
    pub combo_streak: u32,
}

impl Combatant {
    /// A fresh combatant at full health with no streak.
    pub fn new(max_hp: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            combo_streak: 0,
        }
    }

    /// Subtract damage, clamping at zero.
    pub fn take_damage(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
    }

    /// Restore health, clamping at `max_hp`.
    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Extend the streak and return its new length.
    pub fn register_win(&mut self) -> u32 {
        self.combo_streak += 1;
        self.combo_streak
    }

    pub fn register_loss(&mut self) {
        self.combo_streak = 0;
    }
}

impl Default for Combatant {
    fn default() -> Self {
        Self::new(BASE_MAX_HP)
    }
}
