//! Quirks, power-ups and the stages they run in.
//!
//! Every modifier is a closed enum variant carrying the data its
//! transform needs. Modifiers never run in registration order: each one
//! declares the pipeline stage it belongs to and a priority inside that
//! stage, and the infinite-mode resolver applies them stage by stage.
//!
//! ```text
//! TimeAdjustment → WinDetermination → DamageAdjustment
//! ```

use serde::Serialize;

/// Pipeline stage a modifier runs in.
///
/// Stages run in declaration order. Anything that changes the input
/// times must run before the winner is decided. Anything that changes
/// damage runs after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ModifierStage {
    /// Alter the player's or opponent's time before comparison.
    TimeAdjustment,
    /// Decide, or flip, who won.
    WinDetermination,
    /// Scale, add to or block damage once the winner is fixed.
    DamageAdjustment,
}

/// Stages in the order the resolver runs them.
pub const PIPELINE: [ModifierStage; 3] = [
    ModifierStage::TimeAdjustment,
    ModifierStage::WinDetermination,
    ModifierStage::DamageAdjustment,
];

/// Whether a modifier belongs to the opponent or was picked by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ModifierKind {
    Quirk,
    PowerUp,
}

/// How long a modifier stays in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ModifierScope {
    /// Applied once, then gone.
    OneShot,
    /// In effect for the next resolved round only.
    PerRound,
    /// In effect for the rest of the run.
    Permanent,
}

/// A single effect a quirk can carry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum QuirkEffect {
    /// Force the opponent's time to a constant.
    FixedOpponentTime(f64),
    /// The opponent copies the player's submitted time.
    MirrorOpponentTime,
    /// Add seconds to the player's time (negative values help).
    PlayerTimeShift(f64),
    /// The slower solver wins.
    ReverseWinner,
    /// Reset the player's streak before the combo bonus is counted.
    ComboBreaker,
    /// Multiply damage, rounding half-up.
    ScaleDamage(f64),
    /// Flat bonus added to the round's hit.
    LuckyHit(u32),
}

impl QuirkEffect {
    pub fn stage(&self) -> ModifierStage {
        match self {
            QuirkEffect::FixedOpponentTime(_)
            | QuirkEffect::MirrorOpponentTime
            | QuirkEffect::PlayerTimeShift(_) => ModifierStage::TimeAdjustment,
            QuirkEffect::ReverseWinner => ModifierStage::WinDetermination,
            QuirkEffect::ComboBreaker | QuirkEffect::ScaleDamage(_) | QuirkEffect::LuckyHit(_) => {
                ModifierStage::DamageAdjustment
            }
        }
    }

    /// Order inside the stage; lower runs first.
    ///
    /// Opponent time overrides run before player time shifts, so a mirror
    /// copies the time the player actually submitted. Combo resets run
    /// before any damage is counted. Quirk damage effects run after the
    /// player's power-ups.
    pub fn priority(&self) -> u8 {
        match self {
            QuirkEffect::FixedOpponentTime(_) => 0,
            QuirkEffect::MirrorOpponentTime => 1,
            QuirkEffect::PlayerTimeShift(_) => 11,
            QuirkEffect::ReverseWinner => 10,
            QuirkEffect::ComboBreaker => 0,
            QuirkEffect::ScaleDamage(_) => 30,
            QuirkEffect::LuckyHit(_) => 31,
        }
    }
}

/// A named rule change attached to an opponent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quirk {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub effects: &'static [QuirkEffect],
}

/// A player-chosen modifier in infinite mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PowerUp {
    /// Restore 20 HP when claimed.
    Heal,
    /// Damage taken next round is halved, rounding up.
    HalveNextDamage,
    /// The opponent's time for next round is revealed before submitting.
    SeeAiTime,
    /// +1 flat damage on every hit for the rest of the run.
    PermanentCombo,
    /// Block all damage taken next round.
    Shield,
    /// +10 damage if the player wins next round.
    PlusTenNextHit,
    /// Subtract 2 seconds from the player's next time.
    PllSkip,
}

/// HP restored by [`PowerUp::Heal`].
pub const HEAL_AMOUNT: u32 = 20;
/// Bonus damage from [`PowerUp::PlusTenNextHit`].
pub const PLUS_TEN_BONUS: u32 = 10;
/// Seconds removed by [`PowerUp::PllSkip`].
pub const PLL_SKIP_SECONDS: f64 = 2.0;

impl PowerUp {
    /// Every power-up, in offer-pool order.
    pub const ALL: [PowerUp; 7] = [
        PowerUp::Heal,
        PowerUp::HalveNextDamage,
        PowerUp::SeeAiTime,
        PowerUp::PermanentCombo,
        PowerUp::Shield,
        PowerUp::PlusTenNextHit,
        PowerUp::PllSkip,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PowerUp::Heal => "heal_20",
            PowerUp::HalveNextDamage => "halve_next_damage",
            PowerUp::SeeAiTime => "see_ai_time",
            PowerUp::PermanentCombo => "perm_combo",
            PowerUp::Shield => "shield",
            PowerUp::PlusTenNextHit => "plus10_next",
            PowerUp::PllSkip => "pll_skip",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PowerUp::Heal => "Heal 20 HP",
            PowerUp::HalveNextDamage => "Halve Next Damage",
            PowerUp::SeeAiTime => "See AI Time",
            PowerUp::PermanentCombo => "+1 Combo Bonus",
            PowerUp::Shield => "Shield",
            PowerUp::PlusTenNextHit => "Deal +10 Next Hit",
            PowerUp::PllSkip => "PLL Skip",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PowerUp::Heal => "Restore 20 HP (cannot exceed max).",
            PowerUp::HalveNextDamage => "Next round: all damage to you is halved.",
            PowerUp::SeeAiTime => "Next round: see the AI's time before submitting.",
            PowerUp::PermanentCombo => "Permanently gain +1 combo bonus.",
            PowerUp::Shield => "Block all damage next round.",
            PowerUp::PlusTenNextHit => "Next time you deal damage, add +10.",
            PowerUp::PllSkip => "Your next solve counts 2 seconds faster.",
        }
    }

    pub fn scope(&self) -> ModifierScope {
        match self {
            PowerUp::Heal | PowerUp::PllSkip => ModifierScope::OneShot,
            PowerUp::HalveNextDamage
            | PowerUp::SeeAiTime
            | PowerUp::Shield
            | PowerUp::PlusTenNextHit => ModifierScope::PerRound,
            PowerUp::PermanentCombo => ModifierScope::Permanent,
        }
    }

    /// Whether the effect is spent the moment it is claimed.
    pub fn applies_on_claim(&self) -> bool {
        matches!(self, PowerUp::Heal | PowerUp::PermanentCombo)
    }

    /// Stage this power-up runs in, or `None` if it never touches the
    /// round pipeline.
    pub fn stage(&self) -> Option<ModifierStage> {
        match self {
            PowerUp::PllSkip => Some(ModifierStage::TimeAdjustment),
            PowerUp::HalveNextDamage | PowerUp::PlusTenNextHit | PowerUp::Shield => {
                Some(ModifierStage::DamageAdjustment)
            }
            PowerUp::Heal | PowerUp::SeeAiTime | PowerUp::PermanentCombo => None,
        }
    }

    /// Order inside the stage; shares the scale used by [`QuirkEffect`].
    pub fn priority(&self) -> u8 {
        match self {
            PowerUp::PllSkip => 10,
            PowerUp::HalveNextDamage => 20,
            PowerUp::PlusTenNextHit => 21,
            PowerUp::Shield => 22,
            PowerUp::Heal | PowerUp::SeeAiTime | PowerUp::PermanentCombo => u8::MAX,
        }
    }
}

/// Any modifier in effect for a round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Modifier {
    Quirk(&'static Quirk),
    PowerUp(PowerUp),
}

impl Modifier {
    pub fn id(&self) -> &'static str {
        match self {
            Modifier::Quirk(q) => q.id,
            Modifier::PowerUp(p) => p.id(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Modifier::Quirk(q) => q.name,
            Modifier::PowerUp(p) => p.name(),
        }
    }

    pub fn kind(&self) -> ModifierKind {
        match self {
            Modifier::Quirk(_) => ModifierKind::Quirk,
            Modifier::PowerUp(_) => ModifierKind::PowerUp,
        }
    }

    pub fn scope(&self) -> ModifierScope {
        match self {
            Modifier::Quirk(_) => ModifierScope::PerRound,
            Modifier::PowerUp(p) => p.scope(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(ModifierStage::TimeAdjustment < ModifierStage::WinDetermination);
        assert!(ModifierStage::WinDetermination < ModifierStage::DamageAdjustment);
        let mut sorted = PIPELINE;
        sorted.sort();
        assert_eq!(sorted, PIPELINE);
    }

    #[test]
    fn test_time_effects_precede_win_determination() {
        let time_effects = [
            QuirkEffect::FixedOpponentTime(12.0),
            QuirkEffect::MirrorOpponentTime,
            QuirkEffect::PlayerTimeShift(1.5),
        ];
        for effect in time_effects {
            assert_eq!(effect.stage(), ModifierStage::TimeAdjustment);
        }
        assert_eq!(PowerUp::PllSkip.stage(), Some(ModifierStage::TimeAdjustment));
    }

    #[test]
    fn test_overrides_before_shifts() {
        assert!(
            QuirkEffect::MirrorOpponentTime.priority()
                < QuirkEffect::PlayerTimeShift(1.0).priority()
        );
        assert!(QuirkEffect::FixedOpponentTime(12.0).priority() < PowerUp::PllSkip.priority());
    }

    #[test]
    fn test_shield_after_other_power_ups_and_before_quirks() {
        assert!(PowerUp::HalveNextDamage.priority() < PowerUp::Shield.priority());
        assert!(PowerUp::PlusTenNextHit.priority() < PowerUp::Shield.priority());
        assert!(PowerUp::Shield.priority() < QuirkEffect::ScaleDamage(2.0).priority());
    }

    #[test]
    fn test_power_up_ids_unique() {
        let mut ids: Vec<&str> = PowerUp::ALL.iter().map(|p| p.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), PowerUp::ALL.len());
    }

    #[test]
    fn test_modifier_metadata() {
        let m = Modifier::PowerUp(PowerUp::PermanentCombo);
        assert_eq!(m.kind(), ModifierKind::PowerUp);
        assert_eq!(m.scope(), ModifierScope::Permanent);
        assert_eq!(m.id(), "perm_combo");
    }
}
