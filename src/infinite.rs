//! Infinite mode: an endless run of AI opponents with quirks,
//! power-ups and scripted bosses.
//!
//! [`resolve_infinite_turn`] is the pure resolver. It runs the base
//! formula through the explicit modifier pipeline (see
//! [`modifier::PIPELINE`](crate::modifier::PIPELINE)):
//!
//! 1. **TimeAdjustment**: opponent overrides (freeze, mirror), then
//!    player time shifts (PLL Skip, lockup-style quirks).
//! 2. **WinDetermination**: the faster effective time wins, then reversal
//!    quirks flip the winner. Ties deal no damage.
//! 3. **DamageAdjustment**: base damage from the raw time difference,
//!    the early-round ramp, combo and permanent bonuses, the player's
//!    power-ups (shield blocks everything after it), then quirk damage
//!    effects. Power-ups look at the winner after any reversal.
//!
//! The player's streak bonus works as in [`resolve_turn`](crate::turn::resolve_turn),
//! so the combo rule is the same in every mode. It is added only to
//! player hits. AI hits carry the permanent bonus but no streak bonus.
//!
//! [`InfiniteRun`] owns the state around it: encounters, offers and the
//! per-run used-boss and claimed-power-up sets.

use crate::catalog::{self, Boss};
use crate::combatant::{Combatant, BASE_MAX_HP};
use crate::error::DuelError;
use crate::modifier::{
    Modifier, ModifierScope, ModifierStage, PowerUp, Quirk, QuirkEffect, HEAL_AMOUNT,
    PLL_SKIP_SECONDS, PLUS_TEN_BONUS,
};
use crate::numeric::{ceil_half, hit_damage, scale_damage};
use crate::outcome::{terminal_for, Narrative, RoundOutcome, Winner};
use crate::sampler::sample;
use crate::source::MIN_OPPONENT_TIME;
use rand::RngCore;
use serde::Serialize;
use std::collections::BTreeSet;

/// Seconds-to-damage scale in infinite mode.
pub const INFINITE_DAMAGE_MULTIPLIER: f64 = 5.0;
/// Rounds up to and including this one deal ramped damage.
pub const EARLY_ROUND_LIMIT: u32 = 5;
/// Damage factor applied during the early rounds.
pub const EARLY_ROUND_FACTOR: f64 = 1.5;
/// Extra opponent HP per cleared round.
pub const HP_PER_ROUND: u32 = 5;

/// Modifier context for one infinite-mode round.
#[derive(Debug, Clone, Copy)]
pub struct InfiniteContext<'a> {
    /// Encounter number, starting at 1.
    pub round: u32,
    /// Flat bonus accumulated from "+1 Combo Bonus" picks.
    pub perm_combo_bonus: u32,
    /// Power-ups in effect for this round.
    pub active: &'a [PowerUp],
    /// The opponent's quirk for this turn.
    pub quirk: &'a Quirk,
    /// A one-time quirk bonus has already fired while this quirk was active.
    pub quirk_spent: bool,
}

/// The result of one infinite-mode round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfiniteOutcome {
    /// The two-sided outcome. `terminal` is `Victory` when the opponent
    /// was knocked out, which ends the encounter rather than the run.
    pub round: RoundOutcome,
    /// Player time after time adjustments.
    pub effective_player_time: f64,
    /// Opponent time after time adjustments.
    pub effective_opponent_time: f64,
    /// Power-ups used up by this round.
    pub consumed: Vec<PowerUp>,
    /// Whether the shield absorbed a hit.
    pub shielded: bool,
    /// Whether a one-time quirk bonus fired this round.
    pub quirk_fired: bool,
}

#[derive(Debug, Clone, Copy)]
enum Step<'a> {
    Quirk(&'a QuirkEffect),
    PowerUp(PowerUp),
}

impl Step<'_> {
    fn stage(&self) -> Option<ModifierStage> {
        match self {
            Step::Quirk(effect) => Some(effect.stage()),
            Step::PowerUp(power_up) => power_up.stage(),
        }
    }

    fn priority(&self) -> u8 {
        match self {
            Step::Quirk(effect) => effect.priority(),
            Step::PowerUp(power_up) => power_up.priority(),
        }
    }
}

/// Resolve one infinite-mode round.
///
/// Pure: reads the two combatants and the modifier context and returns
/// the next state without touching anything.
///
/// # Examples
///
/// ```rust
/// use cubeduel::catalog::QUIRKS;
/// use cubeduel::infinite::{resolve_infinite_turn, InfiniteContext};
/// use cubeduel::{Combatant, Winner};
///
/// let lockup = QUIRKS.iter().find(|q| q.id == "lockup").unwrap();
/// let ctx = InfiniteContext {
///     round: 1,
///     perm_combo_bonus: 0,
///     active: &[],
///     quirk: lockup,
///     quirk_spent: false,
/// };
///
/// // 10.0 + 1.5 = 11.5 is slower than 11.0, so the AI wins.
/// let outcome = resolve_infinite_turn(10.0, 11.0, &Combatant::new(50), &Combatant::new(50), &ctx);
/// assert_eq!(outcome.round.winner, Winner::Opponent);
/// assert_eq!(outcome.effective_player_time, 11.5);
/// ```
pub fn resolve_infinite_turn(
    player_time: f64,
    ai_time: f64,
    player: &Combatant,
    ai: &Combatant,
    ctx: &InfiniteContext<'_>,
) -> InfiniteOutcome {
    let mut player = *player;
    let mut ai = *ai;
    let mut narrative = Narrative::default();
    narrative.add_step("Round", f64::from(ctx.round));
    narrative.add_step("Player time", player_time);
    narrative.add_step("AI time", ai_time);

    let mut steps: Vec<Step<'_>> = ctx
        .quirk
        .effects
        .iter()
        .map(Step::Quirk)
        .chain(ctx.active.iter().copied().map(Step::PowerUp))
        .filter(|s| s.stage().is_some())
        .collect();
    steps.sort_by_key(|s| (s.stage(), s.priority()));
    let in_stage = |stage: ModifierStage| {
        steps
            .iter()
            .copied()
            .filter(|s| s.stage() == Some(stage))
            .collect::<Vec<_>>()
    };

    // TimeAdjustment
    let mut p_time = player_time;
    let mut o_time = ai_time;
    for step in in_stage(ModifierStage::TimeAdjustment) {
        match step {
            Step::Quirk(QuirkEffect::FixedOpponentTime(t)) => {
                o_time = *t;
                narrative.add_step("Fixed AI time", o_time);
            }
            Step::Quirk(QuirkEffect::MirrorOpponentTime) => {
                o_time = player_time;
                narrative.add_step("Mirrored AI time", o_time);
            }
            Step::Quirk(QuirkEffect::PlayerTimeShift(shift)) => {
                p_time += shift;
                narrative.add_step("Quirk-adjusted player time", p_time);
            }
            Step::PowerUp(PowerUp::PllSkip) => {
                p_time -= PLL_SKIP_SECONDS;
                narrative.add_step("PLL Skip player time", p_time);
            }
            _ => {}
        }
    }
    let p_time = p_time.max(MIN_OPPONENT_TIME);

    // WinDetermination
    let mut winner = if p_time < o_time {
        Winner::Player
    } else if p_time > o_time {
        Winner::Opponent
    } else {
        Winner::Tie
    };
    for step in in_stage(ModifierStage::WinDetermination) {
        if let Step::Quirk(QuirkEffect::ReverseWinner) = step {
            winner = winner.reversed();
            narrative.add_step("Winner reversed", 1.0);
        }
    }

    // DamageAdjustment
    let diff = (p_time - o_time).abs();
    narrative.add_step("Difference", diff);
    let mut shielded = false;
    let mut quirk_fired = false;
    let damage = if winner == Winner::Tie {
        narrative.add_step("Tie", 0.0);
        0
    } else {
        let mut damage = hit_damage(diff, INFINITE_DAMAGE_MULTIPLIER);
        narrative.add_step("Base damage", f64::from(damage));
        if ctx.round <= EARLY_ROUND_LIMIT {
            damage = scale_damage(damage, EARLY_ROUND_FACTOR);
            narrative.add_step("Early-round ramp", f64::from(damage));
        }

        let mut damage_steps = in_stage(ModifierStage::DamageAdjustment)
            .into_iter()
            .peekable();
        while let Some(Step::Quirk(QuirkEffect::ComboBreaker)) = damage_steps.peek() {
            damage_steps.next();
            player.register_loss();
            narrative.add_step("Combo broken", 0.0);
        }

        let player_wins = winner == Winner::Player;
        if player_wins {
            ai.register_loss();
            let combo = player.register_win();
            damage = damage.saturating_add(combo);
            narrative.add_step("Combo bonus", f64::from(combo));
        } else {
            ai.register_win();
        }
        if ctx.perm_combo_bonus > 0 {
            damage = damage.saturating_add(ctx.perm_combo_bonus);
            narrative.add_step("Permanent combo bonus", f64::from(ctx.perm_combo_bonus));
        }

        for step in damage_steps {
            if shielded {
                break;
            }
            match step {
                Step::PowerUp(PowerUp::HalveNextDamage) if !player_wins => {
                    damage = ceil_half(damage);
                    narrative.add_step("Halve Next Damage", f64::from(damage));
                }
                Step::PowerUp(PowerUp::PlusTenNextHit) if player_wins => {
                    damage = damage.saturating_add(PLUS_TEN_BONUS);
                    narrative.add_step("Deal +10 Next Hit", f64::from(damage));
                }
                Step::PowerUp(PowerUp::Shield) if !player_wins => {
                    damage = 0;
                    shielded = true;
                    narrative.add_step("Shield", 0.0);
                }
                Step::Quirk(QuirkEffect::ScaleDamage(factor)) => {
                    damage = scale_damage(damage, *factor);
                    narrative.add_step("Quirk damage scale", f64::from(damage));
                }
                Step::Quirk(QuirkEffect::LuckyHit(bonus)) if !ctx.quirk_spent => {
                    damage = damage.saturating_add(*bonus);
                    quirk_fired = true;
                    narrative.add_step("Lucky Hit", f64::from(damage));
                }
                _ => {}
            }
        }

        if player_wins {
            ai.take_damage(damage);
        } else {
            if !shielded {
                player.register_loss();
            }
            player.take_damage(damage);
        }
        narrative.add_step("Total damage", f64::from(damage));
        damage
    };

    narrative.add_step("Player HP", f64::from(player.hp));
    narrative.add_step("AI HP", f64::from(ai.hp));

    let consumed = ctx
        .active
        .iter()
        .copied()
        .filter(|p| p.scope() != ModifierScope::Permanent)
        .collect();

    InfiniteOutcome {
        round: RoundOutcome {
            damage,
            winner,
            terminal: terminal_for(&player, &ai),
            player,
            opponent: ai,
            narrative,
        },
        effective_player_time: p_time,
        effective_opponent_time: o_time,
        consumed,
        shielded,
        quirk_fired,
    }
}

/// The opponent of the current encounter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opponent {
    pub name: &'static str,
    /// Set for scripted boss encounters.
    pub boss: Option<&'static Boss>,
    pub combatant: Combatant,
}

/// HP of the opponent met in `round`.
pub fn opponent_hp(round: u32) -> u32 {
    BASE_MAX_HP + HP_PER_ROUND * round.saturating_sub(1)
}

/// What happened to the run after a round was applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub outcome: InfiniteOutcome,
    /// The opponent was knocked out and the next round began.
    pub encounter_cleared: bool,
    /// The player was knocked out; the run is over.
    pub run_over: bool,
    /// Power-ups on offer, if this round earned a choice. Empty on every
    /// other round; see [`InfiniteRun::pending_offer`] for an open offer.
    pub offer: Vec<PowerUp>,
    /// Best round reached across runs, for the host to persist.
    pub best_round: u32,
}

/// State of one infinite-mode run.
///
/// # Examples
///
/// ```rust
/// use cubeduel::infinite::InfiniteRun;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let mut run = InfiniteRun::new(0, &mut rng);
/// let report = run.submit(1.0, &mut rng);
/// assert!(report.best_round >= 1);
/// ```
#[derive(Debug, Clone)]
pub struct InfiniteRun {
    round: u32,
    player: Combatant,
    opponent: Opponent,
    quirk: &'static Quirk,
    quirk_spent: bool,
    ai_time: f64,
    perm_combo_bonus: u32,
    active: Vec<PowerUp>,
    offer: Vec<PowerUp>,
    claimed: BTreeSet<PowerUp>,
    bosses_used: BTreeSet<&'static str>,
    best_round: u32,
    cleared: u32,
}

impl InfiniteRun {
    /// Start a run at round 1. `best_round` is the value the host
    /// persisted from earlier runs.
    pub fn new(best_round: u32, rng: &mut dyn RngCore) -> Self {
        let quirk = &catalog::QUIRKS[0];
        let mut run = Self {
            round: 1,
            player: Combatant::new(BASE_MAX_HP),
            opponent: Opponent {
                name: "",
                boss: None,
                combatant: Combatant::new(opponent_hp(1)),
            },
            quirk,
            quirk_spent: false,
            ai_time: 0.0,
            perm_combo_bonus: 0,
            active: Vec::new(),
            offer: Vec::new(),
            claimed: BTreeSet::new(),
            bosses_used: BTreeSet::new(),
            best_round: best_round.max(1),
            cleared: 0,
        };
        run.start_encounter(rng);
        run
    }

    fn start_encounter(&mut self, rng: &mut dyn RngCore) {
        let hp = opponent_hp(self.round);
        self.quirk_spent = false;
        self.opponent = if catalog::is_boss_round(self.round) {
            let boss = catalog::draw_boss(rng, &mut self.bosses_used);
            self.quirk = &boss.superquirk;
            Opponent {
                name: boss.name,
                boss: Some(boss),
                combatant: Combatant::new(hp + boss.bonus_hp),
            }
        } else {
            Opponent {
                name: catalog::draw_name(rng),
                boss: None,
                combatant: Combatant::new(hp),
            }
        };
        tracing::debug!(
            round = self.round,
            opponent = self.opponent.name,
            boss = self.opponent.boss.is_some(),
            hp = self.opponent.combatant.hp,
            "infinite encounter started"
        );
        self.begin_turn(rng);
    }

    /// Draw the quirk and AI time for the next turn.
    ///
    /// Regular opponents draw a fresh quirk every turn. A boss keeps its
    /// superquirk for the whole encounter and shifts the mean by its
    /// speed edge.
    pub fn begin_turn(&mut self, rng: &mut dyn RngCore) {
        let round = f64::from(self.round);
        let offset = self.opponent.boss.map_or(0.0, |b| b.mean_offset);
        if self.opponent.boss.is_none() {
            self.quirk = catalog::draw_quirk(rng);
            self.quirk_spent = false;
        }
        let mean = 12.0 + round + offset;
        self.ai_time = sample(rng, mean, 1.2 + 0.1 * round).max(MIN_OPPONENT_TIME);
    }

    /// Apply a player's time, advancing to the next encounter if the
    /// opponent falls.
    pub fn submit(&mut self, player_time: f64, rng: &mut dyn RngCore) -> RunReport {
        let ctx = InfiniteContext {
            round: self.round,
            perm_combo_bonus: self.perm_combo_bonus,
            active: &self.active,
            quirk: self.quirk,
            quirk_spent: self.quirk_spent,
        };
        let outcome = resolve_infinite_turn(
            player_time,
            self.ai_time,
            &self.player,
            &self.opponent.combatant,
            &ctx,
        );

        self.player = outcome.round.player;
        self.opponent.combatant = outcome.round.opponent;
        self.active.retain(|p| !outcome.consumed.contains(p));
        self.quirk_spent |= outcome.quirk_fired;

        let run_over = self.player.is_defeated();
        let encounter_cleared = !run_over && self.opponent.combatant.is_defeated();
        let mut offer = Vec::new();
        if encounter_cleared {
            self.cleared += 1;
            self.round += 1;
            if self.cleared % 2 == 0 {
                self.offer = catalog::draw_offer(rng, &mut self.claimed);
                offer = self.offer.clone();
                tracing::debug!(offer = ?self.offer, "power-up offer");
            }
            self.start_encounter(rng);
        } else if !run_over {
            self.begin_turn(rng);
        }

        if self.round > self.best_round {
            self.best_round = self.round;
            tracing::info!(best_round = self.best_round, "new best round");
        }

        RunReport {
            outcome,
            encounter_cleared,
            run_over,
            offer,
            best_round: self.best_round,
        }
    }

    /// Claim one power-up from the pending offer.
    pub fn choose_power_up(&mut self, index: usize) -> Result<PowerUp, DuelError> {
        if self.offer.is_empty() {
            return Err(DuelError::NoPowerUpOffer);
        }
        let power_up = *self
            .offer
            .get(index)
            .ok_or(DuelError::InvalidPowerUpChoice {
                index,
                offered: self.offer.len(),
            })?;
        self.offer.clear();
        self.claimed.insert(power_up);
        match power_up {
            PowerUp::Heal => self.player.heal(HEAL_AMOUNT),
            PowerUp::PermanentCombo => self.perm_combo_bonus += 1,
            _ => self.active.push(power_up),
        }
        tracing::debug!(
            power_up = power_up.id(),
            immediate = power_up.applies_on_claim(),
            "power-up claimed"
        );
        Ok(power_up)
    }

    /// The AI's time for this turn, if "See AI Time" is active.
    pub fn revealed_ai_time(&self) -> Option<f64> {
        self.active
            .contains(&PowerUp::SeeAiTime)
            .then_some(self.ai_time)
    }

    /// Every modifier currently in effect.
    pub fn active_modifiers(&self) -> Vec<Modifier> {
        std::iter::once(Modifier::Quirk(self.quirk))
            .chain(self.active.iter().copied().map(Modifier::PowerUp))
            .collect()
    }

    /// Current encounter number, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn opponent(&self) -> &Opponent {
        &self.opponent
    }

    pub fn quirk(&self) -> &'static Quirk {
        self.quirk
    }

    pub fn perm_combo_bonus(&self) -> u32 {
        self.perm_combo_bonus
    }

    pub fn active_power_ups(&self) -> &[PowerUp] {
        &self.active
    }

    pub fn pending_offer(&self) -> &[PowerUp] {
        &self.offer
    }

    pub fn best_round(&self) -> u32 {
        self.best_round
    }

    pub fn bosses_used(&self) -> &BTreeSet<&'static str> {
        &self.bosses_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QUIRKS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quirk(id: &str) -> &'static Quirk {
        QUIRKS.iter().find(|q| q.id == id).unwrap()
    }

    fn ctx<'a>(round: u32, active: &'a [PowerUp], quirk: &'a Quirk) -> InfiniteContext<'a> {
        InfiniteContext {
            round,
            perm_combo_bonus: 0,
            active,
            quirk,
            quirk_spent: false,
        }
    }

    #[test]
    fn test_base_formula_late_round() {
        let c = Combatant::new(50);
        let out = resolve_infinite_turn(10.0, 12.0, &c, &c, &ctx(6, &[], quirk("none")));
        // round(2 × 5 + 5) + combo 1
        assert_eq!(out.round.damage, 16);
        assert_eq!(out.round.opponent.hp, 34);
    }

    #[test]
    fn test_early_round_ramp() {
        let c = Combatant::new(50);
        let out = resolve_infinite_turn(10.0, 12.0, &c, &c, &ctx(1, &[], quirk("none")));
        // round(15 × 1.5) = 23, + combo 1
        assert_eq!(out.round.damage, 24);
    }

    #[test]
    fn test_reverse_keeps_magnitude() {
        let c = Combatant::new(50);
        let out = resolve_infinite_turn(10.0, 12.0, &c, &c, &ctx(6, &[], quirk("reverse")));
        assert_eq!(out.round.winner, Winner::Opponent);
        assert_eq!(out.round.damage, 15);
        assert_eq!(out.round.player.hp, 35);
    }

    #[test]
    fn test_freeze_fixes_ai_time() {
        let c = Combatant::new(50);
        let out = resolve_infinite_turn(11.0, 30.0, &c, &c, &ctx(6, &[], quirk("freeze")));
        assert_eq!(out.effective_opponent_time, 12.0);
        assert_eq!(out.round.winner, Winner::Player);
    }

    #[test]
    fn test_mirror_is_a_tie() {
        let c = Combatant::new(50);
        let out = resolve_infinite_turn(11.0, 14.0, &c, &c, &ctx(6, &[], quirk("mirror")));
        assert_eq!(out.round.winner, Winner::Tie);
        assert_eq!(out.round.damage, 0);
    }

    #[test]
    fn test_mirror_then_pll_skip() {
        let c = Combatant::new(50);
        let active = [PowerUp::PllSkip];
        let out = resolve_infinite_turn(11.0, 14.0, &c, &c, &ctx(6, &active, quirk("mirror")));
        assert_eq!(out.effective_opponent_time, 11.0);
        assert_eq!(out.effective_player_time, 9.0);
        assert_eq!(out.round.winner, Winner::Player);
        assert_eq!(out.consumed, vec![PowerUp::PllSkip]);
    }

    #[test]
    fn test_halve_rounds_up() {
        let c = Combatant::new(50);
        let active = [PowerUp::HalveNextDamage];
        let out = resolve_infinite_turn(12.0, 10.0, &c, &c, &ctx(6, &active, quirk("none")));
        // base 15, no combo on an AI hit, halved up to 8
        assert_eq!(out.round.damage, 8);
    }

    #[test]
    fn test_plus_ten_only_on_win() {
        let c = Combatant::new(50);
        let active = [PowerUp::PlusTenNextHit];
        let win = resolve_infinite_turn(10.0, 12.0, &c, &c, &ctx(6, &active, quirk("none")));
        assert_eq!(win.round.damage, 26);
        let lose = resolve_infinite_turn(12.0, 10.0, &c, &c, &ctx(6, &active, quirk("none")));
        assert_eq!(lose.round.damage, 15);
        assert_eq!(lose.consumed, vec![PowerUp::PlusTenNextHit]);
    }

    #[test]
    fn test_shield_blocks_quirk_damage_and_keeps_streak() {
        let mut player = Combatant::new(50);
        player.combo_streak = 2;
        let ai = Combatant::new(50);
        let active = [PowerUp::Shield];
        let out = resolve_infinite_turn(
            12.0,
            10.0,
            &player,
            &ai,
            &ctx(6, &active, quirk("lucky_hit")),
        );
        assert_eq!(out.round.damage, 0);
        assert!(out.shielded);
        assert_eq!(out.round.player.hp, 50);
        assert_eq!(out.round.player.combo_streak, 2);
    }

    #[test]
    fn test_double_damage_and_lucky_hit() {
        let c = Combatant::new(50);
        let out = resolve_infinite_turn(10.0, 12.0, &c, &c, &ctx(6, &[], quirk("double_damage")));
        assert_eq!(out.round.damage, 32);
        let out = resolve_infinite_turn(10.0, 12.0, &c, &c, &ctx(6, &[], quirk("lucky_hit")));
        assert_eq!(out.round.damage, 26);
    }

    #[test]
    fn test_combo_breaker_resets_before_bonus() {
        let mut player = Combatant::new(50);
        player.combo_streak = 4;
        let ai = Combatant::new(50);
        let out = resolve_infinite_turn(
            10.0,
            12.0,
            &player,
            &ai,
            &ctx(6, &[], quirk("combo_breaker")),
        );
        assert_eq!(out.round.damage, 16);
        assert_eq!(out.round.player.combo_streak, 1);
    }

    #[test]
    fn test_perm_bonus_applies_to_every_hit() {
        let c = Combatant::new(50);
        let none = quirk("none");
        let mut context = ctx(6, &[], none);
        context.perm_combo_bonus = 3;
        let win = resolve_infinite_turn(10.0, 12.0, &c, &c, &context);
        assert_eq!(win.round.damage, 19);
        let lose = resolve_infinite_turn(12.0, 10.0, &c, &c, &context);
        assert_eq!(lose.round.damage, 18);
    }

    #[test]
    fn test_lucky_hit_fires_once() {
        let c = Combatant::new(50);
        let lucky = quirk("lucky_hit");
        let mut context = ctx(6, &[], lucky);
        let first = resolve_infinite_turn(10.0, 12.0, &c, &c, &context);
        assert!(first.quirk_fired);
        context.quirk_spent = true;
        let second = resolve_infinite_turn(10.0, 12.0, &c, &c, &context);
        assert!(!second.quirk_fired);
        assert_eq!(second.round.damage, 16);
    }

    #[test]
    fn test_ai_hits_carry_no_combo() {
        let c = Combatant::new(50);
        let none = quirk("none");
        let first = resolve_infinite_turn(12.0, 10.0, &c, &c, &ctx(6, &[], none));
        let again = resolve_infinite_turn(
            12.0,
            10.0,
            &first.round.player,
            &first.round.opponent,
            &ctx(6, &[], none),
        );
        assert_eq!(again.round.damage, 15);
        assert_eq!(again.round.player.hp, 20);
    }

    #[test]
    fn test_choose_power_up_without_offer() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut run = InfiniteRun::new(0, &mut rng);
        assert_eq!(run.choose_power_up(0), Err(DuelError::NoPowerUpOffer));
    }

    #[test]
    fn test_opponent_hp_scales() {
        assert_eq!(opponent_hp(1), 50);
        assert_eq!(opponent_hp(2), 55);
        assert_eq!(opponent_hp(10), 95);
    }
}
