//! Immutable infinite-mode content tables.
//!
//! Quirks, bosses and opponent names are loaded once as `static` data.
//! Per-run "already used" tracking lives in the run state and is passed
//! into the selection helpers here; the tables themselves never change.

use crate::modifier::{PowerUp, Quirk, QuirkEffect};
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::Serialize;
use std::collections::BTreeSet;

/// Quirks regular opponents draw from each round.
pub static QUIRKS: &[Quirk] = &[
    Quirk {
        id: "none",
        name: "No Quirk",
        description: "No special effect this round.",
        effects: &[],
    },
    Quirk {
        id: "double_damage",
        name: "Double Damage",
        description: "All damage is doubled this round.",
        effects: &[QuirkEffect::ScaleDamage(2.0)],
    },
    Quirk {
        id: "sturdy",
        name: "Sturdy",
        description: "All damage is halved this round.",
        effects: &[QuirkEffect::ScaleDamage(0.5)],
    },
    Quirk {
        id: "reverse",
        name: "Reverse Win/Lose",
        description: "Slower solver wins this round!",
        effects: &[QuirkEffect::ReverseWinner],
    },
    Quirk {
        id: "freeze",
        name: "Time Freeze",
        description: "AI always gets the same time (12.00s).",
        effects: &[QuirkEffect::FixedOpponentTime(12.0)],
    },
    Quirk {
        id: "mirror",
        name: "Mirror Match",
        description: "AI copies your time this round.",
        effects: &[QuirkEffect::MirrorOpponentTime],
    },
    Quirk {
        id: "combo_breaker",
        name: "Combo Breaker",
        description: "Combos reset every turn.",
        effects: &[QuirkEffect::ComboBreaker],
    },
    Quirk {
        id: "lucky_hit",
        name: "Lucky Hit",
        description: "First hit this round deals +10 bonus damage.",
        effects: &[QuirkEffect::LuckyHit(10)],
    },
    Quirk {
        id: "lockup",
        name: "Lockup",
        description: "Your time counts 1.5s slower.",
        effects: &[QuirkEffect::PlayerTimeShift(1.5)],
    },
    Quirk {
        id: "parity",
        name: "Parity",
        description: "Your time counts 2s slower.",
        effects: &[QuirkEffect::PlayerTimeShift(2.0)],
    },
    Quirk {
        id: "lookahead",
        name: "Lookahead",
        description: "Your time counts 1s faster.",
        effects: &[QuirkEffect::PlayerTimeShift(-1.0)],
    },
];

/// A scripted opponent with a superquirk that holds for its whole
/// encounter.
#[derive(Debug, PartialEq, Serialize)]
pub struct Boss {
    pub id: &'static str,
    pub name: &'static str,
    pub superquirk: Quirk,
    /// Added to the round's mean AI time (negative is faster).
    pub mean_offset: f64,
    /// Extra HP on top of the round's scaled HP.
    pub bonus_hp: u32,
}

pub static BOSSES: &[Boss] = &[
    Boss {
        id: "scramble_king",
        name: "Scramble King",
        superquirk: Quirk {
            id: "parity_storm",
            name: "Parity Storm",
            description: "Your time counts 2s slower and damage is ×1.5.",
            effects: &[
                QuirkEffect::PlayerTimeShift(2.0),
                QuirkEffect::ScaleDamage(1.5),
            ],
        },
        mean_offset: -0.5,
        bonus_hp: 10,
    },
    Boss {
        id: "frostbite",
        name: "Frostbite",
        superquirk: Quirk {
            id: "absolute_zero",
            name: "Absolute Zero",
            description: "Frostbite always gets 11.00s and damage is doubled.",
            effects: &[
                QuirkEffect::FixedOpponentTime(11.0),
                QuirkEffect::ScaleDamage(2.0),
            ],
        },
        mean_offset: 0.0,
        bonus_hp: 15,
    },
    Boss {
        id: "trickster",
        name: "Trickster",
        superquirk: Quirk {
            id: "topsy_turvy",
            name: "Topsy-Turvy",
            description: "Slower solver wins and the first hit deals +10.",
            effects: &[QuirkEffect::ReverseWinner, QuirkEffect::LuckyHit(10)],
        },
        mean_offset: 0.0,
        bonus_hp: 10,
    },
    Boss {
        id: "combo_eater",
        name: "Combo Eater",
        superquirk: Quirk {
            id: "hunger",
            name: "Hunger",
            description: "Combos reset every turn and damage is doubled.",
            effects: &[QuirkEffect::ComboBreaker, QuirkEffect::ScaleDamage(2.0)],
        },
        mean_offset: -1.0,
        bonus_hp: 20,
    },
];

/// Names regular opponents are drawn from.
pub static OPPONENT_NAMES: &[&str] = &[
    "CubeBot", "Speedy", "Twister", "Mosaic", "Slice", "Ghost", "Echo", "Nova", "Pixel", "Blitz",
    "Rando", "Scrambler", "Typhoon", "Vortex", "Prism", "Shadow", "Frost", "Inferno", "Bolt",
    "Zenith",
];

/// Power-ups shown per offer.
pub const OFFER_SIZE: usize = 3;

/// Whether an infinite-mode round is fought against a boss.
///
/// Bosses appear at rounds 3, 6 and 10, then every fifth round.
pub fn is_boss_round(round: u32) -> bool {
    matches!(round, 3 | 6) || (round >= 10 && round % 5 == 0)
}

/// Draw a boss that has not appeared this run.
///
/// Once every boss has been used the set is cleared and the pool
/// recycles.
pub fn draw_boss(rng: &mut dyn RngCore, used: &mut BTreeSet<&'static str>) -> &'static Boss {
    if BOSSES.iter().all(|b| used.contains(b.id)) {
        used.clear();
    }
    let fresh: Vec<&'static Boss> = BOSSES.iter().filter(|b| !used.contains(b.id)).collect();
    let boss = fresh.choose(rng).copied().unwrap_or(&BOSSES[0]);
    used.insert(boss.id);
    boss
}

/// Draw a regular opponent name.
pub fn draw_name(rng: &mut dyn RngCore) -> &'static str {
    OPPONENT_NAMES.choose(rng).copied().unwrap_or("CubeBot")
}

/// Draw a quirk for one round of a regular opponent.
pub fn draw_quirk(rng: &mut dyn RngCore) -> &'static Quirk {
    QUIRKS.choose(rng).unwrap_or(&QUIRKS[0])
}

/// Build a power-up offer of [`OFFER_SIZE`] distinct power-ups that
/// prefers anything not yet claimed.
///
/// When fewer than [`OFFER_SIZE`] unclaimed power-ups remain, every one
/// of them is offered and the rest of the slots are filled from the
/// claimed pool. When every power-up has been claimed, the claimed set
/// is cleared and the full pool is offered again.
pub fn draw_offer(rng: &mut dyn RngCore, claimed: &mut BTreeSet<PowerUp>) -> Vec<PowerUp> {
    if PowerUp::ALL.iter().all(|p| claimed.contains(p)) {
        claimed.clear();
    }
    let (mut offer, mut recycled): (Vec<PowerUp>, Vec<PowerUp>) =
        PowerUp::ALL.iter().copied().partition(|p| !claimed.contains(p));
    offer.shuffle(rng);
    offer.truncate(OFFER_SIZE);
    if offer.len() < OFFER_SIZE {
        recycled.shuffle(rng);
        let missing = OFFER_SIZE - offer.len();
        offer.extend(recycled.into_iter().take(missing));
    }
    offer
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_boss_rounds() {
        let bosses: Vec<u32> = (1..=25).filter(|r| is_boss_round(*r)).collect();
        assert_eq!(bosses, vec![3, 6, 10, 15, 20, 25]);
    }

    #[test]
    fn test_bosses_do_not_repeat_until_exhausted() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut used = BTreeSet::new();
        let mut seen = BTreeSet::new();
        for _ in 0..BOSSES.len() {
            assert!(seen.insert(draw_boss(&mut rng, &mut used).id));
        }
        // Pool recycles on the next draw.
        draw_boss(&mut rng, &mut used);
        assert_eq!(used.len(), 1);
    }

    #[test]
    fn test_offer_excludes_claimed() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut claimed: BTreeSet<PowerUp> =
            [PowerUp::Heal, PowerUp::Shield, PowerUp::PllSkip].into_iter().collect();
        for _ in 0..20 {
            let offer = draw_offer(&mut rng, &mut claimed);
            assert_eq!(offer.len(), OFFER_SIZE);
            assert!(offer.iter().all(|p| !claimed.contains(p)));
        }
    }

    #[test]
    fn test_offer_stays_full_then_recycles() {
        let mut rng = StdRng::seed_from_u64(2);
        for claimed_count in 4..PowerUp::ALL.len() {
            let mut claimed: BTreeSet<PowerUp> =
                PowerUp::ALL[..claimed_count].iter().copied().collect();
            for _ in 0..10 {
                let offer = draw_offer(&mut rng, &mut claimed);
                assert_eq!(offer.len(), OFFER_SIZE);
                let distinct: BTreeSet<PowerUp> = offer.iter().copied().collect();
                assert_eq!(distinct.len(), OFFER_SIZE);
                // Every unclaimed power-up makes the cut.
                assert!(PowerUp::ALL[claimed_count..]
                    .iter()
                    .all(|p| offer.contains(p)));
            }
        }

        let mut claimed: BTreeSet<PowerUp> = PowerUp::ALL.iter().copied().collect();
        let offer = draw_offer(&mut rng, &mut claimed);
        assert_eq!(offer.len(), OFFER_SIZE);
        assert!(claimed.is_empty());
    }

    #[test]
    fn test_quirk_ids_unique() {
        let ids: BTreeSet<&str> = QUIRKS.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), QUIRKS.len());
    }
}
