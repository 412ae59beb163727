//! Numeric helpers shared by every resolver.
//!
//! All damage in the engine is an integer produced by rounding a float
//! formula. Rounding is half-up (`floor(x + 0.5)`), so `.5` cases move
//! toward positive infinity.

/// Flat damage added to every hit on top of the scaled time difference.
pub const BASE_HIT_BONUS: f64 = 5.0;

/// Round half-up to the nearest integer.
///
/// # Examples
///
/// ```rust
/// use cubeduel::numeric::round_half_up;
///
/// assert_eq!(round_half_up(2.5), 3);
/// assert_eq!(round_half_up(2.49), 2);
/// assert_eq!(round_half_up(-2.5), -2);
/// ```
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Damage of one hit: `round(diff × multiplier + 5)`.
///
/// Never negative for a non-negative time difference and multiplier.
/// Saturates at `u32::MAX` for huge differences.
///
/// # Examples
///
/// ```rust
/// use cubeduel::numeric::hit_damage;
///
/// // 1.0s faster at multiplier 5: round(5 + 5) = 10
/// assert_eq!(hit_damage(1.0, 5.0), 10);
/// // 0.3s faster: round(1.5 + 5) = 7
/// assert_eq!(hit_damage(0.3, 5.0), 7);
/// ```
pub fn hit_damage(diff: f64, multiplier: f64) -> u32 {
    to_damage(round_half_up(diff * multiplier + BASE_HIT_BONUS))
}

/// Scale integer damage by a factor, rounding half-up.
pub fn scale_damage(damage: u32, factor: f64) -> u32 {
    to_damage(round_half_up(f64::from(damage) * factor))
}

/// Clamp a rounded value into the damage range.
fn to_damage(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Halve damage, rounding up.
pub fn ceil_half(damage: u32) -> u32 {
    damage.div_ceil(2)
}
