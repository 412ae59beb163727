//! Normally-distributed solve time sampling.
//!
//! Simulated opponents, boss times and the assist all draw from a normal
//! distribution via the Box–Muller transform.

use rand::Rng;

/// Draw one normally-distributed value with the given mean and standard
/// deviation.
///
/// Both uniform draws are taken from `(0, 1]` (zero is redrawn) so the
/// logarithm is always defined. The result is not clamped: with a small
/// mean or a large deviation it can be negative. Use a
/// [`TimeSource`](crate::source::TimeSource) when a positive time is
/// required.
///
/// # Examples
///
/// ```rust
/// use cubeduel::sampler::sample;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let t = sample(&mut rng, 11.62, 1.10);
/// assert!(t.is_finite());
///
/// // Zero deviation always returns the mean.
/// assert_eq!(sample(&mut rng, 12.0, 0.0), 12.0);
/// ```
pub fn sample<R: Rng + ?Sized>(rng: &mut R, mean: f64, std: f64) -> f64 {
    let u = nonzero_unit(rng);
    let v = nonzero_unit(rng);
    let z = (-2.0 * u.ln()).sqrt() * (2.0 * std::f64::consts::PI * v).cos();
    z * std + mean
}

fn nonzero_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let x: f64 = rng.gen();
        if x != 0.0 {
            return x;
        }
    }
}
