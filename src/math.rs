//! Numeric helpers shared by the simulation
//!
//! Nothing here holds state. Randomness always comes from the caller's RNG so a
//! seeded `Pcg32` reproduces a run exactly.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Clamp `v` into `[min, max]`
#[inline]
pub fn clamp(v: f32, min: f32, max: f32) -> f32 {
    v.max(min).min(max)
}

/// Uniform value in `[min, max)`. Degenerate ranges return `min`.
#[inline]
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// True with probability `p` (clamped to `[0, 1]`)
#[inline]
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f32) -> bool {
    rng.random::<f32>() < clamp(p, 0.0, 1.0)
}

/// Random point around `center` at a uniform angle and a distance uniform in
/// `[inner, outer]`.
///
/// Distance is sampled linearly, not by area, so points bunch toward the inner
/// edge. Streaming density relies on this.
pub fn point_in_annulus<R: Rng + ?Sized>(rng: &mut R, center: Vec2, inner: f32, outer: f32) -> Vec2 {
    let angle = rand_range(rng, 0.0, TAU);
    let dist = rand_range(rng, inner, outer);
    center + Vec2::new(angle.cos(), angle.sin()) * dist
}

#[inline]
pub fn dist_sq(a: Vec2, b: Vec2) -> f32 {
    a.distance_squared(b)
}

#[inline]
pub fn dist(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Normalize an axis pair. Zero stays zero.
#[inline]
pub fn normalize_axes(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_rand_range_degenerate() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(rand_range(&mut rng, 5.0, 5.0), 5.0);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            assert!(!chance(&mut rng, 0.0));
            assert!(chance(&mut rng, 1.0));
        }
    }

    #[test]
    fn test_normalize_axes() {
        assert_eq!(normalize_axes(0.0, 0.0), Vec2::ZERO);
        let v = normalize_axes(1.0, -1.0);
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert_eq!(normalize_axes(0.0, 3.0), Vec2::new(0.0, 1.0));
    }

    proptest! {
        #[test]
        fn annulus_points_stay_in_bounds(seed in any::<u64>(), inner in 0.0f32..500.0, width in 0.0f32..500.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let center = Vec2::new(120.0, -40.0);
            let outer = inner + width;
            let p = point_in_annulus(&mut rng, center, inner, outer);
            let d = dist(p, center);
            prop_assert!(d >= inner - 1e-2 && d <= outer + 1e-2);
        }

        #[test]
        fn clamp_is_bounded(v in -1e6f32..1e6, lo in -100.0f32..0.0, hi in 0.0f32..100.0) {
            let c = clamp(v, lo, hi);
            prop_assert!(c >= lo && c <= hi);
        }
    }
}
