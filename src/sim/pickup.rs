//! Collectible coins and supply crates
//!
//! Neither holds a countdown. Age is always `now - created_at`, so expiry and
//! animation can't drift from the clock.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::consts::{COIN_BLINK_FRACTION, COIN_BLINK_WINDOW_MS};
use crate::math::rand_range;
use crate::renderer::{Color, Paint, RadialGradient, Surface};
use crate::tuning::Tunables;

const COIN_GOLD: Color = Color::rgb(255, 206, 84);
const COIN_EDGE: Color = Color::rgb(196, 140, 30);

/// A stationary coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub created_at: f64,
    pub lifetime: f64,
    pub radius: f32,
}

impl Coin {
    pub fn new(pos: Vec2, now: f64, tunables: &Tunables) -> Self {
        Self {
            pos,
            created_at: now,
            lifetime: tunables.coin_lifetime,
            radius: tunables.coin_size,
        }
    }

    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        now - self.created_at
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.age(now) >= self.lifetime
    }

    /// Draw opacity at `now`. Full until the last 30% of life, then blinks off
    /// every other 100ms window and fades with what remains.
    pub fn alpha(&self, now: f64) -> f32 {
        let age = self.age(now).max(0.0);
        let remaining = (1.0 - age / self.lifetime).max(0.0) as f32;
        if remaining >= COIN_BLINK_FRACTION {
            return 1.0;
        }
        if (age / COIN_BLINK_WINDOW_MS).floor() as u64 % 2 == 1 {
            return 0.0;
        }
        remaining / COIN_BLINK_FRACTION
    }

    pub fn draw<S: Surface + ?Sized>(&self, ctx: &mut S, now: f64) {
        let alpha = self.alpha(now);
        if alpha <= 0.0 {
            return;
        }

        ctx.save();
        ctx.set_alpha(alpha);
        ctx.translate(self.pos.x, self.pos.y);
        let face = Paint::Radial(RadialGradient {
            x0: -self.radius * 0.35,
            y0: -self.radius * 0.35,
            r0: 0.0,
            x1: 0.0,
            y1: 0.0,
            r1: self.radius,
            stops: vec![(0.0, Color::WHITE), (0.4, COIN_GOLD), (1.0, COIN_EDGE)],
        });
        ctx.fill_circle(0.0, 0.0, self.radius, &face);
        ctx.stroke(&Paint::Solid(COIN_EDGE), 1.5);
        ctx.restore();
    }
}

/// What a crate restocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrateKind {
    Ammo,
    Secondary,
    Defense,
}

impl CrateKind {
    pub fn color(&self) -> Color {
        match self {
            CrateKind::Ammo => Color::rgb(255, 190, 70),
            CrateKind::Secondary => Color::rgb(200, 110, 255),
            CrateKind::Defense => Color::rgb(90, 200, 255),
        }
    }
}

/// A pulsing, spinning supply drop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyCrate {
    pub pos: Vec2,
    pub kind: CrateKind,
    pub created_at: f64,
    pub lifetime: f64,
    /// Half-size of the box
    pub size: f32,
    /// Spin phase at creation
    pub spin0: f32,
}

impl SupplyCrate {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, pos: Vec2, kind: CrateKind, now: f64, tunables: &Tunables) -> Self {
        Self {
            pos,
            kind,
            created_at: now,
            lifetime: tunables.crate_lifetime,
            size: tunables.crate_size,
            spin0: rand_range(rng, 0.0, TAU),
        }
    }

    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        now - self.created_at
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.age(now) >= self.lifetime
    }

    /// Scale factor oscillating around 1
    pub fn pulse(&self, now: f64) -> f32 {
        1.0 + 0.08 * (self.age(now) / 160.0).sin() as f32
    }

    /// Current rotation
    pub fn spin(&self, now: f64) -> f32 {
        self.spin0 + (self.age(now) / 500.0) as f32
    }

    pub fn draw<S: Surface + ?Sized>(&self, ctx: &mut S, now: f64) {
        let color = self.kind.color();
        let s = self.size;

        ctx.save();
        ctx.translate(self.pos.x, self.pos.y);
        ctx.rotate(self.spin(now));
        let k = self.pulse(now);
        ctx.scale(k, k);

        ctx.fill_circle(
            0.0,
            0.0,
            s * 1.8,
            &Paint::Radial(RadialGradient::centered(
                s * 1.8,
                vec![(0.0, color.with_alpha(0.45)), (1.0, color.with_alpha(0.0))],
            )),
        );

        ctx.begin_path();
        ctx.move_to(-s, -s);
        ctx.line_to(s, -s);
        ctx.line_to(s, s);
        ctx.line_to(-s, s);
        ctx.close_path();
        ctx.fill(&Paint::Solid(Color::rgb(28, 32, 44)));
        ctx.stroke(&Paint::Solid(color), 2.0);

        // Cross strap
        ctx.begin_path();
        ctx.move_to(-s, 0.0);
        ctx.line_to(s, 0.0);
        ctx.move_to(0.0, -s);
        ctx.line_to(0.0, s);
        ctx.stroke(&Paint::Solid(color.with_alpha(0.7)), 1.5);

        ctx.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn coin() -> Coin {
        Coin {
            pos: Vec2::ZERO,
            created_at: 1000.0,
            lifetime: 10_000.0,
            radius: 7.0,
        }
    }

    #[test]
    fn test_coin_expiry_boundary() {
        let c = coin();
        assert!(!c.is_expired(1000.0 + 10_000.0 - 1.0));
        assert!(c.is_expired(1000.0 + 10_000.0));
    }

    #[test]
    fn test_coin_alpha_blinks_in_last_stretch() {
        let c = coin();
        assert_eq!(c.alpha(1000.0), 1.0);
        assert_eq!(c.alpha(1000.0 + 6_999.0), 1.0);
        // age 7050 -> window 70 (even) visible, age 7150 -> window 71 hidden
        let visible = c.alpha(1000.0 + 7_050.0);
        assert!(visible > 0.0 && visible < 1.0);
        assert_eq!(c.alpha(1000.0 + 7_150.0), 0.0);
        // fades as life runs out
        assert!(c.alpha(1000.0 + 9_850.0) < visible);
    }

    #[test]
    fn test_hidden_coin_draws_nothing() {
        let c = coin();
        let mut s = RecordingSurface::new();
        c.draw(&mut s, 1000.0 + 7_150.0);
        assert!(s.ops.is_empty());
        c.draw(&mut s, 1000.0);
        assert!(s.is_balanced());
        assert_eq!(s.alphas(), vec![1.0]);
    }

    #[test]
    fn test_crate_animation_is_pure_in_age() {
        let mut rng = Pcg32::seed_from_u64(11);
        let t = Tunables::default();
        let c = SupplyCrate::new(&mut rng, Vec2::ZERO, CrateKind::Defense, 500.0, &t);
        assert_eq!(c.pulse(500.0), 1.0);
        assert!((c.spin(1500.0) - c.spin0 - 2.0).abs() < 1e-5);
        assert!(!c.is_expired(500.0 + t.crate_lifetime - 1.0));
        assert!(c.is_expired(500.0 + t.crate_lifetime));
        assert!(c.spin0 >= 0.0 && c.spin0 < TAU);
    }

    #[test]
    fn test_crate_kind_colors_differ() {
        assert_ne!(CrateKind::Ammo.color(), CrateKind::Secondary.color());
        assert_ne!(CrateKind::Secondary.color(), CrateKind::Defense.color());
    }
}
