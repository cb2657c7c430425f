//! Drifting asteroids and the streamer that keeps a field of them around the player
//!
//! The world has no edges. Asteroids that drift too far from the player are
//! moved back into a ring around them rather than destroyed, so the population
//! stays fixed and nothing is allocated while flying.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::consts::*;
use crate::math::{point_in_annulus, rand_range};
use crate::renderer::{Color, Paint, RadialGradient, Surface};
use crate::tick_scale;
use crate::tuning::Tunables;

/// Asteroid material. Only affects colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidVariant {
    Rock,
    Iron,
    Ember,
}

impl AsteroidVariant {
    /// Map a uniform roll: `< 0.25` iron, `> 0.75` ember, rock otherwise
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.25 {
            AsteroidVariant::Iron
        } else if roll > 0.75 {
            AsteroidVariant::Ember
        } else {
            AsteroidVariant::Rock
        }
    }

    /// (fill core, fill rim, outline)
    fn colors(&self) -> (Color, Color, Color) {
        match self {
            AsteroidVariant::Rock => (
                Color::rgb(122, 112, 104),
                Color::rgb(70, 63, 58),
                Color::rgb(160, 150, 140),
            ),
            AsteroidVariant::Iron => (
                Color::rgb(120, 132, 150),
                Color::rgb(58, 66, 82),
                Color::rgb(176, 190, 210),
            ),
            AsteroidVariant::Ember => (
                Color::rgb(196, 92, 48),
                Color::rgb(92, 34, 22),
                Color::rgb(255, 150, 80),
            ),
        }
    }
}

/// One outline vertex: angle around the center and a radius multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlinePoint {
    pub angle: f32,
    pub radius_factor: f32,
}

pub const OUTLINE_MIN_VERTICES: usize = 8;
pub const OUTLINE_MAX_VERTICES: usize = 11;
pub const OUTLINE_MIN_FACTOR: f32 = 0.7;
pub const OUTLINE_MAX_FACTOR: f32 = 1.15;

/// Max angular speed (radians per reference tick)
const SPIN_MAX: f32 = 0.02;

/// Base toughness for a given radius
pub fn hit_points_for_radius(radius: f32) -> u32 {
    ((radius / 10.0).round() as u32).max(3)
}

fn random_drift<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::new(
        rand_range(rng, -OBSTACLE_DRIFT, OBSTACLE_DRIFT),
        rand_range(rng, -OBSTACLE_DRIFT, OBSTACLE_DRIFT),
    )
}

/// A drifting obstacle with a fixed irregular silhouette
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub spin: f32,
    pub hp: u32,
    radius: f32,
    variant: AsteroidVariant,
    outline: Vec<OutlinePoint>,
}

impl Asteroid {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, pos: Vec2, radius: f32, variant: AsteroidVariant) -> Self {
        let count = rng.random_range(OUTLINE_MIN_VERTICES..=OUTLINE_MAX_VERTICES);
        let step = TAU / count as f32;
        let outline = (0..count)
            .map(|i| OutlinePoint {
                // Jitter stays inside the slot so vertices keep their order
                angle: i as f32 * step + rand_range(rng, -0.2, 0.2) * step,
                radius_factor: rand_range(rng, OUTLINE_MIN_FACTOR, OUTLINE_MAX_FACTOR),
            })
            .collect();

        Self {
            pos,
            vel: random_drift(rng),
            rotation: rand_range(rng, 0.0, TAU),
            spin: rand_range(rng, -SPIN_MAX, SPIN_MAX),
            hp: hit_points_for_radius(radius),
            radius,
            variant,
            outline,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn variant(&self) -> AsteroidVariant {
        self.variant
    }

    #[inline]
    pub fn outline(&self) -> &[OutlinePoint] {
        &self.outline
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }

    /// Apply damage. Returns true if this hit destroyed the asteroid.
    pub fn hit(&mut self, damage: u32) -> bool {
        let was_alive = self.hp > 0;
        self.hp = self.hp.saturating_sub(damage);
        was_alive && self.hp == 0
    }

    /// Drift and spin; recycle once too far from the player
    pub fn update<R, V>(&mut self, rng: &mut R, dt: f32, player: Option<Vec2>, view_radius: &V)
    where
        R: Rng + ?Sized,
        V: Fn(f32) -> f32,
    {
        let k = tick_scale(dt);
        self.pos += self.vel * k;
        self.rotation += self.spin * k;

        let Some(player) = player else {
            return;
        };
        let cull = view_radius(CULL_FACTOR);
        if self.pos.distance_squared(player) > cull * cull {
            self.recycle(rng, Some(player), view_radius);
        }
    }

    /// Move into the recycle ring around the player with fresh drift and full
    /// health. Shape, radius and variant are kept. No-op without a player.
    pub fn recycle<R, V>(&mut self, rng: &mut R, player: Option<Vec2>, view_radius: &V)
    where
        R: Rng + ?Sized,
        V: Fn(f32) -> f32,
    {
        let Some(player) = player else {
            return;
        };
        self.pos = point_in_annulus(
            rng,
            player,
            view_radius(RECYCLE_INNER_FACTOR),
            view_radius(RECYCLE_OUTER_FACTOR),
        );
        self.vel = random_drift(rng);
        self.hp = hit_points_for_radius(self.radius);
        log::debug!("Recycled asteroid r={:.1} to {:?}", self.radius, self.pos);
    }

    pub fn draw<S: Surface + ?Sized>(&self, ctx: &mut S) {
        let (core, rim, edge) = self.variant.colors();

        ctx.save();
        ctx.translate(self.pos.x, self.pos.y);
        ctx.rotate(self.rotation);

        ctx.begin_path();
        for (i, p) in self.outline.iter().enumerate() {
            let r = self.radius * p.radius_factor;
            let (x, y) = (p.angle.cos() * r, p.angle.sin() * r);
            if i == 0 {
                ctx.move_to(x, y);
            } else {
                ctx.line_to(x, y);
            }
        }
        ctx.close_path();

        let fill = Paint::Radial(RadialGradient {
            x0: -self.radius * 0.3,
            y0: -self.radius * 0.3,
            r0: self.radius * 0.1,
            x1: 0.0,
            y1: 0.0,
            r1: self.radius * OUTLINE_MAX_FACTOR,
            stops: vec![(0.0, core), (1.0, rim)],
        });
        ctx.fill(&fill);
        ctx.stroke(&Paint::Solid(edge), 2.0);

        ctx.restore();
    }
}

/// Keeps a fixed population of asteroids streamed around the player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AsteroidField {
    pub asteroids: Vec<Asteroid>,
}

impl AsteroidField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Population size for a level
    pub fn population_for_level(count_base: usize, level: u32) -> usize {
        count_base + (level / 2) as usize
    }

    /// Replace the field with a fresh population for `level`. No-op without a
    /// player.
    pub fn spawn_population<R, V>(
        &mut self,
        rng: &mut R,
        player: Option<Vec2>,
        level: u32,
        view_radius: &V,
        count_base: usize,
        tunables: &Tunables,
    ) where
        R: Rng + ?Sized,
        V: Fn(f32) -> f32,
    {
        let Some(player) = player else {
            return;
        };

        let count = Self::population_for_level(count_base, level);
        let inner = view_radius(SPAWN_INNER_FACTOR);
        let outer = view_radius(SPAWN_OUTER_FACTOR);

        self.asteroids.clear();
        self.asteroids.reserve(count);
        for _ in 0..count {
            let pos = point_in_annulus(rng, player, inner, outer);
            let radius = rand_range(rng, tunables.obstacle_min_radius, tunables.obstacle_max_radius);
            let variant = AsteroidVariant::from_roll(rng.random::<f32>());
            self.asteroids.push(Asteroid::new(rng, pos, radius, variant));
        }

        log::info!("Spawned {} asteroids for level {} (ring {:.0}-{:.0})", count, level, inner, outer);
    }

    /// Advance every asteroid, recycling stragglers
    pub fn update<R, V>(&mut self, rng: &mut R, dt: f32, player: Option<Vec2>, view_radius: &V)
    where
        R: Rng + ?Sized,
        V: Fn(f32) -> f32,
    {
        for a in &mut self.asteroids {
            a.update(rng, dt, player, view_radius);
        }
    }

    /// Remove destroyed asteroids, returning their (position, radius)
    pub fn take_destroyed(&mut self) -> Vec<(Vec2, f32)> {
        let mut gone = Vec::new();
        self.asteroids.retain(|a| {
            if a.is_destroyed() {
                gone.push((a.pos, a.radius));
                false
            } else {
                true
            }
        });
        gone
    }

    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    pub fn draw<S: Surface + ?Sized>(&self, ctx: &mut S) {
        for a in &self.asteroids {
            a.draw(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn view(f: f32) -> f32 {
        500.0 * f
    }

    #[test]
    fn test_hit_points_for_radius() {
        assert_eq!(hit_points_for_radius(18.0), 3);
        assert_eq!(hit_points_for_radius(34.0), 3);
        assert_eq!(hit_points_for_radius(35.0), 4);
        assert_eq!(hit_points_for_radius(42.0), 4);
        assert_eq!(hit_points_for_radius(55.0), 6);
    }

    #[test]
    fn test_variant_split() {
        assert_eq!(AsteroidVariant::from_roll(0.1), AsteroidVariant::Iron);
        assert_eq!(AsteroidVariant::from_roll(0.25), AsteroidVariant::Rock);
        assert_eq!(AsteroidVariant::from_roll(0.75), AsteroidVariant::Rock);
        assert_eq!(AsteroidVariant::from_roll(0.9), AsteroidVariant::Ember);
    }

    #[test]
    fn test_outline_shape() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            let a = Asteroid::new(&mut rng, Vec2::ZERO, 30.0, AsteroidVariant::Rock);
            let n = a.outline().len();
            assert!((OUTLINE_MIN_VERTICES..=OUTLINE_MAX_VERTICES).contains(&n));
            for p in a.outline() {
                assert!(p.radius_factor >= OUTLINE_MIN_FACTOR && p.radius_factor <= OUTLINE_MAX_FACTOR);
            }
            assert!(a.outline().windows(2).all(|w| w[0].angle < w[1].angle));
        }
    }

    #[test]
    fn test_update_scales_by_reference_tick() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut a = Asteroid::new(&mut rng, Vec2::ZERO, 20.0, AsteroidVariant::Rock);
        a.vel = Vec2::new(0.3, -0.2);
        a.spin = 0.01;
        let rot0 = a.rotation;
        a.update(&mut rng, TICK_MS * 2.0, Some(Vec2::ZERO), &view);
        assert!((a.pos - Vec2::new(0.6, -0.4)).length() < 1e-4);
        assert!((a.rotation - rot0 - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_recycle_keeps_shape_and_restores_health() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut a = Asteroid::new(&mut rng, Vec2::ZERO, 40.0, AsteroidVariant::Ember);
        let outline = a.outline().to_vec();
        a.hit(2);
        let player = Vec2::new(1000.0, 1000.0);
        a.pos = player + Vec2::new(view(CULL_FACTOR) + 5.0, 0.0);

        a.update(&mut rng, 0.0, Some(player), &view);

        let d = a.pos.distance(player);
        assert!(d >= view(RECYCLE_INNER_FACTOR) - 1e-2 && d <= view(RECYCLE_OUTER_FACTOR) + 1e-2);
        assert_eq!(a.hp, hit_points_for_radius(40.0));
        assert_eq!(a.outline(), outline.as_slice());
        assert_eq!(a.radius(), 40.0);
        assert_eq!(a.variant(), AsteroidVariant::Ember);
    }

    #[test]
    fn test_no_player_means_no_recycle() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut a = Asteroid::new(&mut rng, Vec2::new(1e6, 0.0), 20.0, AsteroidVariant::Rock);
        a.vel = Vec2::ZERO;
        a.recycle(&mut rng, None, &view);
        a.update(&mut rng, 16.67, None, &view);
        assert_eq!(a.pos, Vec2::new(1e6, 0.0));
    }

    #[test]
    fn test_hit_reports_destruction_once() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut a = Asteroid::new(&mut rng, Vec2::ZERO, 20.0, AsteroidVariant::Iron);
        assert!(!a.hit(1));
        assert!(a.hit(10));
        assert!(!a.hit(1));
        assert!(a.is_destroyed());
    }

    #[test]
    fn test_spawn_population_level_four() {
        let mut rng = Pcg32::seed_from_u64(44);
        let mut field = AsteroidField::new();
        let player = Vec2::new(-300.0, 80.0);
        field.spawn_population(&mut rng, Some(player), 4, &view, 10, &Tunables::default());

        assert_eq!(field.len(), 12);
        for a in &field.asteroids {
            let d = a.pos.distance(player);
            assert!(d >= view(SPAWN_INNER_FACTOR) - 1e-2 && d <= view(SPAWN_OUTER_FACTOR) + 1e-2);
            assert!(a.radius() >= 18.0 && a.radius() <= 42.0);
            assert_eq!(a.hp, hit_points_for_radius(a.radius()));
        }
    }

    #[test]
    fn test_spawn_population_replaces_and_needs_player() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = AsteroidField::new();
        field.spawn_population(&mut rng, Some(Vec2::ZERO), 0, &view, 6, &Tunables::default());
        assert_eq!(field.len(), 6);
        field.spawn_population(&mut rng, None, 10, &view, 6, &Tunables::default());
        assert_eq!(field.len(), 6);
        field.spawn_population(&mut rng, Some(Vec2::ZERO), 3, &view, 2, &Tunables::default());
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn test_take_destroyed() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = AsteroidField::new();
        field.spawn_population(&mut rng, Some(Vec2::ZERO), 0, &view, 4, &Tunables::default());
        field.asteroids[1].hit(100);
        let gone = field.take_destroyed();
        assert_eq!(gone.len(), 1);
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn test_draw_is_balanced() {
        let mut rng = Pcg32::seed_from_u64(5);
        let a = Asteroid::new(&mut rng, Vec2::ZERO, 20.0, AsteroidVariant::Rock);
        let mut s = RecordingSurface::new();
        a.draw(&mut s);
        assert!(s.is_balanced());
        assert_eq!(s.fills(), 1);
        assert_eq!(s.strokes(), 1);
    }

    proptest! {
        #[test]
        fn recycle_lands_in_ring(seed in any::<u64>(), px in -1e4f32..1e4, py in -1e4f32..1e4, radius in 18.0f32..42.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let player = Vec2::new(px, py);
            let mut a = Asteroid::new(&mut rng, Vec2::ZERO, radius, AsteroidVariant::Rock);
            a.hp = 0;
            a.recycle(&mut rng, Some(player), &view);
            let d = a.pos.distance(player);
            prop_assert!(d >= view(RECYCLE_INNER_FACTOR) - 0.05 && d <= view(RECYCLE_OUTER_FACTOR) + 0.05);
            prop_assert_eq!(a.hp, hit_points_for_radius(radius));
            prop_assert!(a.vel.x.abs() <= OBSTACLE_DRIFT && a.vel.y.abs() <= OBSTACLE_DRIFT);
        }
    }
}
