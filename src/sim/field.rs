//! Everything alive in the play field, advanced once per frame
//!
//! The host game loop owns a `Field`, pushes bullets/pickups/effects into it and
//! calls `update` then `draw`. Collision and scoring stay with the host.

use glam::Vec2;
use rand::Rng;

use super::asteroid::AsteroidField;
use super::bullet::Bullet;
use super::particles::{ParticleKind, ParticleSystem};
use super::pickup::{Coin, SupplyCrate};
use crate::consts::CULL_FACTOR;
use crate::renderer::Surface;
use crate::tuning::Tunables;

/// Debris particles per unit of asteroid radius
const DEBRIS_PER_RADIUS: f32 = 0.4;

/// All simulated entity collections
#[derive(Debug, Clone, Default)]
pub struct Field {
    pub asteroids: AsteroidField,
    pub bullets: Vec<Bullet>,
    pub coins: Vec<Coin>,
    pub crates: Vec<SupplyCrate>,
    pub particles: ParticleSystem,
    pub tunables: Tunables,
}

impl Field {
    pub fn new(tunables: Tunables) -> Self {
        Self {
            tunables,
            ..Default::default()
        }
    }

    /// Repopulate asteroids for a new level and drop leftovers from the last one
    pub fn start_level<R, V>(&mut self, rng: &mut R, player: Option<Vec2>, level: u32, view_radius: &V)
    where
        R: Rng + ?Sized,
        V: Fn(f32) -> f32,
    {
        self.bullets.clear();
        self.coins.clear();
        self.crates.clear();
        self.particles.clear();
        let base = self.tunables.obstacle_count_base;
        self.asteroids
            .spawn_population(rng, player, level, view_radius, base, &self.tunables);
    }

    /// Advance one frame of `dt` ms at clock time `now`
    pub fn update<R, V>(&mut self, rng: &mut R, dt: f32, now: f64, player: Option<Vec2>, view_radius: &V)
    where
        R: Rng + ?Sized,
        V: Fn(f32) -> f32,
    {
        self.asteroids.update(rng, dt, player, view_radius);
        for (pos, radius) in self.asteroids.take_destroyed() {
            let count = (radius * DEBRIS_PER_RADIUS).round() as usize;
            self.particles
                .add(rng, ParticleKind::Debris, pos.x, pos.y, 0.0, count, None);
        }

        let max_distance = view_radius(CULL_FACTOR);
        for b in &mut self.bullets {
            b.update(dt);
        }
        self.bullets.retain(|b| !b.expired(player, max_distance));

        self.coins.retain(|c| !c.is_expired(now));
        self.crates.retain(|c| !c.is_expired(now));

        self.particles.update(dt);
    }

    /// Draw back to front: coins, crates, asteroids, bullets, particles
    pub fn draw<S: Surface + ?Sized>(&self, ctx: &mut S, now: f64) {
        for c in &self.coins {
            c.draw(ctx, now);
        }
        for c in &self.crates {
            c.draw(ctx, now);
        }
        self.asteroids.draw(ctx);
        for b in &self.bullets {
            b.draw(ctx);
        }
        self.particles.draw(ctx);
    }

    /// Total live entities, particles included
    pub fn entity_count(&self) -> usize {
        self.asteroids.len() + self.bullets.len() + self.coins.len() + self.crates.len() + self.particles.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawOp, RecordingSurface};
    use crate::sim::pickup::CrateKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn view(f: f32) -> f32 {
        400.0 * f
    }

    fn field_with_level(seed: u64) -> (Field, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut field = Field::new(Tunables::default());
        field.start_level(&mut rng, Some(Vec2::ZERO), 2, &view);
        (field, rng)
    }

    #[test]
    fn test_start_level_spawns_population() {
        let (field, _) = field_with_level(1);
        assert_eq!(field.asteroids.len(), Tunables::default().obstacle_count_base + 1);
    }

    #[test]
    fn test_update_removes_expired_entities() {
        let (mut field, mut rng) = field_with_level(2);
        let t = field.tunables.clone();
        field.bullets.push(Bullet::player(Vec2::ZERO, 0.0, &t));
        field.coins.push(Coin::new(Vec2::ZERO, 0.0, &t));
        field
            .crates
            .push(SupplyCrate::new(&mut rng, Vec2::ZERO, CrateKind::Ammo, 0.0, &t));

        field.update(&mut rng, 16.0, 100.0, Some(Vec2::ZERO), &view);
        assert_eq!(field.bullets.len(), 1);
        assert_eq!(field.coins.len(), 1);
        assert_eq!(field.crates.len(), 1);

        field.bullets[0].life = field.bullets[0].max_life;
        field.update(&mut rng, 16.0, t.crate_lifetime.max(t.coin_lifetime), Some(Vec2::ZERO), &view);
        assert!(field.bullets.is_empty());
        assert!(field.coins.is_empty());
        assert!(field.crates.is_empty());
    }

    #[test]
    fn test_destroyed_asteroid_leaves_debris() {
        let (mut field, mut rng) = field_with_level(3);
        let before = field.asteroids.len();
        field.asteroids.asteroids[0].hit(1000);
        field.update(&mut rng, 16.0, 0.0, Some(Vec2::ZERO), &view);
        assert_eq!(field.asteroids.len(), before - 1);
        assert!(field.particles.count() > 0);
    }

    #[test]
    fn test_draw_layer_order() {
        let (mut field, mut rng) = field_with_level(4);
        let t = field.tunables.clone();
        field.coins.push(Coin::new(Vec2::ZERO, 0.0, &t));
        field.bullets.push(Bullet::player(Vec2::ZERO, 0.0, &t));

        let mut s = RecordingSurface::new();
        field.draw(&mut s, 0.0);
        assert!(s.is_balanced());
        // Coin is the first thing drawn, so the first alpha is its opacity
        assert_eq!(s.ops[1], DrawOp::Alpha(1.0));
        assert!(field.entity_count() >= field.asteroids.len() + 2);
    }

    #[test]
    fn test_no_player_keeps_far_bullets() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = Field::new(Tunables::default());
        let mut b = Bullet::player(Vec2::new(1e5, 0.0), 0.0, &field.tunables);
        b.life = 10.0;
        field.bullets.push(b);
        field.update(&mut rng, 16.0, 0.0, None, &view);
        assert_eq!(field.bullets.len(), 1);
    }
}
