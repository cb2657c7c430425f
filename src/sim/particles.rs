//! Short-lived visual effect particles
//!
//! Particle velocities are tuned for one reference tick and are applied once
//! per `update` call without dt scaling. Life still counts down in real ms.
//! Alpha fades over a fixed 320ms window no matter how long a kind lives.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::consts::PARTICLE_FADE_MS;
use crate::math::rand_range;
use crate::renderer::{Color, Paint, Surface};

/// A single particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life (ms)
    pub life: f32,
    #[serde(skip, default = "default_color")]
    pub color: Color,
    pub size: f32,
}

fn default_color() -> Color {
    Color::WHITE
}

/// Every effect the system knows how to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Muzzle,
    Pop,
    Sparks,
    Debris,
    Thruster,
    LevelUp,
    Nova,
    Shield,
    Ultimate,
}

/// How emitted particles are aimed
#[derive(Debug, Clone, Copy)]
enum Spread {
    /// Random direction within `±half_angle` of the emit angle
    Cone(f32),
    /// Random direction all around
    Burst,
    /// Evenly spaced around the circle
    Ring,
}

/// Color source for a kind
#[derive(Debug, Clone, Copy)]
enum Tint {
    Fixed(Color),
    /// Cycled by particle index
    Palette(&'static [Color]),
}

/// Fixed emission recipe for one kind
#[derive(Debug, Clone, Copy)]
struct Recipe {
    speed: (f32, f32),
    life: f32,
    size: (f32, f32),
    spread: Spread,
    /// Added to the emit angle before spreading
    angle_offset: f32,
    tint: Tint,
}

const LEVELUP_PALETTE: &[Color] = &[
    Color::rgb(120, 220, 255),
    Color::rgb(255, 220, 100),
    Color::rgb(255, 120, 210),
    Color::rgb(140, 255, 150),
];

const ULTIMATE_PALETTE: &[Color] = &[
    Color::rgb(255, 90, 90),
    Color::rgb(255, 180, 60),
    Color::rgb(255, 255, 140),
    Color::rgb(170, 120, 255),
];

impl ParticleKind {
    pub const ALL: [ParticleKind; 9] = [
        ParticleKind::Muzzle,
        ParticleKind::Pop,
        ParticleKind::Sparks,
        ParticleKind::Debris,
        ParticleKind::Thruster,
        ParticleKind::LevelUp,
        ParticleKind::Nova,
        ParticleKind::Shield,
        ParticleKind::Ultimate,
    ];

    /// Look up a kind by its event name. Unknown names return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "muzzle" => Some(ParticleKind::Muzzle),
            "pop" => Some(ParticleKind::Pop),
            "sparks" => Some(ParticleKind::Sparks),
            "debris" => Some(ParticleKind::Debris),
            "thruster" => Some(ParticleKind::Thruster),
            "levelup" => Some(ParticleKind::LevelUp),
            "nova" => Some(ParticleKind::Nova),
            "shield" => Some(ParticleKind::Shield),
            "ultimate" => Some(ParticleKind::Ultimate),
            _ => None,
        }
    }

    /// Life in ms of every particle of this kind
    pub fn life(&self) -> f32 {
        self.recipe().life
    }

    fn recipe(&self) -> Recipe {
        match self {
            ParticleKind::Muzzle => Recipe {
                speed: (2.0, 4.0),
                life: 120.0,
                size: (1.5, 3.0),
                spread: Spread::Cone(0.35),
                angle_offset: 0.0,
                tint: Tint::Fixed(Color::rgb(255, 210, 122)),
            },
            ParticleKind::Pop => Recipe {
                speed: (1.0, 3.0),
                life: 240.0,
                size: (2.0, 4.0),
                spread: Spread::Burst,
                angle_offset: 0.0,
                tint: Tint::Fixed(Color::WHITE),
            },
            ParticleKind::Sparks => Recipe {
                speed: (2.0, 5.0),
                life: 160.0,
                size: (1.0, 2.0),
                spread: Spread::Burst,
                angle_offset: 0.0,
                tint: Tint::Fixed(Color::rgb(255, 179, 71)),
            },
            ParticleKind::Debris => Recipe {
                speed: (0.5, 2.0),
                life: 520.0,
                size: (2.0, 5.0),
                spread: Spread::Burst,
                angle_offset: 0.0,
                tint: Tint::Fixed(Color::rgb(154, 143, 132)),
            },
            ParticleKind::Thruster => Recipe {
                speed: (1.0, 2.5),
                life: 200.0,
                size: (1.5, 3.0),
                spread: Spread::Cone(0.4),
                // Exhaust goes out the back
                angle_offset: PI,
                tint: Tint::Fixed(Color::rgb(102, 204, 255)),
            },
            ParticleKind::LevelUp => Recipe {
                speed: (3.0, 3.0),
                life: 700.0,
                size: (3.0, 3.0),
                spread: Spread::Ring,
                angle_offset: 0.0,
                tint: Tint::Palette(LEVELUP_PALETTE),
            },
            ParticleKind::Nova => Recipe {
                speed: (6.0, 6.0),
                life: 400.0,
                size: (3.0, 3.0),
                spread: Spread::Ring,
                angle_offset: 0.0,
                tint: Tint::Fixed(Color::rgb(255, 240, 160)),
            },
            ParticleKind::Shield => Recipe {
                speed: (2.0, 2.0),
                life: 300.0,
                size: (2.5, 2.5),
                spread: Spread::Ring,
                angle_offset: 0.0,
                tint: Tint::Fixed(Color::rgb(85, 170, 255)),
            },
            ParticleKind::Ultimate => Recipe {
                speed: (4.0, 9.0),
                life: 900.0,
                size: (3.0, 6.0),
                spread: Spread::Burst,
                angle_offset: 0.0,
                tint: Tint::Palette(ULTIMATE_PALETTE),
            },
        }
    }
}

/// Owns every live particle
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `count` particles of `kind` at (x, y). `angle` aims cone kinds;
    /// `color` overrides the kind's tint.
    #[allow(clippy::too_many_arguments)]
    pub fn add<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        kind: ParticleKind,
        x: f32,
        y: f32,
        angle: f32,
        count: usize,
        color: Option<Color>,
    ) {
        let recipe = kind.recipe();
        let base = angle + recipe.angle_offset;
        self.particles.reserve(count);

        for i in 0..count {
            let dir = match recipe.spread {
                Spread::Cone(half) => base + rand_range(rng, -half, half),
                Spread::Burst => rand_range(rng, 0.0, TAU),
                Spread::Ring => base + i as f32 / count as f32 * TAU,
            };
            let speed = rand_range(rng, recipe.speed.0, recipe.speed.1);
            let tint = match (color, recipe.tint) {
                (Some(c), _) => c,
                (None, Tint::Fixed(c)) => c,
                (None, Tint::Palette(p)) => p[i % p.len()],
            };

            self.particles.push(Particle {
                pos: Vec2::new(x, y),
                vel: Vec2::from_angle(dir) * speed,
                life: recipe.life,
                color: tint,
                size: rand_range(rng, recipe.size.0, recipe.size.1),
            });
        }
    }

    /// `add` keyed by event name. Unknown names emit nothing.
    #[allow(clippy::too_many_arguments)]
    pub fn add_named<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        name: &str,
        x: f32,
        y: f32,
        angle: f32,
        count: usize,
        color: Option<Color>,
    ) {
        match ParticleKind::from_name(name) {
            Some(kind) => self.add(rng, kind, x, y, angle, count, color),
            None => log::debug!("Ignoring unknown particle kind '{name}'"),
        }
    }

    /// Move every particle one step, age it by `dt`, and drop the dead ones
    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn draw<S: Surface + ?Sized>(&self, ctx: &mut S) {
        if self.particles.is_empty() {
            return;
        }
        ctx.save();
        for p in &self.particles {
            ctx.set_alpha(particle_alpha(p.life));
            ctx.fill_circle(p.pos.x, p.pos.y, p.size, &Paint::Solid(p.color));
        }
        ctx.restore();
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

/// Opacity for a particle with `life` ms left
#[inline]
pub fn particle_alpha(life: f32) -> f32 {
    (life / PARTICLE_FADE_MS).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_sparks_life_and_expiry() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ps = ParticleSystem::new();
        ps.add(&mut rng, ParticleKind::Sparks, 0.0, 0.0, 0.0, 5, None);
        assert_eq!(ps.count(), 5);
        assert!(ps.particles().iter().all(|p| p.life == 160.0));

        ps.update(161.0);
        assert_eq!(ps.count(), 0);
    }

    #[test]
    fn test_mixed_expiry_keeps_survivors() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ps = ParticleSystem::new();
        // Interleave short and long lived particles so neighbours die together
        for _ in 0..4 {
            ps.add(&mut rng, ParticleKind::Muzzle, 0.0, 0.0, 0.0, 2, None);
            ps.add(&mut rng, ParticleKind::Debris, 0.0, 0.0, 0.0, 1, None);
        }
        ps.update(130.0);
        assert_eq!(ps.count(), 4);
        assert!(ps.particles().iter().all(|p| p.life == 390.0));
    }

    #[test]
    fn test_unknown_name_is_ignored() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ps = ParticleSystem::new();
        ps.add_named(&mut rng, "confetti", 0.0, 0.0, 0.0, 10, None);
        assert_eq!(ps.count(), 0);
        ps.add_named(&mut rng, "nova", 0.0, 0.0, 0.0, 10, None);
        assert_eq!(ps.count(), 10);
    }

    #[test]
    fn test_every_name_maps() {
        for name in ["muzzle", "pop", "sparks", "debris", "thruster", "levelup", "nova", "shield", "ultimate"] {
            assert!(ParticleKind::from_name(name).is_some(), "{name}");
        }
    }

    #[test]
    fn test_update_ignores_dt_for_motion() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ps = ParticleSystem::new();
        ps.add(&mut rng, ParticleKind::Nova, 0.0, 0.0, 0.0, 4, None);
        let v = ps.particles()[0].vel;
        ps.update(50.0);
        assert_eq!(ps.particles()[0].pos, v);
        ps.update(1.0);
        assert!((ps.particles()[0].pos - v * 2.0).length() < 1e-5);
    }

    #[test]
    fn test_ring_is_even_and_palette_cycles() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ps = ParticleSystem::new();
        ps.add(&mut rng, ParticleKind::LevelUp, 0.0, 0.0, 0.0, 8, None);
        let colors: Vec<_> = ps.particles().iter().map(|p| p.color).collect();
        assert_eq!(colors[0], colors[4]);
        assert_ne!(colors[0], colors[1]);
        let speeds: Vec<_> = ps.particles().iter().map(|p| p.vel.length()).collect();
        assert!(speeds.iter().all(|s| (s - 3.0).abs() < 1e-4));
    }

    #[test]
    fn test_color_override() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut ps = ParticleSystem::new();
        let red = Color::rgb(255, 0, 0);
        ps.add(&mut rng, ParticleKind::Ultimate, 0.0, 0.0, 0.0, 6, Some(red));
        assert!(ps.particles().iter().all(|p| p.color == red));
    }

    #[test]
    fn test_thruster_points_backwards() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ps = ParticleSystem::new();
        ps.add(&mut rng, ParticleKind::Thruster, 0.0, 0.0, 0.0, 20, None);
        assert!(ps.particles().iter().all(|p| p.vel.x < 0.0));
    }

    #[test]
    fn test_alpha_uses_fixed_window() {
        assert_eq!(particle_alpha(640.0), 1.0);
        assert_eq!(particle_alpha(160.0), 0.5);
        assert_eq!(particle_alpha(-5.0), 0.0);

        let mut rng = Pcg32::seed_from_u64(8);
        let mut ps = ParticleSystem::new();
        ps.add(&mut rng, ParticleKind::Sparks, 0.0, 0.0, 0.0, 3, None);
        let mut s = RecordingSurface::new();
        ps.draw(&mut s);
        assert_eq!(s.alphas(), vec![0.5; 3]);
        assert_eq!(s.fills(), 3);
        assert!(s.is_balanced());
    }

    #[test]
    fn test_clear() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut ps = ParticleSystem::new();
        for kind in ParticleKind::ALL {
            ps.add(&mut rng, kind, 0.0, 0.0, 0.0, 3, None);
        }
        assert_eq!(ps.count(), 27);
        ps.clear();
        assert_eq!(ps.count(), 0);
    }
}
