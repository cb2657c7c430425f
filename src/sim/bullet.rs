//! Projectiles fired by the player or by hostiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BULLET_MAX_LIFE;
use crate::renderer::{Color, LinearGradient, Paint, RadialGradient, Surface};
use crate::tick_scale;
use crate::tuning::Tunables;

pub const PLAYER_BULLET_COLOR: Color = Color::rgb(140, 230, 255);
pub const HOSTILE_BULLET_COLOR: Color = Color::rgb(255, 96, 120);

/// A single projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Unit direction
    pub vel: Vec2,
    /// Units per reference tick
    pub speed: f32,
    pub size: f32,
    pub damage: u32,
    /// Remaining pass-throughs. Only collision code decrements this.
    pub pierce: u32,
    /// Elapsed life (ms)
    pub life: f32,
    pub max_life: f32,
    #[serde(skip, default = "default_color")]
    pub color: Color,
    /// Fired by an enemy rather than the player
    pub hostile: bool,
}

fn default_color() -> Color {
    PLAYER_BULLET_COLOR
}

impl Bullet {
    /// Player bullet heading along `angle` with BASE speed, size and damage
    pub fn player(pos: Vec2, angle: f32, tunables: &Tunables) -> Self {
        Self {
            pos,
            vel: Vec2::from_angle(angle),
            speed: tunables.bullet_speed,
            size: tunables.bullet_size,
            damage: tunables.bullet_damage,
            pierce: tunables.bullet_pierce,
            life: 0.0,
            max_life: BULLET_MAX_LIFE,
            color: PLAYER_BULLET_COLOR,
            hostile: false,
        }
    }

    /// Enemy bullet with its own speed multiplier and damage
    pub fn hostile(pos: Vec2, angle: f32, speed: f32, damage: u32, tunables: &Tunables) -> Self {
        Self {
            speed,
            damage,
            pierce: 0,
            size: tunables.bullet_size * 1.4,
            color: HOSTILE_BULLET_COLOR,
            hostile: true,
            ..Self::player(pos, angle, tunables)
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * self.speed * tick_scale(dt);
        self.life += dt;
    }

    /// Out of time, or further than `max_distance` from the player. Without a
    /// player only time applies.
    pub fn expired(&self, player: Option<Vec2>, max_distance: f32) -> bool {
        if self.life >= self.max_life {
            return true;
        }
        match player {
            Some(p) => self.pos.distance_squared(p) > max_distance * max_distance,
            None => false,
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, ctx: &mut S) {
        ctx.save();
        ctx.translate(self.pos.x, self.pos.y);

        if self.hostile {
            let glow = Paint::Radial(RadialGradient::centered(
                self.size * 2.2,
                vec![
                    (0.0, Color::WHITE),
                    (0.35, self.color),
                    (1.0, self.color.with_alpha(0.0)),
                ],
            ));
            ctx.fill_circle(0.0, 0.0, self.size * 2.2, &glow);
        } else {
            // Streak trailing behind the head
            let tail = -self.vel * self.size * 4.0;
            let streak = Paint::Linear(LinearGradient {
                x0: tail.x,
                y0: tail.y,
                x1: 0.0,
                y1: 0.0,
                stops: vec![(0.0, self.color.with_alpha(0.0)), (1.0, self.color)],
            });
            ctx.begin_path();
            ctx.move_to(tail.x, tail.y);
            ctx.line_to(0.0, 0.0);
            ctx.stroke(&streak, self.size * 1.2);
            ctx.fill_circle(0.0, 0.0, self.size, &Paint::Solid(Color::WHITE));
        }

        ctx.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_MS;
    use crate::renderer::RecordingSurface;

    #[test]
    fn test_update_moves_by_speed_per_tick() {
        let mut b = Bullet::player(Vec2::ZERO, 0.0, &Tunables::default());
        b.speed = 5.0;
        b.update(TICK_MS);
        assert!((b.pos - Vec2::new(5.0, 0.0)).length() < 1e-4);
        assert_eq!(b.life, TICK_MS);
    }

    #[test]
    fn test_expires_at_max_life() {
        let mut b = Bullet::player(Vec2::ZERO, 0.0, &Tunables::default());
        b.life = b.max_life - 1.0;
        assert!(!b.expired(Some(Vec2::ZERO), 1000.0));
        b.life = b.max_life;
        assert!(b.expired(Some(Vec2::ZERO), 1000.0));
    }

    #[test]
    fn test_distance_expiry_needs_player() {
        let mut b = Bullet::player(Vec2::ZERO, 0.0, &Tunables::default());
        b.pos = Vec2::new(5000.0, 0.0);
        assert!(b.expired(Some(Vec2::ZERO), 1000.0));
        assert!(!b.expired(None, 1000.0));
        assert!(!b.expired(Some(Vec2::new(4500.0, 0.0)), 1000.0));
        b.life = b.max_life + 1.0;
        assert!(b.expired(None, 1000.0));
    }

    #[test]
    fn test_hostile_flag_only_changes_look() {
        let t = Tunables::default();
        let h = Bullet::hostile(Vec2::ZERO, 1.0, 4.0, 2, &t);
        assert!(h.hostile);
        assert_eq!(h.max_life, BULLET_MAX_LIFE);
        assert!((h.vel.length() - 1.0).abs() < 1e-6);

        let mut s = RecordingSurface::new();
        h.draw(&mut s);
        assert_eq!(s.strokes(), 0);
        s.clear();
        Bullet::player(Vec2::ZERO, 1.0, &t).draw(&mut s);
        assert_eq!(s.strokes(), 1);
        assert!(s.is_balanced());
    }
}
