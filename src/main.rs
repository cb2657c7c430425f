//! Nebula Drift entry point
//!
//! Wires the simulation core to a minimal playable loop: the player ship moves
//! by the input snapshot, fires along the aim vector and flies through an
//! endless asteroid field. In the browser it draws to a canvas; natively it
//! runs a scripted headless session.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use nebula_drift::consts::TICK_MS;
use nebula_drift::renderer::{Color, Paint, Surface};
use nebula_drift::sim::{Bullet, Coin, CrateKind, Field, ParticleKind, SupplyCrate};
use nebula_drift::{InputManager, InputSettings, Tunables, tick_scale};

/// Player ship speed (units per reference tick)
const SHIP_SPEED: f32 = 3.2;
const BOOST_MULT: f32 = 1.8;
/// Milliseconds between primary shots
const FIRE_INTERVAL: f32 = 140.0;
const ALT_FIRE_INTERVAL: f32 = 90.0;
/// Ship collision radius for pickups
const SHIP_RADIUS: f32 = 14.0;

/// Minimal game wrapping the simulation core
struct Demo {
    field: Field,
    input: Rc<RefCell<InputManager>>,
    rng: Pcg32,
    player: Vec2,
    heading: f32,
    fire_cooldown: f32,
    level: u32,
    coins_collected: u32,
    /// Half the screen diagonal; view_radius(f) = f * this
    view_extent: f32,
    screen_center: Vec2,
}

impl Demo {
    fn new(seed: u64, width: f32, height: f32) -> Self {
        let tunables = Tunables::default();
        let mut demo = Self {
            field: Field::new(tunables),
            input: Rc::new(RefCell::new(InputManager::new(InputSettings::load()))),
            rng: Pcg32::seed_from_u64(seed),
            player: Vec2::ZERO,
            heading: 0.0,
            fire_cooldown: 0.0,
            level: 0,
            coins_collected: 0,
            view_extent: 0.0,
            screen_center: Vec2::ZERO,
        };
        demo.resize(width, height);
        demo.start_level(0);
        demo
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.view_extent = Vec2::new(width, height).length() / 2.0;
        self.screen_center = Vec2::new(width / 2.0, height / 2.0);
        // Camera keeps the ship centered
        self.input.borrow_mut().set_player_screen(Some(self.screen_center));
    }

    fn start_level(&mut self, level: u32) {
        self.level = level;
        let extent = self.view_extent;
        let view = move |f: f32| f * extent;
        self.field.start_level(&mut self.rng, Some(self.player), level, &view);
        self.input.borrow_mut().reset();
        self.field
            .particles
            .add(&mut self.rng, ParticleKind::LevelUp, self.player.x, self.player.y, 0.0, 24, None);
        log::info!("Level {} started", level);
    }

    /// Advance one frame
    fn step(&mut self, dt: f32, now: f64) {
        let input = self.input.borrow_mut().poll(now);
        let k = tick_scale(dt);

        let mut speed = SHIP_SPEED;
        if input.is_boosting {
            speed *= BOOST_MULT;
            self.field.particles.add(
                &mut self.rng,
                ParticleKind::Thruster,
                self.player.x,
                self.player.y,
                self.heading,
                2,
                None,
            );
        }
        let mv = input.move_dir();
        if mv != Vec2::ZERO {
            self.heading = mv.to_angle();
        }
        self.player += mv * speed * k;

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        let aim = input.aim_dir();
        if aim != Vec2::ZERO && self.fire_cooldown <= 0.0 {
            let angle = aim.to_angle();
            if input.fire_held {
                self.field
                    .bullets
                    .push(Bullet::player(self.player, angle, &self.field.tunables));
                self.field
                    .particles
                    .add(&mut self.rng, ParticleKind::Muzzle, self.player.x, self.player.y, angle, 4, None);
                self.fire_cooldown = FIRE_INTERVAL;
            } else if input.alt_fire_held {
                for spread in [-0.2f32, 0.0, 0.2] {
                    let mut b = Bullet::player(self.player, angle + spread, &self.field.tunables);
                    b.pierce = 2;
                    self.field.bullets.push(b);
                }
                self.fire_cooldown = ALT_FIRE_INTERVAL;
            }
        }
        if input.defense_held {
            self.field
                .particles
                .add(&mut self.rng, ParticleKind::Shield, self.player.x, self.player.y, 0.0, 6, None);
        }

        self.resolve_hits(now);

        let extent = self.view_extent;
        let view = move |f: f32| f * extent;
        self.field.update(&mut self.rng, dt, now, Some(self.player), &view);

        if self.field.asteroids.is_empty() {
            self.field
                .particles
                .add(&mut self.rng, ParticleKind::Nova, self.player.x, self.player.y, 0.0, 32, None);
            self.start_level(self.level + 1);
        }
    }

    /// Distance-only hit tests between bullets, asteroids and the ship
    fn resolve_hits(&mut self, now: f64) {
        let Field {
            asteroids,
            bullets,
            coins,
            crates,
            particles,
            tunables,
        } = &mut self.field;

        for b in bullets.iter_mut() {
            for a in asteroids.asteroids.iter_mut().filter(|a| !a.is_destroyed()) {
                let reach = a.radius() + b.size;
                if b.pos.distance_squared(a.pos) > reach * reach {
                    continue;
                }
                particles.add(&mut self.rng, ParticleKind::Sparks, b.pos.x, b.pos.y, 0.0, 5, None);
                if a.hit(b.damage) {
                    particles.add(&mut self.rng, ParticleKind::Pop, a.pos.x, a.pos.y, 0.0, 10, None);
                    if self.rng.random_bool(0.5) {
                        coins.push(Coin::new(a.pos, now, tunables));
                    } else if self.rng.random_bool(0.2) {
                        let kind = match self.rng.random_range(0..3) {
                            0 => CrateKind::Ammo,
                            1 => CrateKind::Secondary,
                            _ => CrateKind::Defense,
                        };
                        crates.push(SupplyCrate::new(&mut self.rng, a.pos, kind, now, tunables));
                    }
                }
                if b.pierce == 0 {
                    b.life = b.max_life;
                    break;
                }
                b.pierce -= 1;
            }
        }

        let player = self.player;
        let before = coins.len();
        coins.retain(|c| c.pos.distance(player) > c.radius + SHIP_RADIUS);
        let picked = (before - coins.len()) as u32;
        if picked > 0 {
            self.coins_collected += picked;
            particles.add(&mut self.rng, ParticleKind::Pop, player.x, player.y, 0.0, 6, Some(Color::rgb(255, 206, 84)));
        }
        crates.retain(|c| c.pos.distance(player) > c.size + SHIP_RADIUS);
    }

    fn draw<S: Surface + ?Sized>(&self, ctx: &mut S, now: f64) {
        ctx.save();
        ctx.translate(self.screen_center.x - self.player.x, self.screen_center.y - self.player.y);
        self.field.draw(ctx, now);

        // Ship
        ctx.save();
        ctx.translate(self.player.x, self.player.y);
        ctx.rotate(self.heading);
        ctx.begin_path();
        ctx.move_to(SHIP_RADIUS, 0.0);
        ctx.line_to(-SHIP_RADIUS * 0.7, SHIP_RADIUS * 0.6);
        ctx.line_to(-SHIP_RADIUS * 0.4, 0.0);
        ctx.line_to(-SHIP_RADIUS * 0.7, -SHIP_RADIUS * 0.6);
        ctx.close_path();
        ctx.fill(&Paint::Solid(Color::rgb(230, 240, 255)));
        ctx.restore();

        ctx.restore();
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use super::*;
    use nebula_drift::platform::web::attach_input;
    use nebula_drift::platform::{Clock, SystemClock};
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    struct App {
        demo: Demo,
        ctx: CanvasRenderingContext2d,
        clock: SystemClock,
        last_time: f64,
        width: f32,
        height: f32,
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Nebula Drift starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let width = canvas.client_width() as f32;
        let height = canvas.client_height() as f32;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let clock = SystemClock::new();
        let seed = js_sys::Date::now() as u64;
        let demo = Demo::new(seed, width, height);
        attach_input(&demo.input, &canvas);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            demo,
            ctx,
            last_time: clock.now(),
            clock,
            width,
            height,
        }));
        request_animation_frame(app);
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            let now = a.clock.now();
            // Clamp long stalls (tab switch) to a few ticks
            let dt = ((now - a.last_time) as f32).min(TICK_MS * 4.0);
            a.last_time = now;

            a.demo.step(dt, now);

            let App { demo, ctx, width, height, .. } = &mut *a;
            ctx.set_fill_style_str("#05060d");
            ctx.fill_rect(0.0, 0.0, *width as f64, *height as f64);
            demo.draw(ctx, now);
        }
        request_animation_frame(app);
    }

    #[wasm_bindgen(start)]
    pub fn wasm_main() -> Result<(), JsValue> {
        run()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use nebula_drift::input::PointerButton;
    use nebula_drift::renderer::RecordingSurface;

    env_logger::init();
    log::info!("Nebula Drift (native) starting headless session...");

    let mut demo = Demo::new(0x5eed, 1280.0, 720.0);
    let mut now = 0.0f64;
    let center = demo.screen_center;

    // Scripted session: fly right while sweeping aim, then mouse-fire, then alt-fire
    for frame in 0..1800u32 {
        {
            let mut input = demo.input.borrow_mut();
            match frame {
                0 => input.key_down("d"),
                60 => input.key_down("ArrowUp"),
                300 => input.key_up("ArrowUp"),
                320 => input.pointer_down(PointerButton::Primary, center + Vec2::new(200.0, 50.0), now),
                600 => input.pointer_move(center + Vec2::new(-100.0, 200.0)),
                900 => input.pointer_up(PointerButton::Primary),
                901 => input.key_down(" "),
                960 => input.key_up(" "),
                f if f >= 1000 && f % 30 == 0 => input.trigger_secondary(now),
                _ => {}
            }
        }
        demo.step(TICK_MS, now);
        now += TICK_MS as f64;
    }

    let mut surface = RecordingSurface::new();
    demo.draw(&mut surface, now);

    log::info!(
        "Session done: level {}, {} live entities, {} coins, {} draw ops",
        demo.level,
        demo.field.entity_count(),
        demo.coins_collected,
        surface.ops.len()
    );
    println!(
        "level={} entities={} coins={} draw_ops={}",
        demo.level,
        demo.field.entity_count(),
        demo.coins_collected,
        surface.ops.len()
    );

    demo.input.borrow_mut().destroy();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
