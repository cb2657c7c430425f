//! Unified input: keyboard, mouse and touch fused into one command snapshot
//!
//! Device listeners push raw events in whenever they fire. The game loop pulls
//! the canonical `InputState` once per tick with `poll`, so however many events
//! arrived in between, a tick sees one consistent state.
//!
//! Precedence:
//! - Arrow keys aim and fire, and always take aim back from the mouse.
//! - Pointer movement aims (and fires while the button is held) and stays in
//!   control until an arrow key is pressed.
//! - Releasing the mouse only stops firing while the mouse owns aim.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::math::normalize_axes;
use crate::settings::InputSettings;

/// The per-tick command snapshot
///
/// `move_*` and `aim_*` are each either zero or a unit vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub move_x: f32,
    pub move_y: f32,
    pub aim_x: f32,
    pub aim_y: f32,
    pub is_aiming: bool,
    pub fire_held: bool,
    pub is_boosting: bool,
    pub alt_fire_held: bool,
    pub defense_held: bool,
    pub mouse_down: bool,
    pub mouse_aim_active: bool,
}

impl InputState {
    #[inline]
    pub fn move_dir(&self) -> Vec2 {
        Vec2::new(self.move_x, self.move_y)
    }

    #[inline]
    pub fn aim_dir(&self) -> Vec2 {
        Vec2::new(self.aim_x, self.aim_y)
    }

    fn set_move(&mut self, v: Vec2) {
        self.move_x = v.x;
        self.move_y = v.y;
    }

    fn set_aim(&mut self, v: Vec2) {
        self.aim_x = v.x;
        self.aim_y = v.y;
    }
}

/// Keys the manager tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    /// Shift: held alt-fire
    Shift,
    /// E: held alt-fire
    Ability,
    /// F: defense
    Defense,
    /// Space: boost
    Boost,
}

impl Key {
    const COUNT: usize = 12;

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "w" | "W" => Some(Key::W),
            "a" | "A" => Some(Key::A),
            "s" | "S" => Some(Key::S),
            "d" | "D" => Some(Key::D),
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "Shift" => Some(Key::Shift),
            "e" | "E" => Some(Key::Ability),
            "f" | "F" => Some(Key::Defense),
            " " | "Spacebar" => Some(Key::Boost),
            _ => None,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => PointerButton::Primary,
            2 => PointerButton::Secondary,
            _ => PointerButton::Other,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct KeyboardState {
    down: [bool; Key::COUNT],
}

impl KeyboardState {
    #[inline]
    fn held(&self, key: Key) -> bool {
        self.down[key.index()]
    }

    /// +1 / -1 / 0 from a pair of opposing keys
    #[inline]
    fn axis(&self, positive: Key, negative: Key) -> f32 {
        self.held(positive) as i8 as f32 - self.held(negative) as i8 as f32
    }

    fn any_held(&self) -> bool {
        self.down.iter().any(|&d| d)
    }
}

/// Virtual movement stick driven by one finger
#[derive(Debug, Clone, Copy)]
struct Stick {
    id: i32,
    origin: Vec2,
    dir: Vec2,
}

#[derive(Debug, Clone, Default)]
struct TouchTracking {
    /// Finger currently acting as the primary pointer
    aim: Option<i32>,
    stick: Option<Stick>,
}

/// Detaches a device listener when dropped
pub struct ListenerGuard {
    detach: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// Fuses device events into the canonical `InputState`
#[derive(Debug, Default)]
pub struct InputManager {
    state: InputState,
    keys: KeyboardState,
    touch: TouchTracking,
    /// Movement from WASD alone, kept apart from the touch stick
    key_move: Vec2,
    settings: InputSettings,
    /// Player position in screen space, the origin for pointer aiming
    player_screen: Option<Vec2>,
    /// Deadline of the pending alt-fire release
    alt_release_at: Option<f64>,
    listeners: Vec<ListenerGuard>,
    destroyed: bool,
}

impl InputManager {
    pub fn new(settings: InputSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Replace the input preferences
    pub fn update_settings(&mut self, settings: InputSettings) {
        if !settings.touch_joystick && self.touch.stick.take().is_some() {
            self.apply_move();
        }
        self.settings = settings;
    }

    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    /// Where the player is drawn on screen. `None` while there is no player.
    pub fn set_player_screen(&mut self, pos: Option<Vec2>) {
        self.player_screen = pos;
    }

    /// Take ownership of a device listener so `destroy` can detach it
    pub fn attach(&mut self, guard: ListenerGuard) {
        if self.destroyed {
            // Dropping detaches immediately
            return;
        }
        self.listeners.push(guard);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Latest snapshot without running deferred work
    pub fn state(&self) -> InputState {
        self.state
    }

    /// Settle deferred work due by `now` and return the snapshot for this tick
    pub fn poll(&mut self, now: f64) -> InputState {
        if let Some(due) = self.alt_release_at {
            if now >= due {
                self.alt_release_at = None;
                self.state.alt_fire_held = self.alt_keys_held();
            }
        }
        self.state
    }

    /// True when no key is held
    pub fn keyboard_idle(&self) -> bool {
        !self.keys.any_held()
    }

    // === Keyboard ===

    /// DOM keydown
    pub fn key_down(&mut self, key: &str) {
        if let Some(k) = Key::from_dom(key) {
            self.set_key(k, true);
        }
    }

    /// DOM keyup
    pub fn key_up(&mut self, key: &str) {
        if let Some(k) = Key::from_dom(key) {
            self.set_key(k, false);
        }
    }

    pub fn set_key(&mut self, key: Key, pressed: bool) {
        if self.destroyed {
            return;
        }
        self.keys.down[key.index()] = pressed;
        self.recompute_keys();
    }

    fn alt_keys_held(&self) -> bool {
        self.keys.held(Key::Shift) || self.keys.held(Key::Ability)
    }

    fn recompute_keys(&mut self) {
        let k = &self.keys;
        self.key_move = normalize_axes(k.axis(Key::D, Key::A), k.axis(Key::S, Key::W));
        let aim = normalize_axes(k.axis(Key::Right, Key::Left), k.axis(Key::Down, Key::Up));

        if aim != Vec2::ZERO {
            self.state.set_aim(aim);
            self.state.is_aiming = true;
            self.state.fire_held = true;
            self.state.mouse_aim_active = false;
        } else if !self.state.mouse_aim_active {
            self.state.set_aim(Vec2::ZERO);
            self.state.is_aiming = false;
            self.state.fire_held = false;
        }

        self.state.alt_fire_held = self.alt_keys_held() || self.alt_release_at.is_some();
        self.state.defense_held = self.keys.held(Key::Defense);
        self.state.is_boosting = self.keys.held(Key::Boost);
        self.apply_move();
    }

    /// Keyboard movement wins; the touch stick fills in when no key moves
    fn apply_move(&mut self) {
        let stick = self.touch.stick.map(|s| s.dir).unwrap_or(Vec2::ZERO);
        let mv = if self.key_move != Vec2::ZERO { self.key_move } else { stick };
        self.state.set_move(mv);
    }

    // === Pointer ===

    /// Aim from the player toward a screen point. No-op without a player.
    fn aim_at(&mut self, pos: Vec2) {
        let Some(origin) = self.player_screen else {
            return;
        };
        let dir = (pos - origin).normalize_or_zero();
        if dir != Vec2::ZERO {
            self.state.set_aim(dir);
        }
        self.state.is_aiming = true;
        self.state.mouse_aim_active = true;
        self.state.fire_held = self.state.mouse_down;
    }

    /// Mouse moved (or a mapped touch moved) to screen `pos`
    pub fn pointer_move(&mut self, pos: Vec2) {
        if self.destroyed {
            return;
        }
        self.aim_at(pos);
    }

    pub fn pointer_down(&mut self, button: PointerButton, pos: Vec2, now: f64) {
        if self.destroyed {
            return;
        }
        match button {
            PointerButton::Primary => {
                self.state.mouse_down = true;
                self.state.fire_held = true;
                self.aim_at(pos);
            }
            PointerButton::Secondary => self.trigger_secondary(now),
            PointerButton::Other => {}
        }
    }

    pub fn pointer_up(&mut self, button: PointerButton) {
        if self.destroyed || button != PointerButton::Primary {
            return;
        }
        self.state.mouse_down = false;
        if self.state.mouse_aim_active {
            self.state.fire_held = false;
        }
    }

    /// One-shot alt-fire: held for the configured pulse then released by `poll`.
    /// Retriggering restarts the pulse.
    pub fn trigger_secondary(&mut self, now: f64) {
        if self.destroyed {
            return;
        }
        self.state.alt_fire_held = true;
        self.alt_release_at = Some(now + self.settings.alt_fire_pulse_ms);
    }

    // === Touch ===

    /// Finger down. With the joystick enabled the first finger on the left half
    /// of the viewport steers; any other finger acts as the primary pointer, and
    /// a further finger fires the secondary.
    pub fn touch_start(&mut self, id: i32, pos: Vec2, viewport_width: f32, now: f64) {
        if self.destroyed {
            return;
        }
        if self.settings.touch_joystick && self.touch.stick.is_none() && pos.x < viewport_width * 0.5 {
            self.touch.stick = Some(Stick {
                id,
                origin: pos,
                dir: Vec2::ZERO,
            });
            return;
        }
        if self.touch.aim.is_none() {
            self.touch.aim = Some(id);
            self.pointer_down(PointerButton::Primary, pos, now);
        } else {
            self.trigger_secondary(now);
        }
    }

    pub fn touch_move(&mut self, id: i32, pos: Vec2) {
        if self.destroyed {
            return;
        }
        let dead_zone = self.settings.joystick_dead_zone;
        if let Some(stick) = self.touch.stick.as_mut().filter(|s| s.id == id) {
            let offset = pos - stick.origin;
            stick.dir = if offset.length() < dead_zone {
                Vec2::ZERO
            } else {
                offset.normalize_or_zero()
            };
            self.apply_move();
        } else if self.touch.aim == Some(id) {
            self.pointer_move(pos);
        }
    }

    /// Finger lifted or cancelled
    pub fn touch_end(&mut self, id: i32) {
        if self.destroyed {
            return;
        }
        if self.touch.stick.is_some_and(|s| s.id == id) {
            self.touch.stick = None;
            self.apply_move();
        } else if self.touch.aim == Some(id) {
            self.touch.aim = None;
            self.pointer_up(PointerButton::Primary);
        }
    }

    // === Lifecycle ===

    /// Zero the snapshot and forget every held key and finger. Cancels a pending
    /// alt-fire release.
    pub fn reset(&mut self) {
        self.state = InputState::default();
        self.keys = KeyboardState::default();
        self.touch = TouchTracking::default();
        self.key_move = Vec2::ZERO;
        self.alt_release_at = None;
    }

    /// Reset and detach every listener. The manager ignores events afterwards.
    pub fn destroy(&mut self) {
        self.reset();
        let detached = self.listeners.len();
        self.listeners.clear();
        self.destroyed = true;
        log::info!("Input manager destroyed ({} listeners detached)", detached);
    }
}
