//! Data-driven game balance
//!
//! The BASE tunables every entity reads at construction. Supplied by the host as
//! JSON or built from defaults.

use serde::{Deserialize, Serialize};

/// Global tunables shared by the entity constructors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Coin pickup radius
    pub coin_size: f32,
    /// Coin lifetime (ms)
    pub coin_lifetime: f64,
    /// Supply crate half-size
    pub crate_size: f32,
    /// Supply crate lifetime (ms)
    pub crate_lifetime: f64,
    /// Bullet speed (units per reference tick)
    pub bullet_speed: f32,
    /// Bullet radius
    pub bullet_size: f32,
    /// Damage per bullet hit
    pub bullet_damage: u32,
    /// Obstacles a bullet passes through before it is spent
    pub bullet_pierce: u32,
    /// Obstacles spawned at level 0
    pub obstacle_count_base: usize,
    /// Obstacle radius range
    pub obstacle_min_radius: f32,
    pub obstacle_max_radius: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            coin_size: 7.0,
            coin_lifetime: 12_000.0,
            crate_size: 12.0,
            crate_lifetime: 15_000.0,
            bullet_speed: 9.0,
            bullet_size: 3.0,
            bullet_damage: 1,
            bullet_pierce: 0,
            obstacle_count_base: 14,
            obstacle_min_radius: 18.0,
            obstacle_max_radius: 42.0,
        }
    }
}

impl Tunables {
    /// Parse tunables from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Parse tunables, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Malformed tunables ({e}), using defaults");
                Self::default()
            }
        }
    }
}
