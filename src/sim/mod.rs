//! Simulation module
//!
//! All entity logic lives here. It must stay platform free:
//! - Time arrives as `dt`/`now` arguments, never read from a clock
//! - Randomness comes from the caller's RNG only
//! - Player position is passed in and may be absent

pub mod asteroid;
pub mod bullet;
pub mod field;
pub mod particles;
pub mod pickup;

pub use asteroid::{Asteroid, AsteroidField, AsteroidVariant, OutlinePoint, hit_points_for_radius};
pub use bullet::Bullet;
pub use field::Field;
pub use particles::{Particle, ParticleKind, ParticleSystem, particle_alpha};
pub use pickup::{Coin, CrateKind, SupplyCrate};
