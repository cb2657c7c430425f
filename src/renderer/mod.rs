//! 2D drawing surface abstraction
//!
//! Entities draw through `Surface` so the same code paints a browser canvas or a
//! recorder in tests.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod recording;

pub use recording::{DrawOp, RecordingSurface};

/// Straight RGBA color, channels in 0-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Build from 8-bit channels, fully opaque
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba()` string
    pub fn css(&self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }
}

/// A color stop at offset 0-1
pub type Stop = (f32, Color);

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub stops: Vec<Stop>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub x0: f32,
    pub y0: f32,
    pub r0: f32,
    pub x1: f32,
    pub y1: f32,
    pub r1: f32,
    pub stops: Vec<Stop>,
}

impl RadialGradient {
    /// Concentric gradient from the center out to `radius`
    pub fn centered(radius: f32, stops: Vec<Stop>) -> Self {
        Self {
            x0: 0.0,
            y0: 0.0,
            r0: 0.0,
            x1: 0.0,
            y1: 0.0,
            r1: radius,
            stops,
        }
    }
}

/// Fill or stroke style
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

/// Immediate-mode 2D drawing surface
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);
    fn scale(&mut self, x: f32, y: f32);
    /// Global alpha applied to subsequent fills/strokes
    fn set_alpha(&mut self, alpha: f32);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32);
    fn close_path(&mut self);

    fn fill(&mut self, paint: &Paint);
    fn stroke(&mut self, paint: &Paint, width: f32);

    /// Filled circle at (x, y)
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, paint: &Paint) {
        self.begin_path();
        self.arc(x, y, radius, 0.0, std::f32::consts::TAU);
        self.fill(paint);
    }
}
