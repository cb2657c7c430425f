//! Surface that records draw calls instead of painting

use super::{Paint, Surface};

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    Scale(f32, f32),
    Alpha(f32),
    BeginPath,
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Arc { x: f32, y: f32, radius: f32 },
    ClosePath,
    Fill(Paint),
    Stroke(Paint, f32),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fill calls
    pub fn fills(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Fill(_))).count()
    }

    /// Number of stroke calls
    pub fn strokes(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Stroke(..))).count()
    }

    /// Every alpha that was set, in order
    pub fn alphas(&self) -> Vec<f32> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Alpha(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    /// Save/restore calls are balanced
    pub fn is_balanced(&self) -> bool {
        let mut depth = 0i32;
        for op in &self.ops {
            match op {
                DrawOp::Save => depth += 1,
                DrawOp::Restore => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::Translate(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.ops.push(DrawOp::Rotate(angle));
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::Scale(x, y));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ops.push(DrawOp::Alpha(alpha));
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, _start: f32, _end: f32) {
        self.ops.push(DrawOp::Arc { x, y, radius });
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn fill(&mut self, paint: &Paint) {
        self.ops.push(DrawOp::Fill(paint.clone()));
    }

    fn stroke(&mut self, paint: &Paint, width: f32) {
        self.ops.push(DrawOp::Stroke(paint.clone(), width));
    }
}
