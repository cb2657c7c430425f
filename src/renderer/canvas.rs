//! Browser canvas implementation of `Surface`

use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use super::{Paint, Stop, Surface};

fn add_stops(gradient: &CanvasGradient, stops: &[Stop]) {
    for (offset, color) in stops {
        let _ = gradient.add_color_stop(*offset, &color.css());
    }
}

/// Resolve a paint to a canvas gradient, or `None` for solid colors
fn gradient_for(ctx: &CanvasRenderingContext2d, paint: &Paint) -> Option<CanvasGradient> {
    match paint {
        Paint::Solid(_) => None,
        Paint::Linear(g) => {
            let grad = ctx.create_linear_gradient(g.x0 as f64, g.y0 as f64, g.x1 as f64, g.y1 as f64);
            add_stops(&grad, &g.stops);
            Some(grad)
        }
        Paint::Radial(g) => {
            let grad = ctx
                .create_radial_gradient(
                    g.x0 as f64,
                    g.y0 as f64,
                    g.r0 as f64,
                    g.x1 as f64,
                    g.y1 as f64,
                    g.r1 as f64,
                )
                .ok()?;
            add_stops(&grad, &g.stops);
            Some(grad)
        }
    }
}

impl Surface for CanvasRenderingContext2d {
    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn translate(&mut self, x: f32, y: f32) {
        let _ = CanvasRenderingContext2d::translate(self, x as f64, y as f64);
    }

    fn rotate(&mut self, angle: f32) {
        let _ = CanvasRenderingContext2d::rotate(self, angle as f64);
    }

    fn scale(&mut self, x: f32, y: f32) {
        let _ = CanvasRenderingContext2d::scale(self, x as f64, y as f64);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.set_global_alpha(alpha as f64);
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        CanvasRenderingContext2d::move_to(self, x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        CanvasRenderingContext2d::line_to(self, x as f64, y as f64);
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        let _ = CanvasRenderingContext2d::arc(
            self,
            x as f64,
            y as f64,
            radius.max(0.0) as f64,
            start as f64,
            end as f64,
        );
    }

    fn close_path(&mut self) {
        CanvasRenderingContext2d::close_path(self);
    }

    fn fill(&mut self, paint: &Paint) {
        match (paint, gradient_for(self, paint)) {
            (Paint::Solid(c), _) => self.set_fill_style_str(&c.css()),
            (_, Some(grad)) => self.set_fill_style_canvas_gradient(&grad),
            (_, None) => return,
        }
        CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&mut self, paint: &Paint, width: f32) {
        match (paint, gradient_for(self, paint)) {
            (Paint::Solid(c), _) => self.set_stroke_style_str(&c.css()),
            (_, Some(grad)) => self.set_stroke_style_canvas_gradient(&grad),
            (_, None) => return,
        }
        self.set_line_width(width as f64);
        CanvasRenderingContext2d::stroke(self);
    }
}
