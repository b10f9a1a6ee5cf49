//! Replays renderer commands onto a ratatui braille canvas.
//!
//! The canvas is a grid of braille dots, each covering several logical
//! pixels, and it has no alpha. Shapes are rasterized by sampling one point
//! per dot; translucent colours are composited over black and anything too
//! faint to show is skipped.

use std::f64::consts::TAU;

use nebula_core::{LineCap, Paint, Point, Rect, RenderCommand, Rgba};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout,
    style::Color,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Painter, Shape},
    },
};

/// Logical pixels per terminal cell, horizontally.
pub const CELL_WIDTH_PX: f64 = 8.0;
/// Logical pixels per terminal cell, vertically.
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Braille dots per cell.
const DOTS_X: f64 = 2.0;
const DOTS_Y: f64 = 4.0;

/// Colours fainter than this are not drawn.
const MIN_ALPHA: f32 = 0.1;

/// Logical size of a terminal area.
pub fn area_px(area: layout::Rect) -> (f64, f64) {
    (
        area.width as f64 * CELL_WIDTH_PX,
        area.height as f64 * CELL_HEIGHT_PX,
    )
}

/// Map a colour to the terminal, or `None` if it would be invisible.
pub fn terminal_color(c: Rgba) -> Option<Color> {
    if c.a < MIN_ALPHA {
        return None;
    }
    let (r, g, b) = c.over_black();
    Some(Color::Rgb(r, g, b))
}

/// A frame's worth of commands, drawable as a canvas shape.
pub struct CommandLayer<'a> {
    commands: &'a [RenderCommand],
    height: f64,
    step: f64,
}

impl<'a> CommandLayer<'a> {
    /// `area` is the terminal region the canvas covers.
    pub fn new(commands: &'a [RenderCommand], area: layout::Rect) -> Self {
        let (_, height) = area_px(area);
        let step = (CELL_WIDTH_PX / DOTS_X).min(CELL_HEIGHT_PX / DOTS_Y);
        Self {
            commands,
            height,
            step,
        }
    }

    fn plot(&self, painter: &mut Painter, p: Point, color: Color) {
        // Canvas y grows upward.
        if let Some((x, y)) = painter.get_point(p.x, self.height - p.y) {
            painter.paint(x, y, color);
        }
    }

    fn fill_rect(&self, painter: &mut Painter, rect: &Rect, paint: &Paint) {
        let mut y = rect.y + self.step / 2.0;
        while y < rect.y + rect.h {
            let mut x = rect.x + self.step / 2.0;
            while x < rect.x + rect.w {
                let p = Point::new(x, y);
                if let Some(color) = terminal_color(paint.sample(p)) {
                    self.plot(painter, p, color);
                }
                x += self.step;
            }
            y += self.step;
        }
    }

    fn fill_ellipse(&self, painter: &mut Painter, center: Point, rx: f64, ry: f64, paint: &Paint) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        // Small shapes still get their centre dot.
        if let Some(color) = terminal_color(paint.sample(center)) {
            self.plot(painter, center, color);
        }
        let mut dy = -ry;
        while dy <= ry {
            let mut dx = -rx;
            while dx <= rx {
                if (dx / rx).powi(2) + (dy / ry).powi(2) <= 1.0 {
                    let p = center.offset(dx, dy);
                    if let Some(color) = terminal_color(paint.sample(p)) {
                        self.plot(painter, p, color);
                    }
                }
                dx += self.step;
            }
            dy += self.step;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn stroke_arc(
        &self,
        painter: &mut Painter,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        width: f64,
        cap: LineCap,
        paint: &Paint,
    ) {
        if radius <= 0.0 {
            return;
        }
        let half = width.max(self.step) / 2.0;
        let sweep = end - start;
        let arc_steps = ((sweep.abs() * (radius + half)) / (self.step / 2.0)).ceil() as usize;
        for i in 0..=arc_steps {
            let angle = start + sweep * i as f64 / arc_steps.max(1) as f64;
            let (sin, cos) = angle.sin_cos();
            let mut offset = -half;
            while offset <= half {
                let r = radius + offset;
                let p = center.offset(r * cos, r * sin);
                if let Some(color) = terminal_color(paint.sample(p)) {
                    self.plot(painter, p, color);
                }
                offset += self.step / 2.0;
            }
        }

        if cap == LineCap::Round && sweep.abs() < TAU {
            for angle in [start, end] {
                let (sin, cos) = angle.sin_cos();
                let tip = center.offset(radius * cos, radius * sin);
                self.fill_ellipse(painter, tip, half, half, paint);
            }
        }
    }
}

impl Shape for CommandLayer<'_> {
    fn draw(&self, painter: &mut Painter) {
        for cmd in self.commands {
            match cmd {
                // The canvas works in logical pixels and is redrawn from
                // scratch every frame.
                RenderCommand::SetTransform { .. } | RenderCommand::Clear { .. } => {}
                RenderCommand::FillRect { rect, paint } => self.fill_rect(painter, rect, paint),
                RenderCommand::FillCircle {
                    center,
                    radius,
                    paint,
                } => self.fill_ellipse(painter, *center, *radius, *radius, paint),
                RenderCommand::FillEllipse {
                    center,
                    radius_x,
                    radius_y,
                    paint,
                } => self.fill_ellipse(painter, *center, *radius_x, *radius_y, paint),
                RenderCommand::StrokeArc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    width,
                    cap,
                    paint,
                } => self.stroke_arc(
                    painter,
                    *center,
                    *radius,
                    *start_angle,
                    *end_angle,
                    *width,
                    *cap,
                    paint,
                ),
            }
        }
    }
}

/// Draw `commands` into `area` of the frame as a braille canvas.
pub fn render_commands(frame: &mut Frame, area: layout::Rect, commands: &[RenderCommand]) {
    draw_commands(frame.buffer_mut(), area, commands);
}

/// Draw `commands` into `area` of `buf` as a braille canvas.
pub fn draw_commands(buf: &mut Buffer, area: layout::Rect, commands: &[RenderCommand]) {
    if commands.is_empty() || area.width == 0 || area.height == 0 {
        return;
    }
    let (width, height) = area_px(area);
    let layer = CommandLayer::new(commands, area);
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| ctx.draw(&layer));
    canvas.render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faint_colors_are_skipped() {
        assert_eq!(terminal_color(Rgba::rgba(0, 229, 255, 0.06)), None);
        assert_eq!(
            terminal_color(Rgba::rgba(200, 100, 50, 0.5)),
            Some(Color::Rgb(100, 50, 25))
        );
    }

    /// Cells of a 10x5 buffer (80x80 logical pixels) that received dots.
    fn painted(commands: &[RenderCommand]) -> Vec<(u16, u16, Color)> {
        let area = layout::Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        draw_commands(&mut buf, area, commands);
        let mut cells = Vec::new();
        for y in 0..area.height {
            for x in 0..area.width {
                let cell = &buf[(x, y)];
                if cell.symbol() != " " {
                    cells.push((x, y, cell.fg));
                }
            }
        }
        cells
    }

    fn solid(r: u8, g: u8, b: u8, a: f32) -> Paint {
        Paint::Solid(Rgba::rgba(r, g, b, a))
    }

    #[test]
    fn test_circle_lands_top_left() {
        let cells = painted(&[RenderCommand::FillCircle {
            center: Point::new(20.0, 20.0),
            radius: 8.0,
            paint: solid(255, 0, 0, 1.0),
        }]);
        assert!(!cells.is_empty());
        for (x, y, fg) in cells {
            // Logical y grows downward, so the circle stays in the top rows.
            assert!(x < 5 && y < 3, "dot at cell ({x}, {y})");
            assert_eq!(fg, Color::Rgb(255, 0, 0));
        }
    }

    #[test]
    fn test_quarter_arc_sweeps_bottom_right() {
        let cells = painted(&[RenderCommand::StrokeArc {
            center: Point::new(40.0, 40.0),
            radius: 24.0,
            start_angle: 0.0,
            end_angle: std::f64::consts::FRAC_PI_2,
            width: 4.0,
            cap: LineCap::Butt,
            paint: solid(0, 229, 255, 1.0),
        }]);
        assert!(!cells.is_empty());
        // Clockwise from 3 o'clock to 6 o'clock in screen coordinates.
        assert!(cells.iter().all(|&(x, y, _)| x >= 4 && y >= 2));
        assert!(cells.iter().any(|&(x, _, _)| x >= 7));
        assert!(cells.iter().any(|&(_, y, _)| y >= 3));
    }

    #[test]
    fn test_round_caps_extend_past_arc_ends() {
        let arc = |cap| RenderCommand::StrokeArc {
            center: Point::new(40.0, 40.0),
            radius: 24.0,
            start_angle: 0.0,
            end_angle: std::f64::consts::FRAC_PI_2,
            width: 12.0,
            cap,
            paint: solid(255, 255, 255, 1.0),
        };
        let butt = painted(&[arc(LineCap::Butt)]);
        let round = painted(&[arc(LineCap::Round)]);
        assert!(round.len() >= butt.len());
        assert!(butt.iter().all(|c| round.contains(c)));
    }

    #[test]
    fn test_faint_paint_draws_nothing() {
        let cells = painted(&[
            RenderCommand::FillCircle {
                center: Point::new(40.0, 40.0),
                radius: 30.0,
                paint: solid(0, 229, 255, 0.05),
            },
            RenderCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 80.0, 80.0),
                paint: Paint::linear(
                    Point::new(0.0, 0.0),
                    Point::new(80.0, 80.0),
                    Rgba::rgba(0, 229, 255, 0.06),
                    Rgba::rgba(181, 23, 255, 0.06),
                ),
            },
        ]);
        assert!(cells.is_empty());
    }

    #[test]
    fn test_area_px() {
        assert_eq!(area_px(layout::Rect::new(0, 0, 100, 40)), (800.0, 640.0));
    }
}
