//! Canvas2D replay of renderer commands.
//!
//! Commands are already in logical pixels; the leading `SetTransform` maps
//! them onto the canvas backing store.

use std::f64::consts::TAU;

use nebula_core::{ColorStop, LineCap, Paint, Point, RenderCommand};
use web_sys::{CanvasGradient, CanvasRenderingContext2d};

/// Replay one frame onto `ctx`.
pub fn replay(ctx: &CanvasRenderingContext2d, commands: &[RenderCommand]) {
    for cmd in commands {
        match cmd {
            RenderCommand::SetTransform { scale } => {
                let _ = ctx.set_transform(*scale, 0.0, 0.0, *scale, 0.0, 0.0);
            }
            RenderCommand::Clear { rect } => ctx.clear_rect(rect.x, rect.y, rect.w, rect.h),
            RenderCommand::FillRect { rect, paint } => {
                set_fill(ctx, paint);
                ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
            }
            RenderCommand::FillCircle {
                center,
                radius,
                paint,
            } => {
                set_fill(ctx, paint);
                ctx.begin_path();
                let _ = ctx.arc(center.x, center.y, *radius, 0.0, TAU);
                ctx.fill();
            }
            RenderCommand::FillEllipse {
                center,
                radius_x,
                radius_y,
                paint,
            } => {
                set_fill(ctx, paint);
                ctx.begin_path();
                let _ = ctx.ellipse(center.x, center.y, *radius_x, *radius_y, 0.0, 0.0, TAU);
                ctx.fill();
            }
            RenderCommand::StrokeArc {
                center,
                radius,
                start_angle,
                end_angle,
                width,
                cap,
                paint,
            } => {
                set_stroke(ctx, paint);
                ctx.set_line_width(*width);
                ctx.set_line_cap(line_cap(*cap));
                ctx.begin_path();
                let _ = ctx.arc(center.x, center.y, *radius, *start_angle, *end_angle);
                ctx.stroke();
            }
        }
    }
}

fn set_fill(ctx: &CanvasRenderingContext2d, paint: &Paint) {
    match paint {
        Paint::Solid(color) => ctx.set_fill_style_str(&color.to_css()),
        Paint::LinearGradient { from, to, stops } => {
            ctx.set_fill_style_canvas_gradient(&gradient(ctx, *from, *to, stops));
        }
    }
}

fn set_stroke(ctx: &CanvasRenderingContext2d, paint: &Paint) {
    match paint {
        Paint::Solid(color) => ctx.set_stroke_style_str(&color.to_css()),
        Paint::LinearGradient { from, to, stops } => {
            ctx.set_stroke_style_canvas_gradient(&gradient(ctx, *from, *to, stops));
        }
    }
}

fn gradient(
    ctx: &CanvasRenderingContext2d,
    from: Point,
    to: Point,
    stops: &[ColorStop],
) -> CanvasGradient {
    let g = ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
    for stop in stops {
        // Offsets outside 0..=1 throw; the renderer never emits them.
        let _ = g.add_color_stop(stop.offset, &stop.color.to_css());
    }
    g
}

/// `lineCap` keyword for a cap style.
pub fn line_cap(cap: LineCap) -> &'static str {
    match cap {
        LineCap::Butt => "butt",
        LineCap::Round => "round",
    }
}
