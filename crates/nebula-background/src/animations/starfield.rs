//! Depth-layered starfield (stateful).

use nebula_core::{Paint, Point, RenderCommand, Rgba, Surface};
use rand::Rng;

use crate::palette::{WASH_END, WASH_START};
use crate::settings::StarfieldSettings;

/// Stars that drift past this x coordinate are recycled.
pub const LEFT_EDGE: f64 = -10.0;

/// Recycled stars re-enter within this many pixels beyond the right edge.
pub const RESPAWN_SPREAD: f64 = 20.0;

/// A single star.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    /// Horizontal position in logical pixels.
    pub x: f64,
    /// Vertical position in logical pixels.
    pub y: f64,
    /// Depth layer, 1 = farthest.
    pub z: u8,
    /// Base radius.
    pub r: f64,
    /// Leftward velocity; nearer layers move faster.
    pub vx: f64,
}

impl Star {
    /// Hue in degrees for this star's layer.
    pub fn hue(&self) -> f32 {
        match self.z {
            1 => 180.0,
            2 => 265.0,
            _ => 200.0,
        }
    }

    pub fn alpha(&self) -> f32 {
        (0.35 + self.z as f32 * 0.12).min(1.0)
    }

    pub fn color(&self) -> Rgba {
        Rgba::hsla(self.hue(), 1.0, 0.7, self.alpha())
    }

    /// Painted radius, slightly larger for nearer layers.
    pub fn radius(&self) -> f64 {
        self.r + self.z as f64 * 0.2
    }
}

/// Populate `layers × per_layer` stars uniformly across the surface.
pub fn init_stars<R: Rng>(
    surface: &Surface,
    settings: &StarfieldSettings,
    rng: &mut R,
) -> Vec<Star> {
    let (w, h) = (surface.width(), surface.height());
    let mut stars = Vec::with_capacity(settings.layers as usize * settings.per_layer);
    for z in 1..=settings.layers {
        let depth = z as f64;
        for _ in 0..settings.per_layer {
            stars.push(Star {
                x: rng.gen_range(0.0..1.0) * w,
                y: rng.gen_range(0.0..1.0) * h,
                z,
                r: rng.gen_range(0.0..1.0) * 1.8 + 0.4,
                vx: (rng.gen_range(0.0..1.0) * 0.4 + 0.1) * depth,
            });
        }
    }
    stars
}

/// Advance every star by one frame, recycling those that leave the surface.
///
/// A star past the left edge re-enters at `[w, w + RESPAWN_SPREAD)`; one
/// drifting past `w + RESPAWN_SPREAD` (negative speed) re-enters at
/// `[LEFT_EDGE, 0)`. Both get a fresh random `y`, so after any update every
/// `x` lies in `[LEFT_EDGE, w + RESPAWN_SPREAD)`.
pub fn update<R: Rng>(stars: &mut [Star], surface: &Surface, speed: f64, rng: &mut R) {
    let (w, h) = (surface.width(), surface.height());
    for star in stars {
        star.x -= star.vx * speed;
        if star.x < LEFT_EDGE {
            star.x = w + rng.gen_range(0.0..1.0) * RESPAWN_SPREAD;
            star.y = rng.gen_range(0.0..1.0) * h;
        } else if star.x >= w + RESPAWN_SPREAD {
            star.x = LEFT_EDGE * rng.gen_range(0.0..1.0);
            star.y = rng.gen_range(0.0..1.0) * h;
        }
    }
}

/// Emit the backdrop wash and one circle per star.
///
/// `tilt` is the eased pointer offset; each star is shifted by
/// `tilt × z × parallax`.
pub fn paint(
    stars: &[Star],
    surface: &Surface,
    tilt: (f64, f64),
    parallax: f64,
    out: &mut Vec<RenderCommand>,
) {
    let bounds = surface.bounds();
    out.push(RenderCommand::FillRect {
        rect: bounds,
        paint: Paint::linear(bounds.top_left(), bounds.bottom_right(), WASH_START, WASH_END),
    });

    for star in stars {
        let shift = star.z as f64 * parallax;
        out.push(RenderCommand::FillCircle {
            center: Point::new(star.x + tilt.0 * shift, star.y + tilt.1 * shift),
            radius: star.radius(),
            paint: Paint::Solid(star.color()),
        });
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn star(x: f64, z: u8) -> Star {
        Star {
            x,
            y: 50.0,
            z,
            r: 1.0,
            vx: 1.0,
        }
    }

    #[test]
    fn test_layer_styles() {
        assert_eq!(star(0.0, 1).hue(), 180.0);
        assert_eq!(star(0.0, 2).hue(), 265.0);
        assert_eq!(star(0.0, 3).hue(), 200.0);
        assert!((star(0.0, 1).alpha() - 0.47).abs() < 1e-6);
        assert!((star(0.0, 3).alpha() - 0.71).abs() < 1e-6);
        assert_eq!(star(0.0, 8).alpha(), 1.0);
        assert!((star(0.0, 2).radius() - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_init_distribution() {
        let surface = Surface::new(800.0, 600.0, 1.0);
        let mut rng = StdRng::seed_from_u64(7);
        let stars = init_stars(&surface, &StarfieldSettings::default(), &mut rng);
        assert_eq!(stars.len(), 270);
        for z in 1..=3u8 {
            assert_eq!(stars.iter().filter(|s| s.z == z).count(), 90);
        }
        for s in &stars {
            assert!((0.0..800.0).contains(&s.x));
            assert!((0.0..600.0).contains(&s.y));
            assert!((0.4..2.2).contains(&s.r));
            let depth = s.z as f64;
            assert!(s.vx >= 0.1 * depth && s.vx < 0.5 * depth);
        }
    }

    #[test]
    fn test_update_moves_left_by_velocity() {
        let surface = Surface::new(100.0, 100.0, 1.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut stars = vec![star(50.0, 1)];
        update(&mut stars, &surface, 0.3, &mut rng);
        assert!((stars[0].x - 49.7).abs() < 1e-12);
        assert_eq!(stars[0].y, 50.0);
    }

    #[test]
    fn test_update_wraps_to_right_edge() {
        let surface = Surface::new(100.0, 80.0, 1.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut stars = vec![star(-9.9, 1)];
        update(&mut stars, &surface, 0.3, &mut rng);
        assert!(stars[0].x >= 100.0 && stars[0].x < 100.0 + RESPAWN_SPREAD);
        assert!((0.0..80.0).contains(&stars[0].y));
    }

    #[test]
    fn test_reverse_drift_wraps_to_left_edge() {
        let surface = Surface::new(200.0, 100.0, 1.0);
        let mut rng = StdRng::seed_from_u64(9);
        let mut stars = vec![star(219.0, 2)];
        update(&mut stars, &surface, -5.0, &mut rng);
        assert!(stars[0].x >= LEFT_EDGE && stars[0].x <= 0.0);
        assert!((0.0..100.0).contains(&stars[0].y));
    }

    #[test]
    fn test_reverse_drift_stays_in_bounds() {
        let surface = Surface::new(200.0, 100.0, 1.0);
        let mut rng = StdRng::seed_from_u64(3);
        let settings = StarfieldSettings::default();
        let mut stars = init_stars(&surface, &settings, &mut rng);
        for _ in 0..1_000 {
            update(&mut stars, &surface, -5.0, &mut rng);
            for s in &stars {
                assert!(s.x >= LEFT_EDGE && s.x < 200.0 + RESPAWN_SPREAD, "{s:?}");
            }
        }
    }

    #[test]
    fn test_paint_applies_parallax_per_layer() {
        let surface = Surface::new(100.0, 100.0, 1.0);
        let stars = vec![star(10.0, 1), star(10.0, 3)];
        let mut out = Vec::new();
        paint(&stars, &surface, (0.5, -1.0), 6.0, &mut out);
        assert_eq!(out.len(), 3);
        let centers: Vec<Point> = out
            .iter()
            .filter_map(|c| match c {
                RenderCommand::FillCircle { center, .. } => Some(*center),
                _ => None,
            })
            .collect();
        assert_eq!(centers, vec![Point::new(13.0, 44.0), Point::new(19.0, 32.0)]);
    }
}
