//! Pointer-tilt state driving the parallax offset.

/// Normalized pointer offset from the centre of a viewport.
///
/// The pointer handler writes a target; the frame function eases the current
/// value toward it. Each step is a convex combination of the previous value
/// and the target, so the current value never overshoots.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerTilt {
    target: (f64, f64),
    current: (f64, f64),
    smoothing: f64,
}

impl PointerTilt {
    pub fn new(smoothing: f64) -> Self {
        let smoothing = if smoothing.is_finite() && smoothing > 0.0 {
            smoothing.min(1.0)
        } else {
            1.0
        };
        Self {
            target: (0.0, 0.0),
            current: (0.0, 0.0),
            smoothing,
        }
    }

    /// Record the latest normalized pointer offset. Non-finite input is
    /// dropped.
    pub fn set_target(&mut self, x: f64, y: f64) {
        if x.is_finite() && y.is_finite() {
            self.target = (x, y);
        }
    }

    /// Advance the eased value by one frame.
    pub fn step(&mut self) {
        let k = self.smoothing;
        self.current.0 += (self.target.0 - self.current.0) * k;
        self.current.1 += (self.target.1 - self.current.1) * k;
    }

    pub fn target(&self) -> (f64, f64) {
        self.target
    }

    /// The eased offset used for painting.
    pub fn offset(&self) -> (f64, f64) {
        self.current
    }
}

impl Default for PointerTilt {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Normalize a pointer position against a viewport to roughly `[-1, 1]`.
///
/// `((px - cx) / cx, (py - cy) / cy)`; positions outside the viewport give
/// values beyond that range. An empty viewport axis maps to 0.
pub fn normalize(px: f64, py: f64, viewport_width: f64, viewport_height: f64) -> (f64, f64) {
    let axis = |p: f64, extent: f64| {
        let c = extent / 2.0;
        if c > 0.0 { (p - c) / c } else { 0.0 }
    };
    (axis(px, viewport_width), axis(py, viewport_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_center_and_corners() {
        assert_eq!(normalize(400.0, 300.0, 800.0, 600.0), (0.0, 0.0));
        assert_eq!(normalize(0.0, 0.0, 800.0, 600.0), (-1.0, -1.0));
        assert_eq!(normalize(800.0, 600.0, 800.0, 600.0), (1.0, 1.0));
    }

    #[test]
    fn test_normalize_is_not_clamped() {
        let (x, _) = normalize(840.0, 300.0, 800.0, 600.0);
        assert!((x - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_empty_viewport() {
        assert_eq!(normalize(10.0, 10.0, 0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_snap_when_smoothing_is_one() {
        let mut tilt = PointerTilt::new(1.0);
        tilt.set_target(0.5, -0.25);
        tilt.step();
        assert_eq!(tilt.offset(), (0.5, -0.25));
    }

    #[test]
    fn test_converges_toward_target() {
        let mut tilt = PointerTilt::new(0.2);
        tilt.set_target(1.0, -1.0);
        let mut last_gap = f64::MAX;
        for _ in 0..100 {
            tilt.step();
            let gap = (1.0 - tilt.offset().0).abs();
            assert!(gap < last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1e-6);
        assert!((tilt.offset().1 + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_never_exceeds_largest_target() {
        let mut tilt = PointerTilt::new(0.35);
        let targets = [(0.9, -0.4), (-1.05, 0.3), (0.2, 1.02), (-0.7, -0.7)];
        for (i, (x, y)) in targets.iter().cycle().take(200).enumerate() {
            tilt.set_target(*x, *y);
            for _ in 0..(i % 5) {
                tilt.step();
                let (cx, cy) = tilt.offset();
                assert!(cx.abs() <= 1.05 + 1e-12);
                assert!(cy.abs() <= 1.02 + 1e-12);
            }
        }
    }

    #[test]
    fn test_non_finite_targets_ignored() {
        let mut tilt = PointerTilt::new(1.0);
        tilt.set_target(0.3, 0.3);
        tilt.set_target(f64::NAN, 0.0);
        assert_eq!(tilt.target(), (0.3, 0.3));
    }

    #[test]
    fn test_bad_smoothing_falls_back_to_snap() {
        let mut tilt = PointerTilt::new(-2.0);
        tilt.set_target(1.0, 1.0);
        tilt.step();
        assert_eq!(tilt.offset(), (1.0, 1.0));
    }
}
