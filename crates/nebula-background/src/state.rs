//! Renderer state management.

use chrono::NaiveTime;
use nebula_core::{RenderCommand, Surface, Variant};
use rand::{SeedableRng, rngs::StdRng};

use crate::animations::{rings, starfield};
use crate::pointer::PointerTilt;
use crate::settings::RendererSettings;
use crate::time::Clock;

/// Where a renderer is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, waiting for a surface.
    Uninitialized,
    /// Painting every frame.
    Running,
    /// The host had no surface or drawing context; every call is a no-op
    /// from now on.
    Disabled,
}

/// One animated surface: a starfield or a clock face.
///
/// All mutable state (particles, pointer tilt, surface geometry) lives here
/// and is passed explicitly to event handlers and the frame function.
#[derive(Debug)]
pub struct Renderer {
    variant: Variant,
    settings: RendererSettings,
    lifecycle: Lifecycle,
    /// Layout as reported by the host.
    measured: Option<Surface>,
    /// Layout actually painted; differs from `measured` only for an empty
    /// clock surface, which falls back to a fixed size.
    surface: Option<Surface>,
    tilt: PointerTilt,
    stars: Vec<starfield::Star>,
    rng: StdRng,
    frames: u64,
}

impl Renderer {
    /// Create an uninitialized renderer. `seed` drives every random choice,
    /// so two renderers with the same seed and inputs paint identically.
    pub fn new(variant: Variant, settings: RendererSettings, seed: u64) -> Self {
        let tilt = PointerTilt::new(settings.pointer_smoothing);
        Self {
            variant,
            settings,
            lifecycle: Lifecycle::Uninitialized,
            measured: None,
            surface: None,
            tilt,
            stars: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            frames: 0,
        }
    }

    /// Bind to a freshly measured surface, or disable the renderer if the
    /// host has none.
    ///
    /// Call again whenever the surface's layout size changes: the starfield
    /// is repopulated because old coordinates no longer fit. Once disabled,
    /// a renderer stays disabled.
    pub fn initialize(&mut self, surface: Option<Surface>) {
        if self.lifecycle == Lifecycle::Disabled {
            return;
        }
        let Some(surface) = surface else {
            log::debug!("{:?} renderer has no surface; disabling", self.variant);
            self.lifecycle = Lifecycle::Disabled;
            self.measured = None;
            self.surface = None;
            self.stars.clear();
            return;
        };

        self.measured = Some(surface);
        let surface = match self.variant {
            Variant::Clock if surface.is_empty() => {
                let side = self.settings.clock.fallback_size;
                Surface::new(side, side, surface.scale())
            }
            _ => surface,
        };

        if self.variant == Variant::Starfield {
            self.stars = starfield::init_stars(&surface, &self.settings.starfield, &mut self.rng);
        }

        let (bw, bh) = surface.backing_size();
        log::trace!(
            "{:?} renderer initialized at {}x{} (backing {}x{}, scale {})",
            self.variant,
            surface.width(),
            surface.height(),
            bw,
            bh,
            surface.scale()
        );
        self.surface = Some(surface);
        self.lifecycle = Lifecycle::Running;
    }

    /// Re-initialize if a newly measured layout differs from the last
    /// measurement. Returns `true` when a re-initialization happened.
    pub fn sync_surface(&mut self, width: f64, height: f64, device_scale: f64) -> bool {
        if self.lifecycle == Lifecycle::Disabled {
            return false;
        }
        let changed = match self.measured {
            Some(measured) => measured.differs_from(width, height, device_scale),
            None => true,
        };
        if changed {
            self.initialize(Some(Surface::new(width, height, device_scale)));
        }
        changed
    }

    /// Record a pointer offset normalized to the viewport centre.
    pub fn on_pointer_move(&mut self, normalized_x: f64, normalized_y: f64) {
        if self.lifecycle == Lifecycle::Disabled {
            return;
        }
        self.tilt.set_target(normalized_x, normalized_y);
    }

    /// Produce one frame for wall-clock time `now`.
    ///
    /// Returns an empty list unless the renderer is running.
    pub fn render_frame(&mut self, now: NaiveTime) -> Vec<RenderCommand> {
        let Some(surface) = self.surface.filter(|_| self.lifecycle == Lifecycle::Running) else {
            return Vec::new();
        };
        self.frames = self.frames.wrapping_add(1);
        self.tilt.step();

        let mut out = vec![
            RenderCommand::SetTransform {
                scale: surface.scale(),
            },
            RenderCommand::Clear {
                rect: surface.bounds(),
            },
        ];

        match self.variant {
            Variant::Starfield => {
                let sf = &self.settings.starfield;
                starfield::update(&mut self.stars, &surface, sf.speed, &mut self.rng);
                starfield::paint(&self.stars, &surface, self.tilt.offset(), sf.parallax, &mut out);
            }
            Variant::Clock => rings::paint(&surface, now, &mut out),
        }
        out
    }

    /// Read `clock` and render one frame. Hosts call this from their frame
    /// scheduler.
    pub fn tick(&mut self, clock: &impl Clock) -> Vec<RenderCommand> {
        self.render_frame(clock.now())
    }

    /// Restart the random sequence and repopulate the starfield.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        if let (Some(surface), Variant::Starfield) = (self.surface, self.variant) {
            self.stars = starfield::init_stars(&surface, &self.settings.starfield, &mut self.rng);
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn surface(&self) -> Option<Surface> {
        self.surface
    }

    pub fn stars(&self) -> &[starfield::Star] {
        &self.stars
    }

    pub fn tilt(&self) -> &PointerTilt {
        &self.tilt
    }

    /// Frames rendered since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use nebula_core::Paint;

    use super::*;

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    fn starfield() -> Renderer {
        Renderer::new(Variant::Starfield, RendererSettings::default(), 42)
    }

    #[test]
    fn test_uninitialized_renders_nothing() {
        let mut r = starfield();
        assert_eq!(r.lifecycle(), Lifecycle::Uninitialized);
        assert!(r.render_frame(noon()).is_empty());
        assert_eq!(r.frames(), 0);
    }

    #[test]
    fn test_missing_surface_disables_permanently() {
        let mut r = starfield();
        r.initialize(None);
        assert_eq!(r.lifecycle(), Lifecycle::Disabled);

        r.initialize(Some(Surface::new(800.0, 600.0, 1.0)));
        assert!(!r.sync_surface(800.0, 600.0, 1.0));
        r.on_pointer_move(1.0, 1.0);
        assert_eq!(r.lifecycle(), Lifecycle::Disabled);
        assert!(r.render_frame(noon()).is_empty());
        assert_eq!(r.tilt().target(), (0.0, 0.0));
    }

    #[test]
    fn test_frame_starts_with_transform_and_clear() {
        let mut r = starfield();
        r.initialize(Some(Surface::new(400.0, 300.0, 2.0)));
        let frame = r.render_frame(noon());
        assert_eq!(frame[0], RenderCommand::SetTransform { scale: 2.0 });
        assert!(matches!(frame[1], RenderCommand::Clear { .. }));
        assert!(matches!(
            frame[2],
            RenderCommand::FillRect {
                paint: Paint::LinearGradient { .. },
                ..
            }
        ));
        // transform + clear + wash + one circle per star
        assert_eq!(frame.len(), 3 + 270);
    }

    #[test]
    fn test_resize_repopulates() {
        let mut r = starfield();
        r.initialize(Some(Surface::new(800.0, 600.0, 1.0)));
        assert!(!r.sync_surface(800.0, 600.0, 1.0));
        assert!(r.sync_surface(200.0, 100.0, 1.0));
        assert_eq!(r.stars().len(), 270);
        assert!(r.stars().iter().all(|s| s.x < 200.0 && s.y < 100.0));
        assert_eq!(r.surface().map(|s| s.backing_size()), Some((200, 100)));
    }

    #[test]
    fn test_sync_surface_tracks_scale_changes() {
        let mut r = starfield();
        assert!(r.sync_surface(100.0, 100.0, 1.0));
        assert!(r.sync_surface(100.0, 100.0, 2.0));
        let frame = r.render_frame(noon());
        assert_eq!(frame[0], RenderCommand::SetTransform { scale: 2.0 });
        assert_eq!(r.surface().map(|s| s.backing_size()), Some((200, 200)));
    }

    #[test]
    fn test_empty_clock_surface_uses_fallback() {
        let mut r = Renderer::new(Variant::Clock, RendererSettings::default(), 0);
        r.initialize(Some(Surface::new(0.0, 0.0, 2.0)));
        let surface = r.surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (160.0, 160.0));
        assert_eq!(surface.backing_size(), (320, 320));
        // The same empty measurement is not treated as a resize.
        assert!(!r.sync_surface(0.0, 0.0, 2.0));
        assert!(!r.render_frame(noon()).is_empty());
    }

    #[test]
    fn test_clock_has_no_particles() {
        let mut r = Renderer::new(Variant::Clock, RendererSettings::default(), 0);
        r.initialize(Some(Surface::new(200.0, 200.0, 1.0)));
        assert!(r.stars().is_empty());
        // transform + clear + shadow + 6 arcs + cap
        assert_eq!(r.render_frame(noon()).len(), 10);
    }

    #[test]
    fn test_reseed_is_deterministic() {
        let surface = Some(Surface::new(640.0, 480.0, 1.0));
        let mut a = starfield();
        let mut b = Renderer::new(Variant::Starfield, RendererSettings::default(), 7);
        a.initialize(surface);
        b.initialize(surface);
        assert_ne!(a.stars(), b.stars());
        a.reseed(99);
        b.reseed(99);
        assert_eq!(a.stars(), b.stars());
    }

    #[test]
    fn test_pointer_moves_parallax() {
        let mut settings = RendererSettings::default();
        settings.pointer_smoothing = 1.0;
        settings.starfield.speed = 0.0;
        let mut r = Renderer::new(Variant::Starfield, settings, 3);
        r.initialize(Some(Surface::new(500.0, 500.0, 1.0)));
        let still = r.render_frame(noon());
        r.on_pointer_move(1.0, 0.0);
        let moved = r.render_frame(noon());

        let star = &r.stars()[0];
        let shift = star.z as f64 * 6.0;
        match (&still[3], &moved[3]) {
            (
                RenderCommand::FillCircle { center: a, .. },
                RenderCommand::FillCircle { center: b, .. },
            ) => {
                assert!((b.x - a.x - shift).abs() < 1e-9);
                assert_eq!(a.y, b.y);
            }
            other => panic!("expected star circles, got {other:?}"),
        }
    }
}
