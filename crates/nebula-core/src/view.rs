use serde::{Deserialize, Serialize};

/// Which visual a renderer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Depth-layered drifting stars with pointer parallax.
    Starfield,
    /// Three concentric hour/minute/second progress rings.
    Clock,
}

/// Which renderers a host shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Both,
    Starfield,
    Clock,
}

impl View {
    /// Cycle to the next view.
    pub fn next(&self) -> Self {
        match self {
            View::Both => View::Starfield,
            View::Starfield => View::Clock,
            View::Clock => View::Both,
        }
    }

    /// Whether this view includes the given variant.
    pub fn shows(&self, variant: Variant) -> bool {
        matches!(
            (self, variant),
            (View::Both, _)
                | (View::Starfield, Variant::Starfield)
                | (View::Clock, Variant::Clock)
        )
    }
}
