//! The eight 45° compass sectors.

use serde::{Deserialize, Serialize};

use super::normalize_degrees;

/// One of the eight compass octants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Octant {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Octant {
    /// All octants in compass order, clockwise from north
    pub const ALL: [Octant; 8] = [
        Octant::N,
        Octant::NE,
        Octant::E,
        Octant::SE,
        Octant::S,
        Octant::SW,
        Octant::W,
        Octant::NW,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Octant::N => "N",
            Octant::NE => "NE",
            Octant::E => "E",
            Octant::SE => "SE",
            Octant::S => "S",
            Octant::SW => "SW",
            Octant::W => "W",
            Octant::NW => "NW",
        }
    }

    /// Arrow glyph pointing in the octant's direction
    pub fn glyph(&self) -> &'static str {
        match self {
            Octant::N => "↑",
            Octant::NE => "↗",
            Octant::E => "→",
            Octant::SE => "↘",
            Octant::S => "↓",
            Octant::SW => "↙",
            Octant::W => "←",
            Octant::NW => "↖",
        }
    }

    /// Central bearing of the octant in degrees
    pub fn center_degrees(&self) -> f64 {
        self.index() as f64 * 45.0
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Octant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classify a bearing into an octant.
///
/// Sectors are half-open `[start, start + 45)` with N spanning
/// `[337.5, 360) ∪ [0, 22.5)`.
pub fn cardinal_octant(bearing_degrees: f64) -> Octant {
    let shifted = normalize_degrees(bearing_degrees + 22.5);
    let index = (shifted / 45.0).floor() as usize % 8;
    Octant::ALL[index]
}
