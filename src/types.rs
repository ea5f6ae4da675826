//! Identifiers and coordinate-regime wrappers shared by every stage.
//!
//! Detector-space quantities exist in two regimes: *nominal* (as reconstructed
//! from the raw hit positions, i.e. where the charge appears at the wires) and
//! *corrected* (after the distortion field has been undone). [`Position`] and
//! [`Direction`] carry the regime as a tag so that the geometry code can refuse
//! to mix them.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire plane (projection) inside a drift volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(pub u8);

/// Drift volume (TPC) identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeId(pub u16);

/// Fully qualified plane: a view inside a given drift volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlaneId {
    pub volume: VolumeId,
    pub view: ViewId,
}

impl PlaneId {
    pub fn new(volume: VolumeId, view: ViewId) -> Self {
        Self { volume, view }
    }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}:P{}", self.volume.0, self.view.0)
    }
}

/// Coordinate regime of a detector-space quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Nominal,
    Corrected,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Nominal => f.write_str("nominal"),
            Regime::Corrected => f.write_str("corrected"),
        }
    }
}

/// Detector-space point tagged with its regime.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "regime", content = "point", rename_all = "lowercase")]
pub enum Position {
    Nominal(Point3<f64>),
    Corrected(Point3<f64>),
}

impl Position {
    pub fn regime(&self) -> Regime {
        match self {
            Position::Nominal(_) => Regime::Nominal,
            Position::Corrected(_) => Regime::Corrected,
        }
    }

    /// Raw coordinates, regardless of regime.
    pub fn point(&self) -> Point3<f64> {
        match self {
            Position::Nominal(p) | Position::Corrected(p) => *p,
        }
    }
}

/// Detector-space direction tagged with its regime. Need not be normalized.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "regime", content = "vector", rename_all = "lowercase")]
pub enum Direction {
    Nominal(Vector3<f64>),
    Corrected(Vector3<f64>),
}

impl Direction {
    pub fn regime(&self) -> Regime {
        match self {
            Direction::Nominal(_) => Regime::Nominal,
            Direction::Corrected(_) => Regime::Corrected,
        }
    }

    pub fn vector(&self) -> Vector3<f64> {
        match self {
            Direction::Nominal(v) | Direction::Corrected(v) => *v,
        }
    }

    /// Direction from `from` to `to`; both positions must share a regime.
    pub fn between(from: &Position, to: &Position) -> Option<Self> {
        match (from, to) {
            (Position::Nominal(a), Position::Nominal(b)) => Some(Direction::Nominal(b - a)),
            (Position::Corrected(a), Position::Corrected(b)) => Some(Direction::Corrected(b - a)),
            _ => None,
        }
    }
}
