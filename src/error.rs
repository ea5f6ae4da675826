use crate::types::{PlaneId, Regime, VolumeId};

/// Reasons why a geometric computation cannot produce a value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GeometryError {
    /// Zero, non-finite, or wire-parallel direction where a pitch or a unit
    /// vector is required.
    DegenerateDirection,
    /// Start and end of a stub (or vertex and merged end) coincide.
    CoincidentEndpoints,
    /// Two planes whose pitch axes are parallel cannot be triangulated.
    ParallelPlanes { a: PlaneId, b: PlaneId },
    /// Quantities from different coordinate regimes fed into one computation.
    RegimeMismatch { expected: Regime, found: Regime },
    UnknownPlane(PlaneId),
    UnknownVolume(VolumeId),
}

impl GeometryError {
    /// True for the degenerate-geometry class (as opposed to bad identifiers
    /// or regime misuse).
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            GeometryError::DegenerateDirection
                | GeometryError::CoincidentEndpoints
                | GeometryError::ParallelPlanes { .. }
        )
    }
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::DegenerateDirection => f.write_str("degenerate direction"),
            GeometryError::CoincidentEndpoints => f.write_str("coincident endpoints"),
            GeometryError::ParallelPlanes { a, b } => {
                write!(f, "planes {a} and {b} have parallel wires")
            }
            GeometryError::RegimeMismatch { expected, found } => {
                write!(f, "expected {expected} coordinates, got {found}")
            }
            GeometryError::UnknownPlane(plane) => write!(f, "unknown plane {plane}"),
            GeometryError::UnknownVolume(volume) => write!(f, "unknown volume {}", volume.0),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Rejections raised while building a stub candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StubError {
    NoChargeSamples,
    NonFiniteCharge { index: usize },
}

impl std::fmt::Display for StubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StubError::NoChargeSamples => f.write_str("stub has no charge samples"),
            StubError::NonFiniteCharge { index } => {
                write!(f, "charge sample {index} is not finite")
            }
        }
    }
}

impl std::error::Error for StubError {}
