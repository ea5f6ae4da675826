//! Read-only access to the wire-plane geometry.
//!
//! The engine never owns the detector description; it consumes it through the
//! [`GeometryQuery`] trait. [`DetectorGeometry`] is a plain, serde-loadable
//! implementation used by the binary and the tests.
//!
//! Conventions
//! - Wires of a plane make an angle θ with the z (beam) axis. The wire
//!   direction in the (y, z) plane is `(sin θ, cos θ)` and the pitch axis, the
//!   direction along which consecutive wires are spaced, is `(−cos θ, sin θ)`.
//!   Vertical wires (θ = π/2) therefore measure z.
//! - Each volume has an anode at `anode_x`; ionization electrons drift along
//!   `drift_direction` (±1 in x) towards it.
//! - Distortion maps are tabulated for a volume drifting towards −x. The
//!   x-components of their offsets are multiplied by [`GeometryQuery::xsign`]
//!   in mirrored volumes.

mod detector;
pub mod properties;

pub use detector::{DetectorGeometry, DriftDirection, PlaneGeometry, VolumeGeometry};
pub use properties::{DetectorClocks, DetectorProperties, PlaneTickOffset};

use crate::error::GeometryError;
use crate::types::{PlaneId, ViewId, VolumeId};

/// Queryable detector geometry. Implementations must be safe for concurrent
/// read access.
pub trait GeometryQuery: Send + Sync {
    fn volumes(&self) -> Vec<VolumeId>;

    fn views(&self, volume: VolumeId) -> Result<Vec<ViewId>, GeometryError>;

    /// Angle between the wires and the z axis, radians.
    fn wire_angle(&self, plane: PlaneId) -> Result<f64, GeometryError>;

    /// Wire spacing, cm.
    fn wire_pitch(&self, plane: PlaneId) -> Result<f64, GeometryError>;

    /// Anode x position of the volume, cm.
    fn anode_x(&self, volume: VolumeId) -> Result<f64, GeometryError>;

    /// +1 if electrons drift towards +x in this volume, −1 otherwise.
    fn drift_direction(&self, volume: VolumeId) -> Result<f64, GeometryError>;

    /// Unit pitch-axis vector `(y, z)` of a plane.
    fn pitch_axis(&self, plane: PlaneId) -> Result<[f64; 2], GeometryError> {
        let theta = self.wire_angle(plane)?;
        Ok([-theta.cos(), theta.sin()])
    }

    /// Sign applied to the x-component of distortion offsets in `volume`.
    fn xsign(&self, volume: VolumeId) -> Result<f64, GeometryError> {
        Ok(-self.drift_direction(volume)?)
    }
}
