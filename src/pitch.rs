//! Track pitch and distortion-aware location helpers.
//!
//! The pitch is the length of trajectory that a single wire samples: a
//! segment crossing wires of spacing `p` at angle γ to the pitch axis spends
//! `p / |cos γ|` of its length per wire. When a distortion field is active,
//! the same wire step measured in apparent space corresponds to a different
//! true length; [`PitchEngine::pitch`] maps both ends of the step back to
//! corrected space and measures the distance there.
//!
//! The volume-dependent `xsign` of the distortion offsets is looked up from
//! the geometry, so callers only pass identities.

use crate::distortion::DistortionField;
use crate::error::GeometryError;
use crate::geometry::GeometryQuery;
use crate::transform::{PlaneTransform, ProjectedPoint};
use crate::types::{Direction, PlaneId, Position, VolumeId};
use nalgebra::Vector3;

const EPS: f64 = 1e-12;
/// Below this |cos γ| a direction is treated as running along the wires.
const MIN_COS_GAMMA: f64 = 1e-6;
/// Half-length of the segment used to carry a corrected direction to the
/// wires, cm.
const DIRECTION_STEP_CM: f64 = 0.1;

fn unit(v: Vector3<f64>) -> Result<Vector3<f64>, GeometryError> {
    let norm = v.norm();
    if !norm.is_finite() || norm <= EPS {
        return Err(GeometryError::DegenerateDirection);
    }
    Ok(v / norm)
}

#[derive(Clone, Copy)]
pub struct PitchEngine<'a> {
    geometry: &'a dyn GeometryQuery,
    field: &'a dyn DistortionField,
    nominal_efield: f64,
}

impl<'a> PitchEngine<'a> {
    pub fn new(
        geometry: &'a dyn GeometryQuery,
        field: &'a dyn DistortionField,
        nominal_efield: f64,
    ) -> Self {
        Self {
            geometry,
            field,
            nominal_efield,
        }
    }

    /// Pitch of a trajectory through `location` along `direction` on `plane`.
    ///
    /// Location and direction must share a regime. Corrected input is mapped
    /// to the wires first, direction included, so the wire crossing angle is
    /// the one seen by the plane. With `correct` set and an active field the
    /// wire step is measured in corrected space.
    pub fn pitch(
        &self,
        location: Position,
        direction: Direction,
        plane: PlaneId,
        correct: bool,
    ) -> Result<f64, GeometryError> {
        if location.regime() != direction.regime() {
            return Err(GeometryError::RegimeMismatch {
                expected: location.regime(),
                found: direction.regime(),
            });
        }
        let dir = unit(direction.vector())?;

        let at_wires = self.location_at_wires(location, plane.volume)?.point();
        let dir = match location {
            Position::Nominal(_) => dir,
            Position::Corrected(p) if self.field.is_active() => {
                let ahead = Position::Corrected(p + dir * DIRECTION_STEP_CM);
                let behind = Position::Corrected(p - dir * DIRECTION_STEP_CM);
                let ahead = self.location_at_wires(ahead, plane.volume)?.point();
                let behind = self.location_at_wires(behind, plane.volume)?.point();
                unit(ahead - behind)?
            }
            Position::Corrected(_) => dir,
        };

        let axis = self.geometry.pitch_axis(plane)?;
        let cos_gamma = (axis[0] * dir.y + axis[1] * dir.z).abs();
        if cos_gamma < MIN_COS_GAMMA {
            return Err(GeometryError::DegenerateDirection);
        }
        let mut pitch = self.geometry.wire_pitch(plane)? / cos_gamma;

        if correct && self.field.is_active() {
            let start = self.location(Position::Nominal(at_wires), plane.volume)?;
            let step = at_wires + dir * pitch;
            let step = self.location(Position::Nominal(step), plane.volume)?;
            pitch = (step.point() - start.point()).norm();
        }

        if pitch.is_finite() && pitch > 0.0 {
            Ok(pitch)
        } else {
            Err(GeometryError::DegenerateDirection)
        }
    }

    /// Corrected location of a deposit. Corrected input is returned as-is.
    pub fn location(
        &self,
        position: Position,
        volume: VolumeId,
    ) -> Result<Position, GeometryError> {
        match position {
            Position::Corrected(_) => Ok(position),
            Position::Nominal(p) if !self.field.is_active() => Ok(Position::Corrected(p)),
            Position::Nominal(p) => {
                let xsign = self.geometry.xsign(volume)?;
                let mut offset = self.field.calibration_offset(&p, volume);
                offset.x *= xsign;
                Ok(Position::Corrected(p + offset))
            }
        }
    }

    /// Where a corrected location appears at the wires. Nominal input is
    /// already in that space and is returned as-is.
    pub fn location_at_wires(
        &self,
        position: Position,
        volume: VolumeId,
    ) -> Result<Position, GeometryError> {
        match position {
            Position::Nominal(_) => Ok(position),
            Position::Corrected(p) if !self.field.is_active() => Ok(Position::Nominal(p)),
            Position::Corrected(p) => {
                let xsign = self.geometry.xsign(volume)?;
                let mut offset = self.field.position_offset(&p);
                offset.x *= xsign;
                Ok(Position::Nominal(p + offset))
            }
        }
    }

    /// Drift field magnitude at a location, kV/cm. Falls back to the nominal
    /// field when no distortion is configured.
    pub fn efield(&self, position: Position, volume: VolumeId) -> Result<f64, GeometryError> {
        if !self.field.is_active() {
            return Ok(self.nominal_efield);
        }
        let xsign = self.geometry.xsign(volume)?;
        let location = self.location(position, volume)?.point();
        let offset = self.field.efield_offset(&location);
        let scaled = Vector3::new(1.0 + xsign * offset.x, offset.y, offset.z);
        Ok(self.nominal_efield * scaled.norm())
    }

    /// Projection of a position of either regime onto `plane`.
    pub fn project(
        &self,
        transform: &PlaneTransform,
        position: Position,
        plane: PlaneId,
    ) -> Result<ProjectedPoint, GeometryError> {
        let at_wires = self.location_at_wires(position, plane.volume)?;
        transform.project_point(&at_wires, plane)
    }
}
