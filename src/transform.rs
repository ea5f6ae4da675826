//! Per-plane coordinate transform.
//!
//! A plane measures two coordinates of a deposit: the position along its
//! pitch axis (which wire collected the charge, in cm) and the drift distance
//! to the anode (from the arrival time). [`PlaneTransform`] caches the frame of
//! every plane once and converts nominal detector-space points and directions
//! into that pair. It also inverts two wire coordinates measured on
//! non-parallel planes back to (y, z).
//!
//! Only nominal input is accepted here: a nominal point is, by definition,
//! where the charge shows up at the wires. Corrected points go through
//! [`crate::pitch::PitchEngine::project`], which maps them to the wires first.

use crate::error::GeometryError;
use crate::geometry::GeometryQuery;
use crate::types::{Direction, PlaneId, Position, Regime};
use nalgebra::Point3;
use serde::Serialize;
use std::collections::HashMap;

const EPS: f64 = 1e-9;

/// Position of a deposit as measured by one plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProjectedPoint {
    /// Coordinate along the pitch axis, cm.
    pub wire: f64,
    /// Drift distance to the anode, cm. Positive inside the volume.
    pub drift: f64,
}

#[derive(Clone, Copy, Debug)]
struct PlaneFrame {
    axis: [f64; 2],
    anode_x: f64,
    drift_direction: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PlaneTransform {
    frames: HashMap<PlaneId, PlaneFrame>,
}

impl PlaneTransform {
    pub fn new(geometry: &dyn GeometryQuery) -> Result<Self, GeometryError> {
        let mut frames = HashMap::new();
        for volume in geometry.volumes() {
            let anode_x = geometry.anode_x(volume)?;
            let drift_direction = geometry.drift_direction(volume)?;
            for view in geometry.views(volume)? {
                let plane = PlaneId::new(volume, view);
                frames.insert(
                    plane,
                    PlaneFrame {
                        axis: geometry.pitch_axis(plane)?,
                        anode_x,
                        drift_direction,
                    },
                );
            }
        }
        Ok(Self { frames })
    }

    fn frame(&self, plane: PlaneId) -> Result<&PlaneFrame, GeometryError> {
        self.frames
            .get(&plane)
            .ok_or(GeometryError::UnknownPlane(plane))
    }

    pub fn wire_coordinate(
        &self,
        point: &Point3<f64>,
        plane: PlaneId,
    ) -> Result<f64, GeometryError> {
        let axis = self.frame(plane)?.axis;
        Ok(axis[0] * point.y + axis[1] * point.z)
    }

    pub fn drift_coordinate(
        &self,
        point: &Point3<f64>,
        plane: PlaneId,
    ) -> Result<f64, GeometryError> {
        let frame = self.frame(plane)?;
        Ok((frame.anode_x - point.x) * frame.drift_direction)
    }

    pub fn project_point(
        &self,
        position: &Position,
        plane: PlaneId,
    ) -> Result<ProjectedPoint, GeometryError> {
        let Position::Nominal(point) = position else {
            return Err(GeometryError::RegimeMismatch {
                expected: Regime::Nominal,
                found: position.regime(),
            });
        };
        Ok(ProjectedPoint {
            wire: self.wire_coordinate(point, plane)?,
            drift: self.drift_coordinate(point, plane)?,
        })
    }

    /// Unit `(wire, drift)` direction of a nominal 3D direction on `plane`.
    pub fn project_direction(
        &self,
        direction: &Direction,
        plane: PlaneId,
    ) -> Result<[f64; 2], GeometryError> {
        let Direction::Nominal(dir) = direction else {
            return Err(GeometryError::RegimeMismatch {
                expected: Regime::Nominal,
                found: direction.regime(),
            });
        };
        let frame = self.frame(plane)?;
        let wire = frame.axis[0] * dir.y + frame.axis[1] * dir.z;
        let drift = -frame.drift_direction * dir.x;
        let norm = (wire * wire + drift * drift).sqrt();
        if !norm.is_finite() || norm <= EPS {
            return Err(GeometryError::DegenerateDirection);
        }
        Ok([wire / norm, drift / norm])
    }

    /// Recover (y, z) from the wire coordinates measured on two planes.
    pub fn two_plane_yz(
        &self,
        wire_a: f64,
        plane_a: PlaneId,
        wire_b: f64,
        plane_b: PlaneId,
    ) -> Result<(f64, f64), GeometryError> {
        let [ya, za] = self.frame(plane_a)?.axis;
        let [yb, zb] = self.frame(plane_b)?.axis;
        let det = ya * zb - yb * za;
        if det.abs() <= EPS {
            return Err(GeometryError::ParallelPlanes {
                a: plane_a,
                b: plane_b,
            });
        }
        let y = (wire_a * zb - wire_b * za) / det;
        let z = (ya * wire_b - yb * wire_a) / det;
        Ok((y, z))
    }
}
