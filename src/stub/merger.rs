//! Combining two matched stubs from different planes.
//!
//! Each plane pins the stub end along its own pitch axis and along the drift
//! direction; the wire direction is left unconstrained. Two non-parallel
//! planes together fix (y, z), and the drift coordinate is shared, so the
//! merged end is the intersection of the two wire constraints at the mean
//! drift position, corrected for distortion.
//!
//! None of the functions here apply selection thresholds. They must only be
//! called on pairs that already passed matching.

use super::matcher::{stub_direction_dot, stub_time_offset};
use super::types::{HitId, ParticleId, StubInfo, VertexHitId};
use crate::distortion::DistortionField;
use crate::error::GeometryError;
use crate::geometry::{DetectorClocks, DetectorProperties, GeometryQuery};
use crate::pitch::PitchEngine;
use crate::transform::PlaneTransform;
use crate::types::{Direction, PlaneId, Position};
use nalgebra::Point3;
use serde::Serialize;

/// Everything needed to evaluate a stub pair.
pub struct MergeContext<'a> {
    pub transform: PlaneTransform,
    pub engine: PitchEngine<'a>,
    pub properties: &'a DetectorProperties,
    pub clocks: &'a DetectorClocks,
}

impl<'a> MergeContext<'a> {
    pub fn new(
        geometry: &'a dyn GeometryQuery,
        field: &'a dyn DistortionField,
        properties: &'a DetectorProperties,
        clocks: &'a DetectorClocks,
    ) -> Result<Self, GeometryError> {
        Ok(Self {
            transform: PlaneTransform::new(geometry)?,
            engine: PitchEngine::new(geometry, field, properties.efield),
            properties,
            clocks,
        })
    }
}

/// Pairwise quantities that justified (or may veto) a merge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MergeMetrics {
    pub direction_dot: f64,
    pub time_offset_us: f64,
    pub charge_offset: f64,
    pub peak_charge_offset: f64,
    pub peak_dqdx_offset: f64,
}

/// 3D stub built from two planes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MergedStub {
    pub planes: [PlaneId; 2],
    pub vertex: Position,
    pub end: Position,
    pub particle: Option<ParticleId>,
    pub vertex_hit: VertexHitId,
    pub hits: Vec<HitId>,
    /// Corrected pitch at each plane's peak sample.
    pub pitch: [f64; 2],
    pub efield_vertex: f64,
    pub efield_end: f64,
    pub metrics: MergeMetrics,
}

/// Merged (corrected) end point of two stubs seen on different planes.
pub fn two_stub_end_position(
    transform: &PlaneTransform,
    engine: &PitchEngine<'_>,
    a: &StubInfo,
    b: &StubInfo,
) -> Result<Position, GeometryError> {
    let (plane_a, plane_b) = (a.plane(), b.plane());
    let end_a = a.stub.end.position;
    let end_b = b.stub.end.position;
    let wire_a = transform.wire_coordinate(&end_a, plane_a)?;
    let wire_b = transform.wire_coordinate(&end_b, plane_b)?;
    let (y, z) = transform.two_plane_yz(wire_a, plane_a, wire_b, plane_b)?;
    let x = 0.5 * (end_a.x + end_b.x);
    engine.location(Position::Nominal(Point3::new(x, y, z)), plane_a.volume)
}

/// Total charge of A minus total charge of B.
pub fn stub_charge_offset(a: &StubInfo, b: &StubInfo) -> f64 {
    a.stub.total_charge() - b.stub.total_charge()
}

/// Peak charge of A minus peak charge of B.
pub fn stub_peak_charge_offset(a: &StubInfo, b: &StubInfo) -> f64 {
    a.stub.peak().charge - b.stub.peak().charge
}

/// Peak dQ/dx of A minus peak dQ/dx of B, using the merged 3D direction to
/// compute each plane's pitch.
pub fn stub_peak_dqdx_offset(
    transform: &PlaneTransform,
    engine: &PitchEngine<'_>,
    a: &StubInfo,
    b: &StubInfo,
) -> Result<f64, GeometryError> {
    let end = two_stub_end_position(transform, engine, a, b)?;
    let vertex = engine.location(a.stub.start_position(), a.plane().volume)?;
    let peak = PeakDqdx::compute(engine, a, b, &vertex, &end)?;
    Ok(peak.offset())
}

struct PeakDqdx {
    pitch: [f64; 2],
    dqdx: [f64; 2],
}

impl PeakDqdx {
    fn compute(
        engine: &PitchEngine<'_>,
        a: &StubInfo,
        b: &StubInfo,
        vertex: &Position,
        end: &Position,
    ) -> Result<Self, GeometryError> {
        let direction = merged_direction(vertex, end)?;
        let mut pitch = [0.0; 2];
        let mut dqdx = [0.0; 2];
        for (i, s) in [a, b].into_iter().enumerate() {
            let peak = s.stub.peak();
            let location = engine.location(Position::Nominal(peak.position), s.plane().volume)?;
            pitch[i] = engine.pitch(location, direction, s.plane(), true)?;
            dqdx[i] = peak.charge / pitch[i];
        }
        Ok(Self { pitch, dqdx })
    }

    fn offset(&self) -> f64 {
        self.dqdx[0] - self.dqdx[1]
    }
}

fn merged_direction(vertex: &Position, end: &Position) -> Result<Direction, GeometryError> {
    let direction = Direction::between(vertex, end).ok_or(GeometryError::RegimeMismatch {
        expected: vertex.regime(),
        found: end.regime(),
    })?;
    if direction.vector().norm() <= 1e-9 {
        return Err(GeometryError::CoincidentEndpoints);
    }
    Ok(direction)
}

/// Evaluate every metric for a matched pair and build the merged stub.
pub fn merge_pair(
    ctx: &MergeContext<'_>,
    a: &StubInfo,
    b: &StubInfo,
) -> Result<MergedStub, GeometryError> {
    let engine = &ctx.engine;
    let volume = a.plane().volume;
    let end = two_stub_end_position(&ctx.transform, engine, a, b)?;
    let vertex = engine.location(a.stub.start_position(), volume)?;
    let peak = PeakDqdx::compute(engine, a, b, &vertex, &end)?;

    let metrics = MergeMetrics {
        direction_dot: stub_direction_dot(a, b)?,
        time_offset_us: stub_time_offset(a, b, ctx.clocks, ctx.properties),
        charge_offset: stub_charge_offset(a, b),
        peak_charge_offset: stub_peak_charge_offset(a, b),
        peak_dqdx_offset: peak.offset(),
    };

    let mut hits = a.hits.clone();
    for hit in &b.hits {
        if !hits.contains(hit) {
            hits.push(*hit);
        }
    }

    Ok(MergedStub {
        planes: [a.plane(), b.plane()],
        vertex,
        end,
        particle: a.particle.or(b.particle),
        vertex_hit: a.vertex_hit,
        hits,
        pitch: peak.pitch,
        efield_vertex: engine.efield(vertex, volume)?,
        efield_end: engine.efield(end, volume)?,
        metrics,
    })
}
