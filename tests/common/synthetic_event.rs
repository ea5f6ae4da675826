//! Builders for synthetic per-plane stubs.
//!
//! A plane only measures the pitch-axis and drift coordinates of a deposit;
//! its 3D reconstruction is free to slide along the wire direction. The
//! builders reproduce that by displacing the reconstructed end along the
//! plane's wires.

use nalgebra::{Point3, Vector3};
use vertex_stub::geometry::{DetectorGeometry, DriftDirection, PlaneGeometry, VolumeGeometry};
use vertex_stub::stub::{ChargeSample, HitId, StubCandidate, StubEndpoint, StubInfo, VertexHitId};
use vertex_stub::{GeometryQuery, PlaneId, ViewId, VolumeId};

/// Drift distance covered during one readout tick (0.16 cm/us at 0.5 us).
pub const DRIFT_CM_PER_TICK: f64 = 0.08;

pub fn mirrored_geometry() -> DetectorGeometry {
    DetectorGeometry::mirrored_three_plane(200.0, 0.3)
}

/// Single volume read out by horizontal wires (measuring y) and vertical
/// wires (measuring z).
pub fn orthogonal_geometry() -> DetectorGeometry {
    DetectorGeometry::new(vec![VolumeGeometry {
        id: VolumeId(0),
        anode_x: -200.0,
        drift_direction: DriftDirection::NegativeX,
        planes: vec![
            PlaneGeometry {
                view: ViewId(0),
                wire_angle_deg: 0.0,
                wire_pitch: 0.3,
            },
            PlaneGeometry {
                view: ViewId(1),
                wire_angle_deg: 90.0,
                wire_pitch: 0.3,
            },
        ],
    }])
}

pub fn plane(volume: u16, view: u8) -> PlaneId {
    PlaneId::new(VolumeId(volume), ViewId(view))
}

pub fn wire_direction(geo: &DetectorGeometry, plane: PlaneId) -> Vector3<f64> {
    let theta = geo.wire_angle(plane).expect("known plane");
    Vector3::new(0.0, theta.sin(), theta.cos())
}

pub fn tick_of(geo: &DetectorGeometry, plane: PlaneId, point: &Point3<f64>) -> f64 {
    let anode = geo.anode_x(plane.volume).expect("known volume");
    let drift = geo.drift_direction(plane.volume).expect("known volume");
    (anode - point.x) * drift / DRIFT_CM_PER_TICK
}

pub struct PlaneStub<'a> {
    pub geo: &'a DetectorGeometry,
    pub plane: PlaneId,
    pub vertex: Point3<f64>,
    pub end: Point3<f64>,
    /// Displacement of the reconstructed end along the plane's wires.
    pub slide: f64,
    pub charges: Vec<f64>,
    pub vertex_hit: u64,
    pub first_hit: u64,
}

impl<'a> PlaneStub<'a> {
    pub fn new(
        geo: &'a DetectorGeometry,
        plane: PlaneId,
        vertex: Point3<f64>,
        end: Point3<f64>,
    ) -> Self {
        Self {
            geo,
            plane,
            vertex,
            end,
            slide: 0.0,
            charges: vec![120.0, 140.0, 180.0, 260.0],
            vertex_hit: 1,
            first_hit: 100,
        }
    }

    pub fn slide(mut self, slide: f64) -> Self {
        self.slide = slide;
        self
    }

    pub fn charges(mut self, charges: &[f64]) -> Self {
        self.charges = charges.to_vec();
        self
    }

    pub fn vertex_hit(mut self, id: u64) -> Self {
        self.vertex_hit = id;
        self
    }

    pub fn first_hit(mut self, id: u64) -> Self {
        self.first_hit = id;
        self
    }

    pub fn build(self) -> StubInfo {
        let end = self.end + wire_direction(self.geo, self.plane) * self.slide;
        let n = self.charges.len();
        let samples: Vec<ChargeSample> = self
            .charges
            .iter()
            .enumerate()
            .map(|(i, &charge)| ChargeSample {
                position: self.vertex + (end - self.vertex) * ((i + 1) as f64 / n as f64),
                charge,
            })
            .collect();
        let candidate = StubCandidate::new(
            self.plane,
            StubEndpoint {
                position: self.vertex,
                tick: tick_of(self.geo, self.plane, &self.vertex),
            },
            StubEndpoint {
                position: end,
                tick: tick_of(self.geo, self.plane, &end),
            },
            samples,
        )
        .expect("synthetic stub has charge");
        StubInfo {
            stub: candidate,
            particle: None,
            hits: (0..n as u64).map(|i| HitId(self.first_hit + i)).collect(),
            vertex_hit: VertexHitId(self.vertex_hit),
            vertex_hit_hit: HitId(self.first_hit),
        }
    }
}

pub fn assert_close(actual: &Point3<f64>, expected: &Point3<f64>, tol: f64) {
    let d = (actual - expected).norm();
    assert!(
        d <= tol,
        "expected {expected:?}, got {actual:?} (distance {d:.3e})"
    );
}
