use crate::error::StubError;
use crate::types::{PlaneId, Position};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Opaque handle to an upstream hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitId(pub u64);

/// Opaque handle to the particle (track/shower) that owns the stub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticleId(pub u64);

/// Opaque handle to the vertex hit the stub starts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexHitId(pub u64);

/// Stub end as seen by its plane: nominal 3D position and hit peak time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StubEndpoint {
    pub position: Point3<f64>,
    pub tick: f64,
}

/// Charge collected by one wire along the stub.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChargeSample {
    /// Nominal position of the deposit.
    pub position: Point3<f64>,
    pub charge: f64,
}

/// One plane's reconstruction of a stub.
///
/// `start` is the end attached to the vertex. Charge samples are ordered from
/// start to end; the peak is the largest sample (first one on ties).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StubCandidateRecord", into = "StubCandidateRecord")]
pub struct StubCandidate {
    pub plane: PlaneId,
    pub start: StubEndpoint,
    pub end: StubEndpoint,
    charges: Vec<ChargeSample>,
    peak: usize,
}

impl StubCandidate {
    pub fn new(
        plane: PlaneId,
        start: StubEndpoint,
        end: StubEndpoint,
        charges: Vec<ChargeSample>,
    ) -> Result<Self, StubError> {
        if charges.is_empty() {
            return Err(StubError::NoChargeSamples);
        }
        let mut peak = 0usize;
        for (index, sample) in charges.iter().enumerate() {
            if !sample.charge.is_finite() {
                return Err(StubError::NonFiniteCharge { index });
            }
            if sample.charge > charges[peak].charge {
                peak = index;
            }
        }
        Ok(Self {
            plane,
            start,
            end,
            charges,
            peak,
        })
    }

    pub fn charges(&self) -> &[ChargeSample] {
        &self.charges
    }

    pub fn peak(&self) -> &ChargeSample {
        &self.charges[self.peak]
    }

    pub fn total_charge(&self) -> f64 {
        self.charges.iter().map(|s| s.charge).sum()
    }

    pub fn start_position(&self) -> Position {
        Position::Nominal(self.start.position)
    }

    pub fn end_position(&self) -> Position {
        Position::Nominal(self.end.position)
    }

    /// Start-to-end vector in nominal space.
    pub fn span(&self) -> Vector3<f64> {
        self.end.position - self.start.position
    }

    pub fn length(&self) -> f64 {
        self.span().norm()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StubCandidateRecord {
    plane: PlaneId,
    start: StubEndpoint,
    end: StubEndpoint,
    charges: Vec<ChargeSample>,
}

impl TryFrom<StubCandidateRecord> for StubCandidate {
    type Error = StubError;

    fn try_from(record: StubCandidateRecord) -> Result<Self, Self::Error> {
        StubCandidate::new(record.plane, record.start, record.end, record.charges)
    }
}

impl From<StubCandidate> for StubCandidateRecord {
    fn from(stub: StubCandidate) -> Self {
        Self {
            plane: stub.plane,
            start: stub.start,
            end: stub.end,
            charges: stub.charges,
        }
    }
}

/// A stub candidate with the upstream objects that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StubInfo {
    pub stub: StubCandidate,
    #[serde(default)]
    pub particle: Option<ParticleId>,
    #[serde(default)]
    pub hits: Vec<HitId>,
    pub vertex_hit: VertexHitId,
    /// Hit underlying the vertex hit on this plane.
    pub vertex_hit_hit: HitId,
}

impl StubInfo {
    pub fn plane(&self) -> PlaneId {
        self.stub.plane
    }
}
