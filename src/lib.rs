//! Cross-plane merging of vertex stubs in wire-plane drift chambers.
//!
//! A short particle stub near an interaction vertex is reconstructed
//! separately on each wire plane of a drift volume. No single plane fixes its
//! 3D geometry, so candidates from different planes are compared and the
//! compatible ones are merged into one 3D object.
//!
//! The crate is purely computational: the detector geometry and the
//! space-charge distortion field are injected as read-only services, and every
//! operation is a deterministic function of its inputs.
//!
//! Data flow
//! ```text
//!   StubInfo (per plane) ──► matcher: contains / direction dot / time offset
//!                                │
//!                                ▼
//!                     merger: end position, charge metrics
//!                                │  uses
//!                                ▼
//!          PitchEngine ◄── PlaneTransform ◄── GeometryQuery
//!              │
//!              └────────► DistortionField
//! ```
//!
//! Coordinates are tagged with their regime ([`Position`], [`Direction`]):
//! nominal (as seen at the wires) or corrected (distortion removed).

// Core services.
pub mod distortion;
pub mod error;
pub mod geometry;
pub mod pitch;
pub mod transform;
pub mod types;

// Stub matching/merging and tooling.
pub mod config;
pub mod io;
pub mod stub;

// --- High-level re-exports -------------------------------------------------

pub use crate::distortion::{DistortionField, NoDistortion};
pub use crate::error::{GeometryError, StubError};
pub use crate::geometry::{DetectorGeometry, GeometryQuery};
pub use crate::pitch::PitchEngine;
pub use crate::transform::{PlaneTransform, ProjectedPoint};
pub use crate::types::{Direction, PlaneId, Position, Regime, ViewId, VolumeId};

/// Small prelude for quick experiments.
///
/// ```no_run
/// use vertex_stub::prelude::*;
///
/// let geometry = DetectorGeometry::mirrored_three_plane(200.0, 0.3);
/// let properties = DetectorProperties::default();
/// let clocks = DetectorClocks::default();
/// let ctx = MergeContext::new(&geometry, &NoDistortion, &properties, &clocks).unwrap();
/// let engine = StubMergeEngine::new(ctx, MergeCuts::default());
/// let result = engine.process(&[]);
/// println!("merged={} elapsed_ms={:.3}", result.merged.len(), result.elapsed_ms);
/// ```
pub mod prelude {
    pub use crate::geometry::{DetectorClocks, DetectorGeometry, DetectorProperties};
    pub use crate::stub::{MergeContext, MergeCuts, StubInfo, StubMergeEngine};
    pub use crate::NoDistortion;
}
