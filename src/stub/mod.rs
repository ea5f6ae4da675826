//! Stub matching and merging across wire planes.
//!
//! A vertex stub is reconstructed independently on each plane. This module
//! decides which per-plane candidates describe the same particle and combines
//! them:
//!
//! - [`matcher`]: three independent compatibility metrics. Spatial
//!   containment (same volume, asymmetric), direction alignment (cosine of
//!   the start→end directions) and time offset (end-hit times on a common
//!   clock).
//! - [`merger`]: the merged end position by two-plane triangulation, charge
//!   comparisons (total, peak, peak dQ/dx) and [`merge_pair`], which bundles
//!   everything into a [`MergedStub`].
//! - [`StubMergeEngine`]: per-event driver removing same-plane duplicates,
//!   evaluating every cross-plane pair (in parallel with the `parallel`
//!   feature) and selecting merges with caller-supplied [`MergeCuts`].
//!
//! Geometric failures (zero-length stubs, parallel planes, wire-parallel
//! directions) surface as [`crate::GeometryError`] and simply exclude the
//! affected pair.

mod event;
pub mod matcher;
pub mod merger;
mod options;
mod types;

pub use event::{EventMerge, EventMergeResult, PairRejection, RejectionKind, StubMergeEngine};
pub use matcher::{stub_contains, stub_direction_dot, stub_time_offset, CONTAIN_TOLERANCE_CM};
pub use merger::{
    merge_pair, stub_charge_offset, stub_peak_charge_offset, stub_peak_dqdx_offset,
    two_stub_end_position, MergeContext, MergeMetrics, MergedStub,
};
pub use options::MergeCuts;
pub use types::{
    ChargeSample, HitId, ParticleId, StubCandidate, StubEndpoint, StubInfo, VertexHitId,
};
