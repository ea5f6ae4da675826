use serde::{Deserialize, Serialize};

/// Selection applied by [`super::StubMergeEngine`] on top of the pair metrics.
///
/// - `remove_contained`: drop stubs fully contained in another stub of the
///   same plane before pairing.
/// - `require_shared_vertex`: only pair stubs that start at the same vertex
///   hit.
/// - Optional cuts are skipped when `None`; offsets are compared in absolute
///   value.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeCuts {
    pub remove_contained: bool,
    pub require_shared_vertex: bool,
    /// Maximum |time offset| in microseconds.
    pub max_time_offset_us: f64,
    pub min_direction_dot: Option<f64>,
    pub max_charge_offset: Option<f64>,
    pub max_peak_dqdx_offset: Option<f64>,
}

impl Default for MergeCuts {
    fn default() -> Self {
        Self {
            remove_contained: true,
            require_shared_vertex: true,
            max_time_offset_us: 2.0,
            min_direction_dot: None,
            max_charge_offset: None,
            max_peak_dqdx_offset: None,
        }
    }
}
