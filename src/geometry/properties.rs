//! Detector running conditions: nominal field, readout clock and per-plane
//! time offsets.

use crate::types::PlaneId;
use serde::{Deserialize, Serialize};

/// Ticks added to a plane's readout relative to the common time base.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneTickOffset {
    pub plane: PlaneId,
    pub ticks: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorProperties {
    /// Nominal drift field magnitude (kV/cm).
    pub efield: f64,
    /// Planes missing from this list have no offset.
    pub tick_offsets: Vec<PlaneTickOffset>,
}

impl Default for DetectorProperties {
    fn default() -> Self {
        Self {
            efield: 0.5,
            tick_offsets: Vec::new(),
        }
    }
}

impl DetectorProperties {
    pub fn tick_offset(&self, plane: PlaneId) -> f64 {
        self.tick_offsets
            .iter()
            .find(|o| o.plane == plane)
            .map(|o| o.ticks)
            .unwrap_or(0.0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorClocks {
    /// TPC readout tick period in microseconds.
    pub tick_period_us: f64,
}

impl Default for DetectorClocks {
    fn default() -> Self {
        Self {
            tick_period_us: 0.5,
        }
    }
}

impl DetectorClocks {
    pub fn ticks_to_us(&self, ticks: f64) -> f64 {
        ticks * self.tick_period_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ViewId, VolumeId};

    #[test]
    fn missing_plane_offset_defaults_to_zero() {
        let plane = PlaneId::new(VolumeId(0), ViewId(1));
        let mut props = DetectorProperties::default();
        assert_eq!(props.tick_offset(plane), 0.0);
        props.tick_offsets.push(PlaneTickOffset { plane, ticks: 12.0 });
        assert_eq!(props.tick_offset(plane), 12.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let props: DetectorProperties = serde_json::from_str(r#"{"efield":0.273}"#).unwrap();
        assert_eq!(props.efield, 0.273);
        assert!(props.tick_offsets.is_empty());
        let clocks: DetectorClocks = serde_json::from_str("{}").unwrap();
        assert_eq!(clocks.ticks_to_us(4.0), 2.0);
    }
}
