use super::GeometryQuery;
use crate::error::GeometryError;
use crate::types::{PlaneId, ViewId, VolumeId};
use serde::{Deserialize, Serialize};

/// Direction in which ionization electrons drift inside a volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriftDirection {
    #[serde(rename = "-x")]
    NegativeX,
    #[serde(rename = "+x")]
    PositiveX,
}

impl DriftDirection {
    pub fn sign(self) -> f64 {
        match self {
            DriftDirection::NegativeX => -1.0,
            DriftDirection::PositiveX => 1.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaneGeometry {
    pub view: ViewId,
    /// Angle between the wires and the z axis, degrees.
    pub wire_angle_deg: f64,
    /// Wire spacing in cm.
    pub wire_pitch: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VolumeGeometry {
    pub id: VolumeId,
    pub anode_x: f64,
    pub drift_direction: DriftDirection,
    pub planes: Vec<PlaneGeometry>,
}

/// Static detector description made of independent drift volumes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DetectorGeometry {
    pub volumes: Vec<VolumeGeometry>,
}

impl DetectorGeometry {
    pub fn new(volumes: Vec<VolumeGeometry>) -> Self {
        Self { volumes }
    }

    /// Two mirrored volumes sharing a central cathode at x = 0, each read out
    /// by induction planes at ±60° and a collection plane of vertical wires.
    ///
    /// Views are numbered 0 (+60°), 1 (−60°) and 2 (vertical); volume 0 spans
    /// negative x and drifts towards −x.
    pub fn mirrored_three_plane(half_width: f64, wire_pitch: f64) -> Self {
        let planes = || {
            vec![
                PlaneGeometry {
                    view: ViewId(0),
                    wire_angle_deg: 30.0,
                    wire_pitch,
                },
                PlaneGeometry {
                    view: ViewId(1),
                    wire_angle_deg: 150.0,
                    wire_pitch,
                },
                PlaneGeometry {
                    view: ViewId(2),
                    wire_angle_deg: 90.0,
                    wire_pitch,
                },
            ]
        };
        Self::new(vec![
            VolumeGeometry {
                id: VolumeId(0),
                anode_x: -half_width,
                drift_direction: DriftDirection::NegativeX,
                planes: planes(),
            },
            VolumeGeometry {
                id: VolumeId(1),
                anode_x: half_width,
                drift_direction: DriftDirection::PositiveX,
                planes: planes(),
            },
        ])
    }

    pub fn volume(&self, id: VolumeId) -> Result<&VolumeGeometry, GeometryError> {
        self.volumes
            .iter()
            .find(|v| v.id == id)
            .ok_or(GeometryError::UnknownVolume(id))
    }

    pub fn plane(&self, plane: PlaneId) -> Result<&PlaneGeometry, GeometryError> {
        self.volume(plane.volume)
            .map_err(|_| GeometryError::UnknownPlane(plane))?
            .planes
            .iter()
            .find(|p| p.view == plane.view)
            .ok_or(GeometryError::UnknownPlane(plane))
    }
}

impl GeometryQuery for DetectorGeometry {
    fn volumes(&self) -> Vec<VolumeId> {
        self.volumes.iter().map(|v| v.id).collect()
    }

    fn views(&self, volume: VolumeId) -> Result<Vec<ViewId>, GeometryError> {
        Ok(self.volume(volume)?.planes.iter().map(|p| p.view).collect())
    }

    fn wire_angle(&self, plane: PlaneId) -> Result<f64, GeometryError> {
        Ok(self.plane(plane)?.wire_angle_deg.to_radians())
    }

    fn wire_pitch(&self, plane: PlaneId) -> Result<f64, GeometryError> {
        Ok(self.plane(plane)?.wire_pitch)
    }

    fn anode_x(&self, volume: VolumeId) -> Result<f64, GeometryError> {
        Ok(self.volume(volume)?.anode_x)
    }

    fn drift_direction(&self, volume: VolumeId) -> Result<f64, GeometryError> {
        Ok(self.volume(volume)?.drift_direction.sign())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn collection_plane_measures_z() {
        let geo = DetectorGeometry::mirrored_three_plane(200.0, 0.3);
        let axis = geo.pitch_axis(PlaneId::new(VolumeId(0), ViewId(2))).unwrap();
        assert!(approx_eq(axis[0], 0.0));
        assert!(approx_eq(axis[1], 1.0));
    }

    #[test]
    fn mirrored_volumes_have_opposite_xsign() {
        let geo = DetectorGeometry::mirrored_three_plane(200.0, 0.3);
        assert_eq!(geo.xsign(VolumeId(0)).unwrap(), 1.0);
        assert_eq!(geo.xsign(VolumeId(1)).unwrap(), -1.0);
        assert_eq!(geo.views(VolumeId(1)).unwrap().len(), 3);
    }

    #[test]
    fn unknown_identifiers_are_reported() {
        let geo = DetectorGeometry::mirrored_three_plane(200.0, 0.3);
        let plane = PlaneId::new(VolumeId(0), ViewId(7));
        assert_eq!(geo.wire_pitch(plane), Err(GeometryError::UnknownPlane(plane)));
        assert_eq!(
            geo.anode_x(VolumeId(9)),
            Err(GeometryError::UnknownVolume(VolumeId(9)))
        );
    }

    #[test]
    fn geometry_round_trips_through_json() {
        let json = r#"{"volumes":[{"id":3,"anode_x":-10.0,"drift_direction":"-x",
            "planes":[{"view":0,"wire_angle_deg":90.0,"wire_pitch":0.3}]}]}"#;
        let geo: DetectorGeometry = serde_json::from_str(json).unwrap();
        assert_eq!(geo.volumes(), vec![VolumeId(3)]);
        assert_eq!(geo.drift_direction(VolumeId(3)).unwrap(), -1.0);
    }
}
