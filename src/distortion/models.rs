use super::{DistortionField, NoDistortion};
use crate::types::VolumeId;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

fn zero_offset() -> Vector3<f64> {
    Vector3::zeros()
}

/// Constant displacement of every deposit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UniformDistortion {
    /// Apparent minus true position, cm.
    pub shift: Vector3<f64>,
    #[serde(default = "zero_offset")]
    pub efield_offset: Vector3<f64>,
}

impl DistortionField for UniformDistortion {
    fn calibration_offset(&self, _apparent: &Point3<f64>, _volume: VolumeId) -> Vector3<f64> {
        -self.shift
    }

    fn position_offset(&self, _location: &Point3<f64>) -> Vector3<f64> {
        self.shift
    }

    fn efield_offset(&self, _location: &Point3<f64>) -> Vector3<f64> {
        self.efield_offset
    }
}

/// Per-axis stretch about a reference point:
/// `apparent = origin + (1 + scale) ⊙ (true − origin)`.
///
/// A negative scale component compresses the apparent image along that axis.
/// Components must stay above −1.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinearDistortion {
    pub origin: Point3<f64>,
    pub scale: Vector3<f64>,
    #[serde(default = "zero_offset")]
    pub efield_offset: Vector3<f64>,
}

impl DistortionField for LinearDistortion {
    fn calibration_offset(&self, apparent: &Point3<f64>, _volume: VolumeId) -> Vector3<f64> {
        let d = apparent - self.origin;
        Vector3::new(
            -d.x * self.scale.x / (1.0 + self.scale.x),
            -d.y * self.scale.y / (1.0 + self.scale.y),
            -d.z * self.scale.z / (1.0 + self.scale.z),
        )
    }

    fn position_offset(&self, location: &Point3<f64>) -> Vector3<f64> {
        (location - self.origin).component_mul(&self.scale)
    }

    fn efield_offset(&self, _location: &Point3<f64>) -> Vector3<f64> {
        self.efield_offset
    }
}

/// Distortion model selected by configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum DistortionModel {
    #[default]
    None,
    Uniform(UniformDistortion),
    Linear(LinearDistortion),
}

impl DistortionModel {
    pub fn build(&self) -> Box<dyn DistortionField> {
        match self {
            DistortionModel::None => Box::new(NoDistortion),
            DistortionModel::Uniform(model) => Box::new(model.clone()),
            DistortionModel::Linear(model) => Box::new(model.clone()),
        }
    }
}
