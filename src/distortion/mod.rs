//! Space-charge style distortion of apparent charge positions.
//!
//! A [`DistortionField`] answers three questions about a location:
//! - `calibration_offset`: how far an *apparent* position (as seen at the
//!   wires) must move to reach the true position;
//! - `position_offset`: how far a *true* position appears displaced at the
//!   wires;
//! - `efield_offset`: the fractional change of the local drift field.
//!
//! Offsets are expressed in the frame of a volume drifting towards −x; the
//! engine multiplies their x-components by the volume's `xsign`. When no
//! distortion is configured, [`NoDistortion`] is injected instead of an
//! optional field so that callers never branch on availability.

mod models;

pub use models::{DistortionModel, LinearDistortion, UniformDistortion};

use crate::types::VolumeId;
use nalgebra::{Point3, Vector3};

pub trait DistortionField: Send + Sync {
    /// False when the field is the identity; consumers then skip corrections
    /// entirely and report nominal quantities.
    fn is_active(&self) -> bool {
        true
    }

    fn calibration_offset(&self, apparent: &Point3<f64>, volume: VolumeId) -> Vector3<f64>;

    fn position_offset(&self, location: &Point3<f64>) -> Vector3<f64>;

    fn efield_offset(&self, location: &Point3<f64>) -> Vector3<f64>;
}

/// Identity field.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDistortion;

impl DistortionField for NoDistortion {
    fn is_active(&self) -> bool {
        false
    }

    fn calibration_offset(&self, _apparent: &Point3<f64>, _volume: VolumeId) -> Vector3<f64> {
        Vector3::zeros()
    }

    fn position_offset(&self, _location: &Point3<f64>) -> Vector3<f64> {
        Vector3::zeros()
    }

    fn efield_offset(&self, _location: &Point3<f64>) -> Vector3<f64> {
        Vector3::zeros()
    }
}
