use crate::distortion::DistortionModel;
use crate::geometry::{DetectorClocks, DetectorGeometry, DetectorProperties};
use crate::stub::MergeCuts;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime configuration of the `stub_merge` tool.
#[derive(Debug, Deserialize)]
pub struct StubMergeConfig {
    /// Event file holding the per-plane stubs.
    pub input: PathBuf,
    /// Destination of the merge report.
    pub output: PathBuf,
    pub geometry: DetectorGeometry,
    #[serde(default)]
    pub properties: DetectorProperties,
    #[serde(default)]
    pub clocks: DetectorClocks,
    #[serde(default)]
    pub distortion: DistortionModel,
    #[serde(default)]
    pub cuts: MergeCuts,
}

pub fn load_config(path: &Path) -> Result<StubMergeConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
