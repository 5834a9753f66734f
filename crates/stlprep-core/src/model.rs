use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named group of surfaces forming one physical boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BoundaryCondition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub surface_list: Vec<u32>,
}

/// A named group of volumes used for cell-set tagging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Zone {
    pub name: String,
    #[serde(default)]
    pub volume_list: Vec<u32>,
}

/// One run's worth of input. List order is processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CaseInput {
    pub input_geometry: String,
    #[serde(default = "default_mesh_size")]
    pub surface_mesh_size: f64,
    #[serde(default = "default_true")]
    pub merge_all_solids_in_file: bool,
    #[serde(default = "default_true")]
    pub merge_all_entity_files_together: bool,
    #[serde(default)]
    pub boundary_conditions: Vec<BoundaryCondition>,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

fn default_mesh_size() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl CaseInput {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn declared_surface_ids(&self) -> Vec<u32> {
        self.boundary_conditions
            .iter()
            .flat_map(|bc| bc.surface_list.iter().copied())
            .collect()
    }

    pub fn declared_volume_ids(&self) -> Vec<u32> {
        self.zones
            .iter()
            .flat_map(|z| z.volume_list.iter().copied())
            .collect()
    }

    /// Lower-cased extension of `input_geometry`, empty when absent.
    pub fn geometry_extension(&self) -> String {
        Path::new(&self.input_geometry)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
    }
}
