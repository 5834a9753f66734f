use crate::error::PipelineError;
use crate::fsutil::write_whole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryInfo {
    #[serde(rename = "bc-stl-file")]
    pub filename: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Everything the mesh-setup stage needs to locate the normalized STL set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExportManifest {
    #[serde(rename = "snappyhex-ready-stl-dir")]
    pub normalized_dir: PathBuf,
    pub bc_info: BTreeMap<String, BoundaryInfo>,
    pub bc_stl_file_list: Vec<String>,
    pub block_info: BTreeMap<String, String>,
    pub block_stl_file_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_bc_stl_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_block_stl_filename: Option<String>,
}

impl ExportManifest {
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path).map_err(|e| PipelineError::io("read", path, e))?;
        serde_json::from_str(&text).map_err(|source| PipelineError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| PipelineError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
        write_whole(path, json.as_bytes()).map_err(|e| PipelineError::io("write", path, e))
    }

    /// Every filename the manifest points at, per-entity files first.
    pub fn all_filenames(&self) -> Vec<&str> {
        self.bc_stl_file_list
            .iter()
            .chain(self.combined_bc_stl_filename.iter())
            .chain(self.block_stl_file_list.iter())
            .chain(self.combined_block_stl_filename.iter())
            .map(String::as_str)
            .collect()
    }

    /// Files whose union is the domain surface: the combined boundary file
    /// when there is one, otherwise each per-boundary file.
    pub fn domain_files(&self) -> Vec<PathBuf> {
        match &self.combined_bc_stl_filename {
            Some(combined) => vec![self.normalized_dir.join(combined)],
            None => self
                .bc_stl_file_list
                .iter()
                .map(|f| self.normalized_dir.join(f))
                .collect(),
        }
    }
}
