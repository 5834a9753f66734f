//! A geometry session backed by a staging directory.
//!
//! The CAD tool is expected to have written one ASCII STL per meshed surface
//! (`surface_<id>.stl`) plus a `geometry.json` describing the topology:
//!
//! ```json
//! {
//!   "external-surfaces": [1, 3, 4],
//!   "volumes": [{ "id": 1, "surfaces": [1, 2, 4] }]
//! }
//! ```
//!
//! Exports concatenate the requested surface files, which gives the usual
//! raw export shape of one solid per surface.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use stlprep_core::session::GeometrySession;
use stlprep_core::validate::GeometryFacts;
use stlprep_core::SessionError;

pub const FACTS_FILENAME: &str = "geometry.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedVolume {
    pub id: u32,
    pub surfaces: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StagedFacts {
    pub external_surfaces: Vec<u32>,
    #[serde(default)]
    pub volumes: Vec<StagedVolume>,
}

#[derive(Debug)]
pub struct StagedSession {
    dir: PathBuf,
    external_surfaces: Vec<u32>,
    volumes: BTreeMap<u32, Vec<u32>>,
    mesh_size: Option<f64>,
}

impl StagedSession {
    pub fn open(dir: &Path) -> Result<Self, SessionError> {
        let facts_path = dir.join(FACTS_FILENAME);
        let text = std::fs::read_to_string(&facts_path)?;
        let facts: StagedFacts = serde_json::from_str(&text)
            .map_err(|e| SessionError::Other(format!("parse {facts_path:?}: {e}")))?;
        Ok(Self::from_facts(dir, facts))
    }

    pub fn from_facts(dir: &Path, facts: StagedFacts) -> Self {
        let volumes = facts
            .volumes
            .into_iter()
            .map(|v| (v.id, v.surfaces))
            .collect();
        Self {
            dir: dir.to_path_buf(),
            external_surfaces: facts.external_surfaces,
            volumes,
            mesh_size: None,
        }
    }

    pub fn surface_path(&self, id: u32) -> PathBuf {
        self.dir.join(format!("surface_{id}.stl"))
    }

    pub fn mesh_size(&self) -> Option<f64> {
        self.mesh_size
    }

    fn write_surfaces(&self, surface_ids: &[u32], target: &Path) -> Result<(), SessionError> {
        let mut out = Vec::new();
        for &id in surface_ids {
            let path = self.surface_path(id);
            let bytes = match std::fs::read(&path) {
                Ok(b) => b,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    return Err(SessionError::UnknownEntity { kind: "surface", id });
                }
                Err(err) => return Err(err.into()),
            };
            out.extend_from_slice(&bytes);
            if !out.is_empty() && !out.ends_with(b"\n") {
                out.push(b'\n');
            }
        }
        std::fs::write(target, &out)?;
        tracing::debug!(file = %target.display(), surfaces = surface_ids.len(), "staged export");
        Ok(())
    }
}

impl GeometrySession for StagedSession {
    fn geometry_facts(&self) -> Result<GeometryFacts, SessionError> {
        Ok(GeometryFacts {
            external_surface_ids: self.external_surfaces.clone(),
            volume_ids: self.volumes.keys().copied().collect(),
        })
    }

    fn mesh_surfaces(&mut self, size: f64) -> Result<(), SessionError> {
        // Staged surfaces are already triangulated; only remember the size.
        tracing::info!(size, "surface mesh size (staged surfaces are pre-meshed)");
        self.mesh_size = Some(size);
        Ok(())
    }

    fn export_surfaces(&mut self, surface_ids: &[u32], target: &Path) -> Result<(), SessionError> {
        self.write_surfaces(surface_ids, target)
    }

    fn export_volumes(&mut self, volume_ids: &[u32], target: &Path) -> Result<(), SessionError> {
        let mut surfaces = Vec::new();
        for &id in volume_ids {
            let ids = self
                .volumes
                .get(&id)
                .ok_or(SessionError::UnknownEntity { kind: "volume", id })?;
            for &s in ids {
                if !surfaces.contains(&s) {
                    surfaces.push(s);
                }
            }
        }
        self.write_surfaces(&surfaces, target)
    }
}
