use crate::error::SessionError;
use crate::validate::GeometryFacts;
use std::path::Path;

/// The CAD/meshing session that owns the geometry.
///
/// Implementations write ASCII STL; one solid per exported surface is the
/// usual shape of a raw export.
pub trait GeometrySession {
    fn geometry_facts(&self) -> Result<GeometryFacts, SessionError>;

    /// Merge shared topology and triangulate every surface.
    fn mesh_surfaces(&mut self, size: f64) -> Result<(), SessionError>;

    fn export_surfaces(&mut self, surface_ids: &[u32], target: &Path) -> Result<(), SessionError>;

    /// Export the surfaces bounding the given volumes.
    fn export_volumes(&mut self, volume_ids: &[u32], target: &Path) -> Result<(), SessionError>;
}
