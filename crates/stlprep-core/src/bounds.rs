use crate::error::StlError;
use crate::geom::DomainBounds;
use crate::manifest::ExportManifest;
use crate::stl::StlDocument;
use std::path::Path;

/// Bounding box of every `vertex` record in an ASCII STL file.
///
/// Solid structure is irrelevant here; a file with no vertices is an error
/// rather than a degenerate box.
pub fn extract_domain_bounds(path: &Path) -> Result<DomainBounds, StlError> {
    let doc = StlDocument::load(path)?;
    let vertices = doc.vertices()?;
    let bounds = DomainBounds::from_points(&vertices).ok_or_else(|| StlError::EmptyVertexSet {
        path: path.to_path_buf(),
    })?;

    tracing::info!(
        file = %path.display(),
        vertices = vertices.len(),
        x = ?(bounds.x_min, bounds.x_max),
        y = ?(bounds.y_min, bounds.y_max),
        z = ?(bounds.z_min, bounds.z_max),
        "domain bounds"
    );
    Ok(bounds)
}

/// Union of the bounds of several files. Each file must define geometry.
pub fn extract_union_bounds<P: AsRef<Path>>(paths: &[P]) -> Result<Option<DomainBounds>, StlError> {
    let mut acc: Option<DomainBounds> = None;
    for path in paths {
        let b = extract_domain_bounds(path.as_ref())?;
        acc = Some(match acc {
            Some(prev) => prev.union(&b),
            None => b,
        });
    }
    Ok(acc)
}

/// Bounds of the domain surface described by an export manifest.
pub fn manifest_domain_bounds(manifest: &ExportManifest) -> Result<DomainBounds, StlError> {
    extract_union_bounds(&manifest.domain_files())?.ok_or_else(|| StlError::EmptyVertexSet {
        path: manifest.normalized_dir.clone(),
    })
}
