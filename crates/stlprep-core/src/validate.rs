//! Input-shape checks. Findings never stop a run; they are collected,
//! returned to the caller and rendered into the diagnostic report.

use crate::model::CaseInput;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const SUPPORTED_GEOMETRY_EXTENSIONS: [&str; 3] = ["cub", "stp", "step"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    UnsupportedGeometryExtension,
    SurfaceCountMismatch,
    VolumeCountMismatch,
    InvalidMeshSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub kind: FindingKind,
    pub expected: String,
    pub actual: String,
    pub message: String,
}

/// Facts about the loaded geometry, reported by the geometry session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryFacts {
    /// Surfaces not shared between volumes.
    pub external_surface_ids: Vec<u32>,
    pub volume_ids: Vec<u32>,
}

pub fn check_geometry_extension(case: &CaseInput) -> Option<ValidationFinding> {
    let ext = case.geometry_extension();
    if SUPPORTED_GEOMETRY_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(ValidationFinding {
        kind: FindingKind::UnsupportedGeometryExtension,
        expected: SUPPORTED_GEOMETRY_EXTENSIONS.join("|"),
        actual: ext.clone(),
        message: format!(
            "The geometry extension found --> \"{ext}\"\n\
             Supported extensions are\n - cub (cubit)\n - stp/step\n"
        ),
    })
}

pub fn check_mesh_size(case: &CaseInput) -> Option<ValidationFinding> {
    let size = case.surface_mesh_size;
    if size.is_finite() && size > 0.0 {
        return None;
    }
    Some(ValidationFinding {
        kind: FindingKind::InvalidMeshSize,
        expected: "> 0".to_string(),
        actual: size.to_string(),
        message: format!("Surface mesh size must be a positive number, got {size}\n"),
    })
}

/// Declared boundary-condition surfaces against the external surfaces of
/// the geometry, and declared zone volumes against all volumes.
pub fn check_counts(case: &CaseInput, facts: &GeometryFacts) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    let declared = case.declared_surface_ids();
    if declared.len() != facts.external_surface_ids.len() {
        findings.push(ValidationFinding {
            kind: FindingKind::SurfaceCountMismatch,
            expected: facts.external_surface_ids.len().to_string(),
            actual: declared.len().to_string(),
            message: format!(
                "The number of external (non-shared/merged) surfaces in the geometry does not match the input\n\
                 User provided bc surfaces ({}) --> {}\n\
                 External surfaces found ({})   --> {}\n\n\
                 Check the input file\n\
                 \x20- Check if all the boundary conditions are added\n\
                 \x20- Check if any surface got missed in the surface list for any boundary condition\n",
                declared.len(),
                declared.iter().join(", "),
                facts.external_surface_ids.len(),
                facts.external_surface_ids.iter().join(", "),
            ),
        });
    }

    let declared = case.declared_volume_ids();
    if declared.len() != facts.volume_ids.len() {
        findings.push(ValidationFinding {
            kind: FindingKind::VolumeCountMismatch,
            expected: facts.volume_ids.len().to_string(),
            actual: declared.len().to_string(),
            message: format!(
                "The number of volumes in the geometry does not match the input\n\
                 User provided zone volumes ({}) --> {}\n\
                 Volumes found ({})              --> {}\n\n\
                 Check the input file\n\
                 \x20- Check if all the zones are added\n\
                 \x20- Check if any volume got missed in the volume list for any zone\n",
                declared.len(),
                declared.iter().join(", "),
                facts.volume_ids.len(),
                facts.volume_ids.iter().join(", "),
            ),
        });
    }

    findings
}

/// Plain-text report written next to the manifest when findings exist.
pub fn render_report(findings: &[ValidationFinding]) -> String {
    let mut out = String::new();
    for f in findings {
        out.push_str(&format!(
            "[{:?}] expected {}, got {}\n",
            f.kind, f.expected, f.actual
        ));
        out.push_str(&f.message);
        out.push('\n');
    }
    out
}
