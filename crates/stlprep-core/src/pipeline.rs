//! Batch orchestration of export, reassembly and manifest writing.
//!
//! A run is linear: `Init -> ValidateCounts -> ExportRaw -> Reassemble ->
//! WriteManifest -> Done`. Validation findings do not stop the run; they are
//! written to the diagnostic report at the checkpoint after the geometry is
//! meshed and handed back in [`RunOutcome`]. STL and I/O errors abort it.

use crate::concat::concatenate_files;
use crate::error::PipelineError;
use crate::fsutil::{recreate_dir, remove_if_exists, write_whole};
use crate::manifest::{BoundaryInfo, ExportManifest};
use crate::model::CaseInput;
use crate::naming::{normalized_filename, raw_filename, EntityNameResolver, SuffixTokenResolver};
use crate::reassemble::{reassemble_file, MergePolicy, ReassembleOutcome};
use crate::session::GeometrySession;
use crate::validate::{
    check_counts, check_geometry_extension, check_mesh_size, render_report, ValidationFinding,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const BC_PREFIX: &str = "bc";
pub const ZONE_PREFIX: &str = "block";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub work_dir: PathBuf,
    pub export_subdir: String,
    /// Created inside the export directory.
    pub normalized_subdir: String,
    pub manifest_filename: String,
    pub report_filename: String,
    pub raw_suffix: String,
    pub combined_bc_filename: String,
    pub combined_block_filename: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            export_subdir: "export_pre_formatted_stl".to_string(),
            normalized_subdir: "snappyHexMesh_ready_stl_files".to_string(),
            manifest_filename: "snappyHexInfo.json".to_string(),
            report_filename: "crash_report.txt".to_string(),
            raw_suffix: crate::naming::DEFAULT_RAW_SUFFIX.to_string(),
            combined_bc_filename: "combinedBcStl.stl".to_string(),
            combined_block_filename: "combinedBlockStl.stl".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn in_dir(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Self::default()
        }
    }

    /// The same layout with `work_dir` resolved against the current
    /// directory. The manifest records paths that are read from elsewhere.
    pub fn absolute(&self) -> std::io::Result<Self> {
        Ok(Self {
            work_dir: std::path::absolute(&self.work_dir)?,
            ..self.clone()
        })
    }

    pub fn export_dir(&self) -> PathBuf {
        self.work_dir.join(&self.export_subdir)
    }

    pub fn normalized_dir(&self) -> PathBuf {
        self.export_dir().join(&self.normalized_subdir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.work_dir.join(&self.manifest_filename)
    }

    pub fn report_path(&self) -> PathBuf {
        self.work_dir.join(&self.report_filename)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Init,
    ValidateCounts,
    ExportRaw,
    Reassemble,
    WriteManifest,
    Done,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub manifest: ExportManifest,
    pub manifest_path: PathBuf,
    pub findings: Vec<ValidationFinding>,
    /// Set when findings were written to the diagnostic report.
    pub report_path: Option<PathBuf>,
}

impl RunOutcome {
    pub fn failed(&self) -> bool {
        !self.findings.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EntityClass {
    Boundary,
    Zone,
}

#[derive(Debug, Clone)]
struct RawExport {
    class: EntityClass,
    entity: String,
    kind: Option<String>,
    raw_filename: String,
}

pub struct Orchestrator {
    cfg: PipelineConfig,
    resolver: Box<dyn EntityNameResolver>,
}

impl Orchestrator {
    pub fn new(cfg: PipelineConfig) -> Self {
        let resolver = Box::new(SuffixTokenResolver::with_suffix(cfg.raw_suffix.clone()));
        Self { cfg, resolver }
    }

    /// Replaces the default `<prefix>_<name><suffix>.stl` name resolver.
    pub fn with_resolver(mut self, resolver: impl EntityNameResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    pub fn run<S>(&self, session: &mut S, case: &CaseInput) -> Result<RunOutcome, PipelineError>
    where
        S: GeometrySession + ?Sized,
    {
        enter(RunStage::Init);
        let cfg = self
            .cfg
            .absolute()
            .map_err(|e| PipelineError::io("resolve", &self.cfg.work_dir, e))?;
        clean_previous_outputs(&cfg)?;

        enter(RunStage::ValidateCounts);
        let facts = session.geometry_facts()?;
        let mut findings: Vec<ValidationFinding> = Vec::new();
        findings.extend(check_geometry_extension(case));
        findings.extend(check_mesh_size(case));
        findings.extend(check_counts(case, &facts));

        session.mesh_surfaces(case.surface_mesh_size)?;

        let report_path = if findings.is_empty() {
            None
        } else {
            let path = cfg.report_path();
            write_whole(&path, render_report(&findings).as_bytes())
                .map_err(|e| PipelineError::io("write report", &path, e))?;
            tracing::warn!(
                findings = findings.len(),
                report = %path.display(),
                "input validation failed, continuing with unchecked input"
            );
            Some(path)
        };

        enter(RunStage::ExportRaw);
        let exports = export_raw(&cfg, session, case)?;

        enter(RunStage::Reassemble);
        let manifest = self.reassemble(&cfg, &exports, case)?;

        enter(RunStage::WriteManifest);
        let manifest_path = cfg.manifest_path();
        manifest.save(&manifest_path)?;

        enter(RunStage::Done);
        Ok(RunOutcome {
            manifest,
            manifest_path,
            findings,
            report_path,
        })
    }

    fn reassemble(
        &self,
        cfg: &PipelineConfig,
        exports: &[RawExport],
        case: &CaseInput,
    ) -> Result<ExportManifest, PipelineError> {
        let export_dir = cfg.export_dir();
        let normalized_dir = cfg.normalized_dir();
        recreate_dir(&normalized_dir).map_err(|e| PipelineError::io("recreate", &normalized_dir, e))?;

        let policy = MergePolicy {
            merge_all_solids: case.merge_all_solids_in_file,
        };
        let mut manifest = ExportManifest {
            normalized_dir: normalized_dir.clone(),
            ..ExportManifest::default()
        };
        let mut solid_owners: HashMap<(EntityClass, String), &str> = HashMap::new();

        for export in exports {
            let target_name = normalized_filename(&export.raw_filename, &cfg.raw_suffix)?;
            let outcome = reassemble_file(
                &export_dir.join(&export.raw_filename),
                &normalized_dir.join(&target_name),
                policy,
                self.resolver.as_ref(),
            )?;
            let solid_name = match outcome {
                ReassembleOutcome::Written { solid_name, .. } => solid_name,
                ReassembleOutcome::NoSolids => {
                    tracing::warn!(entity = %export.entity, "export held no solids, left out of manifest");
                    continue;
                }
            };
            // Keep mode leaves the source solid names in place.
            if policy.merge_all_solids {
                if solid_name != export.entity {
                    tracing::warn!(
                        entity = %export.entity,
                        solid = %solid_name,
                        "solid name differs from the manifest key"
                    );
                }
                let key = (export.class, solid_name.clone());
                if let Some(other) = solid_owners.insert(key, &export.entity) {
                    tracing::warn!(
                        entity = %export.entity,
                        other = %other,
                        solid = %solid_name,
                        "two entities share one solid name"
                    );
                }
            }

            match export.class {
                EntityClass::Boundary => {
                    manifest.bc_info.insert(
                        export.entity.clone(),
                        BoundaryInfo {
                            filename: target_name.clone(),
                            kind: export.kind.clone().unwrap_or_default(),
                        },
                    );
                    manifest.bc_stl_file_list.push(target_name);
                }
                EntityClass::Zone => {
                    manifest
                        .block_info
                        .insert(export.entity.clone(), target_name.clone());
                    manifest.block_stl_file_list.push(target_name);
                }
            }
        }

        if case.merge_all_entity_files_together {
            manifest.combined_bc_stl_filename = combine(
                &normalized_dir,
                &manifest.bc_stl_file_list,
                &cfg.combined_bc_filename,
            )?;
            manifest.combined_block_stl_filename = combine(
                &normalized_dir,
                &manifest.block_stl_file_list,
                &cfg.combined_block_filename,
            )?;
        }

        Ok(manifest)
    }
}

fn clean_previous_outputs(cfg: &PipelineConfig) -> Result<(), PipelineError> {
    for path in [cfg.manifest_path(), cfg.report_path()] {
        if remove_if_exists(&path).map_err(|e| PipelineError::io("remove", &path, e))? {
            tracing::debug!(path = %path.display(), "removed previous output");
        }
    }
    Ok(())
}

fn export_raw<S>(cfg: &PipelineConfig, session: &mut S, case: &CaseInput) -> Result<Vec<RawExport>, PipelineError>
where
    S: GeometrySession + ?Sized,
{
    let export_dir = cfg.export_dir();
    recreate_dir(&export_dir).map_err(|e| PipelineError::io("recreate", &export_dir, e))?;

    let mut exports = Vec::new();

    for bc in &case.boundary_conditions {
        if bc.surface_list.is_empty() {
            tracing::info!(bc = %bc.name, "no surfaces, skipped");
            continue;
        }
        let raw = raw_filename(BC_PREFIX, &bc.name, &cfg.raw_suffix);
        tracing::info!(bc = %bc.name, surfaces = ?bc.surface_list, file = %raw, "exporting");
        session.export_surfaces(&bc.surface_list, &export_dir.join(&raw))?;
        exports.push(RawExport {
            class: EntityClass::Boundary,
            entity: bc.name.clone(),
            kind: Some(bc.kind.clone()),
            raw_filename: raw,
        });
    }

    for zone in &case.zones {
        if zone.volume_list.is_empty() {
            tracing::info!(zone = %zone.name, "no volumes, skipped");
            continue;
        }
        let raw = raw_filename(ZONE_PREFIX, &zone.name, &cfg.raw_suffix);
        tracing::info!(zone = %zone.name, volumes = ?zone.volume_list, file = %raw, "exporting");
        session.export_volumes(&zone.volume_list, &export_dir.join(&raw))?;
        exports.push(RawExport {
            class: EntityClass::Zone,
            entity: zone.name.clone(),
            kind: None,
            raw_filename: raw,
        });
    }

    Ok(exports)
}

fn combine(dir: &Path, files: &[String], target: &str) -> Result<Option<String>, PipelineError> {
    if files.is_empty() {
        return Ok(None);
    }
    tracing::info!(file = %target, files = files.len(), "merging entity files");
    concatenate_files(dir, files, &dir.join(target))?;
    Ok(Some(target.to_string()))
}

fn enter(stage: RunStage) {
    tracing::info!(stage = ?stage, "pipeline stage");
}
