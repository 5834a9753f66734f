use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use stlprep_core::bounds::{extract_domain_bounds, manifest_domain_bounds};
use stlprep_core::geom::DomainBounds;
use stlprep_core::grid::{BackgroundGrid, LengthUnit};
use stlprep_core::manifest::ExportManifest;
use stlprep_core::model::CaseInput;
use stlprep_core::naming::{EntityNameResolver, SuffixTokenResolver};
use stlprep_core::pipeline::{Orchestrator, PipelineConfig};
use stlprep_core::reassemble::{reassemble_file, MergePolicy, ReassembleOutcome};
use stlprep_core::StlError;
use stlprep_staged::StagedSession;

#[derive(Debug, Parser)]
#[command(name = "stlprep")]
#[command(about = "Normalize CAD-exported ASCII STL files for background-grid meshing.")]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rebuild one raw export into a normalized STL file.
    Reassemble {
        source: PathBuf,
        target: PathBuf,
        /// Keep each solid instead of merging them into one.
        #[arg(long)]
        keep_solids: bool,
        /// Output solid name; derived from the source filename by default.
        #[arg(long)]
        name: Option<String>,
    },
    /// Bounding box of an STL file.
    Bounds {
        input: PathBuf,
        #[arg(long)]
        cell_size: Option<f64>,
        #[arg(long, default_value = "mm")]
        unit: String,
    },
    /// Bounding box of the domain described by an export manifest.
    DomainBounds {
        manifest: PathBuf,
        #[arg(long)]
        cell_size: Option<f64>,
        #[arg(long, default_value = "mm")]
        unit: String,
    },
    /// Export, reassemble and write the manifest for a whole case.
    Run {
        case: PathBuf,
        /// Staging directory with surface_<id>.stl files and geometry.json.
        #[arg(long)]
        geometry: PathBuf,
        #[arg(long, default_value = ".")]
        work_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Reassemble {
            source,
            target,
            keep_solids,
            name,
        } => reassemble(&source, &target, keep_solids, name),
        Command::Bounds {
            input,
            cell_size,
            unit,
        } => {
            ensure_input_file(&input)?;
            let bounds = extract_domain_bounds(&input)?;
            print_bounds(bounds, cell_size, &unit)
        }
        Command::DomainBounds {
            manifest,
            cell_size,
            unit,
        } => {
            ensure_input_file(&manifest)?;
            let manifest = ExportManifest::load(&manifest)?;
            let bounds = manifest_domain_bounds(&manifest)?;
            print_bounds(bounds, cell_size, &unit)
        }
        Command::Run {
            case,
            geometry,
            work_dir,
        } => run(&case, &geometry, work_dir),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn reassemble(source: &Path, target: &Path, keep_solids: bool, name: Option<String>) -> Result<()> {
    ensure_input_file(source)?;
    let policy = if keep_solids {
        MergePolicy::KEEP
    } else {
        MergePolicy::MERGE
    };
    let resolver: Box<dyn EntityNameResolver> = match name {
        Some(name) => Box::new(move |_: &str| -> Result<String, StlError> { Ok(name.clone()) }),
        None => Box::new(SuffixTokenResolver::default()),
    };

    ensure_parent_dir(target)?;
    match reassemble_file(source, target, policy, resolver.as_ref())
        .with_context(|| format!("reassemble {source:?}"))?
    {
        ReassembleOutcome::Written {
            solid_name,
            source_solids,
            bytes,
        } => println!(
            "{}",
            serde_json::json!({
                "target": target,
                "solid": solid_name,
                "source-solids": source_solids,
                "bytes": bytes,
            })
        ),
        ReassembleOutcome::NoSolids => println!("{}", serde_json::json!({ "target": null })),
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct BoundsReport {
    bounds: DomainBounds,
    #[serde(skip_serializing_if = "Option::is_none")]
    grid: Option<BackgroundGrid>,
}

fn print_bounds(bounds: DomainBounds, cell_size: Option<f64>, unit: &str) -> Result<()> {
    let grid = match cell_size {
        Some(size) => {
            let unit: LengthUnit = unit.parse()?;
            Some(BackgroundGrid::from_bounds(&bounds, size, unit)?)
        }
        None => None,
    };
    let json = serde_json::to_string_pretty(&BoundsReport { bounds, grid }).context("serialize bounds")?;
    println!("{json}");
    Ok(())
}

fn run(case_path: &Path, geometry: &Path, work_dir: PathBuf) -> Result<()> {
    ensure_input_file(case_path)?;
    let text = std::fs::read_to_string(case_path).with_context(|| format!("read case: {case_path:?}"))?;
    let case = CaseInput::from_json(&text).with_context(|| format!("parse case: {case_path:?}"))?;

    let mut session = StagedSession::open(geometry).with_context(|| format!("open staging dir: {geometry:?}"))?;
    std::fs::create_dir_all(&work_dir).with_context(|| format!("create work dir: {work_dir:?}"))?;

    let orchestrator = Orchestrator::new(PipelineConfig::in_dir(work_dir));
    let outcome = orchestrator.run(&mut session, &case)?;

    let json = serde_json::to_string_pretty(&outcome.manifest).context("serialize manifest")?;
    println!("{json}");

    if let Some(report) = &outcome.report_path {
        for f in &outcome.findings {
            tracing::warn!(kind = ?f.kind, expected = %f.expected, actual = %f.actual, "validation finding");
        }
        bail!("input validation failed; see {report:?}");
    }
    tracing::info!(manifest = %outcome.manifest_path.display(), "run complete");
    Ok(())
}

fn ensure_parent_dir(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create dir: {parent:?}"))?;
    }
    Ok(())
}

fn ensure_input_file(input: &Path) -> Result<()> {
    match std::fs::metadata(input) {
        Ok(meta) => {
            if meta.is_file() {
                Ok(())
            } else {
                bail!("input is not a file: {input:?}");
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            bail!("input not found: {input:?} (cwd: {cwd:?}).");
        }
        Err(err) => Err(err).with_context(|| format!("stat input: {input:?}")),
    }
}
