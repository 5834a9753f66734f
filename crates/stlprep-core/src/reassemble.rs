//! Rebuilding one output STL from the solid blocks of a raw export.

use crate::error::StlError;
use crate::fsutil::write_whole;
use crate::naming::EntityNameResolver;
use crate::stl::{SolidBlock, StlDocument, SOLID_END, SOLID_START};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePolicy {
    /// Collapse every solid of a file into one solid named after the entity.
    pub merge_all_solids: bool,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            merge_all_solids: true,
        }
    }
}

impl MergePolicy {
    pub const MERGE: Self = Self {
        merge_all_solids: true,
    };
    pub const KEEP: Self = Self {
        merge_all_solids: false,
    };
}

/// Produces the exact bytes of the output file.
///
/// With `merge_all_solids` the wrapper lines of every block are dropped,
/// the facet lines are concatenated in source order and a single
/// `solid <output_name>` / `endsolid <output_name>` pair is placed around
/// them. Otherwise each block is copied verbatim, wrappers included.
/// Lines outside any block are never copied.
///
/// # Panics
///
/// If a block's line range lies outside `doc` or ends before it starts.
/// Blocks returned by `doc.solids()` always satisfy this.
pub fn reassemble(
    doc: &StlDocument,
    blocks: &[SolidBlock],
    policy: MergePolicy,
    output_name: &str,
) -> String {
    let lines = doc.lines();
    let mut out = String::new();

    if policy.merge_all_solids {
        out.push_str(SOLID_START);
        out.push_str(output_name);
        out.push('\n');
        for block in blocks {
            for line in &lines[block.start_line + 1..block.end_line] {
                out.push_str(line);
            }
        }
        out.push_str(SOLID_END);
        out.push_str(output_name);
        out.push('\n');
    } else {
        for block in blocks {
            for line in &lines[block.start_line..=block.end_line] {
                out.push_str(line);
            }
            if !out.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReassembleOutcome {
    Written {
        solid_name: String,
        source_solids: Vec<String>,
        bytes: usize,
    },
    /// The source held no solid blocks; nothing was written.
    NoSolids,
}

/// Parses `source`, reassembles it under `policy` and replaces `target`.
///
/// The output solid name comes from `resolver` applied to the source
/// filename. Any parse error aborts before `target` is touched.
pub fn reassemble_file(
    source: &Path,
    target: &Path,
    policy: MergePolicy,
    resolver: &dyn EntityNameResolver,
) -> Result<ReassembleOutcome, StlError> {
    let doc = StlDocument::load(source)?;
    let blocks = doc.solids()?;

    let filename = source
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let solid_name = resolver.resolve(filename)?;

    tracing::info!(
        source = %source.display(),
        output = %target.display(),
        solid = %solid_name,
        solids = blocks.len(),
        "reassembling STL"
    );

    if blocks.is_empty() {
        tracing::warn!(source = %source.display(), "no solid definitions found, nothing written");
        return Ok(ReassembleOutcome::NoSolids);
    }

    tracing::debug!(
        names = %blocks.iter().map(|b| b.name.as_str()).join(", "),
        "solid definitions"
    );

    let content = reassemble(&doc, &blocks, policy, &solid_name);
    write_whole(target, content.as_bytes()).map_err(|source| StlError::Write {
        path: target.to_path_buf(),
        source,
    })?;

    Ok(ReassembleOutcome::Written {
        solid_name,
        source_solids: blocks.into_iter().map(|b| b.name).collect(),
        bytes: content.len(),
    })
}
