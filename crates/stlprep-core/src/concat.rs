//! Byte-level concatenation of files. No STL interpretation happens here;
//! solids from each source simply follow one another in the target.

use crate::error::PipelineError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes the contents of `dir/<source>` for every source, in order, to
/// `target`. The target is replaced as a whole; on error it is left untouched.
pub fn concatenate_files<S: AsRef<str>>(
    dir: &Path,
    sources: &[S],
    target: &Path,
) -> Result<u64, PipelineError> {
    let target_dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp =
        NamedTempFile::new_in(target_dir).map_err(|e| PipelineError::io("create temp in", target_dir, e))?;

    let mut total = 0u64;
    for source in sources {
        let path = dir.join(source.as_ref());
        let mut file = std::fs::File::open(&path).map_err(|e| PipelineError::io("open", &path, e))?;
        total += std::io::copy(&mut file, &mut tmp).map_err(|e| PipelineError::io("copy", &path, e))?;
    }

    tmp.flush().map_err(|e| PipelineError::io("flush", target, e))?;
    tmp.persist(target)
        .map_err(|e| PipelineError::io("persist", target, e.error))?;

    tracing::debug!(file = %target.display(), files = sources.len(), bytes = total, "concatenated files");
    Ok(total)
}
