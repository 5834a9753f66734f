//! Line-level scanning of ASCII STL text.
//!
//! Only the `solid`/`endsolid` boundary lines and `vertex` records are
//! interpreted; facet bodies are carried through as opaque lines.

use crate::error::StlError;
use nalgebra::Point3;
use std::path::Path;

pub const SOLID_START: &str = "solid ";
pub const SOLID_END: &str = "endsolid ";

/// One ASCII STL file as an ordered list of lines, each keeping its own
/// line terminator so content can be copied back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StlDocument {
    lines: Vec<String>,
}

/// A `solid <name>` ... `endsolid <name>` span, as 0-based inclusive line indices.
///
/// Blocks are meant to come from [`StlDocument::solids`] on the document
/// they index into; a hand-built block must keep `start_line < end_line`
/// within that document's line count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidBlock {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl SolidBlock {
    /// Number of facet lines between the wrapper lines.
    pub fn interior_len(&self) -> usize {
        self.end_line.saturating_sub(self.start_line).saturating_sub(1)
    }
}

impl StlDocument {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_owned).collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, StlError> {
        let text = std::fs::read_to_string(path).map_err(|source| StlError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(&text))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Locates every solid block in source order.
    ///
    /// The i-th start marker is paired with the i-th end marker. Unequal
    /// marker counts, or a block that opens before the previous one closed,
    /// are reported as errors instead of being repaired.
    pub fn solids(&self) -> Result<Vec<SolidBlock>, StlError> {
        let mut starts: Vec<(usize, String)> = Vec::new();
        let mut ends: Vec<usize> = Vec::new();

        for (index, line) in self.lines.iter().enumerate() {
            if let Some(rest) = line.strip_prefix(SOLID_START) {
                starts.push((index, strip_terminator(rest).to_string()));
            } else if line.starts_with(SOLID_END) {
                ends.push(index);
            }
        }

        if starts.len() != ends.len() {
            return Err(StlError::UnbalancedSolids {
                starts: starts.len(),
                ends: ends.len(),
            });
        }

        let mut blocks: Vec<SolidBlock> = Vec::with_capacity(starts.len());
        for ((start, name), end) in starts.into_iter().zip(ends) {
            if end < start {
                return Err(StlError::OrphanEnd { line: end + 1 });
            }
            if let Some(prev) = blocks.last() {
                if start < prev.end_line {
                    return Err(StlError::OverlappingSolids {
                        name: prev.name.clone(),
                        start: prev.start_line + 1,
                        next: start + 1,
                    });
                }
            }
            blocks.push(SolidBlock {
                name,
                start_line: start,
                end_line: end,
            });
        }
        Ok(blocks)
    }

    /// Every `vertex x y z` record in the document, in source order.
    pub fn vertices(&self) -> Result<Vec<Point3<f64>>, StlError> {
        let mut out = Vec::new();
        for (index, line) in self.lines.iter().enumerate() {
            if let Some(v) = parse_vertex(line, index + 1)? {
                out.push(v);
            }
        }
        Ok(out)
    }
}

/// Parses a single line as a vertex record.
///
/// Returns `Ok(None)` when the line is not a vertex record. `inf` and `nan`
/// coordinates are malformed. `line_no` is 1-based and only used for error
/// reporting.
pub fn parse_vertex(line: &str, line_no: usize) -> Result<Option<Point3<f64>>, StlError> {
    let mut fields = line.split_whitespace();
    if fields.next() != Some("vertex") {
        return Ok(None);
    }

    let malformed = || StlError::MalformedVertex {
        line: line_no,
        text: strip_terminator(line).to_string(),
    };

    let mut coords = [0.0f64; 3];
    for slot in &mut coords {
        *slot = fields
            .next()
            .and_then(|f| f.parse::<f64>().ok())
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(malformed)?;
    }
    Ok(Some(Point3::new(coords[0], coords[1], coords[2])))
}

pub(crate) fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(&['\n', '\r'][..])
}
