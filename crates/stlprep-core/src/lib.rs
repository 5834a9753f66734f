//! Post-processing of CAD-exported ASCII STL files for a background-grid
//! mesher: solid scanning, reassembly, domain bounds and batch orchestration.

pub mod bounds;
pub mod concat;
pub mod error;
pub mod fsutil;
pub mod geom;
pub mod grid;
pub mod manifest;
pub mod model;
pub mod naming;
pub mod pipeline;
pub mod reassemble;
pub mod session;
pub mod stl;
pub mod validate;

pub use error::{PipelineError, SessionError, StlError};
