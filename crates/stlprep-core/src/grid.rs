//! Sizing of the structured background grid that encloses the domain.

use crate::geom::DomainBounds;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Padding added around the domain, in millimetres.
pub const DOMAIN_PADDING_MM: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Mm,
    Cm,
    M,
}

impl LengthUnit {
    /// Millimetres per unit.
    pub fn conversion_factor(self) -> f64 {
        match self {
            LengthUnit::Mm => 1.0,
            LengthUnit::Cm => 10.0,
            LengthUnit::M => 1000.0,
        }
    }
}

impl std::str::FromStr for LengthUnit {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" => Ok(LengthUnit::Mm),
            "cm" => Ok(LengthUnit::Cm),
            "m" => Ok(LengthUnit::M),
            other => Err(GridError::UnknownUnit(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("cell size must be positive and finite, got {0}")]
    CellSize(f64),
    #[error("unknown length unit {0:?} (expected mm, cm or m)")]
    UnknownUnit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BackgroundGrid {
    /// Domain bounds grown by the unit-scaled padding.
    pub padded: DomainBounds,
    pub cells: [usize; 3],
    pub cell_size: f64,
}

impl BackgroundGrid {
    /// Cell counts are taken from the unpadded extent and truncated, with a
    /// floor of one cell per axis.
    pub fn from_bounds(
        bounds: &DomainBounds,
        cell_size: f64,
        unit: LengthUnit,
    ) -> Result<Self, GridError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::CellSize(cell_size));
        }
        let padding = DOMAIN_PADDING_MM / unit.conversion_factor();
        let extent = bounds.extent();
        let cells = extent.map(|len| ((len / cell_size) as usize).max(1));
        Ok(Self {
            padded: bounds.expand(padding),
            cells,
            cell_size,
        })
    }

    /// Hex corners in block-mesh order: the bottom face counter-clockwise
    /// from the minimum corner, then the top face in the same order.
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let b = &self.padded;
        [
            Point3::new(b.x_min, b.y_min, b.z_min),
            Point3::new(b.x_max, b.y_min, b.z_min),
            Point3::new(b.x_max, b.y_max, b.z_min),
            Point3::new(b.x_min, b.y_max, b.z_min),
            Point3::new(b.x_min, b.y_min, b.z_max),
            Point3::new(b.x_max, b.y_min, b.z_max),
            Point3::new(b.x_max, b.y_max, b.z_max),
            Point3::new(b.x_min, b.y_max, b.z_max),
        ]
    }
}
