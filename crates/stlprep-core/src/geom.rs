use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box around a vertex cloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DomainBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl DomainBounds {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            x_min: min.x,
            x_max: max.x,
            y_min: min.y,
            y_max: max.y,
            z_min: min.z,
            z_max: max.z,
        }
    }

    pub fn empty() -> Self {
        Self::new(
            Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max || self.z_min > self.z_max
    }

    pub fn include_point(&mut self, p: &Point3<f64>) {
        self.x_min = self.x_min.min(p.x);
        self.y_min = self.y_min.min(p.y);
        self.z_min = self.z_min.min(p.z);
        self.x_max = self.x_max.max(p.x);
        self.y_max = self.y_max.max(p.y);
        self.z_max = self.z_max.max(p.z);
    }

    /// `None` for an empty cloud; an empty box is never handed out.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut bounds = Self::empty();
        for p in points {
            bounds.include_point(p);
        }
        if bounds.is_empty() {
            None
        } else {
            Some(bounds)
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
            z_min: self.z_min.min(other.z_min),
            z_max: self.z_max.max(other.z_max),
        }
    }

    pub fn min(&self) -> Point3<f64> {
        Point3::new(self.x_min, self.y_min, self.z_min)
    }

    pub fn max(&self) -> Point3<f64> {
        Point3::new(self.x_max, self.y_max, self.z_max)
    }

    /// Edge lengths along x, y and z.
    pub fn extent(&self) -> [f64; 3] {
        [
            (self.x_max - self.x_min).max(0.0),
            (self.y_max - self.y_min).max(0.0),
            (self.z_max - self.z_min).max(0.0),
        ]
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min(), &self.max())
    }

    pub fn expand(&self, delta: f64) -> Self {
        Self {
            x_min: self.x_min - delta,
            x_max: self.x_max + delta,
            y_min: self.y_min - delta,
            y_max: self.y_max + delta,
            z_min: self.z_min - delta,
            z_max: self.z_max + delta,
        }
    }
}
