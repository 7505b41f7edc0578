//! # Geometry Primitives
//!
//! Vectors, transforms and bounding boxes shared by every construction step.
//!
//! ## Wall-local frame
//!
//! All construction happens in the wall's own coordinate frame:
//!
//! - **X** runs along the wall, `0` at the start of the wall's outside line.
//!   Corner extensions push the construction window to negative X at the start
//!   and past the wall length at the end.
//! - **Y** runs across the wall, `0` at the inside face of the finished wall.
//! - **Z** runs up, `0` at the top of the storey's floor construction.
//!
//! Units are millimetres (see [`crate::units`]).

pub mod area;
pub mod shape;

pub use area::SpatialArea;
pub use shape::{ExtrusionPlane, Shape};

use nalgebra::{Isometry3, Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::units::Length;

/// 2D vector (plan coordinates or wall-face coordinates)
pub type Vec2 = Vector2<f64>;

/// 3D vector in the wall-local frame
pub type Vec3 = Vector3<f64>;

/// Rigid transform applied to elements and groups
pub type Transform = Isometry3<f64>;

/// Pure translation transform.
pub fn translation(offset: Vec3) -> Transform {
    Isometry3::translation(offset.x, offset.y, offset.z)
}

/// One of the three wall-local axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index into a `Vec3`
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3D {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds3D {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Bounds3D { min, max }
    }

    /// Box spanned by a position and a non-negative size.
    pub fn from_position_size(position: Vec3, size: Vec3) -> Self {
        Bounds3D {
            min: position,
            max: position + size,
        }
    }

    /// Smallest box containing every point, `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds3D::new(first, first);
        for p in iter {
            bounds.min = bounds.min.inf(&p);
            bounds.max = bounds.max.sup(&p);
        }
        Some(bounds)
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &Bounds3D) -> Bounds3D {
        Bounds3D {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Union over an iterator of optional boxes.
    pub fn merge_all<I: IntoIterator<Item = Bounds3D>>(boxes: I) -> Option<Bounds3D> {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Axis-aligned box around this box after applying `transform`.
    pub fn transformed(&self, transform: &Transform) -> Bounds3D {
        let points = self
            .corners()
            .into_iter()
            .map(|c| transform.transform_point(&Point3::from(c)).coords);
        // corners() is never empty
        Bounds3D::from_points(points).unwrap_or(*self)
    }

    pub fn contains_point(&self, p: &Vec3) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    /// True when `other` lies inside this box, allowing `tolerance` slack.
    pub fn contains(&self, other: &Bounds3D, tolerance: Length) -> bool {
        (0..3).all(|i| {
            other.min[i] >= self.min[i] - tolerance && other.max[i] <= self.max[i] + tolerance
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_union() {
        let a = Bounds3D::from_position_size(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let b = Bounds3D::from_position_size(Vec3::new(2.0, -1.0, 0.5), Vec3::new(1.0, 1.0, 1.0));
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(u.max, Vec3::new(3.0, 1.0, 1.5));
    }

    #[test]
    fn test_bounds_from_points_empty() {
        assert!(Bounds3D::from_points(Vec::<Vec3>::new()).is_none());
    }

    #[test]
    fn test_bounds_transformed_translation() {
        let b = Bounds3D::from_position_size(Vec3::zeros(), Vec3::new(920.0, 360.0, 2000.0));
        let moved = b.transformed(&translation(Vec3::new(100.0, 0.0, 120.0)));
        assert_relative_eq!(moved.min.x, 100.0);
        assert_relative_eq!(moved.max.x, 1020.0);
        assert_relative_eq!(moved.max.z, 2120.0);
    }

    #[test]
    fn test_bounds_contains() {
        let outer = Bounds3D::from_position_size(Vec3::zeros(), Vec3::new(10.0, 10.0, 10.0));
        let inner = Bounds3D::from_position_size(Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 2.0, 2.0));
        assert!(outer.contains(&inner, 0.0));
        assert!(!inner.contains(&outer, 0.0));
        assert!(outer.contains_point(&Vec3::new(10.0, 0.0, 5.0)));
    }
}
