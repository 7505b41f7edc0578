//! # Spatial Area
//!
//! An axis-aligned box in the wall-local frame, used as the unit of work by
//! every construction algorithm: packing fills one, segmentation cuts one
//! along X, opening frames slice one along Z. Areas carry no material or
//! meaning; they are created per call and thrown away.
//!
//! Operations never mutate, they return new areas. Splitting outside the
//! extent is a programming error and panics; adjustments clamp.

use serde::{Deserialize, Serialize};

use super::{Axis, Bounds3D, Vec3};
use crate::units::{Length, LENGTH_EPSILON};

/// Oriented box: `position` is the minimum corner, `size` is non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialArea {
    pub position: Vec3,
    pub size: Vec3,
}

impl SpatialArea {
    /// Create an area. Panics when a size component is negative.
    pub fn new(position: Vec3, size: Vec3) -> Self {
        assert!(
            size.iter().all(|c| *c >= -LENGTH_EPSILON),
            "SpatialArea size must be non-negative, got {:?}",
            size
        );
        SpatialArea {
            position,
            size: size.map(|c| c.max(0.0)),
        }
    }

    pub fn start(&self, axis: Axis) -> Length {
        self.position[axis.index()]
    }

    pub fn end(&self, axis: Axis) -> Length {
        self.position[axis.index()] + self.size[axis.index()]
    }

    pub fn extent(&self, axis: Axis) -> Length {
        self.size[axis.index()]
    }

    /// True when any dimension collapsed to (near) zero.
    pub fn is_empty(&self) -> bool {
        self.size.iter().any(|c| *c <= LENGTH_EPSILON)
    }

    pub fn bounds(&self) -> Bounds3D {
        Bounds3D::from_position_size(self.position, self.size)
    }

    /// Cut the area in two at `offset` (relative to its start) along `axis`.
    ///
    /// Panics when `offset` lies outside `[0, extent]`.
    pub fn split_at(&self, axis: Axis, offset: Length) -> (SpatialArea, SpatialArea) {
        let i = axis.index();
        assert!(
            offset >= -LENGTH_EPSILON && offset <= self.size[i] + LENGTH_EPSILON,
            "split offset {} outside area extent {} on {:?}",
            offset,
            self.size[i],
            axis
        );
        let offset = offset.clamp(0.0, self.size[i]);

        let mut left_size = self.size;
        left_size[i] = offset;

        let mut right_position = self.position;
        right_position[i] += offset;
        let mut right_size = self.size;
        right_size[i] = self.size[i] - offset;

        (
            SpatialArea::new(self.position, left_size),
            SpatialArea::new(right_position, right_size),
        )
    }

    pub fn split_in_x(&self, offset: Length) -> (SpatialArea, SpatialArea) {
        self.split_at(Axis::X, offset)
    }

    /// Narrow the area along `axis`: start `start` into the area and run for
    /// `extent` (or to the end when `None`). Both are clamped to the area.
    pub fn with_adjustment(&self, axis: Axis, start: Length, extent: Option<Length>) -> SpatialArea {
        let i = axis.index();
        let start = start.clamp(0.0, self.size[i]);
        let available = self.size[i] - start;
        let extent = extent.unwrap_or(available).clamp(0.0, available);

        let mut position = self.position;
        position[i] += start;
        let mut size = self.size;
        size[i] = extent;
        SpatialArea::new(position, size)
    }

    pub fn with_x_adjustment(&self, start: Length, extent: Option<Length>) -> SpatialArea {
        self.with_adjustment(Axis::X, start, extent)
    }

    pub fn with_z_adjustment(&self, start: Length, extent: Option<Length>) -> SpatialArea {
        self.with_adjustment(Axis::Z, start, extent)
    }

    /// Sub-area between two absolute coordinates on `axis`. Both ends are
    /// clamped to the area, so the result never reaches outside it.
    pub fn between(&self, axis: Axis, from: Length, to: Length) -> SpatialArea {
        let from = from.max(self.start(axis));
        let to = to.min(self.end(axis));
        self.with_adjustment(axis, from - self.start(axis), Some((to - from).max(0.0)))
    }
}
