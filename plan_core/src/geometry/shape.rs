//! Element shapes in their local frame. A shape is placed by the element's
//! transform; its local bounds start at the origin for cuboids and at the
//! polygon's minimum for extrusions.

use serde::{Deserialize, Serialize};

use super::{Bounds3D, Vec2, Vec3};
use crate::units::Length;

/// Plane an extruded polygon is drawn in. The extrusion runs along the
/// remaining axis in the positive direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrusionPlane {
    /// Wall face: polygon `u` is X, `v` is Z, extruded along +Y
    Xz,
    /// Plan: polygon `u` is X, `v` is Y, extruded along +Z
    Xy,
}

impl ExtrusionPlane {
    /// Lift a 2D polygon point at extrusion depth `w` into 3D.
    pub fn lift(self, p: &Vec2, w: Length) -> Vec3 {
        match self {
            ExtrusionPlane::Xz => Vec3::new(p.x, w, p.y),
            ExtrusionPlane::Xy => Vec3::new(p.x, p.y, w),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Box from the origin to `size`
    Cuboid { size: Vec3 },
    /// Polygon with optional holes, extruded by `thickness`
    ExtrudedPolygon {
        outline: Vec<Vec2>,
        #[serde(default)]
        holes: Vec<Vec<Vec2>>,
        plane: ExtrusionPlane,
        thickness: Length,
    },
}

impl Shape {
    pub fn cuboid(size: Vec3) -> Self {
        Shape::Cuboid { size }
    }

    /// Axis-aligned rectangle on a plane, as a closed outline (counter-clockwise).
    pub fn rectangle(u0: Length, v0: Length, u1: Length, v1: Length) -> Vec<Vec2> {
        vec![
            Vec2::new(u0, v0),
            Vec2::new(u1, v0),
            Vec2::new(u1, v1),
            Vec2::new(u0, v1),
        ]
    }

    /// Bounds in the shape's local frame.
    pub fn local_bounds(&self) -> Bounds3D {
        match self {
            Shape::Cuboid { size } => Bounds3D::from_position_size(Vec3::zeros(), *size),
            Shape::ExtrudedPolygon {
                outline,
                plane,
                thickness,
                ..
            } => {
                let points = outline
                    .iter()
                    .flat_map(|p| [plane.lift(p, 0.0), plane.lift(p, *thickness)]);
                Bounds3D::from_points(points)
                    .unwrap_or_else(|| Bounds3D::new(Vec3::zeros(), Vec3::zeros()))
            }
        }
    }

    /// Net area of an extruded polygon's face (outline minus holes), or the
    /// X×Z face of a cuboid.
    pub fn face_area(&self) -> f64 {
        match self {
            Shape::Cuboid { size } => size.x * size.z,
            Shape::ExtrudedPolygon { outline, holes, .. } => {
                polygon_area(outline) - holes.iter().map(|h| polygon_area(h)).sum::<f64>()
            }
        }
    }
}

/// Unsigned shoelace area.
fn polygon_area(points: &[Vec2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        twice += a.x * b.y - b.x * a.y;
    }
    (twice / 2.0).abs()
}
