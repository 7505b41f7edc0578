//! # Corner Extensions
//!
//! At each corner exactly one of the two adjoining walls builds the corner
//! construction. The owning wall's construction runs past its own outside
//! line up to the corner's outside point; the other wall stops flush.

use serde::{Deserialize, Serialize};

use super::results::{AreaKind, ConstructionResult};
use crate::errors::{PlanError, PlanResult};
use crate::geometry::{Bounds3D, Vec3};
use crate::project::Perimeter;
use crate::units::{Length, LENGTH_EPSILON};

/// How far the construction of one wall reaches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallCornerInfo {
    /// Wall length plus both extensions
    pub construction_length: Length,
    /// Extension before the wall start (construction starts at `-start_extension`)
    pub start_extension: Length,
    /// Extension past the wall end
    pub end_extension: Length,
}

impl WallCornerInfo {
    /// Construction window along the wall.
    pub fn window(&self) -> (Length, Length) {
        (-self.start_extension, self.construction_length - self.start_extension)
    }
}

/// Extensions of wall `wall_index` of `perimeter`.
///
/// # Errors
///
/// * `InvalidInput` - the wall index or one of its corners is missing
pub fn calculate_corner_extensions(perimeter: &Perimeter, wall_index: usize) -> PlanResult<WallCornerInfo> {
    let wall = perimeter.walls.get(wall_index).ok_or_else(|| {
        PlanError::invalid_input("wall_index", wall_index.to_string(), "Perimeter has no wall at this index")
    })?;
    let missing_corner =
        || PlanError::invalid_input("corners", perimeter.id.as_str(), "Perimeter has fewer corners than walls");
    let start_corner = perimeter.start_corner(wall_index).ok_or_else(missing_corner)?;
    let end_corner = perimeter.end_corner(wall_index).ok_or_else(missing_corner)?;

    let start_extension = if start_corner.constructed_by == wall.id {
        (start_corner.outside_point - wall.outside_line.start).norm()
    } else {
        0.0
    };
    let end_extension = if end_corner.constructed_by == wall.id {
        (end_corner.outside_point - wall.outside_line.end).norm()
    } else {
        0.0
    };

    Ok(WallCornerInfo {
        construction_length: wall.length() + start_extension + end_extension,
        start_extension,
        end_extension,
    })
}

/// Highlight the corner parts of the construction window.
pub fn corner_areas(info: &WallCornerInfo, wall_length: Length, y: (Length, Length), height: Length) -> Vec<ConstructionResult> {
    let mut areas = Vec::new();
    if info.start_extension > LENGTH_EPSILON {
        areas.push(ConstructionResult::area(
            AreaKind::CornerExtension,
            "Start corner",
            Bounds3D::new(Vec3::new(-info.start_extension, y.0, 0.0), Vec3::new(0.0, y.1, height)),
        ));
    }
    if info.end_extension > LENGTH_EPSILON {
        areas.push(ConstructionResult::area(
            AreaKind::CornerExtension,
            "End corner",
            Bounds3D::new(
                Vec3::new(wall_length, y.0, 0.0),
                Vec3::new(wall_length + info.end_extension, y.1, height),
            ),
        ));
    }
    areas
}
