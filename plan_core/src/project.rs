//! # Project Data Structures
//!
//! The input records the engine reads: storeys, perimeters, walls, corners and
//! openings. The model layer that edits these lives elsewhere; the engine only
//! ever sees a read-only snapshot, so one wall's construction cannot affect
//! another's.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (schema version, name, timestamps)
//! ├── storeys: Vec<Storey> (level, height, floor assembly)
//! └── perimeters: Vec<Perimeter>
//!     ├── walls: Vec<PerimeterWall> (outside line, thickness, openings)
//!     └── corners: Vec<PerimeterCorner> (outside point, owning wall)
//! ```
//!
//! Corner `i` sits at the start of wall `i`; the end of wall `i` is corner
//! `i + 1` (wrapping around).
//!
//! ## Example
//!
//! ```rust
//! use plan_core::project::{Project, Storey};
//!
//! let mut project = Project::new("Farmhouse");
//! project.storeys.push(Storey::new("ground", "Ground floor", 0, 2800.0, "floor-standard"));
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("Farmhouse"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::ids::{
    CornerId, FloorAssemblyId, OpeningAssemblyId, OpeningId, PerimeterId, StoreyId, WallAssemblyId, WallId,
};
use crate::units::Length;

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,
    #[serde(default)]
    pub storeys: Vec<Storey>,
    #[serde(default)]
    pub perimeters: Vec<Perimeter>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                created: now,
                modified: now,
            },
            storeys: Vec::new(),
            perimeters: Vec::new(),
        }
    }

    pub fn storey(&self, id: &StoreyId) -> Option<&Storey> {
        self.storeys.iter().find(|s| &s.id == id)
    }

    pub fn perimeter(&self, id: &PerimeterId) -> Option<&Perimeter> {
        self.perimeters.iter().find(|p| &p.id == id)
    }

    /// The storey directly above `storey`: the lowest level above it.
    pub fn next_storey(&self, storey: &Storey) -> Option<&Storey> {
        self.storeys
            .iter()
            .filter(|s| s.level > storey.level)
            .min_by_key(|s| s.level)
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// One building level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storey {
    pub id: StoreyId,
    pub name: String,
    /// Ordering key, ground floor is 0
    pub level: i32,
    /// Floor-to-floor height: top of this floor's construction to top of the
    /// next floor's construction
    pub height: Length,
    pub floor_assembly_id: FloorAssemblyId,
}

impl Storey {
    pub fn new(id: &str, name: &str, level: i32, height: Length, floor_assembly_id: &str) -> Self {
        Storey {
            id: StoreyId::from(id),
            name: name.to_string(),
            level,
            height,
            floor_assembly_id: FloorAssemblyId::from(floor_assembly_id),
        }
    }
}

/// A closed loop of walls on one storey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perimeter {
    pub id: PerimeterId,
    pub storey_id: StoreyId,
    pub walls: Vec<PerimeterWall>,
    pub corners: Vec<PerimeterCorner>,
}

impl Perimeter {
    pub fn wall_index(&self, id: &WallId) -> Option<usize> {
        self.walls.iter().position(|w| &w.id == id)
    }

    /// Corner at the start of wall `index`.
    pub fn start_corner(&self, index: usize) -> Option<&PerimeterCorner> {
        self.corners.get(index)
    }

    /// Corner at the end of wall `index`.
    pub fn end_corner(&self, index: usize) -> Option<&PerimeterCorner> {
        if self.corners.is_empty() {
            return None;
        }
        self.corners.get((index + 1) % self.corners.len())
    }
}

/// Straight 2D segment in plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Vec2,
    pub end: Vec2,
}

impl LineSegment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        LineSegment { start, end }
    }

    pub fn length(&self) -> Length {
        (self.end - self.start).norm()
    }
}

/// One wall of a perimeter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerimeterWall {
    pub id: WallId,
    /// Total thickness including finish layers
    pub thickness: Length,
    pub wall_assembly_id: WallAssemblyId,
    /// Outer face of the wall between its two corners; defines the wall length
    pub outside_line: LineSegment,
    #[serde(default)]
    pub openings: Vec<Opening>,
}

impl PerimeterWall {
    pub fn length(&self) -> Length {
        self.outside_line.length()
    }
}

/// Which wall builds the construction of a corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerimeterCorner {
    pub id: CornerId,
    /// Intersection of the two adjoining walls' outside lines
    pub outside_point: Vec2,
    /// Wall that owns the corner's construction
    pub constructed_by: WallId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningType {
    Door,
    Window,
    Passage,
}

/// A door, window or passage in a wall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opening {
    pub id: OpeningId,
    #[serde(rename = "type")]
    pub opening_type: OpeningType,
    /// Distance from the wall start to the opening's left edge
    pub offset_from_start: Length,
    pub width: Length,
    pub height: Length,
    /// Height of the finished sill above the finished floor (windows)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sill_height: Option<Length>,
    /// Opening assembly override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly_id: Option<OpeningAssemblyId>,
}

impl Opening {
    pub fn door(id: &str, offset_from_start: Length, width: Length, height: Length) -> Self {
        Opening {
            id: OpeningId::from(id),
            opening_type: OpeningType::Door,
            offset_from_start,
            width,
            height,
            sill_height: None,
            assembly_id: None,
        }
    }

    pub fn window(id: &str, offset_from_start: Length, width: Length, height: Length, sill_height: Length) -> Self {
        Opening {
            id: OpeningId::from(id),
            opening_type: OpeningType::Window,
            offset_from_start,
            width,
            height,
            sill_height: Some(sill_height),
            assembly_id: None,
        }
    }

    /// Sill height that produces a sill element, if any.
    pub fn effective_sill(&self) -> Option<Length> {
        match (self.opening_type, self.sill_height) {
            (OpeningType::Window, Some(h)) if h > 0.0 => Some(h),
            _ => None,
        }
    }

    pub fn end(&self) -> Length {
        self.offset_from_start + self.width
    }
}
