//! # Wall Construction
//!
//! Turns one wall of a perimeter into a [`ConstructionModel`]: every physical
//! piece, dimension line, highlighted region and problem found on the way.
//!
//! Each construction step returns a lazy [`ResultStream`] of
//! [`ConstructionResult`] items. The orchestrator chains the streams and the
//! model folds them once.
//!
//! ## Coordinate Frame
//!
//! All geometry is in the wall-local frame, millimetres:
//!
//! - X along the wall, 0 at the start of the outside line (negative inside a
//!   start corner extension)
//! - Y across the wall, 0 at the inside face
//! - Z up, 0 at the top of the storey's floor construction
//!
//! ## Construction Methods
//!
//! - [`infill`] - posts and straw between them
//! - [`modules`] - prefabricated frames, strawhenge or tiled
//! - [`non_strawbale`] - one solid body
//!
//! ## Building Blocks
//!
//! - [`segmentation`] - where posts go
//! - [`straw`] - bale layout of one void
//! - [`posts`] - full and double posts
//! - [`openings`] - rough openings, headers, sills
//! - [`ring_beams`] - base and top plates
//! - [`layers`] - finish layers
//! - [`corners`] - corner extensions

pub mod corners;
pub mod element;
pub mod infill;
pub mod layers;
pub mod model;
pub mod modules;
pub mod non_strawbale;
pub mod openings;
pub mod posts;
pub mod results;
pub mod ring_beams;
pub mod segmentation;
pub mod straw;
pub mod tags;
pub mod wall;

pub use corners::{calculate_corner_extensions, WallCornerInfo};
pub use element::{ConstructionElement, ConstructionGroup, ElementId, GroupOrElement};
pub use infill::InfillMethod;
pub use model::ConstructionModel;
pub use results::{
    AreaKind, ConstructionIssue, ConstructionResult, HighlightedArea, MeasurementKind, RawMeasurement,
    ResultStream, Severity,
};
pub use tags::{Tag, TagCategory};
pub use wall::{construct_perimeter, construct_wall, StoreyContext};
