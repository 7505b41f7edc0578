//! # Openings
//!
//! Placement and framing of doors, windows and passages.
//!
//! ## Placement
//!
//! Openings are processed in offset order. Each one is validated, padded by
//! its assembly's clearance and turned into a rough opening: the span the
//! segmentation excludes and the frame builder frames.
//!
//! | Condition | Result |
//! |-----------|--------|
//! | width or height not positive | error, skipped |
//! | reaches outside the wall | error, clipped and built |
//! | finished rectangle overlaps an earlier one | error, skipped |
//! | padded span touches an earlier one, same sill, header and assembly | merged into one rough opening |
//! | padded span overlaps an earlier one otherwise | error, skipped |
//!
//! Elevations are relative to the finished floor. Openings without a sill
//! (doors, passages, windows without a sill height) reach down to the bottom
//! of the wall body.
//!
//! ## Framing
//!
//! A simple assembly puts a header above the rough opening and, when there is
//! a sill, a sill below it. The voids above the header and below the sill go
//! back to the wall's [`InfillMethod`]. A header or sill that leaves the wall
//! body is an error and is skipped; the rest of the frame is still built.

use serde::{Deserialize, Serialize};

use super::element::ConstructionElement;
use super::infill::InfillMethod;
use super::results::{AreaKind, ConstructionResult, MeasurementKind, ResultStream, Severity};
use super::segmentation::available_spans;
use super::tags::Tag;
use crate::config::{OpeningAssemblyConfig, OpeningAssemblyType};
use crate::geometry::{Axis, Bounds3D, SpatialArea, Vec3};
use crate::ids::OpeningId;
use crate::project::Opening;
use crate::units::{format_length, Length, LENGTH_EPSILON};

const OPENING_SPACING_OFFSET: f64 = 120.0;
const OPENING_DIMENSION_OFFSET: f64 = 40.0;

/// Finished (clear) opening on the wall face, X along the wall and Z up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningRect {
    pub x0: Length,
    pub x1: Length,
    pub z0: Length,
    pub z1: Length,
}

impl OpeningRect {
    fn overlaps(&self, other: &OpeningRect) -> bool {
        self.x0 < other.x1 - LENGTH_EPSILON
            && other.x0 < self.x1 - LENGTH_EPSILON
            && self.z0 < other.z1 - LENGTH_EPSILON
            && other.z0 < self.z1 - LENGTH_EPSILON
    }
}

/// Wall levels the placement needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningContext {
    pub wall_length: Length,
    pub finished_floor_z: Length,
    /// Bottom of the wall body (top of the base plate)
    pub body_bottom: Length,
    /// Core extent across the wall, used for issue bounds
    pub core_y: (Length, Length),
}

/// One rough opening, possibly merged from several openings.
#[derive(Debug, Clone)]
pub struct PlacedOpening<'c> {
    pub ids: Vec<OpeningId>,
    pub assembly: &'c OpeningAssemblyConfig,
    /// Padded span along the wall
    pub start: Length,
    pub end: Length,
    /// Top of the sill, bottom of the rough opening
    pub sill_z: Length,
    /// Bottom of the header, top of the rough opening
    pub header_z: Length,
    pub has_sill: bool,
    pub finished_floor_z: Length,
    pub finished: Vec<OpeningRect>,
}

impl PlacedOpening<'_> {
    pub fn width(&self) -> Length {
        self.end - self.start
    }

    fn label(&self) -> String {
        self.ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join("+")
    }

    fn same_elevation(&self, other: &PlacedOpening<'_>) -> bool {
        (self.sill_z - other.sill_z).abs() <= LENGTH_EPSILON
            && (self.header_z - other.header_z).abs() <= LENGTH_EPSILON
            && self.has_sill == other.has_sill
            && self.assembly.id == other.assembly.id
    }
}

fn rect_bounds(rect: &OpeningRect, context: &OpeningContext) -> Bounds3D {
    Bounds3D::new(
        Vec3::new(rect.x0, context.core_y.0, rect.z0),
        Vec3::new(rect.x1, context.core_y.1, rect.z1),
    )
}

/// Validate, pad and merge the openings of one wall.
///
/// Returns the rough openings in wall order and the issues found on the way.
pub fn place_openings<'c>(
    requests: &[(&Opening, &'c OpeningAssemblyConfig)],
    context: &OpeningContext,
) -> (Vec<PlacedOpening<'c>>, Vec<ConstructionResult>) {
    let mut sorted: Vec<_> = requests.to_vec();
    sorted.sort_by(|a, b| a.0.offset_from_start.total_cmp(&b.0.offset_from_start));

    let mut placed: Vec<PlacedOpening<'c>> = Vec::new();
    let mut issues = Vec::new();

    for (opening, assembly) in sorted {
        if opening.width <= LENGTH_EPSILON || opening.height <= LENGTH_EPSILON {
            issues.push(ConstructionResult::error(
                format!("Opening {} has no size", opening.id),
                vec![],
            ));
            continue;
        }

        let sill = opening.effective_sill();
        let z0 = context.finished_floor_z + sill.unwrap_or(0.0);
        let z1 = z0 + opening.height;
        let requested = OpeningRect {
            x0: opening.offset_from_start,
            x1: opening.end(),
            z0,
            z1,
        };

        let x0 = requested.x0.max(0.0);
        let x1 = requested.x1.min(context.wall_length);
        if requested.x0 < -LENGTH_EPSILON || requested.x1 > context.wall_length + LENGTH_EPSILON {
            issues.push(ConstructionResult::region_issue(
                Severity::Error,
                format!("Opening {} exceeds wall length", opening.id),
                rect_bounds(&requested, context),
            ));
            if x1 - x0 <= LENGTH_EPSILON {
                continue;
            }
        }
        let rect = OpeningRect { x0, x1, ..requested };

        if let Some(other) = placed.iter().find(|p| p.finished.iter().any(|f| f.overlaps(&rect))) {
            issues.push(ConstructionResult::region_issue(
                Severity::Error,
                format!("Opening {} overlaps opening {}", opening.id, other.label()),
                rect_bounds(&rect, context),
            ));
            continue;
        }

        let padding = assembly.padding;
        let candidate = PlacedOpening {
            ids: vec![opening.id.clone()],
            assembly,
            start: x0 - padding,
            end: x1 + padding,
            sill_z: match sill {
                Some(_) => z0 - padding,
                None => context.body_bottom,
            },
            header_z: z1 + padding,
            has_sill: sill.is_some(),
            finished_floor_z: context.finished_floor_z,
            finished: vec![rect],
        };

        match placed.last_mut() {
            Some(last) if candidate.start <= last.end + LENGTH_EPSILON => {
                if last.same_elevation(&candidate) {
                    last.end = last.end.max(candidate.end);
                    last.ids.extend(candidate.ids);
                    last.finished.extend(candidate.finished);
                } else {
                    issues.push(ConstructionResult::region_issue(
                        Severity::Error,
                        format!(
                            "Opening {} is too close to opening {} to frame them separately",
                            opening.id,
                            last.label()
                        ),
                        rect_bounds(&rect, context),
                    ));
                }
            }
            _ => placed.push(candidate),
        }
    }

    (placed, issues)
}

/// Frame one rough opening inside `body` and hand the voids above and below
/// it to `infill`.
pub fn construct_opening<'s>(
    opening: &'s PlacedOpening<'_>,
    body: &SpatialArea,
    infill: &'s dyn InfillMethod,
) -> ResultStream<'s> {
    let column = body.between(Axis::X, opening.start, opening.end);
    let top = column.end(Axis::Z);
    let bottom = column.start(Axis::Z);

    let mut results = vec![ConstructionResult::area(
        AreaKind::RoughOpening,
        opening.label(),
        column.between(Axis::Z, opening.sill_z, opening.header_z).bounds(),
    )];
    results.extend(opening_dimensions(opening, column.start(Axis::Y)));

    let (above, below) = match &opening.assembly.kind {
        OpeningAssemblyType::Simple {
            header_thickness,
            header_material,
            sill_thickness,
            sill_material,
        } => {
            let header_top = opening.header_z + header_thickness;
            let above = if header_top > top + LENGTH_EPSILON {
                results.push(ConstructionResult::region_issue(
                    Severity::Error,
                    format!("Header does not fit above opening {}", opening.label()),
                    z_band(&column, opening.header_z, header_top),
                ));
                column.between(Axis::Z, opening.header_z, top)
            } else {
                let header = column.between(Axis::Z, opening.header_z, header_top);
                results.push(ConstructionResult::element(ConstructionElement::cuboid(
                    header_material,
                    &header,
                    vec![Tag::Header],
                )));
                column.between(Axis::Z, header_top, top)
            };

            let below = if !opening.has_sill {
                column.between(Axis::Z, bottom, opening.sill_z)
            } else {
                let sill_bottom = opening.sill_z - sill_thickness;
                if sill_bottom < bottom - LENGTH_EPSILON {
                    results.push(ConstructionResult::region_issue(
                        Severity::Error,
                        format!("Sill does not fit below opening {}", opening.label()),
                        z_band(&column, sill_bottom, opening.sill_z),
                    ));
                    column.between(Axis::Z, bottom, opening.sill_z)
                } else {
                    let sill = column.between(Axis::Z, sill_bottom, opening.sill_z);
                    results.push(ConstructionResult::element(ConstructionElement::cuboid(
                        sill_material,
                        &sill,
                        vec![Tag::Sill],
                    )));
                    column.between(Axis::Z, bottom, sill_bottom)
                }
            };
            (above, below)
        }
        OpeningAssemblyType::Empty => (
            column.between(Axis::Z, opening.header_z, top),
            column.between(Axis::Z, bottom, opening.sill_z),
        ),
    };

    ResultStream::from_results(results)
        .chain(infill.infill(&above))
        .chain(infill.infill(&below))
}

/// Bounds of the column between two elevations, not clamped to the body, so
/// a member that sticks out is highlighted where it would be.
fn z_band(column: &SpatialArea, z0: Length, z1: Length) -> Bounds3D {
    Bounds3D::new(
        Vec3::new(column.start(Axis::X), column.start(Axis::Y), z0),
        Vec3::new(column.end(Axis::X), column.end(Axis::Y), z1),
    )
}

fn opening_dimensions(opening: &PlacedOpening<'_>, y: Length) -> Vec<ConstructionResult> {
    let mut results = Vec::new();
    for rect in &opening.finished {
        results.push(ConstructionResult::measurement(
            MeasurementKind::OpeningWidth,
            Vec3::new(rect.x0, y, rect.z1),
            Vec3::new(rect.x1, y, rect.z1),
            format_length(rect.x1 - rect.x0),
            OPENING_DIMENSION_OFFSET,
            vec![Tag::OpeningDimension],
        ));
        results.push(ConstructionResult::measurement(
            MeasurementKind::OpeningHeight,
            Vec3::new(rect.x0, y, rect.z0),
            Vec3::new(rect.x0, y, rect.z1),
            format_length(rect.z1 - rect.z0),
            OPENING_DIMENSION_OFFSET,
            vec![Tag::OpeningDimension],
        ));
        if opening.has_sill {
            results.push(ConstructionResult::measurement(
                MeasurementKind::SillHeight,
                Vec3::new(rect.x0, y, opening.finished_floor_z),
                Vec3::new(rect.x0, y, rect.z0),
                format_length(rect.z0 - opening.finished_floor_z),
                OPENING_DIMENSION_OFFSET,
                vec![Tag::OpeningDimension],
            ));
        }
    }
    results
}

/// Spacing from the wall edges to the openings and between openings.
pub fn opening_spacing_measurements(body: &SpatialArea, openings: &[PlacedOpening<'_>]) -> Vec<ConstructionResult> {
    if openings.is_empty() {
        return Vec::new();
    }
    let exclusions: Vec<_> = openings.iter().map(|o| (o.start, o.end)).collect();
    let y = body.start(Axis::Y);
    let z = body.end(Axis::Z);
    available_spans(body.start(Axis::X), body.end(Axis::X), &exclusions)
        .into_iter()
        .map(|(a, b)| {
            ConstructionResult::measurement(
                MeasurementKind::OpeningSpacing,
                Vec3::new(a, y, z),
                Vec3::new(b, y, z),
                format_length(b - a),
                OPENING_SPACING_OFFSET,
                vec![Tag::OpeningSpacing],
            )
        })
        .collect()
}
