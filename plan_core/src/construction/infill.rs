//! # Infill
//!
//! Post-and-straw construction. [`InfillMethod`] is the seam the opening
//! frame builder and the module layouts hand leftover areas to, so the space
//! above a header or beside the last module is built exactly like the rest
//! of the wall.

use super::openings::{construct_opening, opening_spacing_measurements, PlacedOpening};
use super::posts::construct_post;
use super::results::{ConstructionIssue, ConstructionResult, MeasurementKind, ResultStream};
use super::segmentation::{segment, SegmentationParams, Span, SpanKind};
use super::straw::construct_straw;
use super::tags::Tag;
use crate::config::InfillConfig;
use crate::geometry::{Axis, SpatialArea, Vec3};
use crate::ids::MaterialId;
use crate::materials::StrawbaleProfile;
use crate::units::format_length;

/// Dimension line distance for post spacing
const POST_SPACING_OFFSET: f64 = 60.0;

/// Fills an area that contains no openings.
pub trait InfillMethod {
    fn infill<'s>(&'s self, area: &SpatialArea) -> ResultStream<'s>;
}

/// Infill configuration with its straw material resolved.
#[derive(Debug, Clone)]
pub struct InfillConstruction<'c> {
    pub config: &'c InfillConfig,
    pub straw_material: MaterialId,
    pub profile: StrawbaleProfile,
}

impl<'c> InfillConstruction<'c> {
    pub fn new(config: &'c InfillConfig, straw_material: MaterialId, profile: StrawbaleProfile) -> Self {
        InfillConstruction {
            config,
            straw_material,
            profile,
        }
    }

    pub fn params(&self) -> SegmentationParams {
        SegmentationParams {
            max_post_spacing: self.config.max_post_spacing,
            min_straw_space: self.config.min_straw_space,
            post_width: self.config.posts.width(),
        }
    }

    /// Build the straw and post spans of a partition; opening spans are left
    /// to the caller.
    pub fn construct_spans(&self, area: &SpatialArea, spans: &[Span]) -> Vec<ConstructionResult> {
        let mut results = Vec::new();
        for span in spans {
            let sub = area.between(Axis::X, span.start, span.end);
            match span.kind {
                SpanKind::Straw => {
                    let straw: Vec<ConstructionResult> =
                        construct_straw(&sub, &self.profile, &self.straw_material).collect();
                    if let Some(issue) = &span.issue {
                        let ids = straw.iter().filter_map(ConstructionResult::element_id).collect();
                        results.push(ConstructionResult::issue(
                            issue.severity,
                            ConstructionIssue::new(issue.description.clone(), ids).with_bounds(sub.bounds()),
                        ));
                    }
                    results.extend(straw);
                    results.push(post_spacing(&sub));
                }
                SpanKind::Post => results.extend(construct_post(&sub, &self.config.posts)),
                SpanKind::Opening(_) => {}
            }
        }
        results
    }

    fn fill(&self, area: &SpatialArea) -> Vec<ConstructionResult> {
        if area.is_empty() {
            return Vec::new();
        }
        let spans = segment(area.start(Axis::X), area.end(Axis::X), &[], &self.params());
        self.construct_spans(area, &spans)
    }
}

impl InfillMethod for InfillConstruction<'_> {
    fn infill<'s>(&'s self, area: &SpatialArea) -> ResultStream<'s> {
        let area = *area;
        ResultStream::lazy(move || ResultStream::from_results(self.fill(&area)))
    }
}

fn post_spacing(span: &SpatialArea) -> ConstructionResult {
    let y = span.start(Axis::Y);
    let z = span.end(Axis::Z);
    ConstructionResult::measurement(
        MeasurementKind::PostSpacing,
        Vec3::new(span.start(Axis::X), y, z),
        Vec3::new(span.end(Axis::X), y, z),
        format_length(span.extent(Axis::X)),
        POST_SPACING_OFFSET,
        vec![Tag::PostSpacing],
    )
}

/// Infill wall body: segmentation around the openings, frames in the gaps.
pub fn construct_infill_wall<'s>(
    infill: &'s InfillConstruction<'_>,
    body: SpatialArea,
    openings: &'s [PlacedOpening<'_>],
) -> ResultStream<'s> {
    let exclusions: Vec<_> = openings.iter().map(|o| (o.start, o.end)).collect();
    let spans = segment(body.start(Axis::X), body.end(Axis::X), &exclusions, &infill.params());

    let mut streams = Vec::with_capacity(spans.len() + 1);
    streams.push(ResultStream::from_results(opening_spacing_measurements(&body, openings)));
    for span in spans {
        match span.kind {
            SpanKind::Opening(index) => streams.push(construct_opening(&openings[index], &body, infill)),
            _ => streams.push(ResultStream::from_results(infill.construct_spans(&body, &[span]))),
        }
    }
    ResultStream::concat(streams)
}
