//! # Module Assembly
//!
//! Prefabricated frame modules of fixed width, each returned as one
//! [`ConstructionGroup`] so it can be counted, highlighted or exploded as a
//! unit. Modules take priority over infill: the layouts decide where whole
//! modules go and everything left over is handed to the infill.
//!
//! ## Layouts
//!
//! - **Strawhenge** works outside-in. A segment at least two modules wide gets
//!   a module at both ends and the middle is laid out again. A middle between
//!   one and two modules wide gets one module at the leading edge, then the
//!   trailing edge on the next call. Anything narrower is infill.
//! - **Tiled** places modules end to end from one edge and leaves the
//!   remainder at the other. The edge alternates per wall segment.
//!
//! ## Frames
//!
//! A single frame runs its members through the full wall depth. A double
//! frame has a frame at each face, held apart by spacer blocks in the top and
//! bottom bands; the rest of the bands is filled with the infill material.
//! Straw fills the frame interior across the full depth in both cases.

use super::element::{ConstructionElement, ConstructionGroup, GroupOrElement};
use super::infill::{InfillConstruction, InfillMethod};
use super::openings::{construct_opening, opening_spacing_measurements, PlacedOpening};
use super::results::{ConstructionResult, MeasurementKind, ResultStream, Severity};
use super::segmentation::available_spans;
use super::straw::construct_straw;
use super::tags::Tag;
use crate::config::{ModuleConfig, ModuleFrame};
use crate::geometry::{translation, Axis, SpatialArea, Vec3};
use crate::ids::MaterialId;
use crate::materials::StrawbaleProfile;
use crate::units::{format_length, Length, LENGTH_EPSILON};

const MODULE_DIMENSION_OFFSET: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleLayout {
    Strawhenge,
    Tiled,
}

/// Where modules go in one segment, and what is left for infill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModulePlacement {
    pub modules: Vec<(Length, Length)>,
    pub remainders: Vec<(Length, Length)>,
}

impl ModulePlacement {
    fn sort(mut self) -> Self {
        self.modules.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.remainders.sort_by(|a, b| a.0.total_cmp(&b.0));
        self
    }
}

/// Outside-in placement over `[start, end]`.
pub fn strawhenge_layout(start: Length, end: Length, width: Length, leading: bool) -> ModulePlacement {
    let mut placement = ModulePlacement::default();
    strawhenge_into(start, end, width, leading, &mut placement);
    placement.sort()
}

fn strawhenge_into(start: Length, end: Length, width: Length, leading: bool, out: &mut ModulePlacement) {
    let available = end - start;
    if available <= LENGTH_EPSILON {
        return;
    }
    if available >= 2.0 * width - LENGTH_EPSILON {
        out.modules.push((start, start + width));
        out.modules.push((end - width, end));
        strawhenge_into(start + width, end - width, width, !leading, out);
    } else if available >= width - LENGTH_EPSILON {
        if leading {
            out.modules.push((start, start + width));
            push_remainder(start + width, end, out);
        } else {
            out.modules.push((end - width, end));
            push_remainder(start, end - width, out);
        }
    } else {
        push_remainder(start, end, out);
    }
}

fn push_remainder(start: Length, end: Length, out: &mut ModulePlacement) {
    if end - start > LENGTH_EPSILON {
        out.remainders.push((start, end));
    }
}

/// End-to-end placement over `[start, end]`, from `start` or from `end`.
pub fn tiled_layout(start: Length, end: Length, width: Length, from_start: bool) -> ModulePlacement {
    let mut placement = ModulePlacement::default();
    let count = ((end - start + LENGTH_EPSILON) / width).floor().max(0.0) as usize;
    if from_start {
        let mut pos = start;
        for _ in 0..count {
            placement.modules.push((pos, pos + width));
            pos += width;
        }
        push_remainder(pos, end, &mut placement);
    } else {
        let mut pos = end;
        for _ in 0..count {
            placement.modules.push((pos - width, pos));
            pos -= width;
        }
        push_remainder(start, pos, &mut placement);
    }
    placement.sort()
}

/// Module settings with the straw material resolved.
#[derive(Debug, Clone)]
pub struct ModuleConstruction<'c> {
    pub config: &'c ModuleConfig,
    pub straw_material: MaterialId,
    pub profile: StrawbaleProfile,
}

impl ModuleConstruction<'_> {
    /// Build one module filling `area`.
    pub fn construct(&self, area: &SpatialArea) -> ResultStream<'static> {
        if area.is_empty() {
            return ResultStream::empty();
        }

        let w = area.extent(Axis::X);
        let t = area.extent(Axis::Y);
        let h = area.extent(Axis::Z);
        let fw = self.config.frame_width;
        if 2.0 * fw >= w - LENGTH_EPSILON || 2.0 * fw >= h - LENGTH_EPSILON {
            return self.unframed(area, "Module frame does not fit the module area");
        }

        let mut children: Vec<GroupOrElement> = Vec::new();
        let mut issues = Vec::new();
        let frame = |children: &mut Vec<GroupOrElement>, y0: Length, y1: Length| {
            let material = &self.config.frame_material;
            for (x0, z0, x1, z1) in [
                (0.0, 0.0, w, fw),
                (0.0, h - fw, w, h),
                (0.0, fw, fw, h - fw),
                (w - fw, fw, w, h - fw),
            ] {
                children.push(local_cuboid(material, x0, y0, z0, x1, y1, z1, Tag::ModuleFrame).into());
            }
        };

        match &self.config.frame {
            ModuleFrame::Single => frame(&mut children, 0.0, t),
            ModuleFrame::Double {
                spacer_size,
                spacer_count,
                spacer_material,
                infill_material,
            } => {
                let ft = self.config.frame_thickness;
                let spacers_width = *spacer_count as f64 * spacer_size;
                if 2.0 * ft >= t - LENGTH_EPSILON || spacers_width > w + LENGTH_EPSILON {
                    return self.unframed(area, "Double module frame does not fit the wall thickness");
                }
                frame(&mut children, 0.0, ft);
                frame(&mut children, t - ft, t);

                let (y0, y1) = (ft, t - ft);
                for (z0, z1) in [(0.0, fw), (h - fw, h)] {
                    let mut cursor = 0.0;
                    for x in spacer_positions(w, *spacer_size, *spacer_count) {
                        if x - cursor > LENGTH_EPSILON {
                            children.push(local_cuboid(infill_material, cursor, y0, z0, x, y1, z1, Tag::ModuleInfill).into());
                        }
                        children.push(
                            local_cuboid(spacer_material, x, y0, z0, x + spacer_size, y1, z1, Tag::ModuleSpacer).into(),
                        );
                        cursor = x + spacer_size;
                    }
                    if w - cursor > LENGTH_EPSILON {
                        children.push(local_cuboid(infill_material, cursor, y0, z0, w, y1, z1, Tag::ModuleInfill).into());
                    }
                }
                for (x0, x1) in [(0.0, fw), (w - fw, w)] {
                    children.push(local_cuboid(infill_material, x0, y0, fw, x1, y1, h - fw, Tag::ModuleInfill).into());
                }
            }
        }

        let interior = SpatialArea::new(Vec3::new(fw, 0.0, fw), Vec3::new(w - 2.0 * fw, t, h - 2.0 * fw));
        for result in construct_straw(&interior, &self.profile, &self.straw_material) {
            match result {
                ConstructionResult::Element(e) => children.push(e),
                other => issues.push(other),
            }
        }

        let mut results = Vec::with_capacity(issues.len() + 2);
        if let Some(group) = ConstructionGroup::new(children, translation(area.position), vec![Tag::Module]) {
            results.push(ConstructionResult::element(group));
        }
        results.extend(issues);
        results.push(module_dimension(area));
        ResultStream::from_results(results)
    }

    fn unframed(&self, area: &SpatialArea, description: &str) -> ResultStream<'static> {
        ResultStream::once(ConstructionResult::region_issue(Severity::Error, description, area.bounds()))
            .chain(construct_straw(area, &self.profile, &self.straw_material))
    }
}

#[allow(clippy::too_many_arguments)]
fn local_cuboid(
    material: &MaterialId,
    x0: Length,
    y0: Length,
    z0: Length,
    x1: Length,
    y1: Length,
    z1: Length,
    tag: Tag,
) -> ConstructionElement {
    let area = SpatialArea::new(Vec3::new(x0, y0, z0), Vec3::new(x1 - x0, y1 - y0, z1 - z0));
    ConstructionElement::cuboid(material, &area, vec![tag])
}

/// Evenly spread spacer start positions across `width`.
fn spacer_positions(width: Length, size: Length, count: u32) -> Vec<Length> {
    match count {
        0 => Vec::new(),
        1 => vec![(width - size) / 2.0],
        n => {
            let step = (width - size) / (n - 1) as f64;
            (0..n).map(|i| i as f64 * step).collect()
        }
    }
}

fn module_dimension(area: &SpatialArea) -> ConstructionResult {
    let y = area.start(Axis::Y);
    let z = area.start(Axis::Z);
    ConstructionResult::measurement(
        MeasurementKind::ModuleWidth,
        Vec3::new(area.start(Axis::X), y, z),
        Vec3::new(area.end(Axis::X), y, z),
        format_length(area.extent(Axis::X)),
        MODULE_DIMENSION_OFFSET,
        vec![Tag::ModuleDimension],
    )
}

/// Module wall body: modules in the gaps between openings, infill for the
/// rest, frames around the openings.
pub fn construct_module_wall<'s>(
    modules: &'s ModuleConstruction<'_>,
    layout: ModuleLayout,
    infill: &'s InfillConstruction<'_>,
    body: SpatialArea,
    openings: &'s [PlacedOpening<'_>],
) -> ResultStream<'s> {
    let exclusions: Vec<_> = openings.iter().map(|o| (o.start, o.end)).collect();
    let segments = available_spans(body.start(Axis::X), body.end(Axis::X), &exclusions);
    let width = modules.config.width;

    let mut streams = vec![ResultStream::from_results(opening_spacing_measurements(&body, openings))];
    for (index, (a, b)) in segments.into_iter().enumerate() {
        let leading = index % 2 == 0;
        let placement = match layout {
            ModuleLayout::Strawhenge => strawhenge_layout(a, b, width, leading),
            ModuleLayout::Tiled => tiled_layout(a, b, width, leading),
        };
        for (x0, x1) in placement.modules {
            streams.push(modules.construct(&body.between(Axis::X, x0, x1)));
        }
        for (x0, x1) in placement.remainders {
            streams.push(infill.infill(&body.between(Axis::X, x0, x1)));
        }
    }
    for opening in openings {
        streams.push(construct_opening(opening, &body, infill));
    }
    ResultStream::concat(streams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::ConstructionModel;
    use approx::assert_relative_eq;

    fn single() -> ModuleConfig {
        ModuleConfig {
            width: 920.0,
            frame_thickness: 60.0,
            frame_width: 60.0,
            frame_material: MaterialId::from("timber-60x120"),
            straw_material: None,
            frame: ModuleFrame::Single,
        }
    }

    fn double() -> ModuleConfig {
        ModuleConfig {
            frame: ModuleFrame::Double {
                spacer_size: 120.0,
                spacer_count: 3,
                spacer_material: MaterialId::from("timber-60x120"),
                infill_material: MaterialId::from("wood-fibre"),
            },
            ..single()
        }
    }

    fn module_area() -> SpatialArea {
        SpatialArea::new(Vec3::new(920.0, 30.0, 120.0), Vec3::new(920.0, 360.0, 2560.0))
    }

    #[test]
    fn test_strawhenge_scenario() {
        let placement = strawhenge_layout(0.0, 5000.0, 920.0, true);
        assert_eq!(
            placement.modules,
            vec![(0.0, 920.0), (920.0, 1840.0), (1840.0, 2760.0), (3160.0, 4080.0), (4080.0, 5000.0)]
        );
        assert_eq!(placement.remainders, vec![(2760.0, 3160.0)]);
    }

    #[test]
    fn test_strawhenge_narrow_segment_is_infill() {
        let placement = strawhenge_layout(0.0, 700.0, 920.0, true);
        assert!(placement.modules.is_empty());
        assert_eq!(placement.remainders, vec![(0.0, 700.0)]);
    }

    #[test]
    fn test_strawhenge_single_module_alternates() {
        let leading = strawhenge_layout(0.0, 1200.0, 920.0, true);
        assert_eq!(leading.modules, vec![(0.0, 920.0)]);
        let trailing = strawhenge_layout(0.0, 1200.0, 920.0, false);
        assert_eq!(trailing.modules, vec![(280.0, 1200.0)]);
        assert_eq!(trailing.remainders, vec![(0.0, 280.0)]);
    }

    #[test]
    fn test_tiled_layout_both_directions() {
        let forward = tiled_layout(0.0, 3000.0, 920.0, true);
        assert_eq!(forward.modules.len(), 3);
        assert_eq!(forward.remainders, vec![(2760.0, 3000.0)]);
        let backward = tiled_layout(0.0, 3000.0, 920.0, false);
        assert_eq!(backward.modules[0], (240.0, 1160.0));
        assert_eq!(backward.remainders, vec![(0.0, 240.0)]);
    }

    #[test]
    fn test_single_frame_module() {
        let config = single();
        let modules = ModuleConstruction {
            config: &config,
            straw_material: MaterialId::from("straw-bale"),
            profile: StrawbaleProfile::default(),
        };
        let model = ConstructionModel::aggregate(modules.construct(&module_area()));
        assert!(model.is_valid());
        assert_eq!(model.elements.len(), 1);
        assert_eq!(model.elements_with_tag(Tag::ModuleFrame).len(), 4);
        let bounds = model.bounds.unwrap();
        assert_relative_eq!(bounds.min.x, 920.0);
        assert_relative_eq!(bounds.max.x, 1840.0);
        assert_relative_eq!(bounds.max.z, 2680.0);
        assert_eq!(model.tag_counts().get(&Tag::Module), Some(&1));
        assert_eq!(model.measurements.len(), 1);
    }

    #[test]
    fn test_double_frame_module() {
        let config = double();
        let modules = ModuleConstruction {
            config: &config,
            straw_material: MaterialId::from("straw-bale"),
            profile: StrawbaleProfile::default(),
        };
        let model = ConstructionModel::aggregate(modules.construct(&module_area()));
        assert_eq!(model.elements_with_tag(Tag::ModuleFrame).len(), 8);
        assert_eq!(model.elements_with_tag(Tag::ModuleSpacer).len(), 6);
        // two gaps per band between three spacers, plus two side bands
        assert_eq!(model.elements_with_tag(Tag::ModuleInfill).len(), 6);
        let spacers = model.elements_with_tag(Tag::ModuleSpacer);
        assert!(spacers.iter().all(|s| s.bounds.min.y == 60.0 && s.bounds.max.y == 300.0));
    }

    #[test]
    fn test_frame_too_wide_is_error() {
        let config = ModuleConfig {
            frame_width: 500.0,
            ..single()
        };
        let modules = ModuleConstruction {
            config: &config,
            straw_material: MaterialId::from("straw-bale"),
            profile: StrawbaleProfile::default(),
        };
        let model = ConstructionModel::aggregate(modules.construct(&module_area()));
        assert_eq!(model.errors.len(), 1);
        assert!(model.errors[0].bounds.is_some());
        assert!(model.elements_with_tag(Tag::ModuleFrame).is_empty());
    }

    #[test]
    fn test_spacer_positions() {
        assert_eq!(spacer_positions(920.0, 120.0, 3), vec![0.0, 400.0, 800.0]);
        assert_eq!(spacer_positions(920.0, 120.0, 1), vec![400.0]);
        assert!(spacer_positions(920.0, 120.0, 0).is_empty());
    }
}
