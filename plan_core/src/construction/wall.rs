//! # Wall Orchestrator
//!
//! Entry point of the engine: looks everything up, dispatches to the wall's
//! construction method and folds the results into one [`ConstructionModel`].
//!
//! ## Flow
//!
//! 1. Resolve the perimeter, wall, storey, floor assemblies, wall assembly,
//!    ring beams, materials and every opening's assembly. Any miss is a
//!    [`PlanError`] and nothing is built.
//! 2. Work out the construction window (corner extensions), the wall height
//!    and the finished floor/ceiling levels.
//! 3. Split off the ring beams, place the openings and build the wall body
//!    with the method matching the assembly type.
//! 4. Add the finish layers, area markers and the overall dimension, then
//!    aggregate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use plan_core::config::ConfigSnapshot;
//! use plan_core::construction::construct_wall;
//! use plan_core::ids::{PerimeterId, WallId};
//! use plan_core::project::Project;
//!
//! let project: Project = plan_core::file_io::load_project("house.json".as_ref())?;
//! let config = ConfigSnapshot::builtin();
//! let model = construct_wall(&project, &config, &PerimeterId::from("ground"), &WallId::from("south"))?;
//! println!("{} elements, {} errors", model.elements.len(), model.errors.len());
//! # Ok::<(), plan_core::errors::PlanError>(())
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::corners::{calculate_corner_extensions, corner_areas};
use super::infill::{construct_infill_wall, InfillConstruction};
use super::layers::{construct_layers, LayerFrame};
use super::model::ConstructionModel;
use super::modules::{construct_module_wall, ModuleConstruction, ModuleLayout};
use super::non_strawbale::construct_non_strawbale;
use super::openings::{place_openings, OpeningContext, OpeningRect, PlacedOpening};
use super::results::{AreaKind, ConstructionResult, MeasurementKind, ResultStream, Severity};
use super::ring_beams::construct_ring_beams;
use super::tags::Tag;
use crate::config::{
    resolve_opening_assembly, ConfigSnapshot, InfillConfig, ModuleFrame, NonStrawbaleConfig, OpeningAssemblyType, PostConfig,
    RingBeamAssemblyConfig, WallAssemblyConfig, WallAssemblyType,
};
use crate::errors::{AssemblyKind, PlanError, PlanResult};
use crate::geometry::{Axis, Bounds3D, SpatialArea, Vec3};
use crate::ids::{MaterialId, PerimeterId, RingBeamAssemblyId, WallId};
use crate::project::{Perimeter, Project, Storey};
use crate::units::{format_length, Length, LENGTH_EPSILON};

const WALL_DIMENSION_OFFSET: f64 = 200.0;

// ============================================================================
// Storey Context
// ============================================================================

/// Vertical levels of one storey's walls, Z measured from the top of the
/// storey's floor construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoreyContext {
    /// Up to the underside of the next floor's construction
    pub wall_height: Length,
    /// Top of the floor finish
    pub finished_floor_z: Length,
    /// Underside of the ceiling finish
    pub finished_ceiling_z: Length,
}

impl StoreyContext {
    /// # Errors
    ///
    /// * `AssemblyNotFound` - the storey's or the next storey's floor assembly is missing
    /// * `InvalidInput` - the next floor leaves no wall height
    pub fn resolve(project: &Project, config: &ConfigSnapshot, storey: &Storey) -> PlanResult<Self> {
        let floor = config
            .floor_assembly(&storey.floor_assembly_id)
            .ok_or_else(|| PlanError::assembly_not_found(AssemblyKind::Floor, storey.floor_assembly_id.as_str()))?;

        let next_floor = match project.next_storey(storey) {
            Some(next) => Some(
                config
                    .floor_assembly(&next.floor_assembly_id)
                    .ok_or_else(|| PlanError::assembly_not_found(AssemblyKind::Floor, next.floor_assembly_id.as_str()))?,
            ),
            None => None,
        };

        let wall_height = storey.height - next_floor.map_or(0.0, |f| f.construction_thickness);
        if wall_height <= LENGTH_EPSILON {
            return Err(PlanError::invalid_input(
                format!("storeys.{}.height", storey.id),
                storey.height.to_string(),
                "Storey is not taller than the floor construction above it",
            ));
        }

        Ok(StoreyContext {
            wall_height,
            finished_floor_z: floor.top_layers_thickness,
            finished_ceiling_z: wall_height - next_floor.map_or(0.0, |f| f.bottom_layers_thickness),
        })
    }

    fn level_areas(&self, window: (Length, Length), thickness: Length) -> Vec<ConstructionResult> {
        let level = |z: Length| Bounds3D::new(Vec3::new(window.0, 0.0, z), Vec3::new(window.1, thickness, z));
        vec![
            ConstructionResult::area(AreaKind::FinishedFloor, "Finished floor", level(self.finished_floor_z)),
            ConstructionResult::area(AreaKind::FinishedCeiling, "Finished ceiling", level(self.finished_ceiling_z)),
        ]
    }
}

// ============================================================================
// Construction Methods
// ============================================================================

/// A wall assembly type with its straw material resolved.
enum WallMethod<'c> {
    Infill(InfillConstruction<'c>),
    Modules {
        layout: ModuleLayout,
        modules: ModuleConstruction<'c>,
        infill: InfillConstruction<'c>,
    },
    NonStrawbale(&'c NonStrawbaleConfig),
}

impl<'c> WallMethod<'c> {
    fn resolve(kind: &'c WallAssemblyType, config: &ConfigSnapshot) -> PlanResult<Self> {
        let infill = |cfg: &'c InfillConfig| -> PlanResult<InfillConstruction<'c>> {
            let (straw, profile) = config.resolve_straw(cfg.straw_material.as_ref())?;
            Ok(InfillConstruction::new(cfg, straw, profile))
        };

        match kind {
            WallAssemblyType::Infill(cfg) => Ok(WallMethod::Infill(infill(cfg)?)),
            WallAssemblyType::Strawhenge(cfg) | WallAssemblyType::Modules(cfg) => {
                let layout = match kind {
                    WallAssemblyType::Strawhenge(_) => ModuleLayout::Strawhenge,
                    _ => ModuleLayout::Tiled,
                };
                let straw_id = cfg.module.straw_material.as_ref().or(cfg.infill.straw_material.as_ref());
                let (straw, profile) = config.resolve_straw(straw_id)?;
                Ok(WallMethod::Modules {
                    layout,
                    modules: ModuleConstruction {
                        config: &cfg.module,
                        straw_material: straw,
                        profile,
                    },
                    infill: infill(&cfg.infill)?,
                })
            }
            WallAssemblyType::NonStrawbale(cfg) => Ok(WallMethod::NonStrawbale(cfg)),
        }
    }

    fn construct<'s>(&'s self, body: SpatialArea, openings: &'s [PlacedOpening<'_>]) -> ResultStream<'s> {
        match self {
            WallMethod::Infill(infill) => construct_infill_wall(infill, body, openings),
            WallMethod::Modules {
                layout,
                modules,
                infill,
            } => construct_module_wall(modules, *layout, infill, body, openings),
            WallMethod::NonStrawbale(cfg) => construct_non_strawbale(&body, cfg, openings),
        }
    }
}

// ============================================================================
// Orchestration
// ============================================================================

/// Construct one wall of a perimeter.
///
/// # Errors
///
/// An unusable catalog dimension (`InvalidInput`), or an integrity failure:
/// unknown perimeter, wall, storey, assembly or material, or a missing global
/// default. Construction problems are reported inside the returned model.
pub fn construct_wall(
    project: &Project,
    config: &ConfigSnapshot,
    perimeter_id: &PerimeterId,
    wall_id: &WallId,
) -> PlanResult<ConstructionModel> {
    config.validate()?;
    let perimeter = project
        .perimeter(perimeter_id)
        .ok_or_else(|| PlanError::perimeter_not_found(perimeter_id.as_str()))?;
    let wall_index = perimeter
        .wall_index(wall_id)
        .ok_or_else(|| PlanError::wall_not_found(perimeter_id.as_str(), wall_id.as_str()))?;
    construct_wall_at(project, config, perimeter, wall_index)
}

/// Construct every wall of a perimeter in parallel, in wall order.
///
/// Fails on an unusable catalog or with the first integrity failure of any
/// wall.
pub fn construct_perimeter(
    project: &Project,
    config: &ConfigSnapshot,
    perimeter_id: &PerimeterId,
) -> PlanResult<Vec<(WallId, ConstructionModel)>> {
    config.validate()?;
    let perimeter = project
        .perimeter(perimeter_id)
        .ok_or_else(|| PlanError::perimeter_not_found(perimeter_id.as_str()))?;

    (0..perimeter.walls.len())
        .into_par_iter()
        .map(|index| {
            let model = construct_wall_at(project, config, perimeter, index)?;
            Ok((perimeter.walls[index].id.clone(), model))
        })
        .collect()
}

fn construct_wall_at(
    project: &Project,
    config: &ConfigSnapshot,
    perimeter: &Perimeter,
    wall_index: usize,
) -> PlanResult<ConstructionModel> {
    let wall = perimeter.walls.get(wall_index).ok_or_else(|| {
        PlanError::invalid_input("wall_index", wall_index.to_string(), "Perimeter has no wall at this index")
    })?;
    let storey = project
        .storey(&perimeter.storey_id)
        .ok_or_else(|| PlanError::storey_not_found(perimeter.storey_id.as_str()))?;
    let levels = StoreyContext::resolve(project, config, storey)?;

    let assembly = config
        .wall_assembly(&wall.wall_assembly_id)
        .ok_or_else(|| PlanError::assembly_not_found(AssemblyKind::Wall, wall.wall_assembly_id.as_str()))?;
    let base = ring_beam(config, assembly.base_ring_beam_id.as_ref())?;
    let top = ring_beam(config, assembly.top_ring_beam_id.as_ref())?;
    require_materials(config, wall_materials(assembly, base, top))?;
    let method = WallMethod::resolve(&assembly.kind, config)?;

    let mut requests = Vec::with_capacity(wall.openings.len());
    for opening in &wall.openings {
        let (opening_assembly, source) =
            resolve_opening_assembly(config, opening.assembly_id.as_ref(), assembly.opening_assembly_id.as_ref())?;
        debug!(opening_id = %opening.id, assembly_id = %opening_assembly.id, ?source, "Opening assembly");
        if let OpeningAssemblyType::Simple {
            header_material,
            sill_material,
            ..
        } = &opening_assembly.kind
        {
            require_materials(config, [header_material, sill_material])?;
        }
        requests.push((opening, opening_assembly));
    }

    let corners = calculate_corner_extensions(perimeter, wall_index)?;
    let window = corners.window();
    let height = levels.wall_height;
    let inside = assembly.layers.inside_thickness();
    let core_thickness = wall.thickness - inside - assembly.layers.outside_thickness();

    debug!(
        wall_id = %wall.id,
        assembly_id = %assembly.id,
        method = assembly.kind.name(),
        construction_length = corners.construction_length,
        height,
        core_thickness,
        "Constructing wall"
    );

    let core = (core_thickness > LENGTH_EPSILON).then(|| {
        SpatialArea::new(
            Vec3::new(window.0, inside, 0.0),
            Vec3::new(window.1 - window.0, core_thickness, height),
        )
    });
    let split = core.as_ref().map(|core| construct_ring_beams(core, base, top));
    let body = split.as_ref().and_then(|s| s.body);

    let context = OpeningContext {
        wall_length: wall.length(),
        finished_floor_z: levels.finished_floor_z,
        body_bottom: body.map_or(base.map_or(0.0, |b| b.height), |b| b.start(Axis::Z)),
        core_y: (inside, inside + core_thickness.max(0.0)),
    };
    let (placed, opening_issues) = place_openings(&requests, &context);
    let finished: Vec<OpeningRect> = placed.iter().flat_map(|p| p.finished.iter().copied()).collect();

    let mut results = Vec::new();
    if core.is_none() {
        results.push(ConstructionResult::region_issue(
            Severity::Error,
            "Wall is thinner than its finish layers",
            Bounds3D::new(Vec3::new(window.0, 0.0, 0.0), Vec3::new(window.1, wall.thickness, height)),
        ));
    }
    if let Some(split) = split {
        results.extend(split.results);
    }
    results.extend(opening_issues);

    let body_stream = match body {
        Some(body) => method.construct(body, &placed),
        None => ResultStream::empty(),
    };

    let layer_frame = LayerFrame {
        x: window,
        height,
        core_start: inside,
        core_thickness,
    };
    let mut markers = levels.level_areas(window, wall.thickness);
    markers.extend(corner_areas(&corners, wall.length(), (0.0, wall.thickness), height));
    markers.push(ConstructionResult::measurement(
        MeasurementKind::ConstructionLength,
        Vec3::new(window.0, 0.0, 0.0),
        Vec3::new(window.1, 0.0, 0.0),
        format_length(corners.construction_length),
        WALL_DIMENSION_OFFSET,
        vec![Tag::WallDimension],
    ));

    let stream = ResultStream::from_results(results)
        .chain(body_stream)
        .chain(construct_layers(&assembly.layers, &layer_frame, &finished))
        .chain(ResultStream::from_results(markers));
    let model = ConstructionModel::aggregate(stream);

    info!(
        wall_id = %wall.id,
        elements = model.elements.len(),
        errors = model.errors.len(),
        warnings = model.warnings.len(),
        "Wall constructed"
    );
    Ok(model)
}

fn ring_beam<'c>(
    config: &'c ConfigSnapshot,
    id: Option<&RingBeamAssemblyId>,
) -> PlanResult<Option<&'c RingBeamAssemblyConfig>> {
    match id {
        Some(id) => config
            .ring_beam_assembly(id)
            .map(Some)
            .ok_or_else(|| PlanError::assembly_not_found(AssemblyKind::RingBeam, id.as_str())),
        None => Ok(None),
    }
}

/// Every material the wall's own construction refers to (straw is resolved
/// separately).
fn wall_materials<'c>(
    assembly: &'c WallAssemblyConfig,
    base: Option<&'c RingBeamAssemblyConfig>,
    top: Option<&'c RingBeamAssemblyConfig>,
) -> Vec<&'c MaterialId> {
    fn post_materials(posts: &PostConfig) -> Vec<&MaterialId> {
        match posts {
            PostConfig::Full { material, .. } => vec![material],
            PostConfig::Double {
                material,
                infill_material,
                ..
            } => vec![material, infill_material],
        }
    }

    let mut ids: Vec<&MaterialId> = assembly
        .layers
        .inside
        .iter()
        .chain(&assembly.layers.outside)
        .map(|l| &l.material)
        .collect();
    ids.extend(base.into_iter().chain(top).map(|r| &r.material));

    match &assembly.kind {
        WallAssemblyType::Infill(infill) => ids.extend(post_materials(&infill.posts)),
        WallAssemblyType::Strawhenge(cfg) | WallAssemblyType::Modules(cfg) => {
            ids.extend(post_materials(&cfg.infill.posts));
            ids.push(&cfg.module.frame_material);
            if let ModuleFrame::Double {
                spacer_material,
                infill_material,
                ..
            } = &cfg.module.frame
            {
                ids.push(spacer_material);
                ids.push(infill_material);
            }
        }
        WallAssemblyType::NonStrawbale(cfg) => ids.push(&cfg.material),
    }
    ids
}

fn require_materials<'a, I>(config: &ConfigSnapshot, ids: I) -> PlanResult<()>
where
    I: IntoIterator<Item = &'a MaterialId>,
{
    for id in ids {
        config.require_material(id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigSnapshot;
    use crate::construction::element::GroupOrElement;
    use crate::construction::tags::TagCategory;
    use crate::geometry::Vec2;
    use crate::ids::{CornerId, OpeningAssemblyId, StoreyId, WallAssemblyId};
    use crate::materials::StrawbaleProfile;
    use crate::project::{LineSegment, Opening, PerimeterCorner, PerimeterWall};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    /// Rectangle `length` x 3000 on one storey; wall 0 runs along X.
    fn project(length: f64, thickness: f64, assembly: &str, openings: Vec<Opening>) -> Project {
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(length, 0.0),
            Vec2::new(length, 3000.0),
            Vec2::new(0.0, 3000.0),
        ];
        let mut walls: Vec<PerimeterWall> = (0..4)
            .map(|i| PerimeterWall {
                id: WallId::new(format!("w{}", i)),
                thickness,
                wall_assembly_id: WallAssemblyId::from(assembly),
                outside_line: LineSegment::new(pts[i], pts[(i + 1) % 4]),
                openings: vec![],
            })
            .collect();
        walls[0].openings = openings;
        let corners = (0..4)
            .map(|i| PerimeterCorner {
                id: CornerId::new(format!("c{}", i)),
                outside_point: pts[i],
                constructed_by: WallId::new(format!("w{}", i)),
            })
            .collect();

        let mut project = Project::new("Test house");
        project.storeys.push(Storey::new("ground", "Ground floor", 0, 2800.0, "floor-standard"));
        project.perimeters.push(Perimeter {
            id: PerimeterId::from("p"),
            storey_id: StoreyId::from("ground"),
            walls,
            corners,
        });
        project
    }

    fn build(project: &Project) -> ConstructionModel {
        construct_wall(project, &ConfigSnapshot::builtin(), &PerimeterId::from("p"), &WallId::from("w0")).unwrap()
    }

    fn measurements(model: &ConstructionModel, kind: MeasurementKind) -> Vec<f64> {
        model
            .measurements
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| (m.length() * 1000.0).round() / 1000.0)
            .collect()
    }

    #[test]
    fn test_scenario_plain_infill_wall() {
        let model = build(&project(3000.0, 420.0, "infill-standard", vec![]));
        assert!(model.is_valid(), "{:?}", model.errors);
        assert_eq!(model.elements_with_tag(Tag::Post).len(), 3);
        assert_eq!(measurements(&model, MeasurementKind::PostSpacing), vec![800.0, 800.0, 420.0, 800.0]);
        assert_eq!(model.elements_with_tag(Tag::BasePlate).len(), 1);
        assert_eq!(model.elements_with_tag(Tag::TopPlate).len(), 1);
        assert_eq!(model.elements_with_tag(Tag::InsideLayer).len(), 1);
        assert_eq!(model.elements_with_tag(Tag::OutsideLayer).len(), 1);

        let bounds = model.bounds.unwrap();
        assert_relative_eq!(bounds.size().x, 3000.0);
        assert_relative_eq!(bounds.size().y, 420.0);
        assert_relative_eq!(bounds.size().z, 2800.0);
    }

    #[test]
    fn test_scenario_door() {
        let door = Opening::door("d1", 1500.0, 900.0, 2100.0);
        let model = build(&project(4000.0, 420.0, "infill-standard", vec![door]));
        assert!(model.is_valid(), "{:?}", model.errors);
        assert_eq!(measurements(&model, MeasurementKind::OpeningSpacing), vec![1485.0, 1585.0]);

        let rough: Vec<_> = model.areas.iter().filter(|a| a.kind == AreaKind::RoughOpening).collect();
        assert_eq!(rough.len(), 1);
        assert_relative_eq!(rough[0].bounds.min.x, 1485.0);
        assert_relative_eq!(rough[0].bounds.max.x, 2415.0);

        let headers = model.elements_with_tag(Tag::Header);
        assert_eq!(headers.len(), 1);
        assert_relative_eq!(headers[0].bounds.min.z, 2175.0);
        assert!(model.elements_with_tag(Tag::Sill).is_empty());

        // one post in each side span, none inside the rough opening below the header
        let posts = model.elements_with_tag(Tag::Post);
        assert!(posts
            .iter()
            .filter(|p| p.bounds.min.z < 2175.0)
            .all(|p| p.bounds.max.x <= 1485.0 || p.bounds.min.x >= 2415.0));
        assert_eq!(posts.iter().filter(|p| p.bounds.max.x <= 1485.0).count(), 1);
        assert_eq!(posts.iter().filter(|p| p.bounds.min.x >= 2415.0).count(), 1);
    }

    #[test]
    fn test_scenario_strawhenge() {
        let model = build(&project(5000.0, 420.0, "strawhenge-standard", vec![]));
        assert!(model.is_valid(), "{:?}", model.errors);
        let mut starts: Vec<f64> = model
            .elements
            .iter()
            .filter(|e| matches!(e, GroupOrElement::Group(_)))
            .map(|e| e.bounds().min.x)
            .collect();
        starts.sort_by(f64::total_cmp);
        assert_eq!(starts, vec![0.0, 920.0, 1840.0, 3160.0, 4080.0]);
        assert_eq!(model.tag_counts().get(&Tag::Module), Some(&5));
        assert!(model.elements_with_tag(Tag::Post).is_empty());
        assert_eq!(measurements(&model, MeasurementKind::PostSpacing), vec![400.0]);
    }

    #[test]
    fn test_scenario_bale_fit() {
        let model = build(&project(3000.0, 420.0, "infill-standard", vec![]));
        let flake = StrawbaleProfile::default().flake_size;
        for (element, _) in model.leaves() {
            if element.has_tag(Tag::Stuffed) {
                assert!(element.bounds.size().x < flake);
            }
        }
        assert!(!model.elements_with_tag(Tag::FullBale).is_empty());
    }

    #[test]
    fn test_merged_windows_one_frame() {
        let a = Opening::window("a", 1000.0, 800.0, 1300.0, 900.0);
        let b = Opening::window("b", 1830.0, 800.0, 1300.0, 900.0);
        let model = build(&project(4000.0, 420.0, "infill-standard", vec![a, b]));
        assert!(model.is_valid(), "{:?}", model.errors);
        let rough: Vec<_> = model.areas.iter().filter(|a| a.kind == AreaKind::RoughOpening).collect();
        assert_eq!(rough.len(), 1);
        let headers = model.elements_with_tag(Tag::Header);
        assert_eq!(headers.len(), 1);
        assert_relative_eq!(headers[0].bounds.size().x, 1660.0);
        assert_eq!(model.elements_with_tag(Tag::Sill).len(), 1);
        assert_eq!(measurements(&model, MeasurementKind::OpeningWidth), vec![800.0, 800.0]);
    }

    #[test]
    fn test_determinism() {
        let door = Opening::door("d1", 1500.0, 900.0, 2100.0);
        let project = project(4000.0, 420.0, "modules-standard", vec![door]);
        let first = build(&project);
        let second = build(&project);
        let geometry = |m: &ConstructionModel| -> Vec<(Vec<Tag>, String, Bounds3D)> {
            m.leaves()
                .into_iter()
                .map(|(e, t)| (e.tags.clone(), e.material.to_string(), e.shape.local_bounds().transformed(&t)))
                .collect()
        };
        assert_eq!(geometry(&first), geometry(&second));
        assert_eq!(first.measurements, second.measurements);
        assert_eq!(first.bounds, second.bounds);
    }

    #[test]
    fn test_non_strawbale_wall() {
        let window = Opening::window("w", 1000.0, 1200.0, 1300.0, 900.0);
        let model = build(&project(4000.0, 240.0, "non-strawbale-brick", vec![window]));
        assert!(model.is_valid());
        assert_eq!(model.elements.len(), 1);
        assert_eq!(model.elements_with_tag(Tag::NonStrawbale).len(), 1);
    }

    #[test]
    fn test_wall_thinner_than_layers() {
        let model = build(&project(3000.0, 50.0, "infill-standard", vec![]));
        assert_eq!(model.errors.len(), 1);
        assert_eq!(model.elements.len(), 2);
        assert!(model.elements_with_tag(Tag::Post).is_empty());
    }

    #[test]
    fn test_too_thick_core_reports_errors() {
        let model = build(&project(800.0, 500.0, "infill-standard", vec![]));
        assert!(!model.is_valid());
        assert!(model.errors.iter().all(|e| e.description.contains("too thick")));
        for issue in &model.errors {
            for id in &issue.elements {
                assert!(model.find_element(*id).is_some());
            }
        }
    }

    #[test]
    fn test_corner_extension_widens_window() {
        let mut project = project(4000.0, 420.0, "infill-standard", vec![]);
        project.perimeters[0].walls[0].outside_line.start = Vec2::new(420.0, 0.0);
        let model = build(&project);
        // corner 0 belongs to wall 0, so construction starts 420 before the outside line
        let bounds = model.bounds.unwrap();
        assert_relative_eq!(bounds.min.x, -420.0);
        assert_relative_eq!(bounds.max.x, 3580.0);
        assert_eq!(
            model.areas.iter().filter(|a| a.kind == AreaKind::CornerExtension).count(),
            1
        );
        assert_eq!(measurements(&model, MeasurementKind::ConstructionLength), vec![4000.0]);
    }

    #[test]
    fn test_storey_levels() {
        let mut project = project(3000.0, 420.0, "infill-standard", vec![]);
        project.storeys.push(Storey::new("upper", "Upper floor", 1, 2600.0, "floor-standard"));
        let storey = project.storey(&StoreyId::from("ground")).unwrap();
        let levels = StoreyContext::resolve(&project, &ConfigSnapshot::builtin(), storey).unwrap();
        assert_eq!(levels.wall_height, 2580.0);
        assert_eq!(levels.finished_floor_z, 60.0);
        assert_eq!(levels.finished_ceiling_z, 2550.0);

        let model = build(&project);
        assert_relative_eq!(model.bounds.unwrap().max.z, 2580.0);
    }

    #[test]
    fn test_integrity_failures() {
        let project = project(3000.0, 420.0, "infill-standard", vec![Opening::door("d", 500.0, 900.0, 2100.0)]);
        let config = ConfigSnapshot::builtin();

        let err = construct_wall(&project, &config, &PerimeterId::from("nope"), &WallId::from("w0")).unwrap_err();
        assert_eq!(err.error_code(), "PERIMETER_NOT_FOUND");
        let err = construct_wall(&project, &config, &PerimeterId::from("p"), &WallId::from("nope")).unwrap_err();
        assert_eq!(err.error_code(), "WALL_NOT_FOUND");

        let mut no_default = config.clone();
        no_default.defaults.opening_assembly_id = None;
        let err = construct_wall(&project, &no_default, &PerimeterId::from("p"), &WallId::from("w0")).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_DEFAULT");

        let mut broken = project.clone();
        broken.perimeters[0].walls[0].wall_assembly_id = WallAssemblyId::from("missing");
        let err = construct_wall(&broken, &config, &PerimeterId::from("p"), &WallId::from("w0")).unwrap_err();
        assert_eq!(err, PlanError::assembly_not_found(AssemblyKind::Wall, "missing"));

        let mut no_storey = project.clone();
        no_storey.storeys.clear();
        let err = construct_wall(&no_storey, &config, &PerimeterId::from("p"), &WallId::from("w0")).unwrap_err();
        assert_eq!(err.error_code(), "STOREY_NOT_FOUND");

        let mut no_plaster = config.clone();
        no_plaster.materials.retain(|m| m.id.as_str() != "clay-plaster");
        let err = construct_wall(&project, &no_plaster, &PerimeterId::from("p"), &WallId::from("w0")).unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_opening_override_used() {
        let mut door = Opening::door("d", 1500.0, 900.0, 2100.0);
        door.assembly_id = Some(OpeningAssemblyId::from("opening-empty"));
        let model = build(&project(4000.0, 420.0, "infill-standard", vec![door]));
        assert!(model.elements_with_tag(Tag::Header).is_empty());
        let rough = model.areas.iter().find(|a| a.kind == AreaKind::RoughOpening).unwrap();
        assert_relative_eq!(rough.bounds.min.x, 1500.0);
    }

    #[test]
    fn test_construct_perimeter() {
        let project = project(4000.0, 420.0, "infill-standard", vec![]);
        let models = construct_perimeter(&project, &ConfigSnapshot::builtin(), &PerimeterId::from("p")).unwrap();
        let ids: Vec<&str> = models.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["w0", "w1", "w2", "w3"]);
        assert!(models.iter().all(|(_, m)| m.is_valid()));
    }

    #[test]
    fn test_door_at_wall_start() {
        let door = Opening::door("d", 0.0, 900.0, 2100.0);
        let model = build(&project(4000.0, 420.0, "infill-standard", vec![door]));
        assert!(model.is_valid(), "{:?}", model.errors);
        assert!(model.bounds.unwrap().min.x >= 0.0);

        let rough = model.areas.iter().find(|a| a.kind == AreaKind::RoughOpening).unwrap();
        assert_relative_eq!(rough.bounds.min.x, 0.0);
        assert_relative_eq!(rough.bounds.max.x, 915.0);

        let headers = model.elements_with_tag(Tag::Header);
        assert_eq!(headers.len(), 1);
        assert_relative_eq!(headers[0].bounds.min.x, 0.0);
        assert_relative_eq!(headers[0].bounds.max.x, 915.0);

        // below the header the straw and posts start where the rough opening ends
        for (element, t) in model.leaves() {
            let bounds = element.shape.local_bounds().transformed(&t);
            let body = element.has_tag(Tag::Post) || element.tags.iter().any(|tag| tag.category() == TagCategory::Straw);
            if body && bounds.min.z < 2175.0 {
                assert!(bounds.min.x >= 915.0 - 1e-6, "{:?} at {:?}", element.tags, bounds);
            }
        }
    }

    #[test]
    fn test_unusable_catalog_rejected() {
        let project = project(4000.0, 420.0, "strawhenge-standard", vec![]);

        let mut zero_module = ConfigSnapshot::builtin();
        for assembly in &mut zero_module.wall_assemblies {
            if let WallAssemblyType::Strawhenge(modules) | WallAssemblyType::Modules(modules) = &mut assembly.kind {
                modules.module.width = 0.0;
            }
        }
        let err = construct_wall(&project, &zero_module, &PerimeterId::from("p"), &WallId::from("w0")).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        let err = construct_perimeter(&project, &zero_module, &PerimeterId::from("p")).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let mut zero_spacing = ConfigSnapshot::builtin();
        for assembly in &mut zero_spacing.wall_assemblies {
            if let WallAssemblyType::Infill(infill) = &mut assembly.kind {
                infill.max_post_spacing = 0.0;
            }
        }
        let infill = self::project(4000.0, 420.0, "infill-standard", vec![]);
        let err = construct_wall(&infill, &zero_spacing, &PerimeterId::from("p"), &WallId::from("w0")).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    /// X intervals of posts, straw and rough openings crossing height `z`.
    fn body_intervals(model: &ConstructionModel, z: f64) -> Vec<(f64, f64)> {
        let mut intervals: Vec<(f64, f64)> = model
            .leaves()
            .into_iter()
            .filter(|(e, _)| e.has_tag(Tag::Post) || e.tags.iter().any(|tag| tag.category() == TagCategory::Straw))
            .map(|(e, t)| e.shape.local_bounds().transformed(&t))
            .chain(model.areas.iter().filter(|a| a.kind == AreaKind::RoughOpening).map(|a| a.bounds))
            .filter(|b| b.min.z < z && b.max.z > z)
            .map(|b| (b.min.x, b.max.x))
            .collect();
        intervals.sort_by(|a, b| a.0.total_cmp(&b.0));
        intervals
    }

    proptest! {
        #[test]
        fn prop_wall_window_tiled(
            offset in prop_oneof![Just(0.0), Just(3100.0), Just(3300.0), 0.0f64..3100.0],
        ) {
            let door = Opening::door("d", offset, 900.0, 2100.0);
            let model = build(&project(4000.0, 420.0, "infill-standard", vec![door]));
            let window = model.bounds.unwrap();

            let intervals = body_intervals(&model, 1401.3);
            prop_assert!(!intervals.is_empty());
            let mut cursor = window.min.x;
            for (start, end) in intervals {
                prop_assert!((start - cursor).abs() < 1e-6, "gap or overlap at {} (expected {})", start, cursor);
                prop_assert!(end > start);
                cursor = end;
            }
            prop_assert!((cursor - window.max.x).abs() < 1e-6);
        }
    }
}
