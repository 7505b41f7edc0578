//! Solid walls of a single material (brick, concrete, timber panel): one
//! extruded wall face with the rough openings cut out.

use super::element::ConstructionElement;
use super::openings::{opening_spacing_measurements, PlacedOpening};
use super::results::{AreaKind, ConstructionResult, ResultStream};
use super::tags::Tag;
use crate::config::NonStrawbaleConfig;
use crate::geometry::{translation, Axis, ExtrusionPlane, Shape, SpatialArea, Vec3};
use crate::units::LENGTH_EPSILON;

/// Build the wall body as one element.
pub fn construct_non_strawbale(
    body: &SpatialArea,
    config: &NonStrawbaleConfig,
    openings: &[PlacedOpening<'_>],
) -> ResultStream<'static> {
    if body.is_empty() {
        return ResultStream::empty();
    }

    let (x0, x1) = (body.start(Axis::X), body.end(Axis::X));
    let (z0, z1) = (body.start(Axis::Z), body.end(Axis::Z));

    let mut results = opening_spacing_measurements(body, openings);
    let mut holes = Vec::new();
    for opening in openings {
        let hx0 = opening.start.max(x0);
        let hx1 = opening.end.min(x1);
        let hz0 = opening.sill_z.max(z0);
        let hz1 = opening.header_z.min(z1);
        if hx1 - hx0 <= LENGTH_EPSILON || hz1 - hz0 <= LENGTH_EPSILON {
            continue;
        }
        holes.push(Shape::rectangle(hx0, hz0, hx1, hz1));
        let rough = body.between(Axis::X, hx0, hx1).between(Axis::Z, hz0, hz1);
        let label = opening.ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join("+");
        results.push(ConstructionResult::area(AreaKind::RoughOpening, label, rough.bounds()));
    }

    let shape = Shape::ExtrudedPolygon {
        outline: Shape::rectangle(x0, z0, x1, z1),
        holes,
        plane: ExtrusionPlane::Xz,
        thickness: body.extent(Axis::Y),
    };
    let wall = ConstructionElement::new(
        config.material.clone(),
        shape,
        translation(Vec3::new(0.0, body.start(Axis::Y), 0.0)),
        vec![Tag::NonStrawbale],
    );
    results.insert(0, ConstructionResult::element(wall));
    ResultStream::from_results(results)
}
