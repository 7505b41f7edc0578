//! Vertical posts between straw spans.
//!
//! A full post is one member through the whole core. A double post puts one
//! member at each face and fills the gap with the configured infill material;
//! when the two members would meet, a full post is built instead and flagged.

use super::element::ConstructionElement;
use super::results::{ConstructionResult, ResultStream, Severity};
use super::tags::Tag;
use crate::config::PostConfig;
use crate::geometry::{Axis, SpatialArea};
use crate::units::LENGTH_EPSILON;

/// Build one post filling `area` (post width along X, core thickness along Y).
pub fn construct_post(area: &SpatialArea, post: &PostConfig) -> ResultStream<'static> {
    if area.is_empty() {
        return ResultStream::empty();
    }

    match post {
        PostConfig::Full { material, .. } => {
            ResultStream::once(ConstructionResult::element(ConstructionElement::cuboid(material, area, vec![Tag::Post])))
        }
        PostConfig::Double {
            thickness,
            material,
            infill_material,
            ..
        } => {
            let depth = area.extent(Axis::Y);
            if 2.0 * thickness >= depth - LENGTH_EPSILON {
                return ResultStream::element_with_issue(
                    ConstructionElement::cuboid(material, area, vec![Tag::Post]),
                    Severity::Error,
                    "Double post members do not fit the wall thickness",
                );
            }

            let (inside, rest) = area.split_at(Axis::Y, *thickness);
            let (gap, outside) = rest.split_at(Axis::Y, depth - 2.0 * thickness);
            ResultStream::from_results(vec![
                ConstructionResult::element(ConstructionElement::cuboid(material, &inside, vec![Tag::Post])),
                ConstructionResult::element(ConstructionElement::cuboid(infill_material, &gap, vec![Tag::PostInfill])),
                ConstructionResult::element(ConstructionElement::cuboid(material, &outside, vec![Tag::Post])),
            ])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::ConstructionModel;
    use crate::geometry::Vec3;
    use crate::ids::MaterialId;

    fn post_area(depth: f64) -> SpatialArea {
        SpatialArea::new(Vec3::new(800.0, 30.0, 120.0), Vec3::new(60.0, depth, 2560.0))
    }

    fn double(thickness: f64) -> PostConfig {
        PostConfig::Double {
            width: 60.0,
            thickness,
            material: MaterialId::from("timber-60x120"),
            infill_material: MaterialId::from("wood-fibre"),
        }
    }

    #[test]
    fn test_full_post() {
        let post = PostConfig::Full {
            width: 60.0,
            material: MaterialId::from("timber-60x360"),
        };
        let model = ConstructionModel::aggregate(construct_post(&post_area(360.0), &post));
        assert_eq!(model.elements.len(), 1);
        let bounds = model.bounds.unwrap();
        assert_eq!(bounds.min, Vec3::new(800.0, 30.0, 120.0));
        assert_eq!(bounds.max, Vec3::new(860.0, 390.0, 2680.0));
    }

    #[test]
    fn test_double_post_layers() {
        let model = ConstructionModel::aggregate(construct_post(&post_area(360.0), &double(120.0)));
        assert!(model.is_valid());
        assert_eq!(model.elements.len(), 3);
        let infill = model.elements_with_tag(Tag::PostInfill);
        assert_eq!(infill.len(), 1);
        assert_eq!(infill[0].bounds.min.y, 150.0);
        assert_eq!(infill[0].bounds.max.y, 270.0);
        assert_eq!(model.elements_with_tag(Tag::Post).len(), 2);
    }

    #[test]
    fn test_double_post_too_thick_falls_back() {
        let model = ConstructionModel::aggregate(construct_post(&post_area(360.0), &double(180.0)));
        assert_eq!(model.elements.len(), 1);
        assert_eq!(model.errors.len(), 1);
        assert_eq!(model.errors[0].elements, vec![model.elements[0].id()]);
    }
}
