//! Base and top plates. Both run the full construction length across the
//! core; the wall body sits between them.

use super::element::ConstructionElement;
use super::results::{ConstructionResult, Severity};
use super::tags::Tag;
use crate::config::RingBeamAssemblyConfig;
use crate::geometry::{Axis, SpatialArea};
use crate::units::LENGTH_EPSILON;

/// Plates plus the area left for the wall body.
#[derive(Debug)]
pub struct RingBeamSplit {
    pub results: Vec<ConstructionResult>,
    /// `None` when the plates use up the whole height
    pub body: Option<SpatialArea>,
}

pub fn construct_ring_beams(
    core: &SpatialArea,
    base: Option<&RingBeamAssemblyConfig>,
    top: Option<&RingBeamAssemblyConfig>,
) -> RingBeamSplit {
    let base_height = base.map_or(0.0, |b| b.height);
    let top_height = top.map_or(0.0, |t| t.height);
    let height = core.extent(Axis::Z);

    if base_height + top_height >= height - LENGTH_EPSILON {
        return RingBeamSplit {
            results: vec![ConstructionResult::region_issue(
                Severity::Error,
                "Ring beams leave no height for the wall",
                core.bounds(),
            )],
            body: None,
        };
    }

    let mut results = Vec::new();
    if let Some(base) = base {
        let plate = core.with_z_adjustment(0.0, Some(base.height));
        results.push(ConstructionResult::element(ConstructionElement::cuboid(
            &base.material,
            &plate,
            vec![Tag::BasePlate],
        )));
    }
    if let Some(top) = top {
        let plate = core.with_z_adjustment(height - top.height, None);
        results.push(ConstructionResult::element(ConstructionElement::cuboid(
            &top.material,
            &plate,
            vec![Tag::TopPlate],
        )));
    }

    RingBeamSplit {
        results,
        body: Some(core.with_z_adjustment(base_height, Some(height - base_height - top_height))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::ids::{MaterialId, RingBeamAssemblyId};

    fn plate(height: f64) -> RingBeamAssemblyConfig {
        RingBeamAssemblyConfig {
            id: RingBeamAssemblyId::from("plate"),
            name: "Plate".to_string(),
            height,
            material: MaterialId::from("timber-120x360"),
        }
    }

    fn core() -> SpatialArea {
        SpatialArea::new(Vec3::new(0.0, 30.0, 0.0), Vec3::new(3000.0, 360.0, 2800.0))
    }

    #[test]
    fn test_body_between_plates() {
        let (base, top) = (plate(120.0), plate(160.0));
        let split = construct_ring_beams(&core(), Some(&base), Some(&top));
        assert_eq!(split.results.len(), 2);
        let body = split.body.unwrap();
        assert_eq!(body.start(Axis::Z), 120.0);
        assert_eq!(body.end(Axis::Z), 2640.0);
    }

    #[test]
    fn test_no_plates() {
        let split = construct_ring_beams(&core(), None, None);
        assert!(split.results.is_empty());
        assert_eq!(split.body.unwrap(), core());
    }

    #[test]
    fn test_plates_fill_height() {
        let big = plate(1400.0);
        let split = construct_ring_beams(&core(), Some(&big), Some(&big));
        assert!(split.body.is_none());
        assert!(matches!(split.results[0], ConstructionResult::Error(_)));
    }
}
