//! Inside and outside finish layers.
//!
//! Each layer is one extruded wall face over the construction window with the
//! finished openings cut out. Inside layers stack from the core towards Y = 0,
//! outside layers from the core outwards.

use super::element::ConstructionElement;
use super::openings::OpeningRect;
use super::results::{ConstructionResult, ResultStream};
use super::tags::Tag;
use crate::config::{LayerConfig, LayersConfig};
use crate::geometry::{translation, ExtrusionPlane, Shape, Vec3};
use crate::units::{Length, LENGTH_EPSILON};

/// Where the layers go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerFrame {
    /// Construction window along the wall
    pub x: (Length, Length),
    pub height: Length,
    /// Inside face of the core
    pub core_start: Length,
    pub core_thickness: Length,
}

pub fn construct_layers(layers: &LayersConfig, frame: &LayerFrame, openings: &[OpeningRect]) -> ResultStream<'static> {
    let mut results = Vec::new();

    let mut y = frame.core_start;
    for layer in &layers.inside {
        y -= layer.thickness;
        results.extend(layer_element(layer, y, frame, openings, Tag::InsideLayer));
    }

    let mut y = frame.core_start + frame.core_thickness.max(0.0);
    for layer in &layers.outside {
        results.extend(layer_element(layer, y, frame, openings, Tag::OutsideLayer));
        y += layer.thickness;
    }

    ResultStream::from_results(results)
}

fn layer_element(
    layer: &LayerConfig,
    y: Length,
    frame: &LayerFrame,
    openings: &[OpeningRect],
    tag: Tag,
) -> Option<ConstructionResult> {
    let (x0, x1) = frame.x;
    if layer.thickness <= LENGTH_EPSILON || x1 - x0 <= LENGTH_EPSILON || frame.height <= LENGTH_EPSILON {
        return None;
    }

    let holes = openings
        .iter()
        .filter_map(|r| {
            let (hx0, hx1) = (r.x0.max(x0), r.x1.min(x1));
            let (hz0, hz1) = (r.z0.max(0.0), r.z1.min(frame.height));
            (hx1 - hx0 > LENGTH_EPSILON && hz1 - hz0 > LENGTH_EPSILON).then(|| Shape::rectangle(hx0, hz0, hx1, hz1))
        })
        .collect();

    let shape = Shape::ExtrudedPolygon {
        outline: Shape::rectangle(x0, 0.0, x1, frame.height),
        holes,
        plane: ExtrusionPlane::Xz,
        thickness: layer.thickness,
    };
    Some(ConstructionResult::element(ConstructionElement::new(
        layer.material.clone(),
        shape,
        translation(Vec3::new(0.0, y, 0.0)),
        vec![tag],
    )))
}
