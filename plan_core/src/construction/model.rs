//! # Construction Model
//!
//! The aggregate a wall construction returns. Built by folding a
//! [`ResultStream`] exactly once; immutable afterwards.
//!
//! ## Example
//!
//! ```rust
//! use plan_core::construction::{ConstructionModel, ConstructionResult, ResultStream};
//!
//! let stream = ResultStream::once(ConstructionResult::warning("Wall is too thin", vec![]));
//! let model = ConstructionModel::aggregate(stream);
//! assert!(model.is_valid());
//! assert_eq!(model.warnings.len(), 1);
//! assert!(model.bounds.is_none());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::element::{ConstructionElement, ElementId, GroupOrElement};
use super::results::{ConstructionIssue, ConstructionResult, HighlightedArea, RawMeasurement, ResultStream};
use super::tags::Tag;
use crate::geometry::{Bounds3D, Transform};

/// Everything one wall construction produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructionModel {
    pub elements: Vec<GroupOrElement>,
    pub measurements: Vec<RawMeasurement>,
    pub areas: Vec<HighlightedArea>,
    pub errors: Vec<ConstructionIssue>,
    pub warnings: Vec<ConstructionIssue>,
    /// Union of all element bounds, `None` when nothing was built
    pub bounds: Option<Bounds3D>,
}

impl ConstructionModel {
    /// Fold a result stream into a model.
    pub fn aggregate(stream: ResultStream<'_>) -> Self {
        let mut model = ConstructionModel::default();
        for result in stream {
            match result {
                ConstructionResult::Element(element) => {
                    let b = element.bounds();
                    model.bounds = Some(match model.bounds {
                        Some(acc) => acc.union(&b),
                        None => b,
                    });
                    model.elements.push(element);
                }
                ConstructionResult::Measurement(m) => model.measurements.push(m),
                ConstructionResult::Area(a) => model.areas.push(a),
                ConstructionResult::Error(issue) => model.errors.push(issue),
                ConstructionResult::Warning(issue) => model.warnings.push(issue),
            }
        }
        model
    }

    /// No hard construction errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Every leaf element with its transform in the wall frame.
    pub fn leaves(&self) -> Vec<(&ConstructionElement, Transform)> {
        let mut out = Vec::new();
        let root = Transform::identity();
        for element in &self.elements {
            element.visit_leaves(&root, &mut |leaf, t| out.push((leaf, t)));
        }
        out
    }

    /// Leaf elements carrying `tag`.
    pub fn elements_with_tag(&self, tag: Tag) -> Vec<&ConstructionElement> {
        self.leaves()
            .into_iter()
            .filter(|(e, _)| e.has_tag(tag))
            .map(|(e, _)| e)
            .collect()
    }

    /// How many leaves and groups carry each tag.
    pub fn tag_counts(&self) -> BTreeMap<Tag, usize> {
        fn count(node: &GroupOrElement, counts: &mut BTreeMap<Tag, usize>) {
            for tag in node.tags() {
                *counts.entry(*tag).or_insert(0) += 1;
            }
            if let GroupOrElement::Group(g) = node {
                for child in &g.children {
                    count(child, counts);
                }
            }
        }

        let mut counts = BTreeMap::new();
        for element in &self.elements {
            count(element, &mut counts);
        }
        for m in &self.measurements {
            for tag in &m.tags {
                *counts.entry(*tag).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn find_element(&self, id: ElementId) -> Option<&GroupOrElement> {
        self.elements.iter().find_map(|e| e.find(id))
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }
}
