//! # Result Protocol
//!
//! Every construction step produces a [`ResultStream`]: a lazy, finite,
//! single-use sequence of [`ConstructionResult`]s. Steps compose by
//! concatenation, so a frame builder can hand part of its area to the infill
//! and simply chain the infill's stream into its own. The wall orchestrator
//! folds the final stream once into a
//! [`ConstructionModel`](super::ConstructionModel).
//!
//! Order is preserved but carries no meaning beyond draw order.
//!
//! ## Example
//!
//! ```rust
//! use plan_core::construction::{ConstructionResult, ResultStream};
//!
//! let stream = ResultStream::from_results(vec![ConstructionResult::warning("thin wall", vec![])])
//!     .chain(ResultStream::empty());
//! assert_eq!(stream.count(), 1);
//! ```

use serde::{Deserialize, Serialize};

use super::element::{ConstructionElement, ElementId, GroupOrElement};
use super::tags::Tag;
use crate::geometry::{Bounds3D, Vec3};
use crate::units::Length;

// ============================================================================
// Issues
// ============================================================================

/// A construction problem anchored to the elements it concerns.
///
/// `elements` is a set of back-references, not ownership. Problems about a
/// region where no element could be placed carry `bounds` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionIssue {
    pub description: String,
    #[serde(default)]
    pub elements: Vec<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds3D>,
}

impl ConstructionIssue {
    pub fn new(description: impl Into<String>, elements: Vec<ElementId>) -> Self {
        ConstructionIssue {
            description: description.into(),
            elements,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds3D) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ============================================================================
// Measurements and Areas
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    PostSpacing,
    OpeningSpacing,
    OpeningWidth,
    OpeningHeight,
    SillHeight,
    ModuleWidth,
    ConstructionLength,
}

/// Dimension annotation between two points. Not authoritative geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMeasurement {
    pub kind: MeasurementKind,
    pub start_point: Vec3,
    pub end_point: Vec3,
    pub label: String,
    /// Distance of the dimension line from the measured edge
    pub offset: Length,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl RawMeasurement {
    pub fn length(&self) -> Length {
        (self.end_point - self.start_point).norm()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaKind {
    RoughOpening,
    CornerExtension,
    FinishedFloor,
    FinishedCeiling,
}

/// A marked region for the plan viewer (no material).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightedArea {
    pub kind: AreaKind,
    pub label: String,
    pub bounds: Bounds3D,
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ConstructionResult {
    Element(GroupOrElement),
    Measurement(RawMeasurement),
    Area(HighlightedArea),
    Error(ConstructionIssue),
    Warning(ConstructionIssue),
}

impl ConstructionResult {
    pub fn element(element: impl Into<GroupOrElement>) -> Self {
        ConstructionResult::Element(element.into())
    }

    pub fn error(description: impl Into<String>, elements: Vec<ElementId>) -> Self {
        ConstructionResult::Error(ConstructionIssue::new(description, elements))
    }

    pub fn warning(description: impl Into<String>, elements: Vec<ElementId>) -> Self {
        ConstructionResult::Warning(ConstructionIssue::new(description, elements))
    }

    pub fn issue(severity: Severity, issue: ConstructionIssue) -> Self {
        match severity {
            Severity::Error => ConstructionResult::Error(issue),
            Severity::Warning => ConstructionResult::Warning(issue),
        }
    }

    /// Issue about a region with nothing to point at.
    pub fn region_issue(severity: Severity, description: impl Into<String>, bounds: Bounds3D) -> Self {
        ConstructionResult::issue(severity, ConstructionIssue::new(description, vec![]).with_bounds(bounds))
    }

    pub fn measurement(
        kind: MeasurementKind,
        start_point: Vec3,
        end_point: Vec3,
        label: impl Into<String>,
        offset: Length,
        tags: Vec<Tag>,
    ) -> Self {
        ConstructionResult::Measurement(RawMeasurement {
            kind,
            start_point,
            end_point,
            label: label.into(),
            offset,
            tags,
        })
    }

    pub fn area(kind: AreaKind, label: impl Into<String>, bounds: Bounds3D) -> Self {
        ConstructionResult::Area(HighlightedArea {
            kind,
            label: label.into(),
            bounds,
        })
    }

    /// Id of a produced element or group.
    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            ConstructionResult::Element(e) => Some(e.id()),
            _ => None,
        }
    }
}

/// A lazy, finite, single-use sequence of results.
///
/// Not `Clone`: once drained it is gone, so aggregation happens exactly once.
pub struct ResultStream<'a> {
    inner: Box<dyn Iterator<Item = ConstructionResult> + 'a>,
}

impl<'a> ResultStream<'a> {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = ConstructionResult> + 'a,
    {
        ResultStream { inner: Box::new(iter) }
    }

    pub fn empty() -> Self {
        ResultStream::new(std::iter::empty())
    }

    pub fn from_results(results: Vec<ConstructionResult>) -> Self {
        ResultStream::new(results.into_iter())
    }

    pub fn once(result: ConstructionResult) -> Self {
        ResultStream::new(std::iter::once(result))
    }

    /// Defer a step until the first result is pulled.
    pub fn lazy<F>(produce: F) -> Self
    where
        F: FnOnce() -> ResultStream<'a> + 'a,
    {
        ResultStream::new(std::iter::once_with(produce).flatten())
    }

    /// An element together with the issue it raises.
    pub fn element_with_issue(element: ConstructionElement, severity: Severity, description: impl Into<String>) -> Self {
        let issue = ConstructionIssue::new(description, vec![element.id]);
        ResultStream::from_results(vec![
            ConstructionResult::element(element),
            ConstructionResult::issue(severity, issue),
        ])
    }

    /// Concatenate two streams.
    #[allow(clippy::should_implement_trait)]
    pub fn chain(self, other: ResultStream<'a>) -> Self {
        ResultStream::new(self.inner.chain(other.inner))
    }

    /// Concatenate many streams in order.
    pub fn concat<I>(streams: I) -> Self
    where
        I: IntoIterator<Item = ResultStream<'a>>,
        I::IntoIter: 'a,
    {
        ResultStream::new(streams.into_iter().flatten())
    }
}

impl Iterator for ResultStream<'_> {
    type Item = ConstructionResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a> FromIterator<ConstructionResult> for ResultStream<'a> {
    fn from_iter<T: IntoIterator<Item = ConstructionResult>>(iter: T) -> Self {
        ResultStream::from_results(iter.into_iter().collect())
    }
}
