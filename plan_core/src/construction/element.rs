//! # Construction Elements
//!
//! One element is one physical piece: a post, a bale, a plate. Groups bundle
//! pieces that are handled as a unit (a prefabricated module) while keeping
//! the pieces inspectable. Both are immutable once built; bounds are computed
//! at construction time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tags::Tag;
use crate::geometry::{translation, Bounds3D, Shape, SpatialArea, Transform};
use crate::ids::MaterialId;

/// Unique id of an element or group, referenced by issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub Uuid);

impl ElementId {
    pub fn new() -> Self {
        ElementId(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        ElementId::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single physical piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionElement {
    pub id: ElementId,
    pub material: MaterialId,
    pub shape: Shape,
    pub transform: Transform,
    pub tags: Vec<Tag>,
    /// Bounds of the placed shape in the parent frame
    pub bounds: Bounds3D,
}

impl ConstructionElement {
    pub fn new(material: MaterialId, shape: Shape, transform: Transform, tags: Vec<Tag>) -> Self {
        let bounds = shape.local_bounds().transformed(&transform);
        ConstructionElement {
            id: ElementId::new(),
            material,
            shape,
            transform,
            tags,
            bounds,
        }
    }

    /// Box filling `area` exactly.
    pub fn cuboid(material: &MaterialId, area: &SpatialArea, tags: Vec<Tag>) -> Self {
        ConstructionElement::new(
            material.clone(),
            Shape::cuboid(area.size),
            translation(area.position),
            tags,
        )
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Elements handled as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionGroup {
    pub id: ElementId,
    pub children: Vec<GroupOrElement>,
    pub transform: Transform,
    pub tags: Vec<Tag>,
    /// Bounds of all children in the parent frame
    pub bounds: Bounds3D,
}

impl ConstructionGroup {
    /// Build a group; returns `None` when there are no children.
    pub fn new(children: Vec<GroupOrElement>, transform: Transform, tags: Vec<Tag>) -> Option<Self> {
        let local = Bounds3D::merge_all(children.iter().map(|c| c.bounds()))?;
        Some(ConstructionGroup {
            id: ElementId::new(),
            bounds: local.transformed(&transform),
            children,
            transform,
            tags,
        })
    }
}

/// Either a single element or a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupOrElement {
    Element(ConstructionElement),
    Group(ConstructionGroup),
}

impl GroupOrElement {
    pub fn id(&self) -> ElementId {
        match self {
            GroupOrElement::Element(e) => e.id,
            GroupOrElement::Group(g) => g.id,
        }
    }

    pub fn bounds(&self) -> Bounds3D {
        match self {
            GroupOrElement::Element(e) => e.bounds,
            GroupOrElement::Group(g) => g.bounds,
        }
    }

    pub fn tags(&self) -> &[Tag] {
        match self {
            GroupOrElement::Element(e) => &e.tags,
            GroupOrElement::Group(g) => &g.tags,
        }
    }

    /// Visit every leaf element with its transform relative to `parent`.
    pub fn visit_leaves<'a, F>(&'a self, parent: &Transform, visit: &mut F)
    where
        F: FnMut(&'a ConstructionElement, Transform),
    {
        match self {
            GroupOrElement::Element(e) => visit(e, parent * e.transform),
            GroupOrElement::Group(g) => {
                let frame = parent * g.transform;
                for child in &g.children {
                    child.visit_leaves(&frame, visit);
                }
            }
        }
    }

    /// Find an element or group by id anywhere below this node.
    pub fn find(&self, id: ElementId) -> Option<&GroupOrElement> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            GroupOrElement::Element(_) => None,
            GroupOrElement::Group(g) => g.children.iter().find_map(|c| c.find(id)),
        }
    }
}

impl From<ConstructionElement> for GroupOrElement {
    fn from(element: ConstructionElement) -> Self {
        GroupOrElement::Element(element)
    }
}

impl From<ConstructionGroup> for GroupOrElement {
    fn from(group: ConstructionGroup) -> Self {
        GroupOrElement::Group(group)
    }
}
