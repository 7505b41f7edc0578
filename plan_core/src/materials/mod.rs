//! # Materials
//!
//! Catalog material definitions. A construction element only stores the
//! [`MaterialId`]; renderers and bill-of-materials consumers resolve it
//! against the catalog.
//!
//! ## Material Kinds
//!
//! - **Strawbale**: bale dimensions and packing tolerances (see [`strawbale`])
//! - **Dimensional**: sawn timber with a nominal cross section
//! - **Sheet**: boards and panels with a nominal thickness
//! - **Generic**: anything else (plaster, masonry, insulation)
//!
//! ## Example
//!
//! ```rust
//! use plan_core::materials::{Material, MaterialKind};
//!
//! let timber = Material::dimensional("timber-60x120", "Post 60x120", "#c8a165", 60.0, 120.0);
//! assert!(matches!(timber.kind, MaterialKind::Dimensional { .. }));
//! ```

pub mod strawbale;

pub use strawbale::{BaleCategory, StrawbaleProfile};

use serde::{Deserialize, Serialize};

use crate::ids::MaterialId;
use crate::units::Length;

/// A catalog material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    /// Display name
    pub name: String,
    /// Display colour as `#rrggbb`
    #[serde(default = "default_color")]
    pub color: String,
    pub kind: MaterialKind,
}

fn default_color() -> String {
    "#999999".to_string()
}

/// Material kind with kind-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialKind {
    Strawbale(StrawbaleProfile),
    Dimensional { width: Length, thickness: Length },
    Sheet { thickness: Length },
    Generic,
}

impl Material {
    pub fn strawbale(id: &str, name: &str, color: &str, profile: StrawbaleProfile) -> Self {
        Material {
            id: MaterialId::from(id),
            name: name.to_string(),
            color: color.to_string(),
            kind: MaterialKind::Strawbale(profile),
        }
    }

    pub fn dimensional(id: &str, name: &str, color: &str, width: Length, thickness: Length) -> Self {
        Material {
            id: MaterialId::from(id),
            name: name.to_string(),
            color: color.to_string(),
            kind: MaterialKind::Dimensional { width, thickness },
        }
    }

    pub fn sheet(id: &str, name: &str, color: &str, thickness: Length) -> Self {
        Material {
            id: MaterialId::from(id),
            name: name.to_string(),
            color: color.to_string(),
            kind: MaterialKind::Sheet { thickness },
        }
    }

    pub fn generic(id: &str, name: &str, color: &str) -> Self {
        Material {
            id: MaterialId::from(id),
            name: name.to_string(),
            color: color.to_string(),
            kind: MaterialKind::Generic,
        }
    }

    /// Strawbale profile when this is a straw material.
    pub fn strawbale_profile(&self) -> Option<&StrawbaleProfile> {
        match &self.kind {
            MaterialKind::Strawbale(profile) => Some(profile),
            _ => None,
        }
    }

    /// Short kind label for summaries
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            MaterialKind::Strawbale(_) => "strawbale",
            MaterialKind::Dimensional { .. } => "dimensional",
            MaterialKind::Sheet { .. } => "sheet",
            MaterialKind::Generic => "generic",
        }
    }
}

/// Materials shipped with the built-in catalog.
pub fn builtin_materials() -> Vec<Material> {
    vec![
        Material::strawbale("straw-bale", "Straw bale", "#e8c872", StrawbaleProfile::default()),
        Material::dimensional("timber-60x360", "Post 60x360", "#c8a165", 60.0, 360.0),
        Material::dimensional("timber-60x120", "Timber 60x120", "#c8a165", 60.0, 120.0),
        Material::dimensional("timber-120x360", "Plate 120x360", "#b08850", 120.0, 360.0),
        Material::dimensional("timber-36x120", "Frame 36x120", "#d2ad78", 36.0, 120.0),
        Material::sheet("osb-18", "OSB 18", "#d9b77e", 18.0),
        Material::generic("wood-fibre", "Wood fibre insulation", "#8b6b4a"),
        Material::generic("clay-plaster", "Clay plaster", "#b5835a"),
        Material::generic("lime-plaster", "Lime plaster", "#efeadc"),
        Material::generic("brick", "Brick", "#a0522d"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_serialization() {
        let material = Material::sheet("osb-18", "OSB 18", "#d9b77e", 18.0);
        let json = serde_json::to_string(&material).unwrap();
        assert!(json.contains("\"type\":\"sheet\""));
        let roundtrip: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, material);
    }

    #[test]
    fn test_builtin_has_straw() {
        let materials = builtin_materials();
        let straw = materials.iter().find(|m| m.id.as_str() == "straw-bale").unwrap();
        assert!(straw.strawbale_profile().is_some());
        assert_eq!(straw.kind_name(), "strawbale");
    }

    #[test]
    fn test_default_color() {
        let json = r#"{"id":"x","name":"X","kind":{"type":"generic"}}"#;
        let material: Material = serde_json::from_str(json).unwrap();
        assert_eq!(material.color, "#999999");
    }
}
