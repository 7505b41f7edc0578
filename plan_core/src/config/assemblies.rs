//! # Assembly Configuration
//!
//! Plain value records describing how walls, ring beams and floors are built.
//! They are resolved from the catalog before construction starts and never
//! mutated by the engine.
//!
//! ## TOML Example
//!
//! ```toml
//! [[wall_assemblies]]
//! id = "infill-standard"
//! name = "Post and straw infill"
//! base_ring_beam_id = "base-plate"
//! top_ring_beam_id = "top-plate"
//!
//! [wall_assemblies.kind]
//! type = "infill"
//! max_post_spacing = 800.0
//! min_straw_space = 70.0
//! posts = { type = "full", width = 60.0, material = "timber-60x360" }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{PlanError, PlanResult};
use crate::ids::{
    FloorAssemblyId, MaterialId, OpeningAssemblyId, RingBeamAssemblyId, WallAssemblyId,
};
use crate::units::Length;

// ============================================================================
// Wall Assemblies
// ============================================================================

/// A named wall build-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallAssemblyConfig {
    pub id: WallAssemblyId,
    pub name: String,

    /// Opening assembly used when an opening has no override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_assembly_id: Option<OpeningAssemblyId>,

    /// Plate under the wall body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_ring_beam_id: Option<RingBeamAssemblyId>,

    /// Plate on top of the wall body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_ring_beam_id: Option<RingBeamAssemblyId>,

    /// Construction method of the structural core
    pub kind: WallAssemblyType,

    /// Inside and outside finish layers
    #[serde(default)]
    pub layers: LayersConfig,
}

/// Construction method, matched exhaustively by the wall orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WallAssemblyType {
    /// Posts alternating with straw
    Infill(InfillConfig),
    /// Modules placed outside-in, infill in between
    Strawhenge(ModulesConfig),
    /// Modules tiled end to end, infill for the remainder
    Modules(ModulesConfig),
    /// Solid wall of a single material
    NonStrawbale(NonStrawbaleConfig),
}

impl WallAssemblyType {
    pub fn name(&self) -> &'static str {
        match self {
            WallAssemblyType::Infill(_) => "infill",
            WallAssemblyType::Strawhenge(_) => "strawhenge",
            WallAssemblyType::Modules(_) => "modules",
            WallAssemblyType::NonStrawbale(_) => "non-strawbale",
        }
    }

    /// Infill settings used for straw spans, if this method has any.
    pub fn infill(&self) -> Option<&InfillConfig> {
        match self {
            WallAssemblyType::Infill(infill) => Some(infill),
            WallAssemblyType::Strawhenge(modules) | WallAssemblyType::Modules(modules) => Some(&modules.infill),
            WallAssemblyType::NonStrawbale(_) => None,
        }
    }
}

/// Post-and-straw infill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfillConfig {
    /// Widest straw span allowed between two posts
    pub max_post_spacing: Length,
    /// Narrower straw spans are flagged as degraded stuffed fill
    pub min_straw_space: Length,
    /// Straw material, falls back to the catalog default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub straw_material: Option<MaterialId>,
    pub posts: PostConfig,
}

impl InfillConfig {
    pub fn validate(&self, field: &str) -> PlanResult<()> {
        positive(&format!("{}.max_post_spacing", field), self.max_post_spacing)?;
        non_negative(&format!("{}.min_straw_space", field), self.min_straw_space)?;
        positive(&format!("{}.posts.width", field), self.posts.width())?;
        if let PostConfig::Double { thickness, .. } = &self.posts {
            positive(&format!("{}.posts.thickness", field), *thickness)?;
        }
        Ok(())
    }
}

/// Vertical post between straw spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PostConfig {
    /// One member across the whole core
    Full { width: Length, material: MaterialId },
    /// Two members at the faces, infill material between them
    Double {
        width: Length,
        thickness: Length,
        material: MaterialId,
        infill_material: MaterialId,
    },
}

impl PostConfig {
    /// Extent of the post along the wall
    pub fn width(&self) -> Length {
        match self {
            PostConfig::Full { width, .. } | PostConfig::Double { width, .. } => *width,
        }
    }

    pub fn material(&self) -> &MaterialId {
        match self {
            PostConfig::Full { material, .. } | PostConfig::Double { material, .. } => material,
        }
    }
}

/// Prefabricated module walls (strawhenge and plain module tiling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulesConfig {
    pub module: ModuleConfig,
    /// Infill for segments too narrow for a module and around openings
    pub infill: InfillConfig,
}

/// One prefabricated frame module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Fixed module width along the wall
    pub width: Length,
    /// Frame member extent across the wall (double frames only)
    pub frame_thickness: Length,
    /// Frame member extent in the face of the wall
    pub frame_width: Length,
    pub frame_material: MaterialId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub straw_material: Option<MaterialId>,
    pub frame: ModuleFrame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModuleFrame {
    /// Frame members run through the full wall thickness
    Single,
    /// Two face frames held apart by spacer blocks
    Double {
        spacer_size: Length,
        spacer_count: u32,
        spacer_material: MaterialId,
        infill_material: MaterialId,
    },
}

/// Solid wall of one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonStrawbaleConfig {
    pub material: MaterialId,
}

// ============================================================================
// Layers
// ============================================================================

/// One finish layer (plaster, boarding, insulation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub name: String,
    pub material: MaterialId,
    pub thickness: Length,
}

/// Finish layers, listed from the structural core outwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayersConfig {
    #[serde(default)]
    pub inside: Vec<LayerConfig>,
    #[serde(default)]
    pub outside: Vec<LayerConfig>,
}

impl LayersConfig {
    pub fn inside_thickness(&self) -> Length {
        self.inside.iter().map(|l| l.thickness).sum()
    }

    pub fn outside_thickness(&self) -> Length {
        self.outside.iter().map(|l| l.thickness).sum()
    }
}

// ============================================================================
// Ring Beams and Floors
// ============================================================================

/// Base or top plate running along the whole wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingBeamAssemblyConfig {
    pub id: RingBeamAssemblyId,
    pub name: String,
    pub height: Length,
    pub material: MaterialId,
}

/// Floor build-up, needed for finished floor and ceiling levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorAssemblyConfig {
    pub id: FloorAssemblyId,
    pub name: String,
    /// Structural floor thickness the walls below stop under
    pub construction_thickness: Length,
    /// Screed and flooring on top of the construction
    #[serde(default)]
    pub top_layers_thickness: Length,
    /// Ceiling finish under the construction
    #[serde(default)]
    pub bottom_layers_thickness: Length,
}

pub(crate) fn positive(field: &str, value: Length) -> PlanResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PlanError::invalid_input(field, value.to_string(), "Must be a positive length"))
    }
}

pub(crate) fn non_negative(field: &str, value: Length) -> PlanResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PlanError::invalid_input(field, value.to_string(), "Must not be negative"))
    }
}
