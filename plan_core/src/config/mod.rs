//! # Configuration Catalog
//!
//! The immutable snapshot of everything the engine looks up by id: materials,
//! wall/opening/ring-beam/floor assemblies and the global defaults. One
//! snapshot is shared read-only by every wall of a construction pass.
//!
//! Lookups return `Option` so that "not configured" stays distinguishable
//! from "configured but invalid"; the orchestrator turns a `None` into an
//! integrity [`PlanError`].
//!
//! ## Example
//!
//! ```rust
//! use plan_core::config::ConfigSnapshot;
//! use plan_core::ids::WallAssemblyId;
//!
//! let config = ConfigSnapshot::builtin();
//! let infill = config.wall_assembly(&WallAssemblyId::from("infill-standard"));
//! assert!(infill.is_some());
//! assert!(config.validate().is_ok());
//! ```

pub mod assemblies;
pub mod opening;

pub use assemblies::{
    FloorAssemblyConfig, InfillConfig, LayerConfig, LayersConfig, ModuleConfig, ModuleFrame,
    ModulesConfig, NonStrawbaleConfig, PostConfig, RingBeamAssemblyConfig, WallAssemblyConfig,
    WallAssemblyType,
};
pub use opening::{resolve_opening_assembly, OpeningAssemblyConfig, OpeningAssemblyType, ResolutionSource};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{PlanError, PlanResult};
use crate::ids::{
    FloorAssemblyId, MaterialId, OpeningAssemblyId, RingBeamAssemblyId, WallAssemblyId,
};
use crate::materials::{builtin_materials, Material, StrawbaleProfile};
use assemblies::{non_negative, positive};

/// Catalog-wide fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDefaults {
    /// Last link of the opening assembly inheritance chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_assembly_id: Option<OpeningAssemblyId>,
    /// Straw used when an infill or module does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub straw_material_id: Option<MaterialId>,
}

/// Read-only configuration snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub defaults: ConfigDefaults,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub wall_assemblies: Vec<WallAssemblyConfig>,
    #[serde(default)]
    pub opening_assemblies: Vec<OpeningAssemblyConfig>,
    #[serde(default)]
    pub ring_beam_assemblies: Vec<RingBeamAssemblyConfig>,
    #[serde(default)]
    pub floor_assemblies: Vec<FloorAssemblyConfig>,
}

static BUILTIN: Lazy<ConfigSnapshot> = Lazy::new(build_builtin);

impl ConfigSnapshot {
    /// The catalog shipped with the engine.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn material(&self, id: &MaterialId) -> Option<&Material> {
        self.materials.iter().find(|m| &m.id == id)
    }

    pub fn wall_assembly(&self, id: &WallAssemblyId) -> Option<&WallAssemblyConfig> {
        self.wall_assemblies.iter().find(|a| &a.id == id)
    }

    pub fn opening_assembly(&self, id: &OpeningAssemblyId) -> Option<&OpeningAssemblyConfig> {
        self.opening_assemblies.iter().find(|a| &a.id == id)
    }

    pub fn ring_beam_assembly(&self, id: &RingBeamAssemblyId) -> Option<&RingBeamAssemblyConfig> {
        self.ring_beam_assemblies.iter().find(|a| &a.id == id)
    }

    pub fn floor_assembly(&self, id: &FloorAssemblyId) -> Option<&FloorAssemblyConfig> {
        self.floor_assemblies.iter().find(|a| &a.id == id)
    }

    /// Material that has to exist.
    pub fn require_material(&self, id: &MaterialId) -> PlanResult<&Material> {
        self.material(id)
            .ok_or_else(|| PlanError::material_not_found(id.as_str()))
    }

    /// Resolve a straw material: the explicit id, else the catalog default.
    ///
    /// # Errors
    ///
    /// * `MissingDefault` - neither is set
    /// * `MaterialNotFound` - the id does not resolve
    /// * `InvalidInput` - the material is not a strawbale material
    pub fn resolve_straw(&self, explicit: Option<&MaterialId>) -> PlanResult<(MaterialId, StrawbaleProfile)> {
        let id = explicit
            .or(self.defaults.straw_material_id.as_ref())
            .ok_or_else(|| PlanError::missing_default("straw_material_id"))?;
        let material = self.require_material(id)?;
        let profile = material.strawbale_profile().ok_or_else(|| {
            PlanError::invalid_input("straw_material", id.as_str(), "Material is not a strawbale material")
        })?;
        Ok((id.clone(), *profile))
    }

    /// Check every dimension in the catalog is usable.
    pub fn validate(&self) -> PlanResult<()> {
        for material in &self.materials {
            if let Some(profile) = material.strawbale_profile() {
                let field = format!("materials.{}", material.id);
                positive(&format!("{}.bale_min_length", field), profile.bale_min_length)?;
                positive(&format!("{}.bale_height", field), profile.bale_height)?;
                positive(&format!("{}.bale_width", field), profile.bale_width)?;
                non_negative(&format!("{}.tolerance", field), profile.tolerance)?;
                if profile.bale_max_length < profile.bale_min_length {
                    return Err(PlanError::invalid_input(
                        format!("{}.bale_max_length", field),
                        profile.bale_max_length.to_string(),
                        "Maximum bale length is below the minimum",
                    ));
                }
            }
        }

        for assembly in &self.wall_assemblies {
            let field = format!("wall_assemblies.{}", assembly.id);
            match &assembly.kind {
                WallAssemblyType::Infill(infill) => infill.validate(&field)?,
                WallAssemblyType::Strawhenge(modules) | WallAssemblyType::Modules(modules) => {
                    modules.infill.validate(&format!("{}.infill", field))?;
                    let module = &modules.module;
                    positive(&format!("{}.module.width", field), module.width)?;
                    positive(&format!("{}.module.frame_width", field), module.frame_width)?;
                    if module.width <= 2.0 * module.frame_width {
                        return Err(PlanError::invalid_input(
                            format!("{}.module.width", field),
                            module.width.to_string(),
                            "Module must be wider than two frame members",
                        ));
                    }
                }
                WallAssemblyType::NonStrawbale(_) => {}
            }
            for layer in assembly.layers.inside.iter().chain(&assembly.layers.outside) {
                positive(&format!("{}.layers.{}", field, layer.name), layer.thickness)?;
            }
        }

        for assembly in &self.opening_assemblies {
            let field = format!("opening_assemblies.{}", assembly.id);
            non_negative(&format!("{}.padding", field), assembly.padding)?;
            if let OpeningAssemblyType::Simple {
                header_thickness,
                sill_thickness,
                ..
            } = &assembly.kind
            {
                positive(&format!("{}.header_thickness", field), *header_thickness)?;
                positive(&format!("{}.sill_thickness", field), *sill_thickness)?;
            }
        }

        for ring_beam in &self.ring_beam_assemblies {
            positive(&format!("ring_beam_assemblies.{}.height", ring_beam.id), ring_beam.height)?;
        }

        for floor in &self.floor_assemblies {
            let field = format!("floor_assemblies.{}", floor.id);
            non_negative(&format!("{}.construction_thickness", field), floor.construction_thickness)?;
            non_negative(&format!("{}.top_layers_thickness", field), floor.top_layers_thickness)?;
            non_negative(&format!("{}.bottom_layers_thickness", field), floor.bottom_layers_thickness)?;
        }

        Ok(())
    }
}

fn build_builtin() -> ConfigSnapshot {
    let standard_infill = InfillConfig {
        max_post_spacing: 800.0,
        min_straw_space: 70.0,
        posts: PostConfig::Full {
            width: 60.0,
            material: MaterialId::from("timber-60x360"),
        },
        straw_material: None,
    };

    let plates = |kind: WallAssemblyType, id: &str, name: &str| WallAssemblyConfig {
        id: WallAssemblyId::from(id),
        name: name.to_string(),
        kind,
        layers: LayersConfig {
            inside: vec![LayerConfig {
                name: "Clay plaster".to_string(),
                material: MaterialId::from("clay-plaster"),
                thickness: 30.0,
            }],
            outside: vec![LayerConfig {
                name: "Lime plaster".to_string(),
                material: MaterialId::from("lime-plaster"),
                thickness: 30.0,
            }],
        },
        opening_assembly_id: None,
        base_ring_beam_id: Some(RingBeamAssemblyId::from("base-plate")),
        top_ring_beam_id: Some(RingBeamAssemblyId::from("top-plate")),
    };

    let module = ModuleConfig {
        width: 920.0,
        frame_thickness: 60.0,
        frame_width: 60.0,
        frame_material: MaterialId::from("timber-60x120"),
        straw_material: None,
        frame: ModuleFrame::Single,
    };

    ConfigSnapshot {
        defaults: ConfigDefaults {
            opening_assembly_id: Some(OpeningAssemblyId::from("opening-standard")),
            straw_material_id: Some(MaterialId::from("straw-bale")),
        },
        materials: builtin_materials(),
        wall_assemblies: vec![
            plates(
                WallAssemblyType::Infill(standard_infill.clone()),
                "infill-standard",
                "Post and straw infill",
            ),
            plates(
                WallAssemblyType::Strawhenge(ModulesConfig {
                    module: module.clone(),
                    infill: standard_infill.clone(),
                }),
                "strawhenge-standard",
                "Strawhenge",
            ),
            plates(
                WallAssemblyType::Modules(ModulesConfig {
                    module: ModuleConfig {
                        frame: ModuleFrame::Double {
                            spacer_size: 120.0,
                            spacer_count: 3,
                            spacer_material: MaterialId::from("timber-60x120"),
                            infill_material: MaterialId::from("wood-fibre"),
                        },
                        ..module
                    },
                    infill: standard_infill,
                }),
                "modules-standard",
                "Prefabricated modules",
            ),
            WallAssemblyConfig {
                id: WallAssemblyId::from("non-strawbale-brick"),
                name: "Brick wall".to_string(),
                kind: WallAssemblyType::NonStrawbale(NonStrawbaleConfig {
                    material: MaterialId::from("brick"),
                }),
                layers: LayersConfig::default(),
                opening_assembly_id: Some(OpeningAssemblyId::from("opening-empty")),
                base_ring_beam_id: None,
                top_ring_beam_id: None,
            },
        ],
        opening_assemblies: vec![
            OpeningAssemblyConfig {
                id: OpeningAssemblyId::from("opening-standard"),
                name: "Header and sill".to_string(),
                padding: 15.0,
                kind: OpeningAssemblyType::Simple {
                    header_thickness: 60.0,
                    header_material: MaterialId::from("timber-60x360"),
                    sill_thickness: 60.0,
                    sill_material: MaterialId::from("timber-60x360"),
                },
            },
            OpeningAssemblyConfig {
                id: OpeningAssemblyId::from("opening-empty"),
                name: "Unframed".to_string(),
                padding: 0.0,
                kind: OpeningAssemblyType::Empty,
            },
        ],
        ring_beam_assemblies: vec![
            RingBeamAssemblyConfig {
                id: RingBeamAssemblyId::from("base-plate"),
                name: "Base plate".to_string(),
                height: 120.0,
                material: MaterialId::from("timber-120x360"),
            },
            RingBeamAssemblyConfig {
                id: RingBeamAssemblyId::from("top-plate"),
                name: "Top plate".to_string(),
                height: 120.0,
                material: MaterialId::from("timber-120x360"),
            },
        ],
        floor_assemblies: vec![FloorAssemblyConfig {
            id: FloorAssemblyId::from("floor-standard"),
            name: "Timber joist floor".to_string(),
            construction_thickness: 220.0,
            top_layers_thickness: 60.0,
            bottom_layers_thickness: 30.0,
        }],
    }
}
