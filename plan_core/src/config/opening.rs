//! # Opening Assemblies
//!
//! How the frame around a door or window is built, and the inheritance chain
//! that picks the assembly for one opening.
//!
//! ## Resolution order
//!
//! The first id that resolves wins:
//!
//! 1. the opening's own override
//! 2. the wall assembly's default opening assembly
//! 3. the catalog's global default
//!
//! Ids in steps 1 and 2 that point at nothing are logged and skipped. Only a
//! global default that is missing or unresolvable is an error, because that
//! is a broken catalog rather than a property of one wall.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ConfigSnapshot;
use crate::errors::{AssemblyKind, PlanError, PlanResult};
use crate::ids::{MaterialId, OpeningAssemblyId};
use crate::units::Length;

/// A named opening frame build-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningAssemblyConfig {
    pub id: OpeningAssemblyId,
    pub name: String,
    /// Clearance around the finished opening on every side
    #[serde(default)]
    pub padding: Length,
    pub kind: OpeningAssemblyType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpeningAssemblyType {
    /// Header above, sill below (windows only)
    Simple {
        header_thickness: Length,
        header_material: MaterialId,
        sill_thickness: Length,
        sill_material: MaterialId,
    },
    /// No framing; the wall infill closes directly around the opening
    Empty,
}

/// Where a resolved opening assembly came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionSource {
    Opening,
    WallAssembly,
    GlobalDefault,
}

/// Resolve the opening assembly for one opening.
///
/// # Errors
///
/// * `PlanError::MissingDefault` - no global default opening assembly is set
/// * `PlanError::AssemblyNotFound` - the global default id does not resolve
pub fn resolve_opening_assembly<'c>(
    config: &'c ConfigSnapshot,
    opening_override: Option<&OpeningAssemblyId>,
    wall_default: Option<&OpeningAssemblyId>,
) -> PlanResult<(&'c OpeningAssemblyConfig, ResolutionSource)> {
    let chain = [
        (ResolutionSource::Opening, opening_override),
        (ResolutionSource::WallAssembly, wall_default),
    ];

    for (source, id) in chain {
        let Some(id) = id else { continue };
        match config.opening_assembly(id) {
            Some(assembly) => {
                debug!(assembly_id = %id, ?source, "Resolved opening assembly");
                return Ok((assembly, source));
            }
            None => warn!(assembly_id = %id, ?source, "Unknown opening assembly, falling back"),
        }
    }

    let global = config
        .defaults
        .opening_assembly_id
        .as_ref()
        .ok_or_else(|| PlanError::missing_default("opening_assembly_id"))?;
    let assembly = config
        .opening_assembly(global)
        .ok_or_else(|| PlanError::assembly_not_found(AssemblyKind::Opening, global.as_str()))?;
    Ok((assembly, ResolutionSource::GlobalDefault))
}
