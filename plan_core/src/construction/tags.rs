//! Classification tags attached to elements, groups and measurements.
//! Renderers pick styles from them and the bill of materials groups by them.

use serde::{Deserialize, Serialize};

use crate::materials::BaleCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tag {
    // Structure
    Post,
    PostInfill,
    BasePlate,
    TopPlate,
    Header,
    Sill,
    // Straw
    FullBale,
    PartialBale,
    Flakes,
    Stuffed,
    // Modules
    Module,
    ModuleFrame,
    ModuleSpacer,
    ModuleInfill,
    // Other wall bodies
    NonStrawbale,
    InsideLayer,
    OutsideLayer,
    // Measurements
    PostSpacing,
    OpeningSpacing,
    OpeningDimension,
    ModuleDimension,
    WallDimension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagCategory {
    Structure,
    Straw,
    Module,
    Finish,
    Measurement,
}

impl Tag {
    pub fn category(self) -> TagCategory {
        match self {
            Tag::Post | Tag::PostInfill | Tag::BasePlate | Tag::TopPlate | Tag::Header | Tag::Sill => {
                TagCategory::Structure
            }
            Tag::FullBale | Tag::PartialBale | Tag::Flakes | Tag::Stuffed => TagCategory::Straw,
            Tag::Module | Tag::ModuleFrame | Tag::ModuleSpacer | Tag::ModuleInfill => TagCategory::Module,
            Tag::NonStrawbale | Tag::InsideLayer | Tag::OutsideLayer => TagCategory::Finish,
            Tag::PostSpacing
            | Tag::OpeningSpacing
            | Tag::OpeningDimension
            | Tag::ModuleDimension
            | Tag::WallDimension => TagCategory::Measurement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tag::Post => "Post",
            Tag::PostInfill => "Post infill",
            Tag::BasePlate => "Base plate",
            Tag::TopPlate => "Top plate",
            Tag::Header => "Header",
            Tag::Sill => "Sill",
            Tag::FullBale => "Full bale",
            Tag::PartialBale => "Partial bale",
            Tag::Flakes => "Flakes",
            Tag::Stuffed => "Stuffed straw",
            Tag::Module => "Module",
            Tag::ModuleFrame => "Module frame",
            Tag::ModuleSpacer => "Module spacer",
            Tag::ModuleInfill => "Module infill",
            Tag::NonStrawbale => "Solid wall",
            Tag::InsideLayer => "Inside layer",
            Tag::OutsideLayer => "Outside layer",
            Tag::PostSpacing => "Post spacing",
            Tag::OpeningSpacing => "Opening spacing",
            Tag::OpeningDimension => "Opening dimension",
            Tag::ModuleDimension => "Module dimension",
            Tag::WallDimension => "Wall dimension",
        }
    }
}

impl From<BaleCategory> for Tag {
    fn from(category: BaleCategory) -> Self {
        match category {
            BaleCategory::FullBale => Tag::FullBale,
            BaleCategory::PartialBale => Tag::PartialBale,
            BaleCategory::Flakes => Tag::Flakes,
            BaleCategory::Stuffed => Tag::Stuffed,
        }
    }
}
