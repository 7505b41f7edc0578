//! # Identifiers
//!
//! String-backed identifier newtypes for input records and catalog entries.
//! They serialize as plain strings so project and catalog files stay readable
//! (`"wall_assembly_id": "infill-standard"`), while the type system keeps a
//! wall id from being passed where a storey id is expected.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Storey (building level) id
    StoreyId
);
define_id!(
    /// Perimeter (closed wall loop) id
    PerimeterId
);
define_id!(
    /// Wall id, unique within a perimeter
    WallId
);
define_id!(
    /// Perimeter corner id
    CornerId
);
define_id!(
    /// Opening id, unique within a wall
    OpeningId
);
define_id!(
    /// Catalog material id
    MaterialId
);
define_id!(
    /// Wall assembly id
    WallAssemblyId
);
define_id!(
    /// Opening assembly id
    OpeningAssemblyId
);
define_id!(
    /// Ring beam (base/top plate) assembly id
    RingBeamAssemblyId
);
define_id!(
    /// Floor assembly id
    FloorAssemblyId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_string() {
        let id = WallId::new("north");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"north\"");
        let back: WallId = serde_json::from_str("\"north\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(MaterialId::from("straw-bale").to_string(), "straw-bale");
    }
}
