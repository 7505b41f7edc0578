//! # Error Types
//!
//! Structured error types for plan_core. A `PlanError` means the caller handed
//! the engine something it cannot work with at all: an id that does not
//! resolve, a catalog without a required default, a file that cannot be read.
//!
//! Construction-quality problems (a header that does not fit, a wall too thick
//! for a bale) are *not* errors in this sense. They are recorded as
//! [`ConstructionIssue`](crate::construction::ConstructionIssue) data inside
//! the returned model and never abort a construction call.
//!
//! ## Example
//!
//! ```rust
//! use plan_core::errors::{PlanError, PlanResult};
//!
//! fn validate_spacing(max_post_spacing: f64) -> PlanResult<()> {
//!     if max_post_spacing <= 0.0 {
//!         return Err(PlanError::invalid_input(
//!             "max_post_spacing",
//!             max_post_spacing.to_string(),
//!             "Post spacing must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for plan_core operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Which kind of assembly a failed lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssemblyKind {
    Wall,
    Opening,
    RingBeam,
    Floor,
}

impl std::fmt::Display for AssemblyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssemblyKind::Wall => "wall",
            AssemblyKind::Opening => "opening",
            AssemblyKind::RingBeam => "ring beam",
            AssemblyKind::Floor => "floor",
        };
        f.write_str(name)
    }
}

/// Structured error type for planning operations.
///
/// Every variant except the file variants is an integrity failure: the
/// wall cannot be constructed at all and no partial model is returned.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PlanError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Perimeter id does not exist in the project
    #[error("Perimeter not found: {perimeter_id}")]
    PerimeterNotFound { perimeter_id: String },

    /// Wall id does not exist on the perimeter
    #[error("Wall not found: {wall_id} on perimeter {perimeter_id}")]
    WallNotFound {
        perimeter_id: String,
        wall_id: String,
    },

    /// Storey id does not exist in the project
    #[error("Storey not found: {storey_id}")]
    StoreyNotFound { storey_id: String },

    /// An assembly referenced by id does not exist in the configuration
    #[error("{kind} assembly not found: {id}")]
    AssemblyNotFound { kind: AssemblyKind, id: String },

    /// Material not found in the configuration
    #[error("Material not found: {material_id}")]
    MaterialNotFound { material_id: String },

    /// A global default the engine relies on is not configured
    #[error("Missing global default: {setting}")]
    MissingDefault { setting: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl PlanError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        PlanError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a PerimeterNotFound error
    pub fn perimeter_not_found(perimeter_id: impl Into<String>) -> Self {
        PlanError::PerimeterNotFound {
            perimeter_id: perimeter_id.into(),
        }
    }

    /// Create a WallNotFound error
    pub fn wall_not_found(perimeter_id: impl Into<String>, wall_id: impl Into<String>) -> Self {
        PlanError::WallNotFound {
            perimeter_id: perimeter_id.into(),
            wall_id: wall_id.into(),
        }
    }

    /// Create a StoreyNotFound error
    pub fn storey_not_found(storey_id: impl Into<String>) -> Self {
        PlanError::StoreyNotFound {
            storey_id: storey_id.into(),
        }
    }

    /// Create an AssemblyNotFound error
    pub fn assembly_not_found(kind: AssemblyKind, id: impl Into<String>) -> Self {
        PlanError::AssemblyNotFound { kind, id: id.into() }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_id: impl Into<String>) -> Self {
        PlanError::MaterialNotFound {
            material_id: material_id.into(),
        }
    }

    /// Create a MissingDefault error
    pub fn missing_default(setting: impl Into<String>) -> Self {
        PlanError::MissingDefault {
            setting: setting.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        PlanError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        PlanError::SerializationError { reason: reason.into() }
    }

    /// True for failures caused by ids or defaults that do not resolve.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            PlanError::PerimeterNotFound { .. }
                | PlanError::WallNotFound { .. }
                | PlanError::StoreyNotFound { .. }
                | PlanError::AssemblyNotFound { .. }
                | PlanError::MaterialNotFound { .. }
                | PlanError::MissingDefault { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PlanError::InvalidInput { .. } => "INVALID_INPUT",
            PlanError::PerimeterNotFound { .. } => "PERIMETER_NOT_FOUND",
            PlanError::WallNotFound { .. } => "WALL_NOT_FOUND",
            PlanError::StoreyNotFound { .. } => "STOREY_NOT_FOUND",
            PlanError::AssemblyNotFound { .. } => "ASSEMBLY_NOT_FOUND",
            PlanError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            PlanError::MissingDefault { .. } => "MISSING_DEFAULT",
            PlanError::FileError { .. } => "FILE_ERROR",
            PlanError::SerializationError { .. } => "SERIALIZATION_ERROR",
            PlanError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = PlanError::assembly_not_found(AssemblyKind::Opening, "window-std");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("AssemblyNotFound"));
        let roundtrip: PlanError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(PlanError::wall_not_found("p1", "w1").error_code(), "WALL_NOT_FOUND");
        assert_eq!(PlanError::missing_default("opening_assembly_id").error_code(), "MISSING_DEFAULT");
    }

    #[test]
    fn test_integrity_classification() {
        assert!(PlanError::storey_not_found("s1").is_integrity_failure());
        assert!(PlanError::material_not_found("straw").is_integrity_failure());
        assert!(!PlanError::file_error("read", "x.json", "gone").is_integrity_failure());
    }

    #[test]
    fn test_display_message() {
        let error = PlanError::assembly_not_found(AssemblyKind::RingBeam, "rb-1");
        assert_eq!(error.to_string(), "ring beam assembly not found: rb-1");
    }
}
