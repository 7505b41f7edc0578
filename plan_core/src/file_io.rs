//! # File I/O Module
//!
//! Loading the engine's two input snapshots:
//! - **Projects**: JSON (`.json`), schema version checked on load
//! - **Configuration catalogs**: TOML (`.toml`) or JSON, picked by extension
//!
//! ## Example
//!
//! ```rust,no_run
//! use plan_core::file_io::{load_config, load_project};
//! use std::path::Path;
//!
//! let project = load_project(Path::new("house.json"))?;
//! let config = load_config(Path::new("catalog.toml"))?;
//! config.validate()?;
//! # Ok::<(), plan_core::errors::PlanError>(())
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::ConfigSnapshot;
use crate::errors::{PlanError, PlanResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Load a project file.
///
/// # Returns
///
/// * `Err(PlanError::VersionMismatch)` - file schema is incompatible
/// * `Err(PlanError::SerializationError)` - invalid JSON
/// * `Err(PlanError::FileError)` - I/O error
pub fn load_project(path: &Path) -> PlanResult<Project> {
    let contents = read(path)?;
    let project: Project = serde_json::from_str(&contents)
        .map_err(|e| PlanError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    validate_version(&project.meta.version)?;
    debug!(
        path = %path.display(),
        storeys = project.storeys.len(),
        perimeters = project.perimeters.len(),
        "Project loaded"
    );
    Ok(project)
}

/// Load a configuration catalog. `.json` files are parsed as JSON, anything
/// else as TOML. The catalog is not validated here.
pub fn load_config(path: &Path) -> PlanResult<ConfigSnapshot> {
    let contents = read(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&contents)
            .map_err(|e| PlanError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))
    } else {
        toml::from_str(&contents)
            .map_err(|e| PlanError::serialization(format!("Invalid TOML in {}: {}", path.display(), e)))
    }
}

fn read(path: &Path) -> PlanResult<String> {
    fs::read_to_string(path).map_err(|e| PlanError::file_error("read", path.display().to_string(), e.to_string()))
}

/// Major versions must match; in 0.x a newer minor is rejected too.
fn validate_version(file_version: &str) -> PlanResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);
    let mismatch = || PlanError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, ..], [current_major, ..]) if file_major != current_major => Err(mismatch()),
        ([0, file_minor, ..], [0, current_minor, ..]) if file_minor > current_minor => Err(mismatch()),
        ([_, ..], [_, ..]) => Ok(()),
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Storey;
    use tempfile::tempdir;

    fn write_project(path: &Path, project: &Project) {
        fs::write(path, serde_json::to_string_pretty(project).unwrap()).unwrap();
    }

    #[test]
    fn test_load_project() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("house.json");

        let mut project = Project::new("Test house");
        project.storeys.push(Storey::new("ground", "Ground floor", 0, 2800.0, "floor-standard"));
        write_project(&path, &project);

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.meta.name, "Test house");
        assert_eq!(loaded.storeys.len(), 1);
        assert_eq!(loaded.storeys[0].height, 2800.0);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.json");
        let mut project = Project::new("Future");
        project.meta.version = "9.0.0".to_string();
        write_project(&path, &project);

        let err = load_project(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ \"meta\": ").unwrap();
        assert_eq!(load_project(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_project(&dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(!err.is_integrity_failure());
    }

    #[test]
    fn test_load_config_by_extension() {
        let dir = tempdir().unwrap();
        let builtin = ConfigSnapshot::builtin();

        let toml_path = dir.path().join("catalog.toml");
        fs::write(&toml_path, toml::to_string(&builtin).unwrap()).unwrap();
        assert_eq!(load_config(&toml_path).unwrap(), builtin);

        let json_path = dir.path().join("catalog.json");
        fs::write(&json_path, serde_json::to_string(&builtin).unwrap()).unwrap();
        assert_eq!(load_config(&json_path).unwrap(), builtin);

        fs::write(&toml_path, "wall_assemblies = 3").unwrap();
        assert_eq!(load_config(&toml_path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
    }
}
