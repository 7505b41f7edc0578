//! # plan_core - Strawbale Wall Construction Planning Engine
//!
//! `plan_core` turns a wall of a building perimeter into a detailed construction
//! plan: posts, bales, modules, headers, sills, plates and finish layers, plus
//! the dimension lines, highlighted regions and problems a builder needs to
//! see. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: construction reads an immutable project and configuration
//!   snapshot and returns a fresh model; walls can be built in parallel
//! - **JSON-First**: all records, configuration and results implement Serialize/Deserialize
//! - **Rich Errors**: structured [`PlanError`]s for broken references, while
//!   construction problems are reported inside the model without aborting it
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plan_core::config::ConfigSnapshot;
//! use plan_core::construction::construct_wall;
//! use plan_core::ids::{PerimeterId, WallId};
//! use std::path::Path;
//!
//! let project = plan_core::load_project(Path::new("house.json"))?;
//! let config = ConfigSnapshot::builtin();
//! let model = construct_wall(&project, &config, &PerimeterId::from("ground"), &WallId::from("south"))?;
//!
//! for issue in &model.errors {
//!     println!("{}", issue.description);
//! }
//! let json = serde_json::to_string_pretty(&model).unwrap();
//! # Ok::<(), plan_core::PlanError>(())
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Input records: storeys, perimeters, walls, corners, openings
//! - [`config`] - Assemblies, materials and global defaults
//! - [`construction`] - The wall construction engine and its result model
//! - [`geometry`] - Vectors, transforms, boxes and shapes
//! - [`materials`] - Material catalog and strawbale profiles
//! - [`units`] - Lengths and tolerances
//! - [`ids`] - Typed identifiers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Loading project and catalog files

pub mod config;
pub mod construction;
pub mod errors;
pub mod file_io;
pub mod geometry;
pub mod ids;
pub mod materials;
pub mod project;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use config::ConfigSnapshot;
pub use construction::{construct_perimeter, construct_wall, ConstructionModel};
pub use errors::{PlanError, PlanResult};
pub use file_io::{load_config, load_project};
pub use project::{Project, ProjectMetadata};
