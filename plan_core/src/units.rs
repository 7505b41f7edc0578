//! # Unit Types
//!
//! The engine works in millimetres throughout. Lengths are plain `f64` values
//! (aliased as [`Length`]) so they flow through nalgebra vectors without
//! wrapping.
//!
//! Wall inputs are normally whole millimetres, which `f64` represents
//! exactly, so sums of span widths reproduce the wall length without drift.
//!
//! ## Example
//!
//! ```rust
//! use plan_core::units::format_length;
//!
//! assert_eq!(format_length(1485.0), "1485 mm");
//! assert_eq!(format_length(12.4), "12.4 mm");
//! ```

/// A length in millimetres.
pub type Length = f64;

/// Tolerance for comparing lengths that went through arithmetic.
pub const LENGTH_EPSILON: Length = 1e-6;

/// Render a length for measurement labels and issue messages.
///
/// Whole millimetres print without decimals, anything else with one.
pub fn format_length(value: Length) -> String {
    if (value - value.round()).abs() < 0.05 {
        format!("{:.0} mm", value)
    } else {
        format!("{:.1} mm", value)
    }
}
