//! Strawbale material profile and piece classification.
//!
//! Every straw piece the packer emits is classified by how close it comes to
//! a whole bale. The category ends up as the element's tag and drives both
//! rendering and bill-of-materials counts downstream.
//!
//! ## Classification
//!
//! | Category | Rule |
//! |----------|------|
//! | `FullBale` | thickness, height and length all within a whole bale's range |
//! | `PartialBale` | a whole bale shortened in length (down to half the minimum length) or cut in height (down to the top cutoff limit) |
//! | `Flakes` | thickness matches, both face dimensions at least one flake |
//! | `Stuffed` | anything else: loose straw stuffed by hand |
//!
//! Bales may lie in courses or stand on end, so both orientations are tried.

use serde::{Deserialize, Serialize};

use crate::units::Length;

/// Dimensions and tolerances of one kind of strawbale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrawbaleProfile {
    /// Shortest bale the baler produces
    pub bale_min_length: Length,
    /// Longest bale the baler produces; courses are tiled in these steps
    pub bale_max_length: Length,
    /// Bale height in a course
    pub bale_height: Length,
    /// Bale width, which has to match the straw void thickness
    pub bale_width: Length,
    /// Allowed deviation when matching dimensions
    pub tolerance: Length,
    /// Smallest remainder height that still gets its own top course
    pub top_cutoff_limit: Length,
    /// Smallest piece that can be built from flakes instead of stuffing
    pub flake_size: Length,
}

impl Default for StrawbaleProfile {
    fn default() -> Self {
        StrawbaleProfile {
            bale_min_length: 800.0,
            bale_max_length: 900.0,
            bale_height: 500.0,
            bale_width: 360.0,
            tolerance: 2.0,
            top_cutoff_limit: 100.0,
            flake_size: 70.0,
        }
    }
}

/// How a straw piece relates to a whole bale. Ordered best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaleCategory {
    FullBale,
    PartialBale,
    Flakes,
    Stuffed,
}

impl StrawbaleProfile {
    /// Bales can be retied down to half their minimum length.
    pub fn min_partial_length(&self) -> Length {
        self.bale_min_length / 2.0
    }

    /// Does `thickness` match the bale width within tolerance?
    pub fn matches_width(&self, thickness: Length) -> bool {
        (thickness - self.bale_width).abs() <= self.tolerance
    }

    /// Does a course of `height` count as bale height? Courses stretched by
    /// less than the top cutoff limit still hold whole bales.
    pub fn matches_height(&self, height: Length) -> bool {
        (height - self.bale_height).abs() <= self.tolerance
            || (height > self.bale_height && height - self.bale_height < self.top_cutoff_limit)
    }

    pub fn matches_length(&self, length: Length) -> bool {
        length >= self.bale_min_length - self.tolerance && length <= self.bale_max_length + self.tolerance
    }

    /// Classify a piece by its extent along the wall, across it and up.
    pub fn classify(&self, length: Length, thickness: Length, height: Length) -> BaleCategory {
        if !self.matches_width(thickness) {
            return BaleCategory::Stuffed;
        }

        let lying = self.classify_oriented(length, height);
        let standing = self.classify_oriented(height, length);
        if let Some(best) = lying.into_iter().chain(standing).min() {
            return best;
        }

        if length >= self.flake_size && height >= self.flake_size {
            BaleCategory::Flakes
        } else {
            BaleCategory::Stuffed
        }
    }

    fn classify_oriented(&self, length: Length, height: Length) -> Option<BaleCategory> {
        let height_match = self.matches_height(height);
        let length_match = self.matches_length(length);

        if height_match && length_match {
            return Some(BaleCategory::FullBale);
        }
        if height_match
            && length >= self.min_partial_length()
            && length < self.bale_min_length - self.tolerance
        {
            return Some(BaleCategory::PartialBale);
        }
        if length_match && height >= self.top_cutoff_limit && height < self.bale_height - self.tolerance {
            return Some(BaleCategory::PartialBale);
        }
        None
    }
}
