//! # Straw Packing
//!
//! Fills a rectangular void with bales.
//!
//! ## Layout
//!
//! The void thickness (Y) has to match the bale width. Outside tolerance the
//! void becomes one stuffed piece with an issue: too thick is an error, too
//! thin a warning. Otherwise the height (Z) picks the layout:
//!
//! | Void height | Layout |
//! |-------------|--------|
//! | about one bale height | one course of lying bales |
//! | within the bale length range | bales standing on end, `bale_height` wide |
//! | anything else | courses of `bale_height`, plus a top row if the remainder reaches `top_cutoff_limit`; smaller remainders stretch the last course |
//!
//! Courses are tiled in `bale_max_length` steps and alternate their starting
//! edge (running bond). A last piece within tolerance of zero is absorbed into
//! its neighbour. Every piece is tagged by [`StrawbaleProfile::classify`].

use super::element::ConstructionElement;
use super::results::{ConstructionResult, ResultStream, Severity};
use super::tags::Tag;
use crate::geometry::{Axis, SpatialArea};
use crate::ids::MaterialId;
use crate::materials::StrawbaleProfile;
use crate::units::{Length, LENGTH_EPSILON};

/// Fill `area` with straw.
pub fn construct_straw(area: &SpatialArea, profile: &StrawbaleProfile, material: &MaterialId) -> ResultStream<'static> {
    if area.is_empty() {
        return ResultStream::empty();
    }

    let thickness = area.extent(Axis::Y);
    if thickness > profile.bale_width + profile.tolerance {
        return ResultStream::element_with_issue(
            stuffed(area, material),
            Severity::Error,
            "Wall is too thick for a single strawbale",
        );
    }
    if thickness < profile.bale_width - profile.tolerance {
        return ResultStream::element_with_issue(
            stuffed(area, material),
            Severity::Warning,
            "Wall is too thin for a single strawbale",
        );
    }

    let pieces = bale_layout(area, profile)
        .into_iter()
        .map(|piece| {
            let category = profile.classify(piece.extent(Axis::X), thickness, piece.extent(Axis::Z));
            ConstructionResult::element(ConstructionElement::cuboid(material, &piece, vec![category.into()]))
        })
        .collect();
    ResultStream::from_results(pieces)
}

fn stuffed(area: &SpatialArea, material: &MaterialId) -> ConstructionElement {
    ConstructionElement::cuboid(material, area, vec![Tag::Stuffed])
}

/// Cut the void into bale-sized pieces.
pub fn bale_layout(area: &SpatialArea, profile: &StrawbaleProfile) -> Vec<SpatialArea> {
    let height = area.extent(Axis::Z);
    let x0 = area.start(Axis::X);
    let x1 = area.end(Axis::X);

    if (height - profile.bale_height).abs() <= profile.tolerance {
        return tile(x0, x1, profile.bale_max_length, profile.tolerance, false)
            .into_iter()
            .map(|(a, b)| area.between(Axis::X, a, b))
            .collect();
    }

    if profile.matches_length(height) {
        return tile(x0, x1, profile.bale_height, profile.tolerance, false)
            .into_iter()
            .map(|(a, b)| area.between(Axis::X, a, b))
            .collect();
    }

    let mut pieces = Vec::new();
    for (i, (z0, z1)) in courses(area.start(Axis::Z), height, profile).into_iter().enumerate() {
        let course = area.between(Axis::Z, z0, z1);
        for (a, b) in tile(x0, x1, profile.bale_max_length, profile.tolerance, i % 2 == 1) {
            pieces.push(course.between(Axis::X, a, b));
        }
    }
    pieces
}

/// Horizontal course boundaries from `z0` up through `height`.
fn courses(z0: Length, height: Length, profile: &StrawbaleProfile) -> Vec<(Length, Length)> {
    let full = ((height + profile.tolerance) / profile.bale_height).floor() as usize;
    if full == 0 {
        return vec![(z0, z0 + height)];
    }

    let remainder = height - full as f64 * profile.bale_height;
    let mut bounds: Vec<(Length, Length)> = (0..full)
        .map(|i| {
            let start = z0 + i as f64 * profile.bale_height;
            (start, start + profile.bale_height)
        })
        .collect();

    let top = z0 + height;
    if remainder >= profile.top_cutoff_limit {
        let last_end = bounds.last().map_or(z0, |b| b.1);
        bounds.push((last_end, top));
    } else if let Some(last) = bounds.last_mut() {
        last.1 = top;
    }
    bounds
}

/// Cut `[start, end]` into `step`-long pieces, from the end when `from_end`.
/// Pieces come back in ascending order and cover the range exactly.
fn tile(start: Length, end: Length, step: Length, tolerance: Length, from_end: bool) -> Vec<(Length, Length)> {
    let mut pieces = Vec::new();
    if end - start <= LENGTH_EPSILON {
        return pieces;
    }

    if from_end {
        let mut pos = end;
        while pos - start > tolerance {
            let mut next = pos - step;
            if next - start <= tolerance {
                next = start;
            }
            pieces.push((next, pos));
            pos = next;
        }
        if pos > start {
            match pieces.last_mut() {
                Some(last) => last.0 = start,
                None => pieces.push((start, pos)),
            }
        }
        pieces.reverse();
    } else {
        let mut pos = start;
        while end - pos > tolerance {
            let mut next = pos + step;
            if end - next <= tolerance {
                next = end;
            }
            pieces.push((pos, next));
            pos = next;
        }
        if pos < end {
            match pieces.last_mut() {
                Some(last) => last.1 = end,
                None => pieces.push((pos, end)),
            }
        }
    }
    pieces
}
