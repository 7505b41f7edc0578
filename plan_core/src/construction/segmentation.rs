//! # Post/Infill Segmentation
//!
//! Partitions a stretch of wall into straw spans, posts and opening spans.
//! Pure arithmetic on X coordinates; nothing here knows about heights or
//! materials.
//!
//! ## Algorithm
//!
//! 1. Remove the opening exclusion spans from `[start, end]`, leaving the
//!    disjoint *available spans*.
//! 2. For each available span of width `W`:
//!    - `W <= 0`: nothing.
//!    - `W <= max_post_spacing`: one straw span (flagged when narrower than
//!      `min_straw_space`).
//!    - `W <= max_post_spacing + post_width`: one straw span, flagged as an
//!      error because there is no room for the post it would need. This is
//!      the only span wider than `max_post_spacing`; every unflagged straw
//!      span respects the spacing.
//!    - otherwise a straw span of exactly `max_post_spacing` and a post, then
//!      recurse into the rest.
//!
//! The recursion places its straw span at the leading edge, then the trailing
//! edge on the next call, and so on. Each available span starts again at its
//! leading edge. Posts therefore spread evenly from both ends towards the
//! middle and the odd-sized span ends up near the centre.
//!
//! Span boundaries are shared values: every span starts exactly where the
//! previous one ends, so the spans sum to the input length without drift.

use serde::{Deserialize, Serialize};

use super::results::Severity;
use crate::units::{format_length, Length, LENGTH_EPSILON};

/// Inputs of the segmentation that come from the infill configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentationParams {
    pub max_post_spacing: Length,
    pub min_straw_space: Length,
    pub post_width: Length,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanKind {
    Straw,
    Post,
    /// Exclusion span, index into the exclusion list
    Opening(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanIssue {
    pub severity: Severity,
    pub description: String,
}

/// One piece of the partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: Length,
    pub end: Length,
    pub kind: SpanKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<SpanIssue>,
}

impl Span {
    fn new(start: Length, end: Length, kind: SpanKind) -> Self {
        Span {
            start,
            end,
            kind,
            issue: None,
        }
    }

    pub fn width(&self) -> Length {
        self.end - self.start
    }
}

/// Gaps between sorted, non-overlapping exclusions inside `[start, end]`.
/// Exclusions are clamped to the range first.
pub fn available_spans(start: Length, end: Length, exclusions: &[(Length, Length)]) -> Vec<(Length, Length)> {
    let mut spans = Vec::new();
    let mut cursor = start;
    for &(a, b) in exclusions {
        let a = a.clamp(start, end);
        let b = b.clamp(start, end);
        if a - cursor > LENGTH_EPSILON {
            spans.push((cursor, a));
        }
        cursor = cursor.max(b);
    }
    if end - cursor > LENGTH_EPSILON {
        spans.push((cursor, end));
    }
    spans
}

/// Partition `[start, end]` around `exclusions` (sorted, non-overlapping).
pub fn segment(start: Length, end: Length, exclusions: &[(Length, Length)], params: &SegmentationParams) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = start;

    for (index, &(a, b)) in exclusions.iter().enumerate() {
        let a = a.clamp(start, end);
        let b = b.clamp(start, end);
        if a - cursor > LENGTH_EPSILON {
            segment_span(cursor, a, params, true, &mut spans);
        }
        if b - a > LENGTH_EPSILON {
            spans.push(Span::new(a.max(cursor), b, SpanKind::Opening(index)));
        }
        cursor = cursor.max(b);
    }
    if end - cursor > LENGTH_EPSILON {
        segment_span(cursor, end, params, true, &mut spans);
    }

    spans.sort_by(|x, y| x.start.total_cmp(&y.start));
    spans
}

fn segment_span(start: Length, end: Length, params: &SegmentationParams, leading: bool, out: &mut Vec<Span>) {
    let width = end - start;
    if width <= LENGTH_EPSILON {
        return;
    }

    let max = params.max_post_spacing;
    if width <= max + LENGTH_EPSILON {
        let mut straw = Span::new(start, end, SpanKind::Straw);
        if width < params.min_straw_space {
            straw.issue = Some(SpanIssue {
                severity: Severity::Warning,
                description: format!(
                    "Straw span of {} is narrower than {}, stuffed fill only",
                    format_length(width),
                    format_length(params.min_straw_space)
                ),
            });
        }
        out.push(straw);
        return;
    }

    if width <= max + params.post_width + LENGTH_EPSILON {
        let mut straw = Span::new(start, end, SpanKind::Straw);
        straw.issue = Some(SpanIssue {
            severity: Severity::Error,
            description: format!(
                "Straw span of {} exceeds the post spacing of {} but leaves no room for a post",
                format_length(width),
                format_length(max)
            ),
        });
        out.push(straw);
        return;
    }

    if leading {
        let straw_end = start + max;
        let post_end = straw_end + params.post_width;
        out.push(Span::new(start, straw_end, SpanKind::Straw));
        out.push(Span::new(straw_end, post_end, SpanKind::Post));
        segment_span(post_end, end, params, false, out);
    } else {
        let straw_start = end - max;
        let post_start = straw_start - params.post_width;
        out.push(Span::new(straw_start, end, SpanKind::Straw));
        out.push(Span::new(post_start, straw_start, SpanKind::Post));
        segment_span(start, post_start, params, true, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn params() -> SegmentationParams {
        SegmentationParams {
            max_post_spacing: 800.0,
            min_straw_space: 70.0,
            post_width: 60.0,
        }
    }

    fn kinds(spans: &[Span]) -> Vec<SpanKind> {
        spans.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_scenario_plain_wall() {
        let spans = segment(0.0, 3000.0, &[], &params());
        use SpanKind::*;
        assert_eq!(kinds(&spans), vec![Straw, Post, Straw, Post, Straw, Post, Straw]);
        let straw: Vec<f64> = spans.iter().filter(|s| s.kind == Straw).map(|s| s.width()).collect();
        assert_eq!(straw, vec![800.0, 800.0, 420.0, 800.0]);
        let posts: Vec<f64> = spans.iter().filter(|s| s.kind == Post).map(|s| s.start).collect();
        assert_eq!(posts, vec![800.0, 1660.0, 2140.0]);
        assert!(spans.iter().all(|s| s.issue.is_none()));
        assert_eq!(spans.iter().map(Span::width).sum::<f64>(), 3000.0);
    }

    #[test]
    fn test_scenario_single_door() {
        let exclusions = [(1485.0, 2415.0)];
        assert_eq!(
            available_spans(0.0, 4000.0, &exclusions),
            vec![(0.0, 1485.0), (2415.0, 4000.0)]
        );
        let spans = segment(0.0, 4000.0, &exclusions, &params());
        let opening: Vec<&Span> = spans.iter().filter(|s| s.kind == SpanKind::Opening(0)).collect();
        assert_eq!(opening.len(), 1);
        assert_eq!((opening[0].start, opening[0].end), (1485.0, 2415.0));
        // 1485 = 800 + 60 + 625
        let left: Vec<f64> = spans.iter().filter(|s| s.end <= 1485.0).map(|s| s.width()).collect();
        assert_eq!(left, vec![800.0, 60.0, 625.0]);
        // 1585 = 800 + 60 + 725
        let right: Vec<f64> = spans.iter().filter(|s| s.start >= 2415.0).map(|s| s.width()).collect();
        assert_eq!(right, vec![800.0, 60.0, 725.0]);
    }

    #[test]
    fn test_span_without_room_for_post() {
        let spans = segment(0.0, 830.0, &[], &params());
        assert_eq!(spans.len(), 1);
        let issue = spans[0].issue.as_ref().unwrap();
        assert_eq!(issue.severity, Severity::Error);
    }

    #[test]
    fn test_narrow_span_warns() {
        let spans = segment(0.0, 50.0, &[], &params());
        assert_eq!(spans[0].issue.as_ref().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_exclusion_at_edges() {
        let spans = segment(0.0, 2000.0, &[(-15.0, 500.0), (1500.0, 2100.0)], &params());
        assert_eq!(spans.first().unwrap().kind, SpanKind::Opening(0));
        assert_eq!(spans.first().unwrap().start, 0.0);
        assert_eq!(spans.last().unwrap().kind, SpanKind::Opening(1));
        assert_eq!(spans.last().unwrap().end, 2000.0);
        assert_relative_eq!(spans.iter().map(Span::width).sum::<f64>(), 2000.0);
    }

    #[test]
    fn test_negative_window_start() {
        let spans = segment(-420.0, 3420.0, &[], &params());
        assert_eq!(spans.first().unwrap().start, -420.0);
        assert_eq!(spans.last().unwrap().end, 3420.0);
    }

    fn assert_contiguous(spans: &[Span], start: f64, end: f64) {
        assert_eq!(spans.first().map(|s| s.start), Some(start));
        assert_eq!(spans.last().map(|s| s.end), Some(end));
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    proptest! {
        #[test]
        fn prop_spans_cover_wall(
            length in 100.0f64..20000.0,
            max in 300.0f64..1200.0,
            post in 40.0f64..200.0,
        ) {
            let p = SegmentationParams { max_post_spacing: max, min_straw_space: 70.0, post_width: post };
            let spans = segment(0.0, length, &[], &p);
            assert_contiguous(&spans, 0.0, length);
        }

        #[test]
        fn prop_spacing_respected(
            length in 100.0f64..20000.0,
            max in 300.0f64..1200.0,
            post in 40.0f64..200.0,
        ) {
            let p = SegmentationParams { max_post_spacing: max, min_straw_space: 70.0, post_width: post };
            for span in segment(0.0, length, &[], &p) {
                match span.kind {
                    SpanKind::Straw if span.issue.as_ref().map(|i| i.severity) != Some(Severity::Error) => {
                        prop_assert!(span.width() <= max + 1e-6);
                    }
                    SpanKind::Straw => prop_assert!(span.width() <= max + post + 1e-6),
                    SpanKind::Post => prop_assert!((span.width() - post).abs() < 1e-6),
                    SpanKind::Opening(_) => prop_assert!(false, "no exclusions given"),
                }
            }
        }

        #[test]
        fn prop_posts_balanced(
            length in 100.0f64..20000.0,
            max in 300.0f64..1200.0,
            post in 40.0f64..200.0,
        ) {
            let p = SegmentationParams { max_post_spacing: max, min_straw_space: 70.0, post_width: post };
            let middle = length / 2.0;
            let (mut left, mut right) = (0i64, 0i64);
            for span in segment(0.0, length, &[], &p) {
                if span.kind == SpanKind::Post {
                    if (span.start + span.end) / 2.0 < middle {
                        left += 1;
                    } else {
                        right += 1;
                    }
                }
            }
            prop_assert!((left - right).abs() <= 1, "left {} right {}", left, right);
        }

        #[test]
        fn prop_exclusions_preserved(
            length in 3000.0f64..12000.0,
            first in 0.05f64..0.4,
            width in 300.0f64..1500.0,
        ) {
            let a = length * first;
            let exclusion = (a, (a + width).min(length));
            let spans = segment(0.0, length, &[exclusion], &params());
            assert_contiguous(&spans, 0.0, length);
            let excluded: f64 = spans
                .iter()
                .filter(|s| matches!(s.kind, SpanKind::Opening(_)))
                .map(Span::width)
                .sum();
            prop_assert!((excluded - (exclusion.1 - exclusion.0)).abs() < 1e-9);
        }
    }
}
