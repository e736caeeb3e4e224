//! Path morphing preparation
//!
//! Two chart paths rarely have the same number of points: a series gains a
//! point, or a sliding window drops one on the left and adds one on the
//! right. [`normalize`] pads both paths into an instruction-aligned pair of
//! equal length so coordinates can be interpolated index by index.
//!
//! Area paths encode two contours (the top line, then the baseline walking
//! back) in one path, so they are grown at the outer ends and at the turn
//! between the contours.

use smallvec::smallvec;

use crate::path::{PathData, PathSegment, SegmentKind};

/// X positions of the points before and after a data update
///
/// Lets the normalizer recognise points entering from one side and leaving
/// from the other, so the series slides instead of warping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlideMarkers {
    pub start_x: Vec<f64>,
    pub end_x: Vec<f64>,
}

impl SlideMarkers {
    pub fn new(start_x: Vec<f64>, end_x: Vec<f64>) -> Self {
        Self { start_x, end_x }
    }
}

/// Output of [`normalize`]
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedPaths {
    /// Start path; empty when it was discarded
    pub start: PathData,
    pub end: PathData,
}

impl NormalizedPaths {
    /// Whether the pair can be interpolated point for point
    pub fn is_aligned(&self) -> bool {
        !self.start.is_empty() && self.start.len() == self.end.len()
    }
}

/// Align `from` and `to` for point-wise interpolation
pub fn normalize(
    from: &PathData,
    to: &PathData,
    markers: Option<&SlideMarkers>,
    is_area: bool,
) -> NormalizedPaths {
    let bezier = from.has_curves() || to.has_curves();
    let joint = if bezier {
        SegmentKind::CurveTo
    } else {
        SegmentKind::LineTo
    };
    let factor = if is_area { 2 } else { 1 };

    let (mut start, _) = split_close(from);
    let (mut end, end_tail) = split_close(to);

    if bezier {
        sixify(&mut start);
        sixify(&mut end);
    }

    let mut shift = None;
    if let Some(markers) = markers.filter(|m| !m.end_x.is_empty()) {
        shift = find_shift(markers);
        if shift.is_none() {
            tracing::debug!(
                "no common point between {} and {} slide markers, cutting",
                markers.start_x.len(),
                markers.end_x.len()
            );
            start.clear();
        }
    }

    if !start.is_empty() {
        if let Some((shift, reversed)) = shift {
            let full_len = end.len() + shift * factor;
            if reversed {
                prepend(&mut start, full_len, joint, is_area);
                append(&mut end, full_len, factor, joint, is_area);
            } else {
                prepend(&mut end, full_len, joint, is_area);
                append(&mut start, full_len, factor, joint, is_area);
            }
        }

        let full_len = start.len().max(end.len());
        if start.len() < full_len {
            append(&mut start, full_len, factor, joint, is_area);
        } else if end.len() < full_len {
            append(&mut end, full_len, factor, joint, is_area);
        }

        start.extend(end_tail.iter().cloned());
    }
    end.extend(end_tail);

    NormalizedPaths {
        start: PathData::from_segments(start),
        end: PathData::from_segments(end),
    }
}

/// Linear interpolation of an aligned pair
///
/// Instruction kinds come from `end`. Returns `None` when the lengths differ.
pub fn interpolate_path(start: &PathData, end: &PathData, position: f64) -> Option<PathData> {
    if start.len() != end.len() {
        return None;
    }

    let segments = start
        .segments()
        .iter()
        .zip(end.segments())
        .map(|(from, to)| {
            let coords = if from.coords.len() == to.coords.len() {
                from.coords
                    .iter()
                    .zip(&to.coords)
                    .map(|(a, b)| a + (b - a) * position)
                    .collect()
            } else {
                to.coords.clone()
            };
            PathSegment {
                kind: to.kind,
                coords,
            }
        })
        .collect();

    Some(PathData::from_segments(segments))
}

// ============================================================================
// Steps
// ============================================================================

/// Separate trailing `Z` instructions from the point-carrying body
fn split_close(path: &PathData) -> (Vec<PathSegment>, Vec<PathSegment>) {
    let segments = path.segments();
    let body_len = segments
        .iter()
        .rposition(PathSegment::is_point)
        .map_or(0, |i| i + 1);
    (segments[..body_len].to_vec(), segments[body_len..].to_vec())
}

/// Pad single-point `M`/`L` segments to six coordinates
fn sixify(segments: &mut [PathSegment]) {
    for segment in segments {
        if matches!(segment.kind, SegmentKind::MoveTo | SegmentKind::LineTo)
            && segment.coords.len() == 2
        {
            let (x, y) = (segment.coords[0], segment.coords[1]);
            segment.coords = smallvec![x, y, x, y, x, y];
        }
    }
}

/// Find how many points slid out of view
///
/// Returns the shift and whether points entered on the left (reversed
/// alignment). The first matching index wins.
fn find_shift(markers: &SlideMarkers) -> Option<(usize, bool)> {
    let start_x = &markers.start_x;
    let end_x = &markers.end_x;
    let first_start = *start_x.first()?;
    let first_end = *end_x.first()?;

    for (i, &x) in start_x.iter().enumerate() {
        if x == first_end {
            return Some((i, false));
        }
        let mirrored = (end_x.len() + i).checked_sub(start_x.len());
        if mirrored.and_then(|j| end_x.get(j)) == Some(&first_start) {
            return Some((i, true));
        }
    }
    None
}

/// Grow at the front by duplicating the first point
fn prepend(segments: &mut Vec<PathSegment>, full_len: usize, joint: SegmentKind, is_area: bool) {
    while segments.len() < full_len {
        let Some(first) = segments.first().cloned() else {
            break;
        };
        if segments[0].kind == SegmentKind::MoveTo {
            segments[0].kind = joint;
        }
        segments.insert(0, first);

        // The baseline walks back to the left, so it grows at its end too
        if is_area {
            if let Some(last) = segments.last().cloned() {
                segments.push(last);
            }
        }
    }
}

/// Grow at the back (at the turn, for areas) by duplicating the last point
fn append(
    segments: &mut Vec<PathSegment>,
    full_len: usize,
    factor: usize,
    joint: SegmentKind,
    is_area: bool,
) {
    while segments.len() < full_len {
        let turn = segments.len() / factor;
        if turn == 0 {
            break;
        }

        let mut added = segments[turn - 1..turn - 1 + factor].to_vec();
        for segment in &mut added {
            if segment.kind == SegmentKind::MoveTo {
                segment.kind = joint;
            }
        }
        if let Some(segment) = added.first_mut() {
            if segment.kind == SegmentKind::CurveTo && segment.coords.len() == 6 {
                segment.coords[0] = segment.coords[4];
                segment.coords[1] = segment.coords[5];
            }
        }

        let at = if is_area { turn } else { segments.len() };
        segments.splice(at..at, added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> PathData {
        s.parse().unwrap()
    }

    #[test]
    fn test_grows_shorter_line_without_markers() {
        let from = path("M 0 0 L 10 10");
        let to = path("M 0 0 L 10 10 L 20 20");
        let normalized = normalize(&from, &to, None, false);

        assert!(normalized.is_aligned());
        assert_eq!(normalized.start.to_string(), "M 0 0 L 10 10 L 10 10");
        assert_eq!(normalized.end, to);

        let at_zero = interpolate_path(&normalized.start, &normalized.end, 0.0).unwrap();
        assert_eq!(at_zero.to_string(), "M 0 0 L 10 10 L 10 10");
        let halfway = interpolate_path(&normalized.start, &normalized.end, 0.5).unwrap();
        assert_eq!(halfway.to_string(), "M 0 0 L 10 10 L 15 15");
    }

    #[test]
    fn test_slide_right() {
        let from = path("M 0 5 L 10 6 L 20 7");
        let to = path("M 10 6 L 20 7 L 30 8");
        let markers = SlideMarkers::new(vec![0.0, 10.0, 20.0], vec![10.0, 20.0, 30.0]);
        let normalized = normalize(&from, &to, Some(&markers), false);

        assert_eq!(normalized.end.to_string(), "M 10 6 L 10 6 L 20 7 L 30 8");
        assert_eq!(normalized.start.to_string(), "M 0 5 L 10 6 L 20 7 L 20 7");
    }

    #[test]
    fn test_slide_left_is_reversed() {
        let from = path("M 10 6 L 20 7 L 30 8");
        let to = path("M 0 5 L 10 6 L 20 7");
        let markers = SlideMarkers::new(vec![10.0, 20.0, 30.0], vec![0.0, 10.0, 20.0]);
        let normalized = normalize(&from, &to, Some(&markers), false);

        assert!(normalized.is_aligned());
        assert_eq!(normalized.start.to_string(), "M 10 6 L 10 6 L 20 7 L 30 8");
        assert_eq!(normalized.end.to_string(), "M 0 5 L 10 6 L 20 7 L 20 7");
    }

    #[test]
    fn test_unmatched_markers_discard_start() {
        let from = path("M 0 0 L 1 1");
        let to = path("M 5 5 L 6 6");
        let markers = SlideMarkers::new(vec![0.0, 1.0], vec![5.0, 6.0]);
        let normalized = normalize(&from, &to, Some(&markers), false);

        assert!(normalized.start.is_empty());
        assert!(!normalized.is_aligned());
        assert!(interpolate_path(&normalized.start, &normalized.end, 0.5).is_none());
    }

    #[test]
    fn test_sixify_when_curves_present() {
        let from = path("M 0 0 L 10 10");
        let to = path("M 0 0 C 1 1 2 2 10 20");
        let normalized = normalize(&from, &to, None, false);

        assert_eq!(normalized.start.to_string(), "M 0 0 0 0 0 0 L 10 10 10 10 10 10");
        let mid = interpolate_path(&normalized.start, &normalized.end, 0.5).unwrap();
        assert_eq!(mid.segments()[1].kind, SegmentKind::CurveTo);
        assert_eq!(mid.segments()[1].end_point(), Some((10.0, 15.0)));
    }

    #[test]
    fn test_appended_curve_collapses_first_control_point() {
        let from = path("M 0 0 C 1 2 3 4 5 6");
        let to = path("M 0 0 C 1 2 3 4 5 6 C 7 8 9 10 11 12");
        let normalized = normalize(&from, &to, None, false);

        assert_eq!(normalized.start.segments()[2].coords.as_slice(), &[5.0, 6.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_area_grows_at_turn_and_keeps_close() {
        let from = path("M 0 0 L 10 0 L 10 5 L 0 5 Z");
        let to = path("M 0 0 L 10 0 L 20 0 L 20 5 L 10 5 L 0 5 Z");
        let normalized = normalize(&from, &to, None, true);

        assert!(normalized.is_aligned());
        assert_eq!(
            normalized.start.to_string(),
            "M 0 0 L 10 0 L 10 0 L 10 5 L 10 5 L 0 5 Z"
        );
    }

    #[test]
    fn test_area_prepend_duplicates_both_ends() {
        let mut segments = path("M 1 0 L 2 0 L 2 5 L 1 5").into_segments();
        prepend(&mut segments, 6, SegmentKind::LineTo, true);
        assert_eq!(
            PathData::from_segments(segments).to_string(),
            "M 1 0 L 1 0 L 2 0 L 2 5 L 1 5 L 1 5"
        );
    }

    #[test]
    fn test_first_match_wins() {
        let markers = SlideMarkers::new(vec![1.0, 2.0, 1.0], vec![1.0, 2.0]);
        assert_eq!(find_shift(&markers), Some((0, false)));
    }
}
