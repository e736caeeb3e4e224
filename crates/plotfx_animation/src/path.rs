//! Typed SVG path data
//!
//! Charts emit absolute `M`/`L`/`C`/`Z` paths. Every [`PathSegment`] carries
//! exactly one point: an instruction followed by several points is split on
//! parse, and extra `M` pairs become implicit `L`s.

use std::fmt;
use std::str::FromStr;

use nom::{
    bytes::complete::take_while,
    character::complete::one_of,
    combinator::all_consuming,
    multi::many0,
    number::complete::double,
    sequence::{pair, preceded, terminated},
    Finish, IResult,
};
use smallvec::SmallVec;

use crate::error::AnimationError;

/// Path instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    MoveTo,
    LineTo,
    CurveTo,
    Close,
}

impl SegmentKind {
    pub fn letter(self) -> char {
        match self {
            SegmentKind::MoveTo => 'M',
            SegmentKind::LineTo => 'L',
            SegmentKind::CurveTo => 'C',
            SegmentKind::Close => 'Z',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'M' => Some(SegmentKind::MoveTo),
            'L' => Some(SegmentKind::LineTo),
            'C' => Some(SegmentKind::CurveTo),
            'Z' | 'z' => Some(SegmentKind::Close),
            _ => None,
        }
    }

    /// Coordinates per point for this instruction
    pub fn arity(self) -> usize {
        match self {
            SegmentKind::MoveTo | SegmentKind::LineTo => 2,
            SegmentKind::CurveTo => 6,
            SegmentKind::Close => 0,
        }
    }
}

/// One instruction with its coordinate operands
#[derive(Clone, Debug, PartialEq)]
pub struct PathSegment {
    pub kind: SegmentKind,
    pub coords: SmallVec<[f64; 6]>,
}

impl PathSegment {
    pub fn new(kind: SegmentKind, coords: &[f64]) -> Self {
        Self {
            kind,
            coords: SmallVec::from_slice(coords),
        }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Self::new(SegmentKind::MoveTo, &[x, y])
    }

    pub fn line_to(x: f64, y: f64) -> Self {
        Self::new(SegmentKind::LineTo, &[x, y])
    }

    pub fn curve_to(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> Self {
        Self::new(SegmentKind::CurveTo, &[x1, y1, x2, y2, x, y])
    }

    pub fn close() -> Self {
        Self::new(SegmentKind::Close, &[])
    }

    /// The point this segment ends on (its last coordinate pair)
    pub fn end_point(&self) -> Option<(f64, f64)> {
        match self.coords.as_slice() {
            [.., x, y] => Some((*x, *y)),
            _ => None,
        }
    }

    /// Whether the segment carries a point (everything but `Z`)
    pub fn is_point(&self) -> bool {
        self.kind != SegmentKind::Close
    }
}

/// A sequence of path segments
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    segments: Vec<PathSegment>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.segments.push(PathSegment::move_to(x, y));
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.segments.push(PathSegment::line_to(x, y));
        self
    }

    pub fn curve_to(mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> Self {
        self.segments
            .push(PathSegment::curve_to(x1, y1, x2, y2, x, y));
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(PathSegment::close());
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<PathSegment> {
        self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether any segment is a cubic bezier
    pub fn has_curves(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| segment.kind == SegmentKind::CurveTo)
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", segment.kind.letter())?;
            for coord in &segment.coords {
                write!(f, " {coord}")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Parsing
// ============================================================================

type ParseResult<'a, O> = IResult<&'a str, O, nom::error::Error<&'a str>>;

fn separator(input: &str) -> ParseResult<'_, &str> {
    take_while(|c: char| c.is_whitespace() || c == ',')(input)
}

fn raw_segment(input: &str) -> ParseResult<'_, (char, Vec<f64>)> {
    pair(
        preceded(separator, one_of("MLCZmlczAaHhVvQqSsTt")),
        many0(preceded(separator, double)),
    )(input)
}

impl FromStr for PathData {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| AnimationError::InvalidPath {
            input: s.to_string(),
            reason,
        };

        let (_, raw) = all_consuming(terminated(many0(raw_segment), separator))(s)
            .finish()
            .map_err(|err| invalid(format!("unexpected input at {:?}", err.input)))?;

        let mut segments = Vec::with_capacity(raw.len());
        for (letter, coords) in raw {
            let kind = SegmentKind::from_letter(letter)
                .ok_or_else(|| invalid(format!("unsupported instruction '{letter}'")))?;
            let arity = kind.arity();
            let valid = if arity == 0 {
                coords.is_empty()
            } else {
                !coords.is_empty() && coords.len() % arity == 0
            };
            if !valid {
                return Err(invalid(format!(
                    "'{letter}' takes a multiple of {arity} coordinates, got {}",
                    coords.len()
                )));
            }
            if arity == 0 {
                segments.push(PathSegment::close());
                continue;
            }
            for (i, point) in coords.chunks_exact(arity).enumerate() {
                let kind = if kind == SegmentKind::MoveTo && i > 0 {
                    SegmentKind::LineTo
                } else {
                    kind
                };
                segments.push(PathSegment::new(kind, point));
            }
        }

        Ok(PathData { segments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_path() {
        let path: PathData = "M 0 0 L 10 10".parse().unwrap();
        assert_eq!(
            path,
            PathData::new().move_to(0.0, 0.0).line_to(10.0, 10.0)
        );
    }

    #[test]
    fn test_parse_compact_and_comma_separated() {
        let path: PathData = "M0,0C1,2,3,4,5,6Z".parse().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.segments()[1].kind, SegmentKind::CurveTo);
        assert_eq!(path.segments()[1].end_point(), Some((5.0, 6.0)));
        assert_eq!(path.segments()[2].kind, SegmentKind::Close);
    }

    #[test]
    fn test_parse_splits_repeated_points() {
        let path: PathData = "M 0 0 L 10 10 20 20".parse().unwrap();
        assert_eq!(
            path,
            PathData::new()
                .move_to(0.0, 0.0)
                .line_to(10.0, 10.0)
                .line_to(20.0, 20.0)
        );
        assert_eq!(path.to_string(), "M 0 0 L 10 10 L 20 20");

        let implicit: PathData = "M 1 2 3 4 C 1 1 2 2 3 3 4 4 5 5 6 6".parse().unwrap();
        let kinds: Vec<_> = implicit.segments().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::MoveTo,
                SegmentKind::LineTo,
                SegmentKind::CurveTo,
                SegmentKind::CurveTo
            ]
        );
        assert!(implicit.segments().iter().all(|s| s.coords.len() <= 6));
    }

    #[test]
    fn test_display_padded_segment() {
        let path = PathData::from_segments(vec![
            PathSegment::new(SegmentKind::MoveTo, &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]),
            PathSegment::new(SegmentKind::LineTo, &[3.5, 4.0, 3.5, 4.0, 3.5, 4.0]),
            PathSegment::close(),
        ]);
        assert_eq!(path.to_string(), "M 1 2 1 2 1 2 L 3.5 4 3.5 4 3.5 4 Z");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "M 0 0 A 5 5 0 0 1 10 10".parse::<PathData>(),
            Err(AnimationError::InvalidPath { .. })
        ));
        assert!("M 0".parse::<PathData>().is_err());
        assert!("L 0 0 junk".parse::<PathData>().is_err());
    }

    #[test]
    fn test_empty_path() {
        let path: PathData = "".parse().unwrap();
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_has_curves_and_end_points() {
        let path = PathData::new()
            .move_to(0.0, 0.0)
            .curve_to(1.0, 1.0, 2.0, 2.0, 3.0, 3.0)
            .close();
        assert!(path.has_curves());
        let ends: Vec<_> = path.segments().iter().map(PathSegment::end_point).collect();
        assert_eq!(ends, vec![Some((0.0, 0.0)), Some((3.0, 3.0)), None]);
    }
}
