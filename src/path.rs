//! Path command parser.
//!
//! Turns a path string (`M`, `L`, `H`, `V`, `C`, `S`, `Q`, `T`, `A`, `Z`
//! and their relative lowercase forms) into absolute [`PathSegment`]s.
//! Relative coordinates are resolved against the pen while parsing, so
//! consumers never track the current point for anything but the smooth
//! curve and horizontal/vertical variants.

use glam::{DVec2, dvec2};
use miette::{NamedSource, SourceSpan};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::errors::{PathError, PathWarning};

#[derive(Parser)]
#[grammar = "path.pest"]
struct PathParser;

/// One drawing command with absolute coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo(DVec2),
    LineTo(DVec2),
    HorizontalLineTo(f64),
    VerticalLineTo(f64),
    CubicCurveTo { c1: DVec2, c2: DVec2, end: DVec2 },
    /// First control point is the reflection of the previous cubic's second.
    SmoothCubicCurveTo { c2: DVec2, end: DVec2 },
    QuadraticCurveTo { c: DVec2, end: DVec2 },
    /// Control point is the reflection of the previous quadratic's.
    SmoothQuadraticCurveTo(DVec2),
    EllipticalArcTo {
        radii: DVec2,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: DVec2,
    },
    ClosePath,
}

/// Result of parsing: the segments read plus any reason parsing stopped early.
#[derive(Debug, Default)]
pub struct ParsedPath {
    pub segments: Vec<PathSegment>,
    pub warnings: Vec<PathWarning>,
}

impl ParsedPath {
    /// Whether the path ends by closing its last subpath.
    pub fn is_closed(&self) -> bool {
        matches!(self.segments.last(), Some(PathSegment::ClosePath))
    }
}

/// Parse a path string.
///
/// Fails only when nothing drawable can come out of the input: an empty
/// string, or a first command that is not a move-to. Anything unreadable
/// after a valid prefix ends parsing with a warning.
pub fn parse_path(data: &str) -> Result<ParsedPath, PathError> {
    if data.trim().is_empty() {
        return Err(PathError::Empty);
    }
    let src = || NamedSource::new("path", data.to_string());

    let mut pairs = PathParser::parse(Rule::path, data).map_err(|e| {
        let offset = match e.location {
            pest::error::InputLocation::Pos(p) => p,
            pest::error::InputLocation::Span((start, _)) => start,
        };
        PathError::Syntax {
            message: e.variant.message().into_owned(),
            src: src(),
            span: SourceSpan::from((offset, 0)),
        }
    })?;
    let Some(path) = pairs.next() else {
        return Err(PathError::Empty);
    };

    let mut builder = SegmentBuilder::default();
    let mut rest = None;

    for pair in path.into_inner() {
        match pair.as_rule() {
            Rule::rest => {
                if !pair.as_str().is_empty() {
                    rest = Some((pair.as_span().start(), pair.as_str()));
                }
            }
            Rule::EOI => {}
            rule => {
                let start = pair.as_span().start();
                let letter = pair.as_str().chars().next().unwrap_or('?');
                if builder.segments.is_empty() && !letter.eq_ignore_ascii_case(&'m') {
                    return Err(PathError::MissingMoveTo {
                        src: src(),
                        span: SourceSpan::from((start, 1)),
                    });
                }
                let args = pair
                    .into_inner()
                    .map(|arg| number(arg, data))
                    .collect::<Result<Vec<_>, _>>()?;
                builder.push(rule, letter.is_ascii_lowercase(), &args);
            }
        }
    }

    if builder.segments.is_empty() {
        let start = data.len() - data.trim_start().len();
        return Err(PathError::MissingMoveTo {
            src: src(),
            span: SourceSpan::from((start, 1)),
        });
    }

    let mut warnings = Vec::new();
    if let Some((start, text)) = rest {
        let warning = classify_rest(start, text, src());
        crate::log::warn!(segments = builder.segments.len(), "{warning}");
        warnings.push(warning);
    }

    crate::log::debug!(segments = builder.segments.len(), "parsed path");
    Ok(ParsedPath { segments: builder.segments, warnings })
}

const COMMAND_LETTERS: &str = "MmLlHhVvCcSsQqTtAaZz";

fn classify_rest(start: usize, text: &str, src: NamedSource<String>) -> PathWarning {
    match text.chars().next() {
        Some(c) if c.is_ascii_alphabetic() && !COMMAND_LETTERS.contains(c) => {
            PathWarning::UnknownCommand {
                command: c,
                src,
                span: SourceSpan::from((start, c.len_utf8())),
            }
        }
        _ => PathWarning::MalformedParameters {
            src,
            span: SourceSpan::from((start, text.trim_end().len())),
        },
    }
}

fn number(pair: Pair<'_, Rule>, data: &str) -> Result<f64, PathError> {
    let span = pair.as_span();
    pair.as_str().parse::<f64>().map_err(|e| PathError::InvalidNumber {
        message: e.to_string(),
        src: NamedSource::new("path", data.to_string()),
        span: SourceSpan::from((span.start(), span.end() - span.start())),
    })
}

/// Tracks the pen so relative commands can be emitted as absolute segments.
#[derive(Default)]
struct SegmentBuilder {
    segments: Vec<PathSegment>,
    pen: DVec2,
    subpath_start: DVec2,
}

impl SegmentBuilder {
    fn origin(&self, relative: bool) -> DVec2 {
        if relative { self.pen } else { DVec2::ZERO }
    }

    fn push(&mut self, rule: Rule, relative: bool, args: &[f64]) {
        match rule {
            Rule::moveto => {
                for c in args.chunks_exact(2) {
                    let p = self.origin(relative) + dvec2(c[0], c[1]);
                    self.pen = p;
                    self.subpath_start = p;
                    self.segments.push(PathSegment::MoveTo(p));
                }
            }
            Rule::lineto => {
                for c in args.chunks_exact(2) {
                    let p = self.origin(relative) + dvec2(c[0], c[1]);
                    self.pen = p;
                    self.segments.push(PathSegment::LineTo(p));
                }
            }
            Rule::hlineto => {
                for &x in args {
                    let x = if relative { self.pen.x + x } else { x };
                    self.pen.x = x;
                    self.segments.push(PathSegment::HorizontalLineTo(x));
                }
            }
            Rule::vlineto => {
                for &y in args {
                    let y = if relative { self.pen.y + y } else { y };
                    self.pen.y = y;
                    self.segments.push(PathSegment::VerticalLineTo(y));
                }
            }
            Rule::curveto => {
                for c in args.chunks_exact(6) {
                    let o = self.origin(relative);
                    let end = o + dvec2(c[4], c[5]);
                    self.segments.push(PathSegment::CubicCurveTo {
                        c1: o + dvec2(c[0], c[1]),
                        c2: o + dvec2(c[2], c[3]),
                        end,
                    });
                    self.pen = end;
                }
            }
            Rule::smooth_curveto => {
                for c in args.chunks_exact(4) {
                    let o = self.origin(relative);
                    let end = o + dvec2(c[2], c[3]);
                    self.segments.push(PathSegment::SmoothCubicCurveTo {
                        c2: o + dvec2(c[0], c[1]),
                        end,
                    });
                    self.pen = end;
                }
            }
            Rule::quadto => {
                for c in args.chunks_exact(4) {
                    let o = self.origin(relative);
                    let end = o + dvec2(c[2], c[3]);
                    self.segments.push(PathSegment::QuadraticCurveTo {
                        c: o + dvec2(c[0], c[1]),
                        end,
                    });
                    self.pen = end;
                }
            }
            Rule::smooth_quadto => {
                for c in args.chunks_exact(2) {
                    let end = self.origin(relative) + dvec2(c[0], c[1]);
                    self.segments.push(PathSegment::SmoothQuadraticCurveTo(end));
                    self.pen = end;
                }
            }
            Rule::arcto => {
                for c in args.chunks_exact(7) {
                    let end = self.origin(relative) + dvec2(c[5], c[6]);
                    self.segments.push(PathSegment::EllipticalArcTo {
                        radii: dvec2(c[0], c[1]),
                        x_rotation: c[2],
                        large_arc: c[3] != 0.0,
                        sweep: c[4] != 0.0,
                        end,
                    });
                    self.pen = end;
                }
            }
            Rule::closepath => {
                self.segments.push(PathSegment::ClosePath);
                self.pen = self.subpath_start;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_move_line_close() {
        let parsed = parse_path("M0 0 L10 10 Z").unwrap();
        assert_eq!(
            parsed.segments,
            vec![
                PathSegment::MoveTo(dvec2(0.0, 0.0)),
                PathSegment::LineTo(dvec2(10.0, 10.0)),
                PathSegment::ClosePath,
            ]
        );
        assert!(parsed.warnings.is_empty());
        assert!(parsed.is_closed());
    }

    #[test]
    fn unknown_command_truncates_with_warning() {
        let parsed = parse_path("M0 0 Q5 5 10 10 X99 99").unwrap();
        assert_eq!(parsed.segments.len(), 2);
        assert_eq!(parsed.warnings.len(), 1);
        assert!(matches!(
            parsed.warnings[0],
            PathWarning::UnknownCommand { command: 'X', .. }
        ));
        assert!(!parsed.is_closed());
    }

    #[test]
    fn must_start_with_move_to() {
        let err = parse_path("L 10 10").unwrap_err();
        assert!(matches!(err, PathError::MissingMoveTo { .. }));

        let err = parse_path("  X1 2").unwrap_err();
        assert!(matches!(err, PathError::MissingMoveTo { .. }));
    }

    #[test]
    fn empty_path_is_an_error() {
        assert!(matches!(parse_path(""), Err(PathError::Empty)));
        assert!(matches!(parse_path("   \n"), Err(PathError::Empty)));
    }

    #[test]
    fn relative_commands_resolve_against_pen() {
        let parsed = parse_path("m1 1 l2 0 h1 v1 z l1 1").unwrap();
        assert_eq!(
            parsed.segments,
            vec![
                PathSegment::MoveTo(dvec2(1.0, 1.0)),
                PathSegment::LineTo(dvec2(3.0, 1.0)),
                PathSegment::HorizontalLineTo(4.0),
                PathSegment::VerticalLineTo(2.0),
                PathSegment::ClosePath,
                PathSegment::LineTo(dvec2(2.0, 2.0)),
            ]
        );
    }

    #[test]
    fn repeated_groups_repeat_the_command() {
        let parsed = parse_path("M0,0 L1,1 2,2 3,3").unwrap();
        assert_eq!(parsed.segments.len(), 4);
        assert_eq!(parsed.segments[3], PathSegment::LineTo(dvec2(3.0, 3.0)));

        let parsed = parse_path("M0 0 5 5").unwrap();
        assert_eq!(parsed.segments[1], PathSegment::MoveTo(dvec2(5.0, 5.0)));
    }

    #[test]
    fn numbers_split_on_sign_and_second_dot() {
        let parsed = parse_path("M10-5.5L.5e1-2").unwrap();
        assert_eq!(
            parsed.segments,
            vec![
                PathSegment::MoveTo(dvec2(10.0, -5.5)),
                PathSegment::LineTo(dvec2(5.0, -2.0)),
            ]
        );

        let parsed = parse_path("M0.5.5").unwrap();
        assert_eq!(parsed.segments, vec![PathSegment::MoveTo(dvec2(0.5, 0.5))]);
    }

    #[test]
    fn arc_flags_may_be_packed() {
        let parsed = parse_path("M0 0 A5 5 0 1010 10").unwrap();
        assert_eq!(
            parsed.segments[1],
            PathSegment::EllipticalArcTo {
                radii: dvec2(5.0, 5.0),
                x_rotation: 0.0,
                large_arc: true,
                sweep: false,
                end: dvec2(10.0, 10.0),
            }
        );
    }

    #[test]
    fn incomplete_parameters_warn() {
        let parsed = parse_path("M0 0 C1 1 2 2").unwrap();
        assert_eq!(parsed.segments.len(), 1);
        assert!(matches!(
            parsed.warnings[0],
            PathWarning::MalformedParameters { .. }
        ));

        let parsed = parse_path("M0 0 L1 1 7").unwrap();
        assert_eq!(parsed.segments.len(), 2);
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn smooth_and_quadratic_variants() {
        let parsed = parse_path("M0 0 C0 1 1 1 1 0 s1 -1 1 0 Q3 1 4 0 t1 0").unwrap();
        assert_eq!(
            parsed.segments[2],
            PathSegment::SmoothCubicCurveTo { c2: dvec2(2.0, -1.0), end: dvec2(2.0, 0.0) }
        );
        assert_eq!(parsed.segments[4], PathSegment::SmoothQuadraticCurveTo(dvec2(5.0, 0.0)));
    }
}
