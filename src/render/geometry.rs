//! Outline construction: every shape, clip mask and parsed path becomes a
//! list of move/line/cubic/close elements that any backend can draw.
//!
//! Quadratics, smooth curves and elliptical arcs are all lowered to cubics
//! here, so backends only need the four primitive operations.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DVec2, dvec2};

use crate::path::{ParsedPath, PathSegment, parse_path};
use crate::shapes::Shape;
use crate::types::{Angle, BBox, rotate_about};

use super::defaults::KAPPA;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathEl {
    MoveTo(DVec2),
    LineTo(DVec2),
    CubicTo { c1: DVec2, c2: DVec2, end: DVec2 },
    Close,
}

/// A backend-neutral vector path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    pub elements: Vec<PathEl>,
}

impl Outline {
    /// Bounds of every on-curve and control point.
    pub fn bounds(&self) -> BBox<f64> {
        let mut b = BBox::new();
        for el in &self.elements {
            match *el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => b.expand_point(p),
                PathEl::CubicTo { c1, c2, end } => {
                    b.expand_point(c1);
                    b.expand_point(c2);
                    b.expand_point(end);
                }
                PathEl::Close => {}
            }
        }
        b
    }

    /// Apply `f` to every point.
    pub fn map(&self, f: impl Fn(DVec2) -> DVec2) -> Outline {
        let elements = self
            .elements
            .iter()
            .map(|el| match *el {
                PathEl::MoveTo(p) => PathEl::MoveTo(f(p)),
                PathEl::LineTo(p) => PathEl::LineTo(f(p)),
                PathEl::CubicTo { c1, c2, end } => PathEl::CubicTo { c1: f(c1), c2: f(c2), end: f(end) },
                PathEl::Close => PathEl::Close,
            })
            .collect();
        Outline { elements }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.elements.last(), Some(PathEl::Close))
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn line(start: DVec2, end: DVec2) -> Outline {
        Outline { elements: vec![PathEl::MoveTo(start), PathEl::LineTo(end)] }
    }

    /// Closed polygon through `points`.
    pub fn polygon(points: &[DVec2]) -> Outline {
        let mut elements = Vec::with_capacity(points.len() + 1);
        for (i, &p) in points.iter().enumerate() {
            elements.push(if i == 0 { PathEl::MoveTo(p) } else { PathEl::LineTo(p) });
        }
        if !elements.is_empty() {
            elements.push(PathEl::Close);
        }
        Outline { elements }
    }

    /// Axis-aligned rectangle from its bottom-left corner.
    pub fn rect(origin: DVec2, size: DVec2) -> Outline {
        Outline::polygon(&[
            origin,
            origin + dvec2(size.x, 0.0),
            origin + size,
            origin + dvec2(0.0, size.y),
        ])
    }

    /// Ellipse as four quarter-arc cubics, starting at the rightmost point.
    pub fn ellipse(center: DVec2, radii: DVec2) -> Outline {
        let k = radii * KAPPA;
        let (rx, ry) = (radii.x, radii.y);
        let right = center + dvec2(rx, 0.0);
        let top = center + dvec2(0.0, ry);
        let left = center - dvec2(rx, 0.0);
        let bottom = center - dvec2(0.0, ry);
        Outline {
            elements: vec![
                PathEl::MoveTo(right),
                PathEl::CubicTo { c1: right + dvec2(0.0, k.y), c2: top + dvec2(k.x, 0.0), end: top },
                PathEl::CubicTo { c1: top - dvec2(k.x, 0.0), c2: left + dvec2(0.0, k.y), end: left },
                PathEl::CubicTo { c1: left - dvec2(0.0, k.y), c2: bottom - dvec2(k.x, 0.0), end: bottom },
                PathEl::CubicTo { c1: bottom + dvec2(k.x, 0.0), c2: right - dvec2(0.0, k.y), end: right },
                PathEl::Close,
            ],
        }
    }

    /// Lower parsed path segments to outline elements.
    pub fn from_segments(segments: &[PathSegment]) -> Outline {
        let mut out = Vec::with_capacity(segments.len());
        let mut pen = DVec2::ZERO;
        let mut start = DVec2::ZERO;
        // Second control point of the previous cubic / control of the previous quadratic
        let mut last_cubic: Option<DVec2> = None;
        let mut last_quad: Option<DVec2> = None;

        for seg in segments {
            let (mut next_cubic, mut next_quad) = (None, None);
            match *seg {
                PathSegment::MoveTo(p) => {
                    out.push(PathEl::MoveTo(p));
                    pen = p;
                    start = p;
                }
                PathSegment::LineTo(p) => {
                    out.push(PathEl::LineTo(p));
                    pen = p;
                }
                PathSegment::HorizontalLineTo(x) => {
                    pen = dvec2(x, pen.y);
                    out.push(PathEl::LineTo(pen));
                }
                PathSegment::VerticalLineTo(y) => {
                    pen = dvec2(pen.x, y);
                    out.push(PathEl::LineTo(pen));
                }
                PathSegment::CubicCurveTo { c1, c2, end } => {
                    out.push(PathEl::CubicTo { c1, c2, end });
                    next_cubic = Some(c2);
                    pen = end;
                }
                PathSegment::SmoothCubicCurveTo { c2, end } => {
                    let c1 = last_cubic.map_or(pen, |c| 2.0 * pen - c);
                    out.push(PathEl::CubicTo { c1, c2, end });
                    next_cubic = Some(c2);
                    pen = end;
                }
                PathSegment::QuadraticCurveTo { c, end } => {
                    out.push(quad_to_cubic(pen, c, end));
                    next_quad = Some(c);
                    pen = end;
                }
                PathSegment::SmoothQuadraticCurveTo(end) => {
                    let c = last_quad.map_or(pen, |q| 2.0 * pen - q);
                    out.push(quad_to_cubic(pen, c, end));
                    next_quad = Some(c);
                    pen = end;
                }
                PathSegment::EllipticalArcTo { radii, x_rotation, large_arc, sweep, end } => {
                    out.extend(arc_to_cubics(pen, radii, x_rotation, large_arc, sweep, end));
                    pen = end;
                }
                PathSegment::ClosePath => {
                    out.push(PathEl::Close);
                    pen = start;
                }
            }
            last_cubic = next_cubic;
            last_quad = next_quad;
        }
        Outline { elements: out }
    }
}

/// Exact degree elevation of a quadratic.
fn quad_to_cubic(p0: DVec2, c: DVec2, end: DVec2) -> PathEl {
    PathEl::CubicTo {
        c1: p0 + (c - p0) * (2.0 / 3.0),
        c2: end + (c - end) * (2.0 / 3.0),
        end,
    }
}

/// Endpoint-parameterized elliptical arc to at most four cubics per turn.
fn arc_to_cubics(
    p0: DVec2,
    radii: DVec2,
    x_rotation: f64,
    large_arc: bool,
    sweep: bool,
    p1: DVec2,
) -> Vec<PathEl> {
    if p0 == p1 {
        return Vec::new();
    }
    let (mut rx, mut ry) = (radii.x.abs(), radii.y.abs());
    if rx == 0.0 || ry == 0.0 {
        return vec![PathEl::LineTo(p1)];
    }

    let (sin_phi, cos_phi) = x_rotation.to_radians().sin_cos();
    let half = (p0 - p1) / 2.0;
    let x1 = cos_phi * half.x + sin_phi * half.y;
    let y1 = -sin_phi * half.x + cos_phi * half.y;

    // Radii too small to span the endpoints are scaled up uniformly
    let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let num = rx * rx * ry * ry - rx * rx * y1 * y1 - ry * ry * x1 * x1;
    let den = rx * rx * y1 * y1 + ry * ry * x1 * x1;
    let sign = if large_arc == sweep { -1.0 } else { 1.0 };
    let coef = sign * (num / den).max(0.0).sqrt();
    let cx1 = coef * rx * y1 / ry;
    let cy1 = -coef * ry * x1 / rx;

    let mid = (p0 + p1) / 2.0;
    let center = dvec2(cos_phi * cx1 - sin_phi * cy1, sin_phi * cx1 + cos_phi * cy1) + mid;

    let u = dvec2((x1 - cx1) / rx, (y1 - cy1) / ry);
    let v = dvec2((-x1 - cx1) / rx, (-y1 - cy1) / ry);
    let theta1 = vector_angle(DVec2::X, u);
    let mut delta = vector_angle(u, v);
    if !sweep && delta > 0.0 {
        delta -= TAU;
    } else if sweep && delta < 0.0 {
        delta += TAU;
    }

    let point = |a: f64| {
        let (s, c) = a.sin_cos();
        center + dvec2(cos_phi * rx * c - sin_phi * ry * s, sin_phi * rx * c + cos_phi * ry * s)
    };
    let tangent = |a: f64| {
        let (s, c) = a.sin_cos();
        dvec2(-cos_phi * rx * s - sin_phi * ry * c, -sin_phi * rx * s + cos_phi * ry * c)
    };

    let n = (delta.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = delta / n as f64;
    let t = 4.0 / 3.0 * (step / 4.0).tan();

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let a1 = theta1 + step * i as f64;
        let a2 = a1 + step;
        // Land exactly on the requested endpoint
        let end = if i + 1 == n { p1 } else { point(a2) };
        out.push(PathEl::CubicTo {
            c1: point(a1) + tangent(a1) * t,
            c2: point(a2) - tangent(a2) * t,
            end,
        });
    }
    out
}

fn vector_angle(u: DVec2, v: DVec2) -> f64 {
    u.perp_dot(v).atan2(u.dot(v))
}

/// Vertices of a star: `2 * points` of them alternating outer and inner
/// radius, the first outer vertex pointing straight up.
pub fn star_vertices(center: DVec2, outer: f64, inner: f64, points: u32) -> Vec<DVec2> {
    let count = points as usize * 2;
    let step = TAU / count as f64;
    (0..count)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let (s, c) = (FRAC_PI_2 + step * i as f64).sin_cos();
            center + dvec2(c, s) * radius
        })
        .collect()
}

/// Outline of a shape in region coordinates (inches), before rotation.
///
/// `parsed` lets the caller reuse a path it has already parsed; without it a
/// path shape is parsed here and an unparsable one yields an empty outline.
pub fn shape_outline(shape: &Shape, parsed: Option<&ParsedPath>) -> Outline {
    match shape {
        Shape::Rectangle(r) => Outline::rect(
            dvec2(r.x.raw(), r.y.raw()),
            dvec2(r.width.raw(), r.height.raw()),
        ),
        Shape::Circle(c) => Outline::ellipse(c.center.to_dvec2(), DVec2::splat(c.radius.raw())),
        Shape::Triangle(t) => Outline::polygon(&t.vertices.map(|v| v.to_dvec2())),
        Shape::Star(s) => Outline::polygon(&star_vertices(
            s.center.to_dvec2(),
            s.outer_radius.raw(),
            s.inner_radius.raw(),
            s.points,
        )),
        Shape::Line(l) => Outline::line(l.start.to_dvec2(), l.end.to_dvec2()),
        Shape::Path(p) => {
            let local = match parsed {
                Some(parsed) => Outline::from_segments(&parsed.segments),
                None => parse_path(&p.data)
                    .map(|parsed| Outline::from_segments(&parsed.segments))
                    .unwrap_or_default(),
            };
            local.map(|pt| p.place(pt).to_dvec2())
        }
    }
}

/// Rotate an outline rigidly about `pivot`.
pub fn rotate_outline(outline: &Outline, pivot: DVec2, angle: Angle) -> Outline {
    outline.map(|p| rotate_about(p, pivot, angle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: DVec2, b: DVec2) {
        assert!((a - b).length() < 1e-9, "{a} != {b}");
    }

    fn end_point(el: &PathEl) -> DVec2 {
        match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => p,
            PathEl::CubicTo { end, .. } => end,
            PathEl::Close => panic!("close has no end point"),
        }
    }

    #[test]
    fn rect_is_closed_four_corners() {
        let o = Outline::rect(dvec2(1.0, 2.0), dvec2(3.0, 4.0));
        assert_eq!(o.elements.len(), 5);
        assert!(o.is_closed());
        let b = o.bounds();
        assert_eq!((b.min.x, b.min.y, b.max.x, b.max.y), (1.0, 2.0, 4.0, 6.0));
    }

    #[test]
    fn ellipse_bounds_match_radii() {
        let o = Outline::ellipse(dvec2(0.0, 0.0), dvec2(2.0, 1.0));
        let b = o.bounds();
        assert_eq!((b.min.x, b.max.x), (-2.0, 2.0));
        assert_eq!((b.min.y, b.max.y), (-1.0, 1.0));
    }

    #[test]
    fn star_alternates_radii_starting_up() {
        let v = star_vertices(DVec2::ZERO, 2.0, 1.0, 5);
        assert_eq!(v.len(), 10);
        assert_close(v[0], dvec2(0.0, 2.0));
        assert!((v[1].length() - 1.0).abs() < 1e-9);
        assert!((v[2].length() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn quadratic_elevates_to_cubic() {
        let segs = [
            PathSegment::MoveTo(dvec2(0.0, 0.0)),
            PathSegment::QuadraticCurveTo { c: dvec2(3.0, 3.0), end: dvec2(6.0, 0.0) },
        ];
        let o = Outline::from_segments(&segs);
        match o.elements[1] {
            PathEl::CubicTo { c1, c2, end } => {
                assert_close(c1, dvec2(2.0, 2.0));
                assert_close(c2, dvec2(4.0, 2.0));
                assert_eq!(end, dvec2(6.0, 0.0));
            }
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn smooth_cubic_reflects_previous_control() {
        let segs = [
            PathSegment::MoveTo(dvec2(0.0, 0.0)),
            PathSegment::CubicCurveTo { c1: dvec2(0.0, 1.0), c2: dvec2(1.0, 1.0), end: dvec2(2.0, 0.0) },
            PathSegment::SmoothCubicCurveTo { c2: dvec2(4.0, -1.0), end: dvec2(4.0, 0.0) },
        ];
        let o = Outline::from_segments(&segs);
        match o.elements[2] {
            PathEl::CubicTo { c1, .. } => assert_close(c1, dvec2(3.0, -1.0)),
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn half_circle_arc_ends_on_target() {
        let segs = [
            PathSegment::MoveTo(dvec2(0.0, 0.0)),
            PathSegment::EllipticalArcTo {
                radii: dvec2(1.0, 1.0),
                x_rotation: 0.0,
                large_arc: false,
                sweep: true,
                end: dvec2(2.0, 0.0),
            },
        ];
        let o = Outline::from_segments(&segs);
        assert_eq!(o.elements.len(), 3);
        assert_close(end_point(&o.elements[1]), dvec2(1.0, -1.0));
        assert_eq!(end_point(&o.elements[2]), dvec2(2.0, 0.0));
    }

    #[test]
    fn zero_radius_arc_is_a_line() {
        let segs = [
            PathSegment::MoveTo(dvec2(0.0, 0.0)),
            PathSegment::EllipticalArcTo {
                radii: dvec2(0.0, 1.0),
                x_rotation: 0.0,
                large_arc: false,
                sweep: false,
                end: dvec2(2.0, 0.0),
            },
        ];
        let o = Outline::from_segments(&segs);
        assert_eq!(o.elements[1], PathEl::LineTo(dvec2(2.0, 0.0)));
    }

    #[test]
    fn horizontal_and_vertical_use_pen() {
        let segs = [
            PathSegment::MoveTo(dvec2(1.0, 1.0)),
            PathSegment::HorizontalLineTo(3.0),
            PathSegment::VerticalLineTo(4.0),
            PathSegment::ClosePath,
        ];
        let o = Outline::from_segments(&segs);
        assert_eq!(o.elements[1], PathEl::LineTo(dvec2(3.0, 1.0)));
        assert_eq!(o.elements[2], PathEl::LineTo(dvec2(3.0, 4.0)));
    }

    #[test]
    fn rotating_quarter_turn() {
        let o = Outline::line(dvec2(1.0, 0.0), dvec2(2.0, 0.0));
        let r = rotate_outline(&o, DVec2::ZERO, Angle(90.0));
        assert_close(end_point(&r.elements[1]), dvec2(0.0, 2.0));
    }
}
