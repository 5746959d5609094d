//! Geometry primitives.
//!
//! Each shape is its own type that knows:
//! - its common styling attributes
//! - the pivot its rotation is applied about
//! - how to move and uniformly scale itself (for composite expansion)
//!
//! [`Shape`] is the closed sum over all of them, dispatched with
//! `enum_dispatch`.

use enum_dispatch::enum_dispatch;

use crate::color::ColorSpec;
use crate::fill::Fill;
use crate::path::parse_path;
use crate::render::geometry::Outline;
use crate::types::{Angle, Length, OffsetIn, PtIn};

/// Attributes every shape carries.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeAttrs {
    pub id: String,
    /// Layering key; lower draws first
    pub layer: i32,
    pub fill: Option<Fill>,
    pub stroke_color: Option<ColorSpec>,
    /// Stroke width in points
    pub stroke_width: f64,
    pub opacity: f64,
    pub rotation: Angle,
}

impl ShapeAttrs {
    pub fn new(id: impl Into<String>) -> Self {
        ShapeAttrs {
            id: id.into(),
            layer: 0,
            fill: None,
            stroke_color: None,
            stroke_width: 0.0,
            opacity: 1.0,
            rotation: Angle::ZERO,
        }
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, color: impl Into<ColorSpec>, width: f64) -> Self {
        self.stroke_color = Some(color.into());
        self.stroke_width = width;
        self
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = Angle(degrees);
        self
    }

    /// A stroke is visible only with both a color and a positive width.
    pub fn has_visible_stroke(&self) -> bool {
        self.stroke_color.is_some() && self.stroke_width > 0.0
    }

    /// Neither fill nor visible stroke: nothing would reach the page.
    pub fn is_noop(&self) -> bool {
        self.fill.is_none() && !self.has_visible_stroke()
    }
}

/// Common behavior for all shapes
#[enum_dispatch]
pub trait Geometry {
    fn attrs(&self) -> &ShapeAttrs;

    fn attrs_mut(&mut self) -> &mut ShapeAttrs;

    /// The point rotation is applied about, in region coordinates
    fn pivot(&self) -> PtIn;

    /// Move every positional field by `offset`
    fn translate(&mut self, offset: OffsetIn);

    /// Multiply every positional and size field by `factor`, about the origin
    fn scale(&mut self, factor: f64);

    /// Short lowercase name used in logs and ids
    fn kind(&self) -> &'static str;
}

#[enum_dispatch(Geometry)]
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Triangle(Triangle),
    Star(Star),
    Line(Line),
    Path(PathShape),
}

impl Shape {
    pub fn id(&self) -> &str {
        &self.attrs().id
    }

    pub fn layer(&self) -> i32 {
        self.attrs().layer
    }
}

// ============================================================================
// Variants
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Rectangle {
    /// Bottom-left corner
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
    pub attrs: ShapeAttrs,
}

impl Rectangle {
    pub fn new(attrs: ShapeAttrs, x: f64, y: f64, width: f64, height: f64) -> Self {
        Rectangle {
            x: Length(x),
            y: Length(y),
            width: Length(width),
            height: Length(height),
            attrs,
        }
    }
}

impl Geometry for Rectangle {
    fn attrs(&self) -> &ShapeAttrs { &self.attrs }
    fn attrs_mut(&mut self) -> &mut ShapeAttrs { &mut self.attrs }

    fn pivot(&self) -> PtIn {
        PtIn::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    fn translate(&mut self, offset: OffsetIn) {
        self.x += offset.dx;
        self.y += offset.dy;
    }

    fn scale(&mut self, factor: f64) {
        self.x = self.x * factor;
        self.y = self.y * factor;
        self.width = self.width * factor;
        self.height = self.height * factor;
    }

    fn kind(&self) -> &'static str { "rectangle" }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Circle {
    pub center: PtIn,
    pub radius: Length,
    pub attrs: ShapeAttrs,
}

impl Circle {
    pub fn new(attrs: ShapeAttrs, center: PtIn, radius: f64) -> Self {
        Circle { center, radius: Length(radius), attrs }
    }
}

impl Geometry for Circle {
    fn attrs(&self) -> &ShapeAttrs { &self.attrs }
    fn attrs_mut(&mut self) -> &mut ShapeAttrs { &mut self.attrs }
    fn pivot(&self) -> PtIn { self.center }

    fn translate(&mut self, offset: OffsetIn) {
        self.center = self.center + offset;
    }

    fn scale(&mut self, factor: f64) {
        self.center = self.center.scaled(factor);
        self.radius = self.radius * factor;
    }

    fn kind(&self) -> &'static str { "circle" }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [PtIn; 3],
    pub attrs: ShapeAttrs,
}

impl Triangle {
    pub fn new(attrs: ShapeAttrs, vertices: [PtIn; 3]) -> Self {
        Triangle { vertices, attrs }
    }

    /// Twice the signed area; zero when the vertices are collinear.
    pub fn doubled_area(&self) -> f64 {
        let [a, b, c] = self.vertices.map(PtIn::to_dvec2);
        (b - a).perp_dot(c - a)
    }
}

impl Geometry for Triangle {
    fn attrs(&self) -> &ShapeAttrs { &self.attrs }
    fn attrs_mut(&mut self) -> &mut ShapeAttrs { &mut self.attrs }

    fn pivot(&self) -> PtIn {
        let [a, b, c] = self.vertices;
        PtIn::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
    }

    fn translate(&mut self, offset: OffsetIn) {
        for v in &mut self.vertices {
            *v = *v + offset;
        }
    }

    fn scale(&mut self, factor: f64) {
        for v in &mut self.vertices {
            *v = v.scaled(factor);
        }
    }

    fn kind(&self) -> &'static str { "triangle" }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub center: PtIn,
    pub outer_radius: Length,
    pub inner_radius: Length,
    pub points: u32,
    pub attrs: ShapeAttrs,
}

impl Star {
    pub fn new(attrs: ShapeAttrs, center: PtIn, outer: f64, inner: f64, points: u32) -> Self {
        Star {
            center,
            outer_radius: Length(outer),
            inner_radius: Length(inner),
            points,
            attrs,
        }
    }
}

impl Geometry for Star {
    fn attrs(&self) -> &ShapeAttrs { &self.attrs }
    fn attrs_mut(&mut self) -> &mut ShapeAttrs { &mut self.attrs }
    fn pivot(&self) -> PtIn { self.center }

    fn translate(&mut self, offset: OffsetIn) {
        self.center = self.center + offset;
    }

    fn scale(&mut self, factor: f64) {
        self.center = self.center.scaled(factor);
        self.outer_radius = self.outer_radius * factor;
        self.inner_radius = self.inner_radius * factor;
    }

    fn kind(&self) -> &'static str { "star" }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub start: PtIn,
    pub end: PtIn,
    pub attrs: ShapeAttrs,
}

impl Line {
    pub fn new(attrs: ShapeAttrs, start: PtIn, end: PtIn) -> Self {
        Line { start, end, attrs }
    }
}

impl Geometry for Line {
    fn attrs(&self) -> &ShapeAttrs { &self.attrs }
    fn attrs_mut(&mut self) -> &mut ShapeAttrs { &mut self.attrs }
    fn pivot(&self) -> PtIn { self.start.midpoint(self.end) }

    fn translate(&mut self, offset: OffsetIn) {
        self.start = self.start + offset;
        self.end = self.end + offset;
    }

    fn scale(&mut self, factor: f64) {
        self.start = self.start.scaled(factor);
        self.end = self.end.scaled(factor);
    }

    fn kind(&self) -> &'static str { "line" }
}

/// A shape drawn from a path string.
///
/// Path coordinates are local: a path point `p` lands at
/// `origin + scale * p`. A declared `pivot` is local too.
#[derive(Clone, Debug, PartialEq)]
pub struct PathShape {
    pub data: String,
    pub origin: PtIn,
    pub scale: f64,
    pub pivot: Option<PtIn>,
    pub attrs: ShapeAttrs,
}

impl PathShape {
    pub fn new(attrs: ShapeAttrs, data: impl Into<String>) -> Self {
        PathShape {
            data: data.into(),
            origin: PtIn::default(),
            scale: 1.0,
            pivot: None,
            attrs,
        }
    }

    pub fn at(mut self, origin: PtIn, scale: f64) -> Self {
        self.origin = origin;
        self.scale = scale;
        self
    }

    /// Map a path-local point into region coordinates.
    pub fn place(&self, local: glam::DVec2) -> PtIn {
        PtIn::from_dvec2(self.origin.to_dvec2() + local * self.scale)
    }
}

impl Geometry for PathShape {
    fn attrs(&self) -> &ShapeAttrs { &self.attrs }
    fn attrs_mut(&mut self) -> &mut ShapeAttrs { &mut self.attrs }

    /// Declared pivot, else the center of the path's bounds. A path that
    /// cannot be parsed pivots about its origin.
    fn pivot(&self) -> PtIn {
        if let Some(p) = self.pivot {
            return self.place(p.to_dvec2());
        }
        match parse_path(&self.data) {
            Ok(parsed) => {
                let bounds = Outline::from_segments(&parsed.segments).bounds();
                if bounds.is_empty() {
                    self.origin
                } else {
                    self.place(bounds.center())
                }
            }
            Err(_) => self.origin,
        }
    }

    fn translate(&mut self, offset: OffsetIn) {
        self.origin = self.origin + offset;
    }

    fn scale(&mut self, factor: f64) {
        self.origin = self.origin.scaled(factor);
        self.scale *= factor;
    }

    fn kind(&self) -> &'static str { "path" }
}
