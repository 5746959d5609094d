//! Style resolution: turn a shape's declarative fill and stroke into paints
//! a backend can apply, with geometry in device units.

use std::sync::Arc;

use glam::{DVec2, dvec2};

use crate::color::{Color, ColorSpec};
use crate::errors::UnresolvedReference;
use crate::fill::{ColorStop, Fill};
use crate::shapes::ShapeAttrs;
use crate::types::{Angle, BBox};

use super::context::RenderContext;
use super::pattern::PatternTile;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedStop {
    pub offset: f64,
    pub color: Color,
}

/// A color ramp with literal colors.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientStops {
    pub stops: Vec<ResolvedStop>,
}

impl GradientStops {
    /// Sample the ramp at `t` by linear interpolation between neighboring
    /// stops. Outside the first/last stop the end colors extend.
    pub fn color_at(&self, t: f64) -> Color {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::BLACK;
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t >= a.offset && t <= b.offset {
                let span = b.offset - a.offset;
                if span <= 0.0 {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.offset) / span);
            }
        }
        last.color
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternPaint {
    pub tile: Arc<PatternTile>,
    /// Tile grid rotation about `pivot`
    pub angle: Angle,
    pub pivot: DVec2,
    /// Area the tiles must cover
    pub area: BBox<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient { start: DVec2, end: DVec2, stops: GradientStops },
    RadialGradient { center: DVec2, radius: f64, stops: GradientStops },
    Pattern(PatternPaint),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokePaint {
    pub color: Color,
    /// Device units
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub fill: Option<Paint>,
    pub stroke: Option<StrokePaint>,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
}

impl ResolvedStyle {
    /// Nothing would reach the page.
    pub fn is_invisible(&self) -> bool {
        (self.fill.is_none() && self.stroke.is_none())
            || (self.fill_opacity == 0.0 && self.stroke_opacity == 0.0)
    }
}

/// Resolve fill and stroke for a shape whose unrotated device-space bounds
/// are `bounds`.
pub fn resolve_style(
    attrs: &ShapeAttrs,
    bounds: &BBox<f64>,
    ctx: &RenderContext,
) -> Result<ResolvedStyle, UnresolvedReference> {
    let fill = attrs
        .fill
        .as_ref()
        .map(|fill| resolve_fill(fill, bounds, ctx, &attrs.id))
        .transpose()?;

    let stroke = match &attrs.stroke_color {
        Some(color) if attrs.stroke_width > 0.0 => Some(StrokePaint {
            color: literal(color, &attrs.id)?,
            width: ctx.scaler.points(attrs.stroke_width),
        }),
        _ => None,
    };

    Ok(ResolvedStyle {
        fill,
        stroke,
        fill_opacity: attrs.opacity,
        stroke_opacity: attrs.opacity,
    })
}

pub fn resolve_fill(
    fill: &Fill,
    bounds: &BBox<f64>,
    ctx: &RenderContext,
    element: &str,
) -> Result<Paint, UnresolvedReference> {
    match fill {
        Fill::Solid(color) => Ok(Paint::Solid(literal(color, element)?)),
        Fill::LinearGradient { angle, stops } => {
            let (sin, cos) = angle.radians().sin_cos();
            let half = dvec2(cos, sin) * (bounds.diagonal() / 2.0);
            let center = bounds.center();
            Ok(Paint::LinearGradient {
                start: center - half,
                end: center + half,
                stops: ramp(stops, element)?,
            })
        }
        Fill::RadialGradient { center, radius, stops } => Ok(Paint::RadialGradient {
            center: bounds.min_corner() + dvec2(center.x * bounds.width(), center.y * bounds.height()),
            radius: radius * bounds.diagonal(),
            stops: ramp(stops, element)?,
        }),
        Fill::Pattern { kind, spacing, angle, scale, colors } => {
            let colors = colors
                .iter()
                .map(|c| literal(c, element))
                .collect::<Result<Vec<_>, _>>()?;
            let size = ctx.scaler.len(*spacing) * scale;
            Ok(Paint::Pattern(PatternPaint {
                tile: ctx.tiles.get_or_build(*kind, size, &colors),
                angle: *angle,
                pivot: bounds.center(),
                area: *bounds,
            }))
        }
    }
}

fn ramp(stops: &[ColorStop], element: &str) -> Result<GradientStops, UnresolvedReference> {
    let stops = stops
        .iter()
        .map(|s| Ok(ResolvedStop { offset: s.position, color: literal(&s.color, element)? }))
        .collect::<Result<Vec<_>, UnresolvedReference>>()?;
    Ok(GradientStops { stops })
}

/// A role placeholder that survived to this point was never substituted.
fn literal(spec: &ColorSpec, element: &str) -> Result<Color, UnresolvedReference> {
    match spec {
        ColorSpec::Literal(c) => Ok(*c),
        ColorSpec::Role(role) => Err(UnresolvedReference::Role {
            role: role.clone(),
            element: element.to_string(),
        }),
    }
}
