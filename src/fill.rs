//! Fill model: solid colors, gradients and tiled patterns.

use serde::Deserialize;

use crate::color::{Color, ColorSpec};
use crate::types::{Angle, Length, Point};

/// A single gradient stop.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorStop {
    /// Position along the ramp, in `[0, 1]`
    pub position: f64,
    pub color: ColorSpec,
}

impl ColorStop {
    pub fn new(position: f64, color: impl Into<ColorSpec>) -> Self {
        ColorStop { position, color: color.into() }
    }
}

/// Which motif a pattern fill repeats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Stripes,
    Dots,
    Grid,
    Checkerboard,
}

impl PatternKind {
    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Stripes => "stripes",
            PatternKind::Dots => "dots",
            PatternKind::Grid => "grid",
            PatternKind::Checkerboard => "checkerboard",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    Solid(ColorSpec),
    LinearGradient {
        angle: Angle,
        stops: Vec<ColorStop>,
    },
    /// `center` is a fraction of the shape's bounding box, `radius` a
    /// fraction of its diagonal.
    RadialGradient {
        center: Point<f64>,
        radius: f64,
        stops: Vec<ColorStop>,
    },
    Pattern {
        kind: PatternKind,
        spacing: Length,
        angle: Angle,
        scale: f64,
        colors: Vec<ColorSpec>,
    },
}

impl Fill {
    pub fn solid(color: Color) -> Self {
        Fill::Solid(ColorSpec::Literal(color))
    }

    /// Every color this fill references, in declaration order.
    pub fn colors(&self) -> Vec<&ColorSpec> {
        match self {
            Fill::Solid(c) => vec![c],
            Fill::LinearGradient { stops, .. } | Fill::RadialGradient { stops, .. } => {
                stops.iter().map(|s| &s.color).collect()
            }
            Fill::Pattern { colors, .. } => colors.iter().collect(),
        }
    }

    /// Apply `f` to every color in the fill, stopping at the first failure.
    pub fn try_map_colors<E>(
        &self,
        mut f: impl FnMut(&ColorSpec) -> Result<ColorSpec, E>,
    ) -> Result<Fill, E> {
        Ok(match self {
            Fill::Solid(c) => Fill::Solid(f(c)?),
            Fill::LinearGradient { angle, stops } => Fill::LinearGradient {
                angle: *angle,
                stops: map_stops(stops, &mut f)?,
            },
            Fill::RadialGradient { center, radius, stops } => Fill::RadialGradient {
                center: *center,
                radius: *radius,
                stops: map_stops(stops, &mut f)?,
            },
            Fill::Pattern { kind, spacing, angle, scale, colors } => Fill::Pattern {
                kind: *kind,
                spacing: *spacing,
                angle: *angle,
                scale: *scale,
                colors: colors.iter().map(&mut f).collect::<Result<_, _>>()?,
            },
        })
    }
}

fn map_stops<E>(
    stops: &[ColorStop],
    f: &mut impl FnMut(&ColorSpec) -> Result<ColorSpec, E>,
) -> Result<Vec<ColorStop>, E> {
    stops
        .iter()
        .map(|s| Ok(ColorStop { position: s.position, color: f(&s.color)? }))
        .collect()
}
